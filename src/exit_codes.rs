//! Standard exit codes for the embedgen binary
//!
//! Every subcommand reports failures through these codes so build scripts
//! can tell a bad invocation apart from a broken input tree.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Generated source could not be parsed back (not produced by embedgen, or damaged)
pub const EXIT_PARSE_ERROR: i32 = 102;

/// Extraction error (unsafe resource path, destination not writable)
pub const EXIT_EXTRACTION_ERROR: i32 = 103;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (input unreadable, output not writable)
pub const EXIT_IO_ERROR: i32 = 106;

/// Generated source does not match its manifest sidecar
pub const EXIT_VERIFY_ERROR: i32 = 107;

/// Invalid glob pattern, or unmatched pattern in strict mode
pub const EXIT_PATTERN_ERROR: i32 = 108;
