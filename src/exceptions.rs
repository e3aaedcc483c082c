//! Error types for embedgen

use crate::exit_codes::{
    EXIT_ERROR, EXIT_EXTRACTION_ERROR, EXIT_INVALID_ARGS, EXIT_IO_ERROR, EXIT_PARSE_ERROR,
    EXIT_PATTERN_ERROR, EXIT_VERIFY_ERROR,
};
use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for embedgen operations
#[derive(Debug)]
pub enum EmbedError {
    /// Missing or malformed command-line arguments
    Usage(String),

    /// IO error tied to a specific file
    Io { path: PathBuf, source: std::io::Error },

    /// IO error without a known path
    IoError(std::io::Error),

    /// Invalid glob pattern or base directory
    Pattern(String),

    /// Supplied patterns that matched nothing (strict mode)
    UnmatchedPatterns(Vec<String>),

    /// Generated source could not be parsed back
    Parse(String),

    /// Generated source disagrees with its manifest sidecar
    Verification(Vec<String>),

    /// Resource path rejected during extraction
    Extraction(String),

    /// JSON error
    JsonError(serde_json::Error),

    /// Generic error with message
    Generic(String),
}

impl EmbedError {
    /// Wrap an IO error with the path it happened on
    pub fn io_at(path: &Path, source: std::io::Error) -> Self {
        EmbedError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        EmbedError::Parse(msg.into())
    }

    /// Process exit code reported for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            EmbedError::Usage(_) => EXIT_INVALID_ARGS,
            EmbedError::Io { .. } | EmbedError::IoError(_) => EXIT_IO_ERROR,
            EmbedError::Pattern(_) | EmbedError::UnmatchedPatterns(_) => EXIT_PATTERN_ERROR,
            EmbedError::Parse(_) | EmbedError::JsonError(_) => EXIT_PARSE_ERROR,
            EmbedError::Verification(_) => EXIT_VERIFY_ERROR,
            EmbedError::Extraction(_) => EXIT_EXTRACTION_ERROR,
            EmbedError::Generic(_) => EXIT_ERROR,
        }
    }
}

impl fmt::Display for EmbedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedError::Usage(msg) => write!(f, "Usage error: {msg}"),
            EmbedError::Io { path, source } => {
                write!(f, "IO error on {}: {source}", path.display())
            }
            EmbedError::IoError(err) => write!(f, "IO error: {err}"),
            EmbedError::Pattern(msg) => write!(f, "Pattern error: {msg}"),
            EmbedError::UnmatchedPatterns(patterns) => {
                write!(f, "Patterns matched no files: {}", patterns.join(", "))
            }
            EmbedError::Parse(msg) => write!(f, "Malformed generated source: {msg}"),
            EmbedError::Verification(problems) => {
                write!(f, "Verification failed: {}", problems.join("; "))
            }
            EmbedError::Extraction(msg) => write!(f, "Extraction error: {msg}"),
            EmbedError::JsonError(err) => write!(f, "JSON error: {err}"),
            EmbedError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EmbedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmbedError::Io { source, .. } => Some(source),
            EmbedError::IoError(err) => Some(err),
            EmbedError::JsonError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EmbedError {
    fn from(err: std::io::Error) -> Self {
        EmbedError::IoError(err)
    }
}

impl From<serde_json::Error> for EmbedError {
    fn from(err: serde_json::Error) -> Self {
        EmbedError::JsonError(err)
    }
}

impl From<glob::PatternError> for EmbedError {
    fn from(err: glob::PatternError) -> Self {
        EmbedError::Pattern(err.to_string())
    }
}

impl From<anyhow::Error> for EmbedError {
    fn from(err: anyhow::Error) -> Self {
        EmbedError::Generic(err.to_string())
    }
}

/// Result type for embedgen operations
pub type Result<T> = std::result::Result<T, EmbedError>;
