//! embedgen - embed resource files into a generated C++ translation unit
//!
//! Files selected by glob patterns under a base directory become `const char`
//! constants plus a table of `{path, size, data}` rows, so a program can ship
//! its resources inside the binary. Generated files can be listed, extracted
//! and verified again from their text.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,
    unreachable_pub,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,
)]
#![warn(
    // Documentation
    missing_docs,

    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::single_match_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![allow(missing_docs)]

pub mod api;
pub mod codegen;
pub mod exceptions;
pub mod exit_codes;
pub mod logger;
pub mod utils;
pub mod version;

// Re-export main API functions
pub use api::{GenerateOptions, GenerateSummary, VerifyResult, extract, generate, inspect, verify};
pub use exceptions::EmbedError;

// Re-export the generator building blocks
pub use codegen::{GeneratedSource, InputEnumerator, OutputWriter, Scaffolding};
