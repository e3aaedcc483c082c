// src/codegen/defaults.rs
// Centralized default values for generated translation units

// =================================
// Encoding limits
// =================================
/// Largest content emitted as a string literal. MSVC caps a single string
/// literal at 65535 bytes including the implicit terminator.
pub const LITERAL_THRESHOLD: usize = 65_534;
/// A segment or initializer line is broken once its escaped text passes this width
pub const WRAP_COLUMN: usize = 120;
pub const DEFAULT_INDENT: usize = 2;

// =================================
// Scaffolding defaults
// =================================
pub const DEFAULT_HEADER: &str = "cpp_codec_resource.h";
pub const DEFAULT_NAMESPACE: &str = "cpp_codec";
pub const DEFAULT_CONTAINER: &str = "rdcarray";
pub const DEFAULT_ROW_TYPE: &str = "ResourceFileDesc";
pub const DEFAULT_TABLE_NAME: &str = "ResourceFiles";

// =================================
// Symbols
// =================================
/// Prefix of every declared constant; the 1-based ordinal follows it
pub const SYMBOL_PREFIX: &str = "fileData_";

/// Name of the constant holding the resource with the given ordinal
pub fn symbol_name(ordinal: usize) -> String {
    format!("{SYMBOL_PREFIX}{ordinal}")
}
