//! Rendering of resource bytes as C++ literal initializers

use super::defaults::{LITERAL_THRESHOLD, WRAP_COLUMN};
use super::escape::{EscapeContext, escape_byte};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// How a resource's bytes are spelled in the generated source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStrategy {
    /// Adjacent `"..."` segments
    StringLiteral,
    /// `{ 'a','b',... }` initializer list
    ByteArrayLiteral,
}

impl fmt::Display for EncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingStrategy::StringLiteral => write!(f, "string"),
            EncodingStrategy::ByteArrayLiteral => write!(f, "bytes"),
        }
    }
}

/// Pick the strategy for content of the given length
pub fn select_strategy(len: usize) -> EncodingStrategy {
    if len > LITERAL_THRESHOLD {
        EncodingStrategy::ByteArrayLiteral
    } else {
        EncodingStrategy::StringLiteral
    }
}

/// Write the initializer for `contents`, starting right after the `=` of the
/// declaration and ending with the statement terminator and a newline.
pub fn encode_contents<W: Write>(
    out: &mut W,
    contents: &[u8],
    indent: usize,
) -> io::Result<EncodingStrategy> {
    let strategy = select_strategy(contents.len());
    match strategy {
        EncodingStrategy::StringLiteral => write_string_literal(out, contents, indent)?,
        EncodingStrategy::ByteArrayLiteral => write_byte_array(out, contents, indent)?,
    }
    Ok(strategy)
}

fn write_string_literal<W: Write>(out: &mut W, contents: &[u8], indent: usize) -> io::Result<()> {
    let pad = " ".repeat(indent);
    out.write_all(b"\n")?;

    if contents.is_empty() {
        writeln!(out, "{pad}\"\";")?;
        return Ok(());
    }

    let mut column = 0usize;
    let mut after_hex = false;
    for &byte in contents {
        let escaped = escape_byte(byte, EscapeContext::String);
        if column == 0 {
            write!(out, "{pad}\"")?;
        } else if after_hex && escaped.is_raw_hex_digit() {
            // "\x00a" would parse as one escape
            out.write_all(b"\"\"")?;
            column += 2;
        }
        out.write_all(escaped.as_bytes())?;
        column += escaped.len();
        after_hex = escaped.is_hex_escape();

        if column > WRAP_COLUMN {
            column = 0;
            out.write_all(b"\"\n")?;
        }
    }
    if column > 0 {
        out.write_all(b"\"")?;
    }
    out.write_all(b";\n")
}

fn write_byte_array<W: Write>(out: &mut W, contents: &[u8], indent: usize) -> io::Result<()> {
    let pad = " ".repeat(indent);
    out.write_all(b" {\n")?;

    let mut column = 0usize;
    for &byte in contents {
        if column == 0 {
            out.write_all(pad.as_bytes())?;
        }
        let escaped = escape_byte(byte, EscapeContext::Char);
        out.write_all(b"'")?;
        out.write_all(escaped.as_bytes())?;
        out.write_all(b"',")?;
        column += escaped.len() + 3;

        if column > WRAP_COLUMN {
            column = 0;
            out.write_all(b"\n")?;
        }
    }
    if column > 0 {
        out.write_all(b"\n")?;
    }
    writeln!(out, "{pad}}};")
}

/// Write `bytes` as a single quoted string literal without line wrapping.
///
/// Used for manifest paths. Hex escapes followed by a hex digit are split
/// the same way as in resource data.
pub fn write_quoted<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    out.write_all(b"\"")?;
    let mut after_hex = false;
    for &byte in bytes {
        let escaped = escape_byte(byte, EscapeContext::String);
        if after_hex && escaped.is_raw_hex_digit() {
            out.write_all(b"\"\"")?;
        }
        out.write_all(escaped.as_bytes())?;
        after_hex = escaped.is_hex_escape();
    }
    out.write_all(b"\"")
}
