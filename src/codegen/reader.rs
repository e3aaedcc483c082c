//! Reader for generated translation units
//!
//! Decodes the `fileData_N` constants and the resource table back into
//! bytes. Only the layout written by the emitter is understood: string
//! segments or char initializer lists, then one table whose rows reference
//! the constants by name.

use super::checksums::{ChecksumAlgorithm, calculate_checksum_bytes};
use super::defaults::{SYMBOL_PREFIX, symbol_name};
use super::encoder::{EncodingStrategy, select_strategy};
use super::escape::hex_value;
use crate::exceptions::{EmbedError, Result};
use log::{debug, trace};
use std::fs;
use std::path::Path;

/// One resource recovered from generated source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedResource {
    pub path: String,
    pub ordinal: usize,
    pub data: Vec<u8>,
}

impl EmbeddedResource {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn symbol(&self) -> String {
        symbol_name(self.ordinal)
    }

    pub fn strategy(&self) -> EncodingStrategy {
        select_strategy(self.data.len())
    }

    pub fn checksum(&self, algorithm: ChecksumAlgorithm) -> String {
        calculate_checksum_bytes(&self.data, algorithm)
    }
}

/// All resources of one generated file, in table order
#[derive(Debug, Clone, Default)]
pub struct GeneratedSource {
    resources: Vec<EmbeddedResource>,
}

impl GeneratedSource {
    /// Read and parse a generated file
    pub fn open(path: &Path, table_name: &str) -> Result<Self> {
        debug!("📖 Reading generated source {:?}", path);
        let bytes = fs::read(path).map_err(|e| EmbedError::io_at(path, e))?;
        let text = String::from_utf8(bytes).map_err(|e| {
            EmbedError::parse(format!(
                "{} is not UTF-8 (invalid byte at offset {})",
                path.display(),
                e.utf8_error().valid_up_to()
            ))
        })?;
        Self::parse(&text, table_name)
    }

    pub fn parse(text: &str, table_name: &str) -> Result<Self> {
        let mut scanner = Scanner::new(text);
        let declarations = parse_declarations(&mut scanner)?;
        trace!("Decoded {} declarations", declarations.len());

        let rows = parse_table(&mut scanner, table_name)?;
        if rows.len() != declarations.len() {
            return Err(EmbedError::parse(format!(
                "{} declarations but {} table rows",
                declarations.len(),
                rows.len()
            )));
        }

        let mut resources = Vec::with_capacity(rows.len());
        for (index, (row, data)) in rows.into_iter().zip(declarations).enumerate() {
            if row.ordinal != index + 1 {
                return Err(EmbedError::parse(format!(
                    "Row {} references {} instead of {}",
                    index + 1,
                    symbol_name(row.ordinal),
                    symbol_name(index + 1)
                )));
            }
            if row.size != data.len() as u64 {
                return Err(EmbedError::parse(format!(
                    "Row for {} declares {} bytes but {} holds {}",
                    row.path,
                    row.size,
                    symbol_name(row.ordinal),
                    data.len()
                )));
            }
            resources.push(EmbeddedResource {
                path: row.path,
                ordinal: row.ordinal,
                data,
            });
        }

        Ok(Self { resources })
    }

    /// Every resource descriptor, in table order
    pub fn resources(&self) -> &[EmbeddedResource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// First resource whose path equals `path`
    pub fn find(&self, path: &str) -> Option<&EmbeddedResource> {
        self.resources.iter().find(|r| r.path == path)
    }

    /// Resources under `prefix`, with the prefix removed from their paths
    pub fn with_prefix(&self, prefix: &str) -> Vec<EmbeddedResource> {
        self.resources
            .iter()
            .filter_map(|r| {
                r.path.strip_prefix(prefix).map(|rest| EmbeddedResource {
                    path: rest.to_string(),
                    ordinal: r.ordinal,
                    data: r.data.clone(),
                })
            })
            .collect()
    }

    pub fn into_resources(self) -> Vec<EmbeddedResource> {
        self.resources
    }
}


#[derive(Debug)]
struct TableRow {
    path: String,
    size: u64,
    ordinal: usize,
}

fn parse_declarations(scanner: &mut Scanner<'_>) -> Result<Vec<Vec<u8>>> {
    let marker = format!("const char {SYMBOL_PREFIX}");
    let mut declarations = Vec::new();

    while scanner.skip_to(&marker) {
        scanner.advance(marker.len());
        let ordinal = scanner.number()? as usize;
        if ordinal != declarations.len() + 1 {
            return Err(EmbedError::parse(format!(
                "Expected {} but found {}",
                symbol_name(declarations.len() + 1),
                symbol_name(ordinal)
            )));
        }
        scanner.expect("[]")?;
        scanner.skip_ws();
        scanner.expect("=")?;
        scanner.skip_ws();

        let data = if scanner.peek() == Some(b'{') {
            parse_char_list(scanner)?
        } else {
            parse_string_segments(scanner)?
        };
        scanner.skip_ws();
        scanner.expect(";")?;
        declarations.push(data);
    }

    Ok(declarations)
}

fn parse_string_segments(scanner: &mut Scanner<'_>) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    loop {
        scanner.skip_ws();
        if scanner.peek() != Some(b'"') {
            break;
        }
        scanner.string_literal(&mut data)?;
    }
    Ok(data)
}

fn parse_char_list(scanner: &mut Scanner<'_>) -> Result<Vec<u8>> {
    scanner.expect("{")?;
    let mut data = Vec::new();
    loop {
        scanner.skip_ws();
        match scanner.peek() {
            Some(b'}') => {
                scanner.advance(1);
                return Ok(data);
            }
            Some(b'\'') => {
                data.push(scanner.char_literal()?);
                scanner.skip_ws();
                if scanner.peek() == Some(b',') {
                    scanner.advance(1);
                }
            }
            other => {
                return Err(scanner.error(&format!(
                    "unexpected {} in initializer list",
                    describe(other)
                )));
            }
        }
    }
}

fn parse_table(scanner: &mut Scanner<'_>, table_name: &str) -> Result<Vec<TableRow>> {
    let marker = format!("> {table_name} = {{");
    if !scanner.skip_to(&marker) {
        return Err(EmbedError::parse(format!("Table {table_name} not found")));
    }
    scanner.advance(marker.len());

    let mut rows = Vec::new();
    loop {
        scanner.skip_ws();
        match scanner.peek() {
            Some(b'}') => {
                scanner.advance(1);
                scanner.expect(";")?;
                return Ok(rows);
            }
            Some(b'{') => {
                scanner.advance(1);
                scanner.skip_ws();
                let mut path = Vec::new();
                // paths may be split around hex escapes
                while scanner.peek() == Some(b'"') {
                    scanner.string_literal(&mut path)?;
                    scanner.skip_ws();
                }
                let path = String::from_utf8(path)
                    .map_err(|_| scanner.error("resource path is not UTF-8"))?;
                scanner.expect(",")?;
                scanner.skip_ws();
                let size = scanner.number()?;
                scanner.expect(",")?;
                scanner.skip_ws();
                scanner.expect(SYMBOL_PREFIX)?;
                let ordinal = scanner.number()? as usize;
                scanner.skip_ws();
                scanner.expect("}")?;
                scanner.skip_ws();
                if scanner.peek() == Some(b',') {
                    scanner.advance(1);
                }
                rows.push(TableRow {
                    path,
                    size,
                    ordinal,
                });
            }
            other => {
                return Err(scanner.error(&format!("unexpected {} in table", describe(other))));
            }
        }
    }
}

fn describe(byte: Option<u8>) -> String {
    match byte {
        Some(b) if b.is_ascii_graphic() => format!("'{}'", b as char),
        Some(b) => format!("byte {b:#04x}"),
        None => "end of input".to_string(),
    }
}

/// Byte cursor over generated text
struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            src: text.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, msg: &str) -> EmbedError {
        let line = self.src[..self.pos.min(self.src.len())]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1;
        EmbedError::parse(format!("line {line}: {msg}"))
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Move to the next occurrence of `needle`. On failure the position is
    /// left unchanged.
    fn skip_to(&mut self, needle: &str) -> bool {
        let needle = needle.as_bytes();
        let found = self.src[self.pos..]
            .windows(needle.len())
            .position(|w| w == needle);
        match found {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        if self.src[self.pos..].starts_with(token.as_bytes()) {
            self.advance(token.len());
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}', found {}", token, describe(self.peek()))))
        }
    }

    fn number(&mut self) -> Result<u64> {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.src[start..self.pos])
            .ok()
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| self.error("expected a number"))
    }

    /// Decode one `"..."` segment, appending its bytes
    fn string_literal(&mut self, out: &mut Vec<u8>) -> Result<()> {
        self.expect("\"")?;
        loop {
            match self.peek() {
                None | Some(b'\n') => return Err(self.error("unterminated string literal")),
                Some(b'"') => {
                    self.advance(1);
                    return Ok(());
                }
                Some(b'\\') => out.push(self.escape_sequence()?),
                Some(b) => {
                    out.push(b);
                    self.advance(1);
                }
            }
        }
    }

    /// Decode one `'c'` literal
    fn char_literal(&mut self) -> Result<u8> {
        self.expect("'")?;
        let value = match self.peek() {
            Some(b'\\') => self.escape_sequence()?,
            Some(b'\'') | Some(b'\n') | None => return Err(self.error("empty character literal")),
            Some(b) => {
                self.advance(1);
                b
            }
        };
        self.expect("'")?;
        Ok(value)
    }

    /// Decode an escape sequence starting at the backslash.
    ///
    /// Hex escapes take every following hex digit, as a C++ compiler would.
    fn escape_sequence(&mut self) -> Result<u8> {
        self.expect("\\")?;
        let c = self
            .peek()
            .ok_or_else(|| self.error("dangling backslash"))?;
        self.advance(1);
        match c {
            b't' => Ok(b'\t'),
            b'n' => Ok(b'\n'),
            b'r' => Ok(b'\r'),
            b'"' | b'\'' | b'\\' | b'?' => Ok(c),
            b'0' if !matches!(self.peek(), Some(b'0'..=b'7')) => Ok(0),
            b'x' => {
                let mut value: u32 = 0;
                let mut digits = 0;
                while let Some(d) = self.peek().and_then(hex_value) {
                    value = (value << 4) | u32::from(d);
                    digits += 1;
                    self.advance(1);
                    if value > 0xff {
                        return Err(self.error("hex escape out of range"));
                    }
                }
                if digits == 0 {
                    return Err(self.error("hex escape without digits"));
                }
                Ok(value as u8)
            }
            other => Err(self.error(&format!("unsupported escape \\{}", other as char))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::defaults::DEFAULT_TABLE_NAME;
    use crate::codegen::emitter::{Scaffolding, render_to_string};

    fn round_trip(resources: &[(&str, &[u8])]) -> GeneratedSource {
        let (text, _) = render_to_string(resources, &Scaffolding::default()).unwrap();
        GeneratedSource::parse(&text, DEFAULT_TABLE_NAME).unwrap()
    }

    #[test]
    fn test_round_trip_all_bytes_both_strategies() {
        let small: Vec<u8> = (0..=255u8).collect();
        let large: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        let source = round_trip(&[
            ("small.bin", small.as_slice()),
            ("dir/large.bin", large.as_slice()),
        ]);

        assert_eq!(source.len(), 2);
        assert_eq!(source.resources()[0].data, small);
        assert_eq!(source.resources()[0].strategy(), EncodingStrategy::StringLiteral);
        assert_eq!(source.resources()[1].data, large);
        assert_eq!(source.resources()[1].strategy(), EncodingStrategy::ByteArrayLiteral);
        assert_eq!(source.resources()[1].symbol(), "fileData_2");
    }

    #[test]
    fn test_hex_escape_followed_by_digit_survives() {
        let data = [0x00, b'a', b'b', 0x1f, b'7', 0xfe, b'F'];
        let source = round_trip(&[("hex", data.as_slice())]);
        assert_eq!(source.resources()[0].data, data);
    }

    #[test]
    fn test_four_special_bytes_decode() {
        let data = [0x00, b'\n', b'"', b'\\'];
        let source = round_trip(&[("special", data.as_slice())]);
        assert_eq!(source.resources()[0].data, data);
    }

    #[test]
    fn test_empty_file_and_empty_table() {
        let source = round_trip(&[("empty", b"".as_slice())]);
        assert_eq!(source.resources()[0].size(), 0);

        let source = round_trip(&[]);
        assert!(source.is_empty());
    }

    #[test]
    fn test_find_and_prefix() {
        let source = round_trip(&[
            ("vulkan/helper/helper.h", b"h".as_slice()),
            ("vulkan/helper/helper.cpp", b"cpp".as_slice()),
            ("gl/other.h", b"o".as_slice()),
        ]);

        assert_eq!(source.find("gl/other.h").unwrap().data, b"o");
        assert!(source.find("gl").is_none());

        let vulkan = source.with_prefix("vulkan/");
        assert_eq!(vulkan.len(), 2);
        assert_eq!(vulkan[0].path, "helper/helper.h");
        assert_eq!(vulkan[1].path, "helper/helper.cpp");
        assert_eq!(vulkan[1].ordinal, 2);
    }

    #[test]
    fn test_non_ascii_path() {
        let source = round_trip(&[("d\u{e9}cor/a.txt", b"x".as_slice())]);
        assert_eq!(source.resources()[0].path, "d\u{e9}cor/a.txt");
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let (text, _) =
            render_to_string(&[("a", b"abc".as_slice())], &Scaffolding::default()).unwrap();
        let tampered = text.replace("{\"a\", 3, fileData_1}", "{\"a\", 4, fileData_1}");
        let err = GeneratedSource::parse(&tampered, DEFAULT_TABLE_NAME).unwrap_err();
        assert!(matches!(err, EmbedError::Parse(_)));
    }

    #[test]
    fn test_wrong_table_name() {
        let (text, _) =
            render_to_string(&[("a", b"abc".as_slice())], &Scaffolding::default()).unwrap();
        assert!(GeneratedSource::parse(&text, "Other").is_err());
    }

    #[test]
    fn test_open_rejects_non_utf8_as_parse_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("binary.cpp");
        fs::write(&path, [b'/', b'/', 0xff, 0xfe, 0x00, b'\n']).unwrap();

        let err = GeneratedSource::open(&path, DEFAULT_TABLE_NAME).unwrap_err();
        assert!(matches!(err, EmbedError::Parse(_)));
        assert!(err.to_string().contains("offset 2"));
    }

    #[test]
    fn test_not_generated_source() {
        let err = GeneratedSource::parse("int main() { return 0; }", DEFAULT_TABLE_NAME)
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
