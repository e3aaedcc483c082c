//! Translation unit writer
//!
//! Declarations are written as files arrive; the table that references them
//! is written once every declaration is out, in the same order.

use super::checksums::{ChecksumAlgorithm, calculate_checksum_bytes};
use super::defaults::{
    DEFAULT_CONTAINER, DEFAULT_HEADER, DEFAULT_INDENT, DEFAULT_NAMESPACE, DEFAULT_ROW_TYPE,
    DEFAULT_TABLE_NAME, symbol_name,
};
use super::encoder::{encode_contents, write_quoted};
use super::enumerate::InputFile;
use super::manifest::ManifestRow;
use crate::exceptions::{EmbedError, Result};
use log::{debug, trace};
use std::fs;
use std::io::{self, Write};

/// Fixed text surrounding the declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffolding {
    /// Companion header included at the top
    pub header: String,
    /// Enclosing namespace (may be nested, `a::b`)
    pub namespace: String,
    /// Template used for the table, e.g. `rdcarray`
    pub container: String,
    /// Element type of the table
    pub row_type: String,
    /// Name of the exported table
    pub table_name: String,
}

impl Default for Scaffolding {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            row_type: DEFAULT_ROW_TYPE.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl Scaffolding {
    /// Reject names that would not compile
    pub fn validate(&self) -> Result<()> {
        if self.header.is_empty() || self.header.contains(['"', '\n', '\r']) {
            return Err(EmbedError::Usage(format!(
                "Invalid header name: {:?}",
                self.header
            )));
        }
        for (what, name) in [
            ("namespace", &self.namespace),
            ("container", &self.container),
            ("row type", &self.row_type),
        ] {
            if !is_qualified_identifier(name) {
                return Err(EmbedError::Usage(format!("Invalid {what}: {name:?}")));
            }
        }
        if !is_identifier(&self.table_name) {
            return Err(EmbedError::Usage(format!(
                "Invalid table name: {:?}",
                self.table_name
            )));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn is_qualified_identifier(name: &str) -> bool {
    name.split("::").all(is_identifier)
}

/// Streams one generated translation unit into `out`
#[derive(Debug)]
pub struct OutputWriter<W: Write> {
    out: W,
    scaffolding: Scaffolding,
    indent: usize,
    checksums: bool,
    rows: Vec<ManifestRow>,
}

impl<W: Write> OutputWriter<W> {
    /// Write the include and namespace openings
    pub fn begin(mut out: W, scaffolding: Scaffolding, indent: usize) -> io::Result<Self> {
        writeln!(out, "#include \"{}\"", scaffolding.header)?;
        writeln!(out, "namespace {}", scaffolding.namespace)?;
        writeln!(out, "{{")?;
        writeln!(out, "namespace")?;
        writeln!(out, "{{")?;

        Ok(Self {
            out,
            scaffolding,
            indent,
            checksums: true,
            rows: Vec::new(),
        })
    }

    /// Skip hashing the resources; rows then carry no checksum
    pub fn with_checksums(mut self, enabled: bool) -> Self {
        self.checksums = enabled;
        self
    }

    /// Declare the next constant and record its manifest row
    pub fn add_resource(&mut self, path: &str, contents: &[u8]) -> io::Result<&ManifestRow> {
        let ordinal = self.rows.len() + 1;
        write!(self.out, "const char {}[] =", symbol_name(ordinal))?;
        let strategy = encode_contents(&mut self.out, contents, self.indent)?;
        trace!(
            "✍️ {} -> {} ({} bytes, {})",
            path,
            symbol_name(ordinal),
            contents.len(),
            strategy
        );

        self.rows.push(ManifestRow {
            path: path.to_string(),
            size: contents.len() as u64,
            ordinal,
            strategy,
            checksum: self
                .checksums
                .then(|| calculate_checksum_bytes(contents, ChecksumAlgorithm::Sha256)),
        });
        Ok(&self.rows[ordinal - 1])
    }

    /// Close the inner block, write the table and close the namespace
    pub fn finish(mut self) -> io::Result<(W, Vec<ManifestRow>)> {
        let pad = " ".repeat(self.indent);
        writeln!(self.out, "}}    // namespace")?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}<{}> {} = {{",
            self.scaffolding.container, self.scaffolding.row_type, self.scaffolding.table_name
        )?;
        for row in &self.rows {
            write!(self.out, "{pad}{{")?;
            write_quoted(&mut self.out, row.path.as_bytes())?;
            writeln!(self.out, ", {}, {}}},", row.size, row.symbol())?;
        }
        writeln!(self.out, "}};")?;
        writeln!(self.out, "}}    // namespace {}", self.scaffolding.namespace)?;
        self.out.flush()?;

        Ok((self.out, self.rows))
    }
}

/// Emit a complete translation unit for `files` into `out`.
///
/// Each file is read right before it is encoded and dropped right after, so
/// only one file's content is in memory at a time. A read failure aborts the
/// run; whatever was written so far stays in `out`. Checksums are only
/// computed when `checksums` is set.
pub fn emit_translation_unit<W: Write>(
    out: W,
    files: &[InputFile],
    scaffolding: &Scaffolding,
    indent: usize,
    checksums: bool,
) -> Result<(W, Vec<ManifestRow>)> {
    let mut writer =
        OutputWriter::begin(out, scaffolding.clone(), indent)?.with_checksums(checksums);

    for file in files {
        let contents =
            fs::read(&file.full_path).map_err(|e| EmbedError::io_at(&file.full_path, e))?;
        let row = writer.add_resource(&file.relative_path, &contents)?;
        debug!(
            "📦 {} {} ({} bytes, {})",
            row.symbol(),
            row.path,
            row.size,
            row.strategy
        );
    }

    Ok(writer.finish()?)
}

/// Render a translation unit for in-memory resources (path, bytes)
pub fn render_to_string(
    resources: &[(&str, &[u8])],
    scaffolding: &Scaffolding,
) -> Result<(String, Vec<ManifestRow>)> {
    let mut writer = OutputWriter::begin(Vec::new(), scaffolding.clone(), DEFAULT_INDENT)?;
    for (path, contents) in resources {
        writer.add_resource(path, contents)?;
    }
    let (bytes, rows) = writer.finish()?;
    let text = String::from_utf8(bytes)
        .map_err(|e| EmbedError::Generic(format!("Generated source is not UTF-8: {e}")))?;
    Ok((text, rows))
}
