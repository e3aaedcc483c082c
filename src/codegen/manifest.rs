//! Manifest rows and the JSON sidecar

use super::defaults::symbol_name;
use super::encoder::EncodingStrategy;
use crate::exceptions::{EmbedError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One row of the emitted resource table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    /// Forward-slash path relative to the base directory
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// 1-based position; names the `fileData_<ordinal>` constant
    pub ordinal: usize,
    pub strategy: EncodingStrategy,
    /// Prefixed checksum of the embedded bytes, when it was computed
    pub checksum: Option<String>,
}

impl ManifestRow {
    pub fn symbol(&self) -> String {
        symbol_name(self.ordinal)
    }
}

/// JSON description of a generated translation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDocument {
    pub generator: String,
    pub table: String,
    pub resources: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub size: u64,
    pub symbol: String,
    pub strategy: EncodingStrategy,
    pub checksum: String,
}

impl TryFrom<&ManifestRow> for ManifestEntry {
    type Error = EmbedError;

    fn try_from(row: &ManifestRow) -> Result<Self> {
        let checksum = row.checksum.clone().ok_or_else(|| {
            EmbedError::Generic(format!("No checksum recorded for {}", row.path))
        })?;
        Ok(ManifestEntry {
            path: row.path.clone(),
            size: row.size,
            symbol: row.symbol(),
            strategy: row.strategy,
            checksum,
        })
    }
}

impl ManifestDocument {
    /// Build the sidecar for `rows`; every row needs a checksum
    pub fn new(generator: String, table: &str, rows: &[ManifestRow]) -> Result<Self> {
        Ok(ManifestDocument {
            generator,
            table: table.to_string(),
            resources: rows
                .iter()
                .map(ManifestEntry::try_from)
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// Write the document as pretty JSON with a trailing newline
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(path, json).map_err(|e| EmbedError::io_at(path, e))
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| EmbedError::io_at(path, e))?;
        Ok(serde_json::from_str(&data)?)
    }
}
