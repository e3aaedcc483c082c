//! Checksum utilities with prefixed format.
//!
//! Format: "algorithm:hexvalue" (e.g., "sha256:cafe8008...")

use sha2::{Digest, Sha256, Sha512};
use std::fmt;

/// Supported checksum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Sha256,
    Sha512,
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumAlgorithm::Sha256 => write!(f, "sha256"),
            ChecksumAlgorithm::Sha512 => write!(f, "sha512"),
        }
    }
}

/// Parse a prefixed checksum string into algorithm and hex digest
pub fn parse_checksum(checksum_str: &str) -> Result<(ChecksumAlgorithm, String), String> {
    let (prefix, value) = checksum_str
        .split_once(':')
        .ok_or_else(|| format!("Invalid checksum format: {}", checksum_str))?;

    let algo = match prefix {
        "sha256" => ChecksumAlgorithm::Sha256,
        "sha512" => ChecksumAlgorithm::Sha512,
        _ => return Err(format!("Unknown checksum algorithm: {}", prefix)),
    };

    Ok((algo, value.to_lowercase()))
}

/// Calculate a prefixed checksum of a byte slice
pub fn calculate_checksum_bytes(data: &[u8], algorithm: ChecksumAlgorithm) -> String {
    let digest = match algorithm {
        ChecksumAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        ChecksumAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
    };
    format!("{algorithm}:{digest}")
}

/// Verify data against a checksum string
pub fn verify_checksum(data: &[u8], checksum_str: &str) -> Result<bool, String> {
    let (algo, expected) = parse_checksum(checksum_str)?;
    let actual = calculate_checksum_bytes(data, algo);

    // Compare just the hex part
    let actual_hex = actual.split(':').next_back().unwrap_or(&actual);
    Ok(actual_hex == expected)
}
