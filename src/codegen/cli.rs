//! CLI command handlers for generated translation units

use super::checksums::ChecksumAlgorithm;
use super::manifest::ManifestEntry;
use crate::api::{self, GenerateOptions};
use crate::exceptions::EmbedError;
use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_VERIFY_ERROR};
use anyhow::Context;
use std::path::Path;

/// Generate a translation unit and report what went in
pub fn generate_resources(
    output: &Path,
    base_dir: &Path,
    patterns: &[String],
    options: &GenerateOptions,
) -> i32 {
    let summary = match api::generate(output, base_dir, patterns, options) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("❌ Generation failed: {}", e);
            return e.exit_code();
        }
    };

    for pattern in &summary.unmatched_patterns {
        eprintln!("⚠️ Pattern matched no files: {}", pattern);
    }
    println!(
        "✅ Embedded {} files ({} bytes) into {}",
        summary.rows.len(),
        summary.total_bytes(),
        output.display()
    );
    EXIT_SUCCESS
}

/// List the resources of a generated file
pub fn show_resources(generated: &Path, table_name: &str, json: bool) -> i32 {
    log::trace!("show_resources starting for: {:?}", generated);
    let source = match api::inspect(generated, table_name) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: Failed to read generated source: {}", e);
            return e.exit_code();
        }
    };

    if json {
        let resources: Vec<ManifestEntry> = source
            .resources()
            .iter()
            .map(|r| ManifestEntry {
                path: r.path.clone(),
                size: r.size() as u64,
                symbol: r.symbol(),
                strategy: r.strategy(),
                checksum: r.checksum(ChecksumAlgorithm::Sha256),
            })
            .collect();
        let document = serde_json::json!({
            "table": table_name,
            "resources": resources,
        });
        return match serde_json::to_string_pretty(&document)
            .with_context(|| format!("Failed to encode resources of {}", generated.display()))
        {
            Ok(text) => {
                println!("{}", text);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                EXIT_ERROR
            }
        };
    }

    let total: usize = source.resources().iter().map(|r| r.size()).sum();
    println!("📦 Embedded Resources ({}):", table_name);
    for resource in source.resources() {
        println!(
            "  {:<12} {:>10}  {:<6}  {}",
            resource.symbol(),
            resource.size(),
            resource.strategy(),
            resource.path
        );
    }
    println!();
    println!("📊 {} resources, {} bytes", source.len(), total);

    EXIT_SUCCESS
}

/// Write embedded resources back to disk
pub fn extract_resources(
    generated: &Path,
    dest_dir: &Path,
    prefix: Option<&str>,
    table_name: &str,
) -> i32 {
    match api::extract(generated, dest_dir, prefix, table_name) {
        Ok(written) => {
            for path in &written {
                println!("  📄 {}", path.display());
            }
            println!("✅ Extracted {} files to {}", written.len(), dest_dir.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Extraction failed: {}", e);
            e.exit_code()
        }
    }
}

/// Check a generated file against its manifest sidecar
pub fn verify_generated(generated: &Path, manifest_json: &Path) -> i32 {
    println!("🔍 Verifying {:?}", generated);

    match api::verify(generated, manifest_json) {
        Ok(result) => {
            println!("  ✓ Generator: {}", result.generator);
            println!("  ✓ {} resources match", result.resource_count);
            println!("  ✓ {} bytes checked", result.total_bytes);
            println!();
            println!("✅ Generated source is intact");
            EXIT_SUCCESS
        }
        Err(EmbedError::Verification(problems)) => {
            for problem in &problems {
                println!("  ✗ {}", problem);
            }
            println!();
            println!("❌ Verification failed ({} problems)", problems.len());
            EXIT_VERIFY_ERROR
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::defaults::DEFAULT_TABLE_NAME;
    use crate::exit_codes::{EXIT_IO_ERROR, EXIT_PARSE_ERROR};
    use std::fs;
    use tempfile::TempDir;

    fn generated_tree() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("res");
        fs::create_dir_all(base.join("text")).unwrap();
        fs::write(base.join("text/hello.txt"), "hello\n").unwrap();
        let output = temp_dir.path().join("out.cpp");
        let sidecar = temp_dir.path().join("out.json");
        let options = GenerateOptions {
            manifest_json: Some(sidecar.clone()),
            ..Default::default()
        };
        let patterns = vec!["text".to_string()];
        assert_eq!(
            generate_resources(&output, &base, &patterns, &options),
            EXIT_SUCCESS
        );
        (temp_dir, output, sidecar)
    }

    #[test]
    fn test_handlers_succeed_on_fresh_output() {
        let (temp_dir, output, sidecar) = generated_tree();
        assert_eq!(show_resources(&output, DEFAULT_TABLE_NAME, false), EXIT_SUCCESS);
        assert_eq!(show_resources(&output, DEFAULT_TABLE_NAME, true), EXIT_SUCCESS);
        assert_eq!(verify_generated(&output, &sidecar), EXIT_SUCCESS);

        let dest = temp_dir.path().join("dest");
        assert_eq!(
            extract_resources(&output, &dest, None, DEFAULT_TABLE_NAME),
            EXIT_SUCCESS
        );
        assert_eq!(fs::read(dest.join("text/hello.txt")).unwrap(), b"hello\n");
    }

    #[test]
    fn test_handlers_report_failures() {
        let (temp_dir, output, sidecar) = generated_tree();
        let missing = temp_dir.path().join("missing.cpp");
        assert_eq!(show_resources(&missing, DEFAULT_TABLE_NAME, false), EXIT_IO_ERROR);

        fs::write(&output, "int main() {}\n").unwrap();
        assert_eq!(show_resources(&output, DEFAULT_TABLE_NAME, false), EXIT_PARSE_ERROR);

        let binary = temp_dir.path().join("binary.cpp");
        fs::write(&binary, [0xc3u8, 0x28, 0xa0, 0xa1]).unwrap();
        assert_eq!(show_resources(&binary, DEFAULT_TABLE_NAME, false), EXIT_PARSE_ERROR);
        assert_eq!(
            extract_resources(&binary, &temp_dir.path().join("dest"), None, DEFAULT_TABLE_NAME),
            EXIT_PARSE_ERROR
        );

        let (_other_dir, good_output, _) = generated_tree();
        let text = fs::read_to_string(&good_output).unwrap();
        fs::write(&output, text.replace("hello\\n", "HELLO\\n")).unwrap();
        assert_eq!(verify_generated(&output, &sidecar), EXIT_VERIFY_ERROR);
    }
}
