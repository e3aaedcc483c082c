//! High-level API for embedgen operations

use crate::codegen::checksums::verify_checksum;
use crate::codegen::defaults::DEFAULT_INDENT;
use crate::codegen::{
    GeneratedSource, InputEnumerator, InputFile, ManifestDocument, ManifestRow, Scaffolding,
    emit_translation_unit,
};
use crate::exceptions::{EmbedError, Result};
use crate::utils::is_contained_resource_path;
use log::{debug, info, trace, warn};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Options for generating a translation unit
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Indent of literal lines
    pub indent: usize,
    /// Include, namespace and table naming
    pub scaffolding: Scaffolding,
    /// Also write a JSON manifest here
    pub manifest_json: Option<PathBuf>,
    /// Fail when a supplied pattern matches nothing
    pub strict: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            scaffolding: Scaffolding::default(),
            manifest_json: None,
            strict: false,
        }
    }
}

/// What a generation run produced
#[derive(Debug)]
pub struct GenerateSummary {
    /// Manifest rows in emission order
    pub rows: Vec<ManifestRow>,
    /// Supplied patterns that matched nothing
    pub unmatched_patterns: Vec<String>,
}

impl GenerateSummary {
    pub fn total_bytes(&self) -> u64 {
        self.rows.iter().map(|r| r.size).sum()
    }
}

/// Result of checking a generated file against its sidecar
#[derive(Debug)]
pub struct VerifyResult {
    pub resource_count: usize,
    pub total_bytes: u64,
    pub generator: String,
}

/// Generate `output_path` from the files `patterns` select under `base_dir`
pub fn generate<S: AsRef<str>>(
    output_path: &Path,
    base_dir: &Path,
    patterns: &[S],
    options: &GenerateOptions,
) -> Result<GenerateSummary> {
    let start_time = Instant::now();
    info!("🔨 Generating {:?} from {:?}", output_path, base_dir);
    trace!("🔍 Generate options: {:?}", options);

    if patterns.is_empty() {
        return Err(EmbedError::Usage(
            "at least one input pattern is required".to_string(),
        ));
    }
    options.scaffolding.validate()?;

    // Phase 1: resolve inputs before the output is touched
    let enumeration = InputEnumerator::new(base_dir)?.enumerate(patterns)?;
    if options.strict && !enumeration.unmatched.is_empty() {
        return Err(EmbedError::UnmatchedPatterns(enumeration.unmatched));
    }
    let files = skip_output_file(enumeration.files, output_path);

    // Phase 2: write the translation unit
    let out = File::create(output_path).map_err(|e| EmbedError::io_at(output_path, e))?;
    let (_, rows) = emit_translation_unit(
        BufWriter::new(out),
        &files,
        &options.scaffolding,
        options.indent,
        options.manifest_json.is_some(),
    )
    .map_err(|e| match e {
        EmbedError::IoError(err) => EmbedError::io_at(output_path, err),
        other => other,
    })?;

    // Phase 3: optional sidecar
    if let Some(manifest_path) = &options.manifest_json {
        let document = ManifestDocument::new(
            crate::version::generator_id(),
            &options.scaffolding.table_name,
            &rows,
        )?;
        document.write_to(manifest_path)?;
        debug!("🧾 Wrote manifest sidecar {:?}", manifest_path);
    }

    let summary = GenerateSummary {
        rows,
        unmatched_patterns: enumeration.unmatched,
    };
    info!(
        "✅ Embedded {} files ({} bytes) in {:?}",
        summary.rows.len(),
        summary.total_bytes(),
        start_time.elapsed()
    );
    Ok(summary)
}

/// Drop matches that are the output file itself; it is truncated before
/// inputs are read.
fn skip_output_file(files: Vec<InputFile>, output_path: &Path) -> Vec<InputFile> {
    let Ok(output) = output_path.canonicalize() else {
        return files;
    };
    files
        .into_iter()
        .filter(|file| {
            let is_output = file
                .full_path
                .canonicalize()
                .map(|p| p == output)
                .unwrap_or(false);
            if is_output {
                warn!("⚠️ Skipping {}: it is the output file", file.relative_path);
            }
            !is_output
        })
        .collect()
}

/// Parse a generated file back into its resources
pub fn inspect(generated: &Path, table_name: &str) -> Result<GeneratedSource> {
    GeneratedSource::open(generated, table_name)
}

/// Write the resources of a generated file below `dest_dir`.
///
/// With a prefix only resources under it are written, with the prefix
/// stripped. Returns the written paths in table order.
pub fn extract(
    generated: &Path,
    dest_dir: &Path,
    prefix: Option<&str>,
    table_name: &str,
) -> Result<Vec<PathBuf>> {
    let source = GeneratedSource::open(generated, table_name)?;
    let selected = match prefix {
        Some(prefix) => source.with_prefix(prefix),
        None => source.into_resources(),
    };
    debug!("📦 Extracting {} resources to {:?}", selected.len(), dest_dir);

    let mut written = Vec::with_capacity(selected.len());
    for resource in &selected {
        if !is_contained_resource_path(&resource.path) {
            return Err(EmbedError::Extraction(format!(
                "Refusing to write {:?} outside {}",
                resource.path,
                dest_dir.display()
            )));
        }

        let target = resource
            .path
            .split('/')
            .fold(dest_dir.to_path_buf(), |acc, part| acc.join(part));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| EmbedError::io_at(parent, e))?;
        }
        fs::write(&target, &resource.data).map_err(|e| EmbedError::io_at(&target, e))?;
        trace!("📄 {} -> {:?}", resource.path, target);
        written.push(target);
    }

    Ok(written)
}

/// Check a generated file against the sidecar written with it
pub fn verify(generated: &Path, manifest_json: &Path) -> Result<VerifyResult> {
    info!("🔍 Verifying {:?} against {:?}", generated, manifest_json);
    let document = ManifestDocument::read_from(manifest_json)?;
    let source = GeneratedSource::open(generated, &document.table)?;

    let mut problems = Vec::new();
    if source.len() != document.resources.len() {
        problems.push(format!(
            "manifest lists {} resources, generated source holds {}",
            document.resources.len(),
            source.len()
        ));
    }

    for (entry, resource) in document.resources.iter().zip(source.resources()) {
        if entry.path != resource.path {
            problems.push(format!(
                "{}: expected path {}, found {}",
                entry.symbol, entry.path, resource.path
            ));
        }
        if entry.symbol != resource.symbol() {
            problems.push(format!(
                "{}: declared as {}",
                entry.path,
                resource.symbol()
            ));
        }
        if entry.size != resource.size() as u64 {
            problems.push(format!(
                "{}: expected {} bytes, found {}",
                entry.path,
                entry.size,
                resource.size()
            ));
        }
        match verify_checksum(&resource.data, &entry.checksum) {
            Ok(true) => {}
            Ok(false) => problems.push(format!("{}: checksum mismatch", entry.path)),
            Err(e) => problems.push(format!("{}: {}", entry.path, e)),
        }
    }

    if !problems.is_empty() {
        return Err(EmbedError::Verification(problems));
    }

    Ok(VerifyResult {
        resource_count: source.len(),
        total_bytes: source.resources().iter().map(|r| r.size() as u64).sum(),
        generator: document.generator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::EncodingStrategy;
    use crate::codegen::defaults::DEFAULT_TABLE_NAME;
    use tempfile::TempDir;

    /// res/shaders/a.vert (10 bytes) and res/shaders/b.vert (70000 bytes)
    fn shader_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let shaders = temp_dir.path().join("res/shaders");
        fs::create_dir_all(&shaders).unwrap();
        fs::write(shaders.join("a.vert"), b"void main;").unwrap();
        let big: Vec<u8> = (0..70_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(shaders.join("b.vert"), big).unwrap();
        temp_dir
    }

    #[test]
    fn test_mixed_strategies_scenario() {
        let temp_dir = shader_tree();
        let output = temp_dir.path().join("resources.cpp");
        let summary = generate(
            &output,
            &temp_dir.path().join("res"),
            &["shaders/*"],
            &GenerateOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].path, "shaders/a.vert");
        assert_eq!(summary.rows[0].size, 10);
        assert_eq!(summary.rows[0].strategy, EncodingStrategy::StringLiteral);
        assert_eq!(summary.rows[1].path, "shaders/b.vert");
        assert_eq!(summary.rows[1].size, 70_000);
        assert_eq!(summary.rows[1].strategy, EncodingStrategy::ByteArrayLiteral);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("const char fileData_1[] =\n  \"void main;\";\n"));
        assert!(text.contains("const char fileData_2[] = {\n"));
        let first = text.find("{\"shaders/a.vert\", 10, fileData_1},").unwrap();
        let second = text.find("{\"shaders/b.vert\", 70000, fileData_2},").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_checksums_follow_sidecar_request() {
        let temp_dir = shader_tree();
        let base = temp_dir.path().join("res");
        let output = temp_dir.path().join("out.cpp");

        let plain = generate(&output, &base, &["shaders/a.vert"], &GenerateOptions::default())
            .unwrap();
        assert!(plain.rows[0].checksum.is_none());

        let options = GenerateOptions {
            manifest_json: Some(temp_dir.path().join("out.json")),
            ..Default::default()
        };
        let hashed = generate(&output, &base, &["shaders/a.vert"], &options).unwrap();
        assert!(hashed.rows[0].checksum.as_deref().unwrap().starts_with("sha256:"));
    }

    #[test]
    fn test_absolute_pattern_writes_nothing() {
        let temp_dir = shader_tree();
        let output = temp_dir.path().join("out.cpp");
        let absolute = temp_dir.path().join("res/shaders/a.vert");
        let err = generate(
            &output,
            &temp_dir.path().join("res"),
            &[absolute.display().to_string()],
            &GenerateOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, EmbedError::Pattern(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_pattern_is_success() {
        let temp_dir = shader_tree();
        let output = temp_dir.path().join("out.cpp");
        let summary = generate(
            &output,
            &temp_dir.path().join("res"),
            &["missing.bin"],
            &GenerateOptions::default(),
        )
        .unwrap();

        assert!(summary.rows.is_empty());
        assert_eq!(summary.unmatched_patterns, vec!["missing.bin".to_string()]);
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("ResourceFiles = {\n};"));
    }

    #[test]
    fn test_strict_mode_rejects_unmatched_before_writing() {
        let temp_dir = shader_tree();
        let output = temp_dir.path().join("out.cpp");
        let options = GenerateOptions {
            strict: true,
            ..Default::default()
        };
        let err = generate(
            &output,
            &temp_dir.path().join("res"),
            &["shaders/a.vert", "typo.vert"],
            &options,
        )
        .unwrap_err();

        assert!(matches!(err, EmbedError::UnmatchedPatterns(ref p) if p == &["typo.vert"]));
        assert!(!output.exists());
    }

    #[test]
    fn test_generation_is_idempotent() {
        let temp_dir = shader_tree();
        let base = temp_dir.path().join("res");
        let first = temp_dir.path().join("first.cpp");
        let second = temp_dir.path().join("second.cpp");
        let options = GenerateOptions {
            manifest_json: Some(temp_dir.path().join("first.json")),
            ..Default::default()
        };

        generate(&first, &base, &["shaders"], &options).unwrap();
        let options = GenerateOptions {
            manifest_json: Some(temp_dir.path().join("second.json")),
            ..Default::default()
        };
        generate(&second, &base, &["shaders"], &options).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
        assert_eq!(
            fs::read(temp_dir.path().join("first.json")).unwrap(),
            fs::read(temp_dir.path().join("second.json")).unwrap()
        );
    }

    #[test]
    fn test_regeneration_replaces_previous_output() {
        let temp_dir = shader_tree();
        let output = temp_dir.path().join("out.cpp");
        fs::write(&output, "stale contents that are much longer than nothing").unwrap();

        generate(
            &output,
            &temp_dir.path().join("res"),
            &["nothing"],
            &GenerateOptions::default(),
        )
        .unwrap();
        let text = fs::read_to_string(&output).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.starts_with("#include"));
    }

    #[test]
    fn test_output_inside_base_is_skipped() {
        let temp_dir = shader_tree();
        let base = temp_dir.path().join("res");
        let output = base.join("shaders/generated.cpp");
        fs::write(&output, "previous run").unwrap();

        let summary = generate(&output, &base, &["shaders/*"], &GenerateOptions::default())
            .unwrap();
        let paths: Vec<&str> = summary.rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["shaders/a.vert", "shaders/b.vert"]);
    }

    #[test]
    fn test_no_patterns_is_usage_error() {
        let temp_dir = shader_tree();
        let output = temp_dir.path().join("out.cpp");
        let patterns: [&str; 0] = [];
        let err = generate(&output, temp_dir.path(), &patterns, &GenerateOptions::default())
            .unwrap_err();
        assert!(matches!(err, EmbedError::Usage(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_extract_round_trip() {
        let temp_dir = shader_tree();
        let base = temp_dir.path().join("res");
        let output = temp_dir.path().join("out.cpp");
        generate(&output, &base, &["shaders"], &GenerateOptions::default()).unwrap();

        let dest = temp_dir.path().join("extracted");
        let written = extract(&output, &dest, None, DEFAULT_TABLE_NAME).unwrap();
        assert_eq!(written.len(), 2);
        for name in ["a.vert", "b.vert"] {
            assert_eq!(
                fs::read(dest.join("shaders").join(name)).unwrap(),
                fs::read(base.join("shaders").join(name)).unwrap()
            );
        }

        let flat = temp_dir.path().join("flat");
        extract(&output, &flat, Some("shaders/"), DEFAULT_TABLE_NAME).unwrap();
        assert!(flat.join("a.vert").is_file());
        assert!(flat.join("b.vert").is_file());
    }

    #[test]
    fn test_extract_rejects_escaping_paths() {
        let temp_dir = TempDir::new().unwrap();
        let (text, _) = crate::codegen::render_to_string(
            &[("../evil", b"x".as_slice())],
            &Scaffolding::default(),
        )
        .unwrap();
        let generated = temp_dir.path().join("evil.cpp");
        fs::write(&generated, text).unwrap();

        let err = extract(
            &generated,
            &temp_dir.path().join("dest"),
            None,
            DEFAULT_TABLE_NAME,
        )
        .unwrap_err();
        assert!(matches!(err, EmbedError::Extraction(_)));
    }

    #[test]
    fn test_verify_against_sidecar() {
        let temp_dir = shader_tree();
        let output = temp_dir.path().join("out.cpp");
        let sidecar = temp_dir.path().join("out.json");
        let options = GenerateOptions {
            manifest_json: Some(sidecar.clone()),
            ..Default::default()
        };
        generate(&output, &temp_dir.path().join("res"), &["shaders/*"], &options).unwrap();

        let result = verify(&output, &sidecar).unwrap();
        assert_eq!(result.resource_count, 2);
        assert_eq!(result.total_bytes, 70_010);

        // Same length, different content
        let text = fs::read_to_string(&output).unwrap();
        fs::write(&output, text.replace("void main;", "void mein;")).unwrap();
        let err = verify(&output, &sidecar).unwrap_err();
        match err {
            EmbedError::Verification(problems) => {
                assert_eq!(problems, vec!["shaders/a.vert: checksum mismatch".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_table_name_round_trip() {
        let temp_dir = shader_tree();
        let output = temp_dir.path().join("out.cpp");
        let mut options = GenerateOptions::default();
        options.scaffolding.table_name = "ShaderFiles".to_string();
        generate(&output, &temp_dir.path().join("res"), &["shaders/a.vert"], &options).unwrap();

        let source = inspect(&output, "ShaderFiles").unwrap();
        assert_eq!(source.find("shaders/a.vert").unwrap().data, b"void main;");
        assert!(inspect(&output, DEFAULT_TABLE_NAME).is_err());
    }
}
