//! Input enumeration: patterns in, ordered regular files out.
//!
//! Patterns are resolved against the base directory with `glob`. A matched
//! directory is not embedded itself; a `dir/*` pattern for it goes to the
//! back of the queue, so nested trees are walked breadth-first.

use crate::exceptions::{EmbedError, Result};
use crate::utils::{normalize_relative, relative_to};
use glob::{MatchOptions, Pattern};
use log::{debug, trace, warn};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// A regular file selected for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Forward-slash path relative to the base directory
    pub relative_path: String,
    /// Path to open on this host
    pub full_path: PathBuf,
}

/// Everything the enumerator found
#[derive(Debug, Default)]
pub struct Enumeration {
    /// Files in enumeration order, duplicates preserved
    pub files: Vec<InputFile>,
    /// Supplied patterns that matched nothing at all
    pub unmatched: Vec<String>,
}

#[derive(Debug)]
enum Origin {
    Supplied,
    Directory,
}

#[derive(Debug)]
struct QueuedPattern {
    pattern: String,
    origin: Origin,
}

/// Resolves patterns relative to a base directory
#[derive(Debug)]
pub struct InputEnumerator {
    base_dir: PathBuf,
    base_pattern: String,
    options: MatchOptions,
}

impl InputEnumerator {
    pub fn new(base_dir: &Path) -> Result<Self> {
        let base_str = base_dir.to_str().ok_or_else(|| {
            EmbedError::Pattern(format!(
                "Base directory is not valid UTF-8: {}",
                base_dir.display()
            ))
        })?;

        // Metacharacters in the base directory are literal
        let escaped = Pattern::escape(base_str);
        let trimmed = escaped.trim_end_matches(|c: char| c == '/' || c == '\\');
        let base_pattern = if trimmed.is_empty() && !escaped.is_empty() {
            // filesystem root
            "/".to_string()
        } else if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        };

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            base_pattern,
            options: MatchOptions {
                case_sensitive: true,
                require_literal_separator: true,
                require_literal_leading_dot: true,
            },
        })
    }

    /// Expand every pattern, in order, into the list of files to embed.
    ///
    /// Patterns are always relative to the base directory; absolute ones
    /// are rejected before anything is expanded.
    pub fn enumerate<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Enumeration> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            if is_absolute_pattern(pattern) {
                return Err(EmbedError::Pattern(format!(
                    "Pattern '{}' is absolute; patterns are relative to {}",
                    pattern,
                    self.base_dir.display()
                )));
            }
        }

        let mut queue: VecDeque<QueuedPattern> = patterns
            .iter()
            .map(|p| QueuedPattern {
                pattern: p.as_ref().to_string(),
                origin: Origin::Supplied,
            })
            .collect();
        let mut result = Enumeration::default();

        debug!(
            "🔍 Enumerating {} patterns under {:?}",
            queue.len(),
            self.base_dir
        );

        while let Some(item) = queue.pop_front() {
            let matched = self.expand(&item.pattern, &mut queue, &mut result.files)?;
            if matched == 0 {
                match item.origin {
                    Origin::Supplied => {
                        warn!("⚠️ Pattern '{}' matched no files", item.pattern);
                        result.unmatched.push(item.pattern);
                    }
                    Origin::Directory => trace!("📁 Empty directory: {}", item.pattern),
                }
            }
        }

        debug!("✅ Enumerated {} files", result.files.len());
        Ok(result)
    }

    /// Expand one pattern. Returns the number of filesystem matches.
    fn expand(
        &self,
        pattern: &str,
        queue: &mut VecDeque<QueuedPattern>,
        files: &mut Vec<InputFile>,
    ) -> Result<usize> {
        let full_pattern = format!("{}{}", self.base_pattern, pattern);
        trace!("🔎 Expanding {}", full_pattern);

        let paths = glob::glob_with(&full_pattern, self.options).map_err(|e| {
            EmbedError::Pattern(format!("Invalid pattern '{}': {}", pattern, e))
        })?;

        let mut matched = 0usize;
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("⚠️ Skipping unreadable path {:?}: {}", e.path(), e.error());
                    continue;
                }
            };
            matched += 1;

            let relative = self.relative_name(&path)?;

            if path.is_dir() {
                let child_pattern = format!("{}/*", Pattern::escape(&relative));
                trace!("📁 Queueing directory {}", child_pattern);
                queue.push_back(QueuedPattern {
                    pattern: child_pattern,
                    origin: Origin::Directory,
                });
            } else if path.is_file() {
                trace!("📄 {}", relative);
                files.push(InputFile {
                    relative_path: relative,
                    full_path: path,
                });
            } else {
                debug!("Skipping non-regular file {:?}", path);
            }
        }

        Ok(matched)
    }

    fn relative_name(&self, path: &Path) -> Result<String> {
        let relative = relative_to(&self.base_dir, path).ok_or_else(|| {
            EmbedError::Pattern(format!(
                "Match {} is outside base directory {}",
                path.display(),
                self.base_dir.display()
            ))
        })?;
        Ok(normalize_relative(&relative))
    }
}

fn is_absolute_pattern(pattern: &str) -> bool {
    pattern.starts_with(['/', '\\']) || Path::new(pattern).is_absolute()
}

/// Convenience wrapper: enumerate `patterns` under `base_dir`
pub fn enumerate_inputs<S: AsRef<str>>(base_dir: &Path, patterns: &[S]) -> Result<Enumeration> {
    InputEnumerator::new(base_dir)?.enumerate(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("shaders/nested/deeper")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("top.txt"), "top").unwrap();
        fs::write(root.join("shaders/a.vert"), "a").unwrap();
        fs::write(root.join("shaders/b.vert"), "b").unwrap();
        fs::write(root.join("shaders/c.frag"), "c").unwrap();
        fs::write(root.join("shaders/nested/n.glsl"), "n").unwrap();
        fs::write(root.join("shaders/nested/deeper/d.glsl"), "d").unwrap();
        fs::write(root.join("shaders/.hidden"), "h").unwrap();
        temp_dir
    }

    fn names(enumeration: &Enumeration) -> Vec<&str> {
        enumeration
            .files
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect()
    }

    #[test]
    fn test_wildcard_in_directory() {
        let temp_dir = tree();
        let result = enumerate_inputs(temp_dir.path(), &["shaders/*.vert"]).unwrap();
        assert_eq!(names(&result), vec!["shaders/a.vert", "shaders/b.vert"]);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_directory_expansion_is_breadth_first() {
        let temp_dir = tree();
        let result = enumerate_inputs(temp_dir.path(), &["shaders"]).unwrap();
        assert_eq!(
            names(&result),
            vec![
                "shaders/a.vert",
                "shaders/b.vert",
                "shaders/c.frag",
                "shaders/nested/n.glsl",
                "shaders/nested/deeper/d.glsl",
            ]
        );
    }

    #[test]
    fn test_star_expands_directories_after_files_of_the_same_level() {
        let temp_dir = tree();
        let result = enumerate_inputs(temp_dir.path(), &["*"]).unwrap();
        assert_eq!(
            names(&result),
            vec![
                "top.txt",
                "shaders/a.vert",
                "shaders/b.vert",
                "shaders/c.frag",
                "shaders/nested/n.glsl",
                "shaders/nested/deeper/d.glsl",
            ]
        );
    }

    #[test]
    fn test_missing_literal_is_not_an_error() {
        let temp_dir = tree();
        let result = enumerate_inputs(temp_dir.path(), &["missing.bin", "top.txt"]).unwrap();
        assert_eq!(names(&result), vec!["top.txt"]);
        assert_eq!(result.unmatched, vec!["missing.bin".to_string()]);
    }

    #[test]
    fn test_empty_directory_is_not_unmatched() {
        let temp_dir = tree();
        let result = enumerate_inputs(temp_dir.path(), &["empty"]).unwrap();
        assert!(result.files.is_empty());
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let temp_dir = tree();
        let result =
            enumerate_inputs(temp_dir.path(), &["shaders/a.vert", "shaders/*.vert"]).unwrap();
        assert_eq!(
            names(&result),
            vec!["shaders/a.vert", "shaders/a.vert", "shaders/b.vert"]
        );
    }

    #[test]
    fn test_hidden_files_need_literal_dot() {
        let temp_dir = tree();
        let result = enumerate_inputs(temp_dir.path(), &["shaders/*"]).unwrap();
        assert!(!names(&result).contains(&"shaders/.hidden"));

        let result = enumerate_inputs(temp_dir.path(), &["shaders/.hidden"]).unwrap();
        assert_eq!(names(&result), vec!["shaders/.hidden"]);
    }

    #[test]
    fn test_paths_use_forward_slashes() {
        let temp_dir = tree();
        let result = enumerate_inputs(temp_dir.path(), &["shaders"]).unwrap();
        for file in &result.files {
            assert!(!file.relative_path.contains('\\'));
            assert!(file.full_path.is_file());
        }
    }

    #[test]
    fn test_base_dir_metacharacters_are_literal() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("res[1]");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("x.bin"), "x").unwrap();

        let result = enumerate_inputs(&base, &["*.bin"]).unwrap();
        assert_eq!(names(&result), vec!["x.bin"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let temp_dir = tree();
        let err = enumerate_inputs(temp_dir.path(), &["shaders/[a"]).unwrap_err();
        assert!(matches!(err, EmbedError::Pattern(_)));
    }

    #[test]
    fn test_absolute_pattern_is_rejected() {
        let temp_dir = tree();
        let absolute = temp_dir.path().join("top.txt");
        let patterns = vec!["shaders".to_string(), absolute.display().to_string()];

        let err = enumerate_inputs(temp_dir.path(), &patterns).unwrap_err();
        assert!(matches!(err, EmbedError::Pattern(ref msg) if msg.contains("absolute")));
        assert!(is_absolute_pattern("/etc/*"));
        assert!(!is_absolute_pattern("shaders/*.vert"));
    }
}
