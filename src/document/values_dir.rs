//! Discovery, loading and write-back of values files.

use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, DocumentError, HelmfixError, Result};

/// File extensions treated as values files (compared case-insensitively).
pub const VALUES_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// A directory of Helm values files.
#[derive(Debug, Clone)]
pub struct ValuesDir {
    root: PathBuf,
}

/// A values file parsed into memory.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Path of the file on disk.
    pub path: PathBuf,
    /// Parsed document tree.
    pub value: Value,
}

impl ValuesDir {
    /// Opens a values directory.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the path does not exist or is not a
    /// directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(HelmfixError::Config(ConfigError::NotADirectory { path: root }));
        }
        Ok(Self { root })
    }

    /// Returns the directory path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists the values files in the directory, sorted by file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file() && is_values_file(&path) {
                files.push(path);
            }
        }

        files.sort();
        debug!("Found {} values files in {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Returns a lazy sequence of `(path, parse result)` pairs.
    ///
    /// Each file is read and parsed only when the iterator reaches it, so a
    /// caller can process and write one file before the next is opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn documents(
        &self,
    ) -> Result<impl Iterator<Item = (PathBuf, std::result::Result<LoadedDocument, DocumentError>)>> {
        let files = self.files()?;
        Ok(files.into_iter().map(|path| {
            let loaded = LoadedDocument::load(&path);
            (path, loaded)
        }))
    }
}

impl LoadedDocument {
    /// Reads and parses a values file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load(path: &Path) -> std::result::Result<Self, DocumentError> {
        let source = std::fs::read_to_string(path).map_err(|e| DocumentError::Access {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(path, &source)
    }

    /// Parses already-read file contents.
    ///
    /// An empty file parses to a null document.
    ///
    /// # Errors
    ///
    /// Returns an error if the contents are not valid YAML.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> std::result::Result<Self, DocumentError> {
        let value = if source.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(source).map_err(|e| DocumentError::Parse {
                message: e.to_string(),
            })?
        };

        Ok(Self {
            path: path.into(),
            value,
        })
    }

    /// Serializes the document in block style.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be serialized.
    pub fn render(&self) -> std::result::Result<String, DocumentError> {
        serde_yaml::to_string(&self.value).map_err(|e| DocumentError::Serialize {
            message: e.to_string(),
        })
    }

    /// Writes the document back to its file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> std::result::Result<(), DocumentError> {
        let rendered = self.render()?;
        std::fs::write(&self.path, rendered).map_err(|e| DocumentError::Access {
            message: format!("Failed to write {}: {e}", self.path.display()),
        })
    }
}

/// Returns the file name component of a path, or the full path if it has none.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn is_values_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VALUES_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_rejects_missing_directory() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let result = ValuesDir::open(temp.path().join("missing"));
        assert!(matches!(
            result,
            Err(HelmfixError::Config(ConfigError::NotADirectory { .. }))
        ));
    }

    #[test]
    fn test_files_are_filtered_and_sorted() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        for name in ["b.yaml", "a.YML", "c.yml", "notes.txt", "d.json"] {
            std::fs::write(temp.path().join(name), "x: 1\n").unwrap();
        }
        std::fs::create_dir(temp.path().join("nested.yaml")).unwrap();

        let dir = ValuesDir::open(temp.path()).unwrap();
        let names: Vec<String> = dir.files().unwrap().iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.YML", "b.yaml", "c.yml"]);
    }

    #[test]
    fn test_documents_reports_parse_errors_per_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp.path().join("good.yaml"), "deployments: []\n").unwrap();
        std::fs::write(temp.path().join("bad.yaml"), "key: [unclosed\n").unwrap();

        let dir = ValuesDir::open(temp.path()).unwrap();
        let results: Vec<_> = dir.documents().unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_err());
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn test_empty_file_is_null_document() {
        let doc = LoadedDocument::parse("empty.yaml", "").unwrap();
        assert!(doc.value.is_null());
    }

    #[test]
    fn test_save_writes_block_style() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("values.yaml");
        std::fs::write(&path, "deploy: {command: [java, -Xmx1g]}\n").unwrap();

        let doc = LoadedDocument::load(&path).unwrap();
        doc.save().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains('{'));
        assert!(written.contains("deploy:\n  command:\n"));
    }
}
