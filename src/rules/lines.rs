//! Line-delimited input files.

use std::path::Path;

use crate::error::{ConfigError, HelmfixError, Result};

/// Reads the non-blank lines of a file, trimmed, in file order.
///
/// # Errors
///
/// Returns a configuration error if the file does not exist and an IO error
/// if it cannot be read.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(HelmfixError::Config(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_lines_skips_blank() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("keys.txt");
        std::fs::write(&path, "FOO\r\n\n  BAR  \n\t\nBAZ").unwrap();

        assert_eq!(read_lines(&path).unwrap(), vec!["FOO", "BAR", "BAZ"]);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let result = read_lines(&temp.path().join("missing.txt"));
        assert!(matches!(
            result,
            Err(HelmfixError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
