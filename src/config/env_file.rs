//! `key=value` files: command env files and the secrets file.
//!
//! Values are taken literally: no variable expansion, no escape handling.
//! Each line is split on its first `=`, both sides are trimmed and a value
//! wrapped in double quotes loses them. Blank lines, `#` comments and lines
//! without `=` are skipped.

use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::error::{ConfigError, HelmfixError, Result};

/// Environment variable consulted before the secrets file.
pub const API_TOKEN_ENV: &str = "CLICKUP_API_TOKEN";

/// Reads a `key=value` file into a map.
///
/// # Errors
///
/// Returns a configuration error if the file is missing and an IO error if
/// it cannot be read.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.is_file() {
        return Err(HelmfixError::Config(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path)?;
    let vars = parse_env_lines(&content);

    debug!("Read {} entries from {}", vars.len(), path.display());
    Ok(vars)
}

/// Parses `key=value` lines. Later keys override earlier ones.
#[must_use]
pub fn parse_env_lines(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let Some((key, value)) = line.split_once('=') else {
                debug!("Skipping line without '='");
                return None;
            };
            Some((key.trim().to_string(), unquote(value.trim()).to_string()))
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Resolves the ClickUp API token.
///
/// `CLICKUP_API_TOKEN` wins when set; otherwise `key` is looked up in the
/// secrets file.
///
/// # Errors
///
/// Returns an error if neither source provides the token.
pub fn resolve_api_token(secrets_file: &Path, key: &str) -> Result<String> {
    if let Ok(token) = std::env::var(API_TOKEN_ENV)
        && !token.trim().is_empty()
    {
        debug!("Using API token from {API_TOKEN_ENV}");
        return Ok(token);
    }

    let secrets = read_env_file(secrets_file)?;
    secrets
        .get(key)
        .filter(|token| !token.is_empty())
        .cloned()
        .ok_or_else(|| {
            HelmfixError::Config(ConfigError::MissingSecret {
                name: key.to_string(),
            })
        })
}
