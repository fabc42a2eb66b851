//! Configuration parser for loading the helmfix configuration file.
//!
//! This module handles loading configuration from YAML files and environment
//! variables, with proper precedence and error handling.

use crate::error::{ConfigError, HelmfixError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::HelmfixConfig;

/// Configuration parser for loading run configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving relative paths.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// Relative paths in the file are resolved against the parser's base path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<HelmfixConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(HelmfixError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            HelmfixError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        let mut config = self.parse_yaml(&content, Some(path))?;
        if let Some(base) = &self.base_path {
            config.rebase_paths(base);
        }
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    ///
    /// An empty document yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<HelmfixConfig> {
        debug!("Parsing YAML configuration");

        if content.trim().is_empty() {
            return Ok(HelmfixConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            HelmfixError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// Without a file the defaults are used. Recognised variables are
    /// `HELMFIX_VALUES_DIR`, `HELMFIX_CLICKUP_LIST_ID` and
    /// `HELMFIX_ENVIRONMENT_CODE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: Option<&Path>) -> Result<HelmfixConfig> {
        let mut config = match path {
            Some(path) => self.load_file(path)?,
            None => {
                debug!("No configuration file, using defaults");
                HelmfixConfig::default()
            }
        };

        Self::apply_env_overrides(&mut config);

        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(config: &mut HelmfixConfig) {
        if let Ok(dir) = std::env::var("HELMFIX_VALUES_DIR") {
            debug!("Overriding values.dir from environment");
            config.values.dir = PathBuf::from(dir);
        }

        if let Ok(list_id) = std::env::var("HELMFIX_CLICKUP_LIST_ID") {
            debug!("Overriding clickup.list_id from environment");
            config.clickup.list_id = list_id;
        }

        if let Ok(code) = std::env::var("HELMFIX_ENVIRONMENT_CODE") {
            debug!("Overriding clickup.environment_code from environment");
            config.clickup.environment_code = code;
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                HelmfixError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["helmfix.yaml", "helmfix.yml", ".helmfix.yaml"];

/// Finds the configuration file in the given directory or its parents.
///
/// Returns `None` when no configuration file exists; helmfix then runs on
/// defaults.
#[must_use]
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = start_dir.as_ref().to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.is_file() {
                info!("Found configuration file: {}", config_path.display());
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
