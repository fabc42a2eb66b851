//! Configuration module for helmfix.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `helmfix.yaml`
//! - Environment overrides and `.env` loading
//! - Reading literal `key=value` command and secrets files
//! - Validation of configuration values

mod env_file;
mod parser;
mod spec;
mod validator;

pub use env_file::{parse_env_lines, read_env_file, resolve_api_token, API_TOKEN_ENV};
pub use parser::{find_config_file, ConfigParser, DEFAULT_CONFIG_FILES};
pub use spec::{
    ClickUpConfig, CommandConfig, CommentConfig, HelmfixConfig, JobsConfig, LimitsConfig,
    SetsConfig, ValuesConfig, CLICKUP_API_URL,
};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
