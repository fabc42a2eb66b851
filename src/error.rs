//! Error types for helmfix.
//!
//! Errors fall into three groups that decide how a run reacts:
//! configuration errors abort the run, document errors skip a single file,
//! and ClickUp errors abort the onboarding command.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for helmfix.
#[derive(Debug, Error)]
pub enum HelmfixError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while reading, transforming or writing a values file.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// ClickUp API errors.
    #[error("ClickUp API error: {0}")]
    ClickUp(#[from] ClickUpError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required file was not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The values directory does not exist or is not a directory.
    #[error("The provided path is not a valid directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// A configuration or input file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// A secret is missing from both the environment and the secrets file.
    #[error("Secret not found: {name}")]
    MissingSecret {
        /// Name of the missing secret.
        name: String,
    },
}

/// Errors scoped to a single values document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be read or written.
    #[error("File access error: {message}")]
    Access {
        /// Description of the IO failure.
        message: String,
    },

    /// The file is not valid YAML.
    #[error("YAML parse error: {message}")]
    Parse {
        /// Parser message.
        message: String,
    },

    /// The modified document could not be serialized.
    #[error("YAML serialization error: {message}")]
    Serialize {
        /// Serializer message.
        message: String,
    },

    /// A located value does not have the shape a rule expects.
    #[error("Unexpected structure at '{path}': {message}")]
    UnexpectedShape {
        /// Selector or field that was being processed.
        path: String,
        /// What was wrong with it.
        message: String,
    },

    /// A path selector string could not be parsed.
    #[error("Invalid path selector '{selector}': {message}")]
    InvalidPath {
        /// The selector text.
        selector: String,
        /// Description of the problem.
        message: String,
    },
}

/// ClickUp API errors.
#[derive(Debug, Error)]
pub enum ClickUpError {
    /// The API answered with a non-success status.
    #[error("Request to create task failed: {status} - {body}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Network error.
    #[error("Network error communicating with ClickUp: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// The response could not be interpreted.
    #[error("Invalid response from ClickUp API: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Result type alias for helmfix operations.
pub type Result<T> = std::result::Result<T, HelmfixError>;

impl DocumentError {
    /// Creates an unexpected-shape error.
    #[must_use]
    pub fn shape(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ClickUpError {
    /// Creates an API request error.
    #[must_use]
    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        Self::ApiRequestFailed {
            status,
            body: body.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }
}
