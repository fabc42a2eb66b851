//! Configuration validation.
//!
//! The general checks run before every command; the ClickUp checks only
//! before `onboard-env`, since the other commands never read that section.

use crate::error::{ConfigError, HelmfixError, Result};
use tracing::debug;

use super::spec::{ClickUpConfig, HelmfixConfig, LimitsConfig};

/// Validator for helmfix configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates the sections used by the values commands.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate(&self, config: &HelmfixConfig) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        Self::validate_limits(&config.limits, &mut result);

        if config.jobs.job_type.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("jobs.job_type"),
                message: String::from("Job type cannot be empty"),
            });
        }

        Self::finish(result)
    }

    /// Validates the ClickUp section.
    ///
    /// # Errors
    ///
    /// Returns the first validation error found.
    pub fn validate_clickup(&self, clickup: &ClickUpConfig) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        for (field, value) in [
            ("clickup.list_id", &clickup.list_id),
            ("clickup.environment_code", &clickup.environment_code),
            ("clickup.player_ui_url", &clickup.player_ui_url),
            ("clickup.admin_ui_url", &clickup.admin_ui_url),
        ] {
            if value.trim().is_empty() {
                result.errors.push(ValidationError {
                    field: field.to_string(),
                    message: format!("{field} is required"),
                });
            }
        }

        if !clickup.list_id.is_empty() && !clickup.list_id.chars().all(|c| c.is_ascii_digit()) {
            result.errors.push(ValidationError {
                field: String::from("clickup.list_id"),
                message: format!("List id '{}' must be numeric", clickup.list_id),
            });
        }

        for (field, url) in [
            ("clickup.api_url", &clickup.api_url),
            ("clickup.player_ui_url", &clickup.player_ui_url),
            ("clickup.admin_ui_url", &clickup.admin_ui_url),
        ] {
            if !url.is_empty() && !is_http_url(url) {
                result.errors.push(ValidationError {
                    field: field.to_string(),
                    message: format!("'{url}' is not an http(s) URL"),
                });
            }
        }

        if clickup.assignees.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("clickup.assignees"),
                message: String::from("At least one assignee is required"),
            });
        }

        Self::finish(result)
    }

    fn validate_limits(limits: &LimitsConfig, result: &mut ValidationResult) {
        if !limits.limit_factor.is_finite() || limits.limit_factor <= 0.0 {
            result.errors.push(ValidationError {
                field: String::from("limits.limit_factor"),
                message: format!("Limit factor must be positive, got {}", limits.limit_factor),
            });
        } else if limits.limit_factor < 1.0 {
            result.warnings.push(format!(
                "Limit factor {} sets memory limits below requests",
                limits.limit_factor
            ));
        }
    }

    fn finish(result: ValidationResult) -> Result<ValidationResult> {
        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(HelmfixError::Config(ConfigError::ValidationError {
                message: first_error.message.clone(),
                field: Some(first_error.field.clone()),
            }))
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty())
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clickup() -> ClickUpConfig {
        ClickUpConfig {
            list_id: String::from("901518891745"),
            environment_code: String::from("SHOP__PRD"),
            player_ui_url: String::from("https://shop.example.com/"),
            admin_ui_url: String::from("https://admin.shop.example.com/"),
            assignees: vec![1],
            ..ClickUpConfig::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let result = ConfigValidator::new().validate(&HelmfixConfig::default()).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_limit_factor() {
        let mut config = HelmfixConfig::default();
        config.limits.limit_factor = 0.0;
        assert!(ConfigValidator::new().validate(&config).is_err());

        config.limits.limit_factor = 0.8;
        let result = ConfigValidator::new().validate(&config).unwrap();
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_valid_clickup() {
        let result = ConfigValidator::new().validate_clickup(&clickup()).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn test_clickup_requires_fields() {
        let err = ConfigValidator::new()
            .validate_clickup(&ClickUpConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("clickup.list_id"));
    }

    #[test]
    fn test_clickup_requires_assignees() {
        let mut config = clickup();
        config.assignees.clear();
        let err = ConfigValidator::new().validate_clickup(&config).unwrap_err();
        assert!(err.to_string().contains("assignee"));
    }

    #[test]
    fn test_clickup_rejects_bad_urls() {
        let mut config = clickup();
        config.admin_ui_url = String::from("admin.example.com");
        assert!(ConfigValidator::new().validate_clickup(&config).is_err());

        let mut config = clickup();
        config.list_id = String::from("abc");
        assert!(ConfigValidator::new().validate_clickup(&config).is_err());
    }

    #[test]
    fn test_http_url() {
        assert!(is_http_url("https://api.clickup.com/api/v2"));
        assert!(is_http_url("http://127.0.0.1:8080"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("ftp://x"));
    }
}
