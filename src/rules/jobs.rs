//! Application metadata for migration jobs.
//!
//! The application a job belongs to is its name without the last
//! `-`-separated segment: `payments-migrate-v2` belongs to `payments-migrate`.

use serde_yaml::Value;
use tracing::debug;

use crate::document::{Rule, YamlPath};
use crate::error::DocumentError;

/// Selector for the first job entry.
pub const JOB_SELECTOR: &str = "jobs[0]";

/// Default value written to `jobType`.
pub const DEFAULT_JOB_TYPE: &str = "migration";

/// Derives the application name by truncating at the last `-`.
#[must_use]
pub fn application_name(job_name: &str) -> Option<&str> {
    job_name.rfind('-').map(|end| &job_name[..end])
}

/// Sets `application` and `jobType` on a job entry.
#[derive(Debug, Clone)]
pub struct JobMetadata {
    job_type: String,
}

impl Default for JobMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_JOB_TYPE)
    }
}

impl JobMetadata {
    /// Creates the rule with a fixed job type.
    #[must_use]
    pub fn new(job_type: impl Into<String>) -> Self {
        Self {
            job_type: job_type.into(),
        }
    }
}

impl Rule for JobMetadata {
    type Tally = ();

    fn name(&self) -> &'static str {
        "fix-jobs"
    }

    fn apply(&self, target: &mut Value, at: &YamlPath) -> Result<Option<()>, DocumentError> {
        let job = target
            .as_mapping_mut()
            .ok_or_else(|| DocumentError::shape(at.to_string(), "expected a job mapping"))?;

        let name = job
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| DocumentError::shape(format!("{at}.name"), "missing or not a string"))?;

        let application = application_name(name)
            .ok_or_else(|| {
                DocumentError::shape(format!("{at}.name"), format!("'{name}' has no '-' separator"))
            })?
            .to_string();

        debug!("Job at {at} belongs to application '{application}'");
        job.insert(Value::from("application"), Value::String(application));
        job.insert(Value::from("jobType"), Value::String(self.job_type.clone()));
        Ok(Some(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::transform;

    fn selector() -> YamlPath {
        JOB_SELECTOR.parse().unwrap()
    }

    #[test]
    fn test_application_name() {
        assert_eq!(application_name("payments-migrate-v2"), Some("payments-migrate"));
        assert_eq!(application_name("a-"), Some("a"));
        assert_eq!(application_name("standalone"), None);
    }

    #[test]
    fn test_sets_metadata_on_first_job() {
        let mut doc: Value = serde_yaml::from_str(
            "jobs:\n  - name: payments-migrate-v2\n    image: x\n  - name: other-job\n",
        )
        .unwrap();
        let result = transform(&mut doc, &selector(), &JobMetadata::default()).unwrap();
        assert_eq!(result.modified, 1);

        let job = selector().select(&doc).and_then(Value::as_mapping).unwrap();
        assert_eq!(job.get("application").and_then(Value::as_str), Some("payments-migrate"));
        assert_eq!(job.get("jobType").and_then(Value::as_str), Some("migration"));

        let keys: Vec<&str> = job.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["name", "image", "application", "jobType"]);

        let second: YamlPath = "jobs[1].application".parse().unwrap();
        assert!(second.select(&doc).is_none());
    }

    #[test]
    fn test_name_without_separator_fails() {
        let mut doc: Value = serde_yaml::from_str("jobs:\n  - name: standalone\n").unwrap();
        let err = transform(&mut doc, &selector(), &JobMetadata::default()).unwrap_err();
        assert!(err.to_string().contains("standalone"));
    }

    #[test]
    fn test_missing_name_fails() {
        let mut doc: Value = serde_yaml::from_str("jobs:\n  - image: x\n").unwrap();
        assert!(transform(&mut doc, &selector(), &JobMetadata::default()).is_err());
    }

    #[test]
    fn test_no_jobs_is_unchanged() {
        let mut doc: Value = serde_yaml::from_str("jobs: []\ndeployments: []\n").unwrap();
        assert!(transform(&mut doc, &selector(), &JobMetadata::new("seed"))
            .unwrap()
            .is_unchanged());
    }
}
