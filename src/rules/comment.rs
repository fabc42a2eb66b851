//! Soft-disabling environment keys by prefixing them with `#`.
//!
//! The renamed key keeps its value and its position in the mapping, so the
//! entry stays visible in the values file but is ignored by the chart.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use tracing::debug;

use crate::document::{Rule, Tally, YamlPath};
use crate::error::DocumentError;

/// Prefix marking a commented-out key.
pub const COMMENT_PREFIX: char = '#';

/// Mappings whose keys are candidates for commenting.
pub const ENV_SELECTORS: &[&str] = &[
    "deployments[0].deploy.env_business",
    "deployments[0].deploy.env_system",
    "jobs[0].env_business",
    "jobs[0].env_system",
];

/// How keys that are already commented, or would collide, are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CommentPolicy {
    /// Leave `#`-prefixed keys alone and skip a key whose commented form
    /// already exists. Running twice changes nothing the second time.
    #[default]
    SkipCommented,
    /// Rename every listed key. An existing `#key` is overwritten by the
    /// value of `key`.
    Unguarded,
}

/// Statistics for commented keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommentTally {
    /// Number of keys renamed.
    pub keys_commented: usize,
}

impl Tally for CommentTally {
    fn merge(&mut self, other: &Self) {
        self.keys_commented += other.keys_commented;
    }
}

/// Renames listed keys of a mapping to their commented form.
#[derive(Debug, Clone)]
pub struct CommentKeys {
    keys: HashSet<String>,
    policy: CommentPolicy,
}

impl CommentKeys {
    /// Creates the rule for a set of key names.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = String>, policy: CommentPolicy) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            policy,
        }
    }

    /// Number of key names in the suppression set.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn should_comment(&self, key: &str, map: &Mapping) -> bool {
        if !self.keys.contains(key) {
            return false;
        }
        match self.policy {
            CommentPolicy::Unguarded => true,
            CommentPolicy::SkipCommented => {
                !key.starts_with(COMMENT_PREFIX) && !map.contains_key(commented(key).as_str())
            }
        }
    }
}

fn commented(key: &str) -> String {
    format!("{COMMENT_PREFIX}{key}")
}

impl Rule for CommentKeys {
    type Tally = CommentTally;

    fn name(&self) -> &'static str {
        "comment-keys"
    }

    fn apply(&self, target: &mut Value, at: &YamlPath) -> Result<Option<CommentTally>, DocumentError> {
        let Some(map) = target.as_mapping_mut() else {
            return Ok(None);
        };

        let current: &Mapping = map;
        let selected: HashSet<String> = current
            .keys()
            .filter_map(Value::as_str)
            .filter(|key| self.should_comment(key, current))
            .map(str::to_string)
            .collect();

        if selected.is_empty() {
            return Ok(None);
        }

        let mut rebuilt = Mapping::with_capacity(map.len());
        for (key, value) in std::mem::take(map) {
            match key.as_str() {
                Some(name) if selected.contains(name) => {
                    rebuilt.insert(Value::String(commented(name)), value);
                }
                _ => {
                    rebuilt.insert(key, value);
                }
            }
        }
        *map = rebuilt;

        debug!("Commented {} keys at {at}", selected.len());
        Ok(Some(CommentTally {
            keys_commented: selected.len(),
        }))
    }
}
