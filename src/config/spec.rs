//! Configuration types for helmfix.
//!
//! These structs map to the optional `helmfix.yaml` file. Every field has a
//! default, so an empty file (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::rules::{CommentPolicy, DEFAULT_JOB_TYPE, DEFAULT_LIMIT_FACTOR, DEFAULT_XMX_POSITION};

/// Default ClickUp REST API base URL.
pub const CLICKUP_API_URL: &str = "https://api.clickup.com/api/v2";

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HelmfixConfig {
    /// Values directory settings.
    #[serde(default)]
    pub values: ValuesConfig,
    /// Settings for `add-limits`.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Settings for `comment-keys`.
    #[serde(default)]
    pub comment: CommentConfig,
    /// Settings for `fix-command`.
    #[serde(default)]
    pub command: CommandConfig,
    /// Settings for `fix-jobs`.
    #[serde(default)]
    pub jobs: JobsConfig,
    /// Settings for `set-diff`.
    #[serde(default)]
    pub sets: SetsConfig,
    /// Settings for `onboard-env`.
    #[serde(default)]
    pub clickup: ClickUpConfig,
}

/// Values directory settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValuesConfig {
    /// Directory holding the values files.
    #[serde(default = "default_values_dir")]
    pub dir: PathBuf,
}

/// Resource limit settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitsConfig {
    /// Index of the `-Xmx` token in the deployment command.
    #[serde(default = "default_xmx_position")]
    pub xmx_position: usize,
    /// Ratio between the memory limit and the request.
    #[serde(default = "default_limit_factor")]
    pub limit_factor: f64,
}

/// Key commenting settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentConfig {
    /// File listing the keys to comment, one per line.
    #[serde(default = "default_keys_file")]
    pub keys_file: PathBuf,
    /// Treatment of already-commented keys.
    #[serde(default)]
    pub policy: CommentPolicy,
}

/// Command substitution settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandConfig {
    /// `.env`-style file holding the command values.
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
}

/// Job metadata settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobsConfig {
    /// Value written to `jobType`.
    #[serde(default = "default_job_type")]
    pub job_type: String,
}

/// Set difference inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetsConfig {
    /// File whose lines are kept.
    #[serde(default = "default_first_set")]
    pub first: PathBuf,
    /// File whose lines are removed.
    #[serde(default = "default_second_set")]
    pub second: PathBuf,
}

/// ClickUp onboarding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClickUpConfig {
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// List the tasks are created in.
    #[serde(default)]
    pub list_id: String,
    /// Code of the environment being onboarded.
    #[serde(default)]
    pub environment_code: String,
    /// Player UI address of the new environment.
    #[serde(default)]
    pub player_ui_url: String,
    /// Admin UI address of the new environment.
    #[serde(default)]
    pub admin_ui_url: String,
    /// ClickUp user ids assigned to every task.
    #[serde(default)]
    pub assignees: Vec<u64>,
    /// Sprint points of the parent task.
    #[serde(default = "default_points")]
    pub points: u32,
    /// Tags of the parent task.
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    /// `key=value` file holding the API token.
    #[serde(default = "default_secrets_file")]
    pub secrets_file: PathBuf,
    /// Key of the API token in the secrets file.
    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_values_dir() -> PathBuf {
    PathBuf::from("values")
}

const fn default_xmx_position() -> usize {
    DEFAULT_XMX_POSITION
}

const fn default_limit_factor() -> f64 {
    DEFAULT_LIMIT_FACTOR
}

fn default_keys_file() -> PathBuf {
    PathBuf::from("values/keys_to_comment.txt")
}

fn default_env_file() -> PathBuf {
    PathBuf::from("values/app.env")
}

fn default_job_type() -> String {
    String::from(DEFAULT_JOB_TYPE)
}

fn default_first_set() -> PathBuf {
    PathBuf::from("values/set1.txt")
}

fn default_second_set() -> PathBuf {
    PathBuf::from("values/set2.txt")
}

fn default_api_url() -> String {
    String::from(CLICKUP_API_URL)
}

const fn default_points() -> u32 {
    3
}

fn default_tags() -> Vec<String> {
    vec![String::from("drop-in"), String::from("sprint goal")]
}

fn default_secrets_file() -> PathBuf {
    PathBuf::from("secrets")
}

fn default_token_key() -> String {
    String::from("apiToken")
}

impl Default for ValuesConfig {
    fn default() -> Self {
        Self {
            dir: default_values_dir(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            xmx_position: default_xmx_position(),
            limit_factor: default_limit_factor(),
        }
    }
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            keys_file: default_keys_file(),
            policy: CommentPolicy::default(),
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            job_type: default_job_type(),
        }
    }
}

impl Default for SetsConfig {
    fn default() -> Self {
        Self {
            first: default_first_set(),
            second: default_second_set(),
        }
    }
}

impl Default for ClickUpConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            list_id: String::new(),
            environment_code: String::new(),
            player_ui_url: String::new(),
            admin_ui_url: String::new(),
            assignees: Vec::new(),
            points: default_points(),
            tags: default_tags(),
            secrets_file: default_secrets_file(),
            token_key: default_token_key(),
        }
    }
}

impl HelmfixConfig {
    /// Makes every relative file path relative to `base`.
    pub fn rebase_paths(&mut self, base: &Path) {
        for path in [
            &mut self.values.dir,
            &mut self.comment.keys_file,
            &mut self.command.env_file,
            &mut self.sets.first,
            &mut self.sets.second,
            &mut self.clickup.secrets_file,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
