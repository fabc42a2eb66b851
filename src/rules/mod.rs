//! Concrete values-file rules.
//!
//! Each rule is paired with the selectors it is normally applied through:
//! - `limits`: memory requests and limits from `-Xmx`
//! - `comment`: soft-disabling env keys
//! - `command`: placeholder command substitution
//! - `jobs`: job application metadata
//! - `sets`: line-set difference (no YAML involved)

mod command;
mod comment;
mod jobs;
mod limits;
mod lines;
mod sets;

pub use command::{placeholder_name, tokenize, CommandFromEnv, COMMAND_SELECTOR};
pub use comment::{CommentKeys, CommentPolicy, CommentTally, COMMENT_PREFIX, ENV_SELECTORS};
pub use jobs::{application_name, JobMetadata, DEFAULT_JOB_TYPE, JOB_SELECTOR};
pub use limits::{
    MemoryQuantity, MemoryTally, MemoryUnit, ResourceLimits, DEFAULT_LIMIT_FACTOR,
    DEFAULT_XMX_POSITION, DEPLOY_SELECTOR, XMX_PREFIX,
};
pub use lines::read_lines;
pub use sets::{file_set_difference, set_difference, SetDifference};
