//! YAML document transformation.
//!
//! This module provides the pieces every values rule is built from:
//! - Structural path selectors into a parsed document
//! - The `Rule` trait and the `Transformer` binding a rule to its selectors
//! - Discovery, parsing and write-back of values files
//! - The batch runner that folds a transformer over a directory

mod batch;
mod path;
mod transform;
mod values_dir;

pub use batch::{run_batch, BatchOptions, BatchReport, FileReport, FileStatus};
pub use path::{PathStep, StepIndex, YamlPath};
pub use transform::{transform, Rule, Tally, Transformed, Transformer};
pub use values_dir::{display_name, LoadedDocument, ValuesDir, VALUES_EXTENSIONS};
