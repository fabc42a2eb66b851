//! CLI module for helmfix.
//!
//! This module provides the command-line interface for the values-file
//! batch fixes and the ClickUp onboarding command.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::{OutputFormatter, TallySummary};
