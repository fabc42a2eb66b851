//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.
//! Every per-command option overrides the matching `helmfix.yaml` value.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::rules::CommentPolicy;

/// Helmfix - batch fixes for Helm values files.
#[derive(Parser, Debug)]
#[command(name = "helmfix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, env = "HELMFIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add memory requests and limits derived from the -Xmx flag.
    AddLimits {
        /// Directory containing the values files.
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Report changes without writing files.
        #[arg(long)]
        dry_run: bool,
    },

    /// Comment out env keys listed in a keys file.
    CommentKeys {
        /// Directory containing the values files.
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// File with one key per line.
        #[arg(short, long)]
        keys_file: Option<PathBuf>,

        /// What to do with keys that are already commented.
        #[arg(long, value_enum)]
        policy: Option<CommentPolicy>,

        /// Report changes without writing files.
        #[arg(long)]
        dry_run: bool,
    },

    /// Replace a ${NAME} command placeholder with the value from an env file.
    FixCommand {
        /// Directory containing the values files.
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Env file with NAME=command entries.
        #[arg(short, long)]
        env_file: Option<PathBuf>,

        /// Report changes without writing files.
        #[arg(long)]
        dry_run: bool,
    },

    /// Add application and jobType to the first job.
    FixJobs {
        /// Directory containing the values files.
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Value written to jobType.
        #[arg(long)]
        job_type: Option<String>,

        /// Report changes without writing files.
        #[arg(long)]
        dry_run: bool,
    },

    /// List lines of the first file missing from the second.
    SetDiff {
        /// First file.
        first: Option<PathBuf>,

        /// Second file.
        second: Option<PathBuf>,
    },

    /// Create the ClickUp onboarding tasks for a new environment.
    OnboardEnv {
        /// ClickUp list receiving the tasks.
        #[arg(long)]
        list_id: Option<String>,

        /// Environment code, e.g. SHOP__PRD_K8S.
        #[arg(long)]
        env_code: Option<String>,

        /// Player UI URL.
        #[arg(long)]
        player_ui_url: Option<String>,

        /// Admin UI URL.
        #[arg(long)]
        admin_ui_url: Option<String>,

        /// Print the request bodies without sending them.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_limits() {
        let cli = Cli::try_parse_from(["helmfix", "add-limits", "--dir", "values", "--dry-run"]).unwrap();
        match cli.command {
            Commands::AddLimits { dir, dry_run } => {
                assert_eq!(dir, Some(PathBuf::from("values")));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_comment_policy() {
        let cli = Cli::try_parse_from(["helmfix", "comment-keys", "--policy", "unguarded"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::CommentKeys { policy: Some(CommentPolicy::Unguarded), .. }
        ));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["helmfix", "set-diff", "a.txt", "b.txt", "--output", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
