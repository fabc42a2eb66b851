//! Helmfix CLI entrypoint.
//!
//! This is the main entrypoint for the helmfix command-line tool.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use helmfix::cli::{Cli, Commands, OutputFormatter};
use helmfix::clickup::{ClickUpClient, OnboardingPlan};
use helmfix::config::{
    find_config_file, read_env_file, resolve_api_token, ConfigParser, ConfigValidator,
    HelmfixConfig,
};
use helmfix::document::{run_batch, BatchOptions, Transformer, ValuesDir};
use helmfix::error::Result;
use helmfix::rules::{
    file_set_difference, read_lines, CommandFromEnv, CommentKeys, CommentPolicy, JobMetadata,
    ResourceLimits, COMMAND_SELECTOR, DEPLOY_SELECTOR, ENV_SELECTORS, JOB_SELECTOR,
};

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::AddLimits { dir, dry_run } => cmd_add_limits(&config, dir, dry_run, &formatter),
        Commands::CommentKeys {
            dir,
            keys_file,
            policy,
            dry_run,
        } => cmd_comment_keys(&config, dir, keys_file, policy, dry_run, &formatter),
        Commands::FixCommand {
            dir,
            env_file,
            dry_run,
        } => cmd_fix_command(&config, dir, env_file, dry_run, &formatter),
        Commands::FixJobs {
            dir,
            job_type,
            dry_run,
        } => cmd_fix_jobs(&config, dir, job_type, dry_run, &formatter),
        Commands::SetDiff { first, second } => cmd_set_diff(&config, first, second, &formatter),
        Commands::OnboardEnv {
            list_id,
            env_code,
            player_ui_url,
            admin_ui_url,
            dry_run,
        } => {
            let overrides = OnboardOverrides {
                list_id,
                env_code,
                player_ui_url,
                admin_ui_url,
            };
            cmd_onboard_env(config, overrides, dry_run, &formatter).await
        }
    }
}

/// Loads the configuration file (explicit or discovered) and validates it.
fn load_config(explicit: Option<&Path>) -> Result<HelmfixConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(std::env::current_dir()?),
    };

    let mut parser = ConfigParser::new();
    if let Some(base) = path.as_deref().and_then(Path::parent) {
        parser = parser.with_base_path(base);
    }

    parser.load_dotenv()?;
    let config = parser.load_with_env(path.as_deref())?;

    let result = ConfigValidator::new().validate(&config)?;
    for warning in &result.warnings {
        warn!("{warning}");
    }

    Ok(config)
}

/// Opens the values directory, preferring the command-line override.
fn values_dir(config: &HelmfixConfig, dir: Option<PathBuf>) -> Result<ValuesDir> {
    ValuesDir::open(dir.unwrap_or_else(|| config.values.dir.clone()))
}

/// Add memory requests and limits.
fn cmd_add_limits(
    config: &HelmfixConfig,
    dir: Option<PathBuf>,
    dry_run: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let dir = values_dir(config, dir)?;
    let rule = ResourceLimits::new(config.limits.xmx_position, config.limits.limit_factor);
    let transformer = Transformer::parse(rule, &[DEPLOY_SELECTOR])?;

    let report = run_batch(&dir, &transformer, BatchOptions { dry_run })?;
    eprintln!("{}", formatter.format_batch(&report));
    Ok(())
}

/// Comment out listed env keys.
fn cmd_comment_keys(
    config: &HelmfixConfig,
    dir: Option<PathBuf>,
    keys_file: Option<PathBuf>,
    policy: Option<CommentPolicy>,
    dry_run: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let keys_file = keys_file.unwrap_or_else(|| config.comment.keys_file.clone());
    let keys = read_lines(&keys_file)?;
    let rule = CommentKeys::new(keys, policy.unwrap_or(config.comment.policy));
    info!("Loaded {} keys to comment from {}", rule.key_count(), keys_file.display());

    let dir = values_dir(config, dir)?;
    let transformer = Transformer::parse(rule, ENV_SELECTORS)?;

    let report = run_batch(&dir, &transformer, BatchOptions { dry_run })?;
    eprintln!("{}", formatter.format_batch(&report));
    Ok(())
}

/// Replace placeholder commands with env file values.
fn cmd_fix_command(
    config: &HelmfixConfig,
    dir: Option<PathBuf>,
    env_file: Option<PathBuf>,
    dry_run: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let env_file = env_file.unwrap_or_else(|| config.command.env_file.clone());
    let rule = CommandFromEnv::new(read_env_file(&env_file)?);
    info!("Loaded {} variables from {}", rule.variable_count(), env_file.display());

    let dir = values_dir(config, dir)?;
    let transformer = Transformer::parse(rule, &[COMMAND_SELECTOR])?;

    let report = run_batch(&dir, &transformer, BatchOptions { dry_run })?;
    eprintln!("{}", formatter.format_batch(&report));
    Ok(())
}

/// Add application and job type metadata to the first job.
fn cmd_fix_jobs(
    config: &HelmfixConfig,
    dir: Option<PathBuf>,
    job_type: Option<String>,
    dry_run: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let dir = values_dir(config, dir)?;
    let rule = JobMetadata::new(job_type.unwrap_or_else(|| config.jobs.job_type.clone()));
    let transformer = Transformer::parse(rule, &[JOB_SELECTOR])?;

    let report = run_batch(&dir, &transformer, BatchOptions { dry_run })?;
    eprintln!("{}", formatter.format_batch(&report));
    Ok(())
}

/// Print lines of the first file missing from the second.
fn cmd_set_diff(
    config: &HelmfixConfig,
    first: Option<PathBuf>,
    second: Option<PathBuf>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let first = first.unwrap_or_else(|| config.sets.first.clone());
    let second = second.unwrap_or_else(|| config.sets.second.clone());
    debug!("Comparing {} against {}", first.display(), second.display());

    let diff = file_set_difference(&first, &second)?;
    eprint!("{}", formatter.format_set_difference(&diff));
    Ok(())
}

/// Command-line overrides for the `clickup` section.
struct OnboardOverrides {
    list_id: Option<String>,
    env_code: Option<String>,
    player_ui_url: Option<String>,
    admin_ui_url: Option<String>,
}

/// Create the onboarding task set in ClickUp.
async fn cmd_onboard_env(
    config: HelmfixConfig,
    overrides: OnboardOverrides,
    dry_run: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut clickup = config.clickup;
    if let Some(list_id) = overrides.list_id {
        clickup.list_id = list_id;
    }
    if let Some(code) = overrides.env_code {
        clickup.environment_code = code;
    }
    if let Some(url) = overrides.player_ui_url {
        clickup.player_ui_url = url;
    }
    if let Some(url) = overrides.admin_ui_url {
        clickup.admin_ui_url = url;
    }

    let result = ConfigValidator::new().validate_clickup(&clickup)?;
    for warning in &result.warnings {
        warn!("{warning}");
    }

    let plan = OnboardingPlan::from_config(&clickup);

    if dry_run {
        let preview = plan.preview(&clickup.api_url, &clickup.list_id);
        eprintln!("{}", formatter.format_onboarding_preview(&preview));
        return Ok(());
    }

    let token = resolve_api_token(&clickup.secrets_file, &clickup.token_key)?;
    let client = ClickUpClient::with_base_url(&token, &clickup.api_url)?;

    let report = plan.execute(&client, &clickup.list_id).await?;
    eprintln!("{}", formatter.format_onboarding(&report));
    Ok(())
}
