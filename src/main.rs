//! adc CLI entrypoint.
//!
//! This is the main entrypoint for the adc command-line tool.

use std::path::Path;
use std::process::ExitCode;

use adc_changes::apisix::ApisixClient;
use adc_changes::changeset::ChangeSetParser;
use adc_changes::cli::{Cli, Commands, OutputFormat, OutputFormatter};
use adc_changes::config::ClusterConfig;
use adc_changes::error::{ConfigError, Result};
use adc_changes::executor::ChangeExecutor;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // A missing .env file is fine; flags and the environment still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.output);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e.report());
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
///
/// JSON output also switches log lines to JSON, so stderr stays parseable.
fn init_logging(verbose: bool, format: OutputFormat) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        OutputFormat::Json => builder.json().init(),
        OutputFormat::Text => builder.init(),
    }
}

/// Main async entry point. Returns whether the command fully succeeded.
async fn run(cli: Cli) -> Result<bool> {
    let formatter = OutputFormatter::new(cli.output);

    match &cli.command {
        Commands::Diff { file } => cmd_diff(file, &formatter),
        Commands::Apply {
            file,
            dry_run,
            continue_on_error,
        } => cmd_apply(&cli, file, *dry_run, *continue_on_error, &formatter).await,
        Commands::Ping => cmd_ping(&cli).await,
    }
}

/// Show the description of every change.
fn cmd_diff(file: &Path, formatter: &OutputFormatter) -> Result<bool> {
    let set = ChangeSetParser::new().load_file(file)?;
    debug!("Loaded {} changes", set.len());

    println!("{}", formatter.format_change_set(&set)?);
    Ok(true)
}

/// Apply a change set.
async fn cmd_apply(
    cli: &Cli,
    file: &Path,
    dry_run: bool,
    continue_on_error: bool,
    formatter: &OutputFormatter,
) -> Result<bool> {
    let set = ChangeSetParser::new().load_file(file)?;
    let client = connect(cli)?;

    info!("Applying {} changes from {}", set.len(), file.display());
    let result = ChangeExecutor::new(&client)
        .with_dry_run(dry_run)
        .with_continue_on_error(continue_on_error)
        .execute(&set.changes)
        .await;

    println!("{}", formatter.format_execution(&result));
    Ok(result.success)
}

/// Check gateway connectivity.
async fn cmd_ping(cli: &Cli) -> Result<bool> {
    let client = connect(cli)?;
    client.ping().await?;

    println!("Connected to {}", cli.server);
    Ok(true)
}

/// Builds an admin API client from the global flags.
fn connect(cli: &Cli) -> Result<ApisixClient> {
    let token = cli.token.as_deref().ok_or(ConfigError::MissingToken)?;
    let config = ClusterConfig::new(&cli.server, token)?.with_timeout(cli.timeout);

    ApisixClient::new(&config)
}
