//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS};

/// adc - describe and apply declarative gateway changes.
#[derive(Parser, Debug)]
#[command(name = "adc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Gateway admin API address.
    #[arg(long, global = true, env = "ADC_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Gateway admin key.
    #[arg(long, global = true, env = "ADC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "ADC_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

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
    /// Show what each change in a change set would do.
    Diff {
        /// Change-set file (YAML, or JSON with a `.json` extension).
        file: PathBuf,
    },

    /// Apply a change set to the gateway.
    Apply {
        /// Change-set file (YAML, or JSON with a `.json` extension).
        file: PathBuf,

        /// Describe the changes without applying them.
        #[arg(long)]
        dry_run: bool,

        /// Continue on errors.
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Check connectivity to the gateway admin API.
    Ping,
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_json_output() {
        let cli = Cli::try_parse_from(["adc", "diff", "changes.json", "--output", "json"])
            .expect("arguments should parse");

        assert!(matches!(cli.output, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Diff { .. }));
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "adc",
            "--server",
            "http://gateway:9180",
            "--token",
            "secret",
            "apply",
            "changes.yaml",
            "--dry-run",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.server, "http://gateway:9180");
        assert_eq!(cli.token.as_deref(), Some("secret"));
        match cli.command {
            Commands::Apply {
                file,
                dry_run,
                continue_on_error,
            } => {
                assert_eq!(file, PathBuf::from("changes.yaml"));
                assert!(dry_run);
                assert!(!continue_on_error);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
