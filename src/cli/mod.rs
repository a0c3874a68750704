//! CLI module for the adc tool.
//!
//! This module provides the command-line interface for describing and
//! applying change sets against a gateway.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
