//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! change descriptions and execution results in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::change::Change;
use crate::changeset::{ChangeSet, SkippedChange};
use crate::error::Result;
use crate::executor::{ExecutionResult, OutcomeStatus};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Outcome row for table display.
#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// JSON representation of a described change.
#[derive(Serialize)]
struct DescriptionJson<'a> {
    summary: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<&'a [SkippedChange]>,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the description of every change in a change set.
    ///
    /// # Errors
    ///
    /// Returns an error if a change cannot be described.
    pub fn format_change_set(&self, set: &ChangeSet) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut entries = Vec::with_capacity(set.len() + 1);
                for change in &set.changes {
                    entries.push(DescriptionJson {
                        summary: change.to_string(),
                        description: change.describe()?,
                        skipped: None,
                    });
                }

                if !set.skipped.is_empty() {
                    entries.push(DescriptionJson {
                        summary: String::from("skipped"),
                        description: format!("{} unsupported entries", set.skipped.len()),
                        skipped: Some(&set.skipped),
                    });
                }

                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Text => Self::format_change_set_text(set),
        }
    }

    /// Formats a change set as text.
    fn format_change_set_text(set: &ChangeSet) -> Result<String> {
        if set.is_empty() && set.skipped.is_empty() {
            return Ok(format!("{} No changes.\n", "✓".green()));
        }

        let mut output = String::new();
        for change in &set.changes {
            output.push_str(&Self::colorize_description(change)?);
            if !output.ends_with('\n') {
                output.push('\n');
            }
        }

        for skipped in &set.skipped {
            let _ = writeln!(
                output,
                "{} skipping change #{}: unsupported resource type \"{}\"",
                "⚠".yellow(),
                skipped.index,
                skipped.resource_type
            );
        }

        let _ = write!(output, "\nChanges: {set}\n");
        Ok(output)
    }

    /// Describes a change, coloring diff lines.
    fn colorize_description(change: &Change) -> Result<String> {
        let description = change.describe()?;
        let mut output = String::with_capacity(description.len());

        for line in description.lines() {
            let painted = if line.starts_with("+++") || line.starts_with("---") {
                line.bold().to_string()
            } else if line.starts_with('+') {
                line.green().to_string()
            } else if line.starts_with('-') {
                line.red().to_string()
            } else if line.starts_with("@@") {
                line.cyan().to_string()
            } else {
                line.to_string()
            };
            let _ = writeln!(output, "{painted}");
        }

        Ok(output)
    }

    /// Formats an execution result.
    #[must_use]
    pub fn format_execution(&self, result: &ExecutionResult) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Text => Self::format_execution_text(result),
        }
    }

    /// Formats an execution result as text.
    fn format_execution_text(result: &ExecutionResult) -> String {
        if result.outcomes.is_empty() {
            return format!("{} Nothing to apply.\n", "✓".green());
        }

        let rows: Vec<OutcomeRow> = result
            .outcomes
            .iter()
            .map(|o| OutcomeRow {
                index: o.index + 1,
                change: o.summary.clone(),
                status: Self::format_status(o.status),
                error: o.error.as_deref().map_or_else(String::new, |e| Self::truncate(e, 60)),
            })
            .collect();

        let mut output = Table::new(rows).to_string();
        output.push('\n');

        let status = if result.success {
            format!("{} Apply successful", "✓".green())
        } else {
            format!("{} Apply failed", "✗".red())
        };
        let _ = write!(output, "\n{status}: {result}\n");

        output
    }

    /// Formats an outcome status with color.
    fn format_status(status: OutcomeStatus) -> String {
        match status {
            OutcomeStatus::Applied => status.to_string().green().to_string(),
            OutcomeStatus::Planned => status.to_string().cyan().to_string(),
            OutcomeStatus::Failed => status.to_string().red().to_string(),
            OutcomeStatus::Skipped => status.to_string().yellow().to_string(),
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{head}...")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apisix::Route;
    use crate::changeset::ChangeSetParser;

    fn sample_set() -> ChangeSet {
        let yaml = r#"
changes:
  - resource_type: route
    option: update
    old_value: { name: r1, uris: ["/get"], upstream_id: "1" }
    value: { name: r1, uris: ["/get"], upstream_id: "2" }
  - resource_type: consumer
    option: create
    value: { name: jack }
"#;
        ChangeSetParser::new()
            .parse_yaml(yaml, None)
            .expect("change set should parse")
    }

    #[test]
    fn test_text_change_set() {
        colored::control::set_override(false);
        let output = OutputFormatter::new(OutputFormat::Text)
            .format_change_set(&sample_set())
            .expect("format should succeed");

        assert!(output.starts_with("updating route: \"r1\"\n--- remote\n+++ local\n"));
        assert!(output.contains("-\t\"upstream_id\": \"1\"\n"));
        assert!(output.contains("+\t\"upstream_id\": \"2\"\n"));
        assert!(output.contains("skipping change #1: unsupported resource type \"consumer\""));
        assert!(output.contains("Changes: 0 to create, 1 to update, 0 to delete (1 skipped)"));
    }

    #[test]
    fn test_json_change_set() {
        let output = OutputFormatter::new(OutputFormat::Json)
            .format_change_set(&sample_set())
            .expect("format should succeed");
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(value[0]["summary"], "update route \"r1\"");
        assert_eq!(value[1]["skipped"][0]["resource_type"], "consumer");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(OutputFormatter::truncate("short", 10), "short");
        assert_eq!(OutputFormatter::truncate("a long message here", 10), "a long ...");
    }

    #[test]
    fn test_create_description_is_single_line() {
        colored::control::set_override(false);
        let output = OutputFormatter::colorize_description(&Change::create(Route::new("r1")))
            .expect("describe should succeed");

        assert_eq!(output, "creating route: \"r1\"\n");
    }
}
