//! Rendering of run results: diagnostics, summary table, JSON

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{Table, Tabled};

use seqrun_core::application::Diagnostic;
use seqrun_core::domain::{CommandSequence, RunReport};

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    index: usize,
    command: String,
    status: String,
    #[tabled(rename = "return code")]
    return_code: String,
    #[tabled(rename = "ms")]
    duration_ms: String,
}

/// Failure diagnostic, colored for a terminal
pub fn render_diagnostic(report: &RunReport) -> Option<String> {
    Diagnostic::from_report(report).map(|d| d.to_string().red().to_string())
}

/// Table of executed steps followed by skipped ones
pub fn render_summary(report: &RunReport, sequence: &CommandSequence) -> String {
    let mut rows: Vec<StepRow> = report
        .executed()
        .iter()
        .map(|s| StepRow {
            index: s.index,
            command: s.command.to_string(),
            status: s.status.to_string(),
            return_code: s.termination.to_string(),
            duration_ms: s.duration_ms.to_string(),
        })
        .collect();

    let first_skipped = report.executed().len();
    rows.extend(
        sequence
            .iter()
            .enumerate()
            .skip(first_skipped)
            .map(|(index, cmd)| StepRow {
                index,
                command: cmd.to_string(),
                status: "SKIPPED".to_string(),
                return_code: "-".to_string(),
                duration_ms: "-".to_string(),
            }),
    );

    Table::new(rows).to_string()
}

pub fn render_json(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize run report")
}
