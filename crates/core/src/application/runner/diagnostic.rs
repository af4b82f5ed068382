// Failure diagnostic and process exit code mapping

use super::constants::{DIAGNOSTIC_PREFIX, FALLBACK_FAILURE_EXIT_CODE};
use crate::domain::{RunReport, StepOutcome, Termination};

/// Diagnostic for a failed command: command, return code, captured output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub command: String,
    pub return_code: String,
    pub output: String,
}

impl Diagnostic {
    pub fn from_failure(step: &StepOutcome) -> Self {
        Self {
            command: step.command.to_string(),
            return_code: step.termination.to_string(),
            output: step.combined_output(),
        }
    }

    /// Diagnostic of the failing step of `report`, if any
    pub fn from_report(report: &RunReport) -> Option<Self> {
        report.failure().map(Self::from_failure)
    }

    /// Render with `prefix: ` in front of each of the three headings
    pub fn render(&self, prefix: &str) -> String {
        format!(
            "{prefix}: Error executing command: {}\n{prefix}: Return code: {}\n{prefix}: Output: {}",
            self.command,
            self.return_code,
            self.output.trim_end(),
            prefix = prefix
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(DIAGNOSTIC_PREFIX))
    }
}

/// Exit code for the whole process after `report`
///
/// 0 on success, the failing command's own code when it fits in 1..=255,
/// otherwise `FALLBACK_FAILURE_EXIT_CODE`.
pub fn exit_code_for(report: &RunReport) -> i32 {
    if report.is_success() {
        return 0;
    }
    match report.failure().map(|s| &s.termination) {
        Some(Termination::Exited { code }) if (1..=255).contains(code) => *code,
        _ => FALLBACK_FAILURE_EXIT_CODE,
    }
}
