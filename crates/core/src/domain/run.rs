// Run Domain Model: state machine, step outcomes, run report

use serde::{Deserialize, Serialize};

use crate::domain::command::Command;
use crate::domain::error::{DomainError, Result};

/// Run identifier (UUID v4 in production)
pub type RunId = String;

/// Sequence runner state
///
/// Idle -> Running(0) -> ... -> Running(n-1) -> Completed, or
/// Running(i) -> Failed(i). Failed and Completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Idle,
    Running { index: usize },
    Failed { index: usize },
    Completed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Idle => write!(f, "IDLE"),
            RunState::Running { index } => write!(f, "RUNNING({})", index),
            RunState::Failed { index } => write!(f, "FAILED({})", index),
            RunState::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl RunState {
    /// Idle -> Running(0), or Idle -> Completed for an empty sequence
    pub fn start(self, len: usize) -> Result<Self> {
        match self {
            RunState::Idle if len == 0 => Ok(RunState::Completed),
            RunState::Idle => Ok(RunState::Running { index: 0 }),
            other => Err(invalid(other, "RUNNING(0)")),
        }
    }

    /// Running(i) -> Running(i+1), or Completed when i was the last index
    pub fn succeed(self, len: usize) -> Result<Self> {
        match self {
            RunState::Running { index } if index + 1 < len => {
                Ok(RunState::Running { index: index + 1 })
            }
            RunState::Running { index } if index + 1 == len => Ok(RunState::Completed),
            other => Err(invalid(other, "RUNNING(i+1)|COMPLETED")),
        }
    }

    /// Running(i) -> Failed(i)
    pub fn fail(self) -> Result<Self> {
        match self {
            RunState::Running { index } => Ok(RunState::Failed { index }),
            other => Err(invalid(other, "FAILED")),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Failed { .. } | RunState::Completed)
    }

    /// Index of the command currently running, if any
    pub fn current_index(&self) -> Option<usize> {
        match self {
            RunState::Running { index } => Some(*index),
            _ => None,
        }
    }
}

fn invalid(from: RunState, to: &str) -> DomainError {
    DomainError::InvalidStateTransition {
        from: from.to_string(),
        to: to.to_string(),
    }
}

/// Execution status of a single command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Success,
    Failed,
    Killed,
    NotStarted,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::Success => write!(f, "SUCCESS"),
            ExecutionStatus::Failed => write!(f, "FAILED"),
            ExecutionStatus::Killed => write!(f, "KILLED"),
            ExecutionStatus::NotStarted => write!(f, "NOT_STARTED"),
        }
    }
}

/// How a command's process ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// Process exited normally with this code
    Exited { code: i32 },
    /// Process was terminated by a signal (Unix)
    Signaled { signal: i32, name: Option<String> },
    /// Process could not be started
    NotStarted { reason: String },
}

impl Termination {
    pub fn status(&self) -> ExecutionStatus {
        match self {
            Termination::Exited { code: 0 } => ExecutionStatus::Success,
            Termination::Exited { .. } => ExecutionStatus::Failed,
            Termination::Signaled { .. } => ExecutionStatus::Killed,
            Termination::NotStarted { .. } => ExecutionStatus::NotStarted,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Termination::Exited { code } => Some(*code),
            _ => None,
        }
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Exited { code } => write!(f, "{}", code),
            Termination::Signaled {
                signal,
                name: Some(name),
            } => write!(f, "signal {} ({})", signal, name),
            Termination::Signaled { signal, name: None } => write!(f, "signal {}", signal),
            Termination::NotStarted { .. } => write!(f, "none (failed to start)"),
        }
    }
}

/// Outcome of one executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub index: usize,
    pub command: Command,
    pub status: ExecutionStatus,
    pub termination: Termination,
    pub duration_ms: i64,
    pub stdout: String,
    pub stderr: String,
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    /// Captured output: stdout followed by stderr
    pub fn combined_output(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }
}

/// Result of running one command sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub state: RunState,
    pub steps: Vec<StepOutcome>,
    pub total: usize,
    pub started_at: i64,  // epoch ms
    pub finished_at: i64, // epoch ms
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.state == RunState::Completed
    }

    /// The failing step, if the run ended in Failed
    pub fn failure(&self) -> Option<&StepOutcome> {
        match self.state {
            RunState::Failed { index } => self.steps.iter().find(|s| s.index == index),
            _ => None,
        }
    }

    /// Steps that actually ran, in order
    pub fn executed(&self) -> &[StepOutcome] {
        &self.steps
    }

    /// Number of commands that never ran
    pub fn skipped(&self) -> usize {
        self.total.saturating_sub(self.steps.len())
    }
}
