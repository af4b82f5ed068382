// Command Executor Port
// Abstraction for running one command to completion (subprocess in production)

use crate::domain::{Command, ExecutionStatus, Termination};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Explicit inputs for running a command (no implicit process-wide state)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub working_dir: PathBuf,
}

impl ExecutionContext {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Result of running a command whose process was started
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub termination: Termination,
    pub duration_ms: i64,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn from_termination(
        termination: Termination,
        duration_ms: i64,
        stdout: String,
        stderr: String,
    ) -> Self {
        Self {
            status: termination.status(),
            termination,
            duration_ms,
            stdout,
            stderr,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.termination.exit_code()
    }
}

/// Execution errors (the process never produced an exit status)
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Command Executor trait
///
/// A nonzero exit is NOT an error: it is an `ExecutionResult` with
/// `ExecutionStatus::Failed`. Errors are reserved for processes that could
/// not be started or waited on.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `command` and wait for it to finish
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the process cannot be started
    /// - ExecutionError::IoError if waiting for or reading the process fails
    async fn execute(
        &self,
        command: &Command,
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Mock executor behavior for a command
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with code 0 and this stdout
        Success(String),
        /// Exit with a nonzero code and this stderr
        Exit(i32, String),
        /// Terminated by a signal
        Signal(i32),
        /// Fail to spawn
        SpawnFail(String),
    }

    /// Mock Command Executor with per-command scripted behavior and a call log
    ///
    /// Commands are matched by their display form; unscripted commands succeed.
    #[derive(Clone, Default)]
    pub struct MockCommandExecutor {
        behaviors: Arc<Mutex<HashMap<String, MockBehavior>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockCommandExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, command: impl Into<String>, behavior: MockBehavior) -> Self {
            self.behaviors
                .lock()
                .unwrap()
                .insert(command.into(), behavior);
            self
        }

        /// Display forms of every executed command, in order
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn execute(
            &self,
            command: &Command,
            _ctx: &ExecutionContext,
        ) -> Result<ExecutionResult, ExecutionError> {
            let key = command.to_string();
            self.calls.lock().unwrap().push(key.clone());

            let behavior = self
                .behaviors
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .unwrap_or_else(|| MockBehavior::Success(String::new()));

            match behavior {
                MockBehavior::Success(out) => Ok(ExecutionResult::from_termination(
                    Termination::Exited { code: 0 },
                    1,
                    out,
                    String::new(),
                )),
                MockBehavior::Exit(code, err) => Ok(ExecutionResult::from_termination(
                    Termination::Exited { code },
                    1,
                    String::new(),
                    err,
                )),
                MockBehavior::Signal(signal) => Ok(ExecutionResult::from_termination(
                    Termination::Signaled { signal, name: None },
                    1,
                    String::new(),
                    String::new(),
                )),
                MockBehavior::SpawnFail(msg) => Err(ExecutionError::SpawnFailed(msg)),
            }
        }
    }
}
