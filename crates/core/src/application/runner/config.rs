// Runner configuration: explicit working directory and shell

use std::path::PathBuf;

use super::constants::{DEFAULT_SHELL_FLAG, DEFAULT_SHELL_PROGRAM, DEFAULT_WORKING_DIR};
use crate::error::{AppError, Result};
use crate::port::ExecutionContext;

/// Shell used to run `Command::Shell` lines: `<program> <flag> <line>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSpec {
    pub program: String,
    pub flag: String,
}

impl ShellSpec {
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flag: flag.into(),
        }
    }
}

impl Default for ShellSpec {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL_PROGRAM, DEFAULT_SHELL_FLAG)
    }
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub working_dir: PathBuf,
    pub shell: ShellSpec,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from(DEFAULT_WORKING_DIR),
            shell: ShellSpec::default(),
        }
    }
}

impl RunnerConfig {
    /// Check the configuration before any command runs
    ///
    /// # Errors
    /// - AppError::Config if the working directory does not exist or the shell is blank
    pub fn validate(&self) -> Result<()> {
        if !self.working_dir.is_dir() {
            return Err(AppError::Config(format!(
                "working directory '{}' is not a directory",
                self.working_dir.display()
            )));
        }
        if self.shell.program.trim().is_empty() {
            return Err(AppError::Config("shell program must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn execution_context(&self) -> ExecutionContext {
        ExecutionContext::new(self.working_dir.clone())
    }
}
