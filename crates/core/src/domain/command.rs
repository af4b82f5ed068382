// Command Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// A single invocation in a sequence
///
/// `Argv` is spawned directly with an explicit argument list, so nothing is
/// re-parsed by a shell. `Shell` hands an opaque line to an explicit shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    Argv { program: String, args: Vec<String> },
    Shell { line: String },
}

impl Command {
    /// Build an argument-list command
    ///
    /// # Errors
    /// - DomainError::ValidationError if `program` is empty or blank
    pub fn argv<I, S>(program: impl Into<String>, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "command program must not be empty".to_string(),
            ));
        }

        Ok(Command::Argv {
            program,
            args: args.into_iter().map(Into::into).collect(),
        })
    }

    /// Build a shell command line (run through the configured shell)
    ///
    /// # Errors
    /// - DomainError::ValidationError if `line` is empty or blank
    pub fn shell(line: impl Into<String>) -> Result<Self> {
        let line = line.into();
        if line.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "shell command line must not be empty".to_string(),
            ));
        }
        Ok(Command::Shell { line })
    }

    /// Program name (argv) or the whole line (shell)
    pub fn program(&self) -> &str {
        match self {
            Command::Argv { program, .. } => program,
            Command::Shell { line } => line,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Argv { program, args } => {
                write!(f, "{}", program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Command::Shell { line } => write!(f, "{}", line),
        }
    }
}

/// Ordered, immutable list of commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSequence {
    commands: Vec<Command>,
}

impl CommandSequence {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// The fixed build-and-run sequence: `make clean`, `make all`, `./buddy_system`
    pub fn default_build_and_run() -> Self {
        Self::new(vec![
            Command::Argv {
                program: "make".to_string(),
                args: vec!["clean".to_string()],
            },
            Command::Argv {
                program: "make".to_string(),
                args: vec!["all".to_string()],
            },
            Command::Argv {
                program: "./buddy_system".to_string(),
                args: Vec::new(),
            },
        ])
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a CommandSequence {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
