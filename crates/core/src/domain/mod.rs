// Domain Layer - Pure entities and the run state machine

pub mod command;
pub mod error;
pub mod run;

// Re-exports
pub use command::{Command, CommandSequence};
pub use error::DomainError;
pub use run::{ExecutionStatus, RunId, RunReport, RunState, StepOutcome, Termination};
