// Application Layer - Use Cases

pub mod runner;

// Re-exports
pub use runner::{exit_code_for, Diagnostic, RunnerConfig, SequenceRunner, ShellSpec};
