//! Command-line arguments
//!
//! The command list itself is fixed; flags only describe where and how it runs.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use seqrun_core::application::runner::constants::DEFAULT_WORKING_DIR;
use seqrun_core::application::RunnerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Stream command output, print a diagnostic on failure
    Text,
    /// Print the run report as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "seqrun")]
#[command(
    about = "Run `make clean`, `make all` and `./buddy_system` in order, stopping at the first failure",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Directory the commands run in
    #[arg(long, env = "SEQRUN_WORKING_DIR", default_value = DEFAULT_WORKING_DIR)]
    pub working_dir: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print a table of all steps after the run
    #[arg(long)]
    pub summary: bool,

    /// Do not stream command output while it runs
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Runner configuration with `~` expanded in the working directory
    ///
    /// The fixed sequence is argv-only, so the shell stays at its default.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            working_dir: PathBuf::from(shellexpand::tilde(&self.working_dir).into_owned()),
            ..RunnerConfig::default()
        }
    }
}
