//! seqrun - Main Entry Point
//! Runs the fixed build-and-run sequence, fail-fast

mod args;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

use args::{Cli, OutputFormat};
use seqrun_core::application::{exit_code_for, SequenceRunner};
use seqrun_core::domain::CommandSequence;
use seqrun_core::port::id_provider::UuidProvider;
use seqrun_core::port::time_provider::SystemTimeProvider;
use seqrun_infra_system::{OutputEcho, SubprocessExecutor};

const VERSION: &str = env!("CARGO_PKG_VERSION");

// One child at a time: a current-thread runtime is all the runner needs
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Initialize logging (colors only when stderr is a terminal)
    logging::init_logging();
    colored::control::set_override(std::io::stderr().is_terminal());
    info!("seqrun v{} starting", VERSION);

    // 2. Load configuration
    let config = cli.runner_config();
    config
        .validate()
        .context("Invalid runner configuration")?;
    debug!(config = ?config, "Configuration loaded");

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let executor = Arc::new(
        SubprocessExecutor::new(time_provider.clone(), config.shell.clone())
            .with_echo(echo_mode(&cli)),
    );
    let runner = SequenceRunner::new(
        executor,
        time_provider,
        Arc::new(UuidProvider),
        config.execution_context(),
    );

    // 4. Run the fixed sequence
    let sequence = CommandSequence::default_build_and_run();
    let report = runner
        .run(&sequence)
        .await
        .context("Command sequence aborted")?;

    // 5. Report
    match cli.format {
        OutputFormat::Json => println!("{}", output::render_json(&report)?),
        OutputFormat::Text => {
            if let Some(diagnostic) = output::render_diagnostic(&report) {
                eprintln!("{}", diagnostic);
            }
        }
    }

    if cli.summary {
        eprintln!("{}", output::render_summary(&report, &sequence));
    }

    let code = exit_code_for(&report);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}

/// Live output target: JSON mode keeps stdout for the report
fn echo_mode(cli: &Cli) -> OutputEcho {
    match (cli.quiet, cli.format) {
        (true, _) => OutputEcho::Silent,
        (false, OutputFormat::Text) => OutputEcho::Terminal,
        (false, OutputFormat::Json) => OutputEcho::Stderr,
    }
}
