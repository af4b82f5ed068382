//! Logging setup
//!
//! Logs go to stderr so captured command output on stdout stays clean.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (default: `seqrun=warn`)
//! - `SEQRUN_LOG_FORMAT`: `json` for structured logs, anything else for pretty

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "seqrun=warn";

pub fn init_logging() {
    let log_format = std::env::var("SEQRUN_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match log_format.as_str() {
        "json" => {
            // Structured logging for machine consumption
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .pretty()
                        .with_ansi(std::io::stderr().is_terminal())
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}
