use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::NatlangError;

/// Where diagnostics go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Standard error, for the REPL and one-shot modes
    Stderr,
    /// An append-only file, for the full-screen UI
    File(&'a Path),
}

/// Build the filter: RUST_LOG wins, then the requested default level
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the logging system
pub fn init_logger(default_level: &str, target: LogTarget<'_>) -> Result<(), NatlangError> {
    let filter = build_filter(default_level);

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_thread_names(false)
                        .compact(),
                )
                .try_init()
                .map_err(|e| NatlangError::ConfigError(e.to_string()))?;
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            // Terminal UI owns the screen, so no ANSI and no stderr layer here
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true),
                )
                .try_init()
                .map_err(|e| NatlangError::ConfigError(e.to_string()))?;
        }
    }

    Ok(())
}
