//! Tracing setup for the ingestion server.
//!
//! Two layers: a compact stdout layer for interactive runs, and an optional
//! non-blocking file layer so a slow disk never stalls the upload hot path.
//! The file target comes from `DOCTRIAGE_LOG_FILE`, falling back to
//! `logs/doctriage.log`; if neither can be opened the server logs to stdout
//! only. `RUST_LOG` controls filtering and defaults to `info`.

use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Dropping the guard flushes and shuts the writer down, so it lives for the
// whole process.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global tracing subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout = fmt::layer().with_target(false).compact();
    let registry = tracing_subscriber::registry().with(filter).with(stdout);

    match file_writer() {
        Some(writer) => registry
            .with(fmt::layer().with_writer(writer).with_ansi(false).compact())
            .init(),
        None => registry.init(),
    }
}

/// Open the log file target and wrap it in a non-blocking writer.
fn file_writer() -> Option<NonBlocking> {
    let (writer, guard) = match std::env::var("DOCTRIAGE_LOG_FILE") {
        Ok(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|err| eprintln!("Failed to open log file {path}: {err}"))
                .ok()?;
            tracing_appender::non_blocking(file)
        }
        Err(_) => {
            std::fs::create_dir_all("logs")
                .map_err(|err| eprintln!("Failed to create logs directory: {err}"))
                .ok()?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(
                "logs",
                "doctriage.log",
            ))
        }
    };
    let _ = LOG_GUARD.set(guard);
    Some(writer)
}
