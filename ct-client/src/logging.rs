//! This module sets up `tracing` for the client.

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{filter::LevelFilter, fmt::Layer, prelude::*, EnvFilter};
use tracing_unwrap::ResultExt;

/// The common prefix for the client's log files.
const LOG_PREFIX: &str = "chaos-tree.log";

/// The directory for log files, from the `CHAOS_TREE_LOG_DIR` environment variable.
fn log_dir() -> Option<String> {
    std::env::var("CHAOS_TREE_LOG_DIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
}

/// Initialise a subscriber for tracing to log to `stdout`, and also to a daily log file if
/// `CHAOS_TREE_LOG_DIR` is set.
///
/// The returned guard must be kept alive for the file log to be flushed.
pub fn init_tracing() -> Option<WorkerGuard> {
    let stdout_layer = Layer::new()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        );

    let (file_layer, guard) = match log_dir() {
        Some(dir) => {
            let (appender, guard) = non_blocking(rolling::daily(dir, LOG_PREFIX));
            let layer = Layer::new()
                .with_writer(appender)
                .with_ansi(false)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(LevelFilter::DEBUG.into())
                        .parse_lossy(""),
                );
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer);

    tracing::subscriber::set_global_default(subscriber)
        .expect_or_log("Setting the global default for tracing should be okay");

    guard
}
