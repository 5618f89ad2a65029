//! Logging Infrastructure
//!
//! Structured logging for development (pretty, stdout) and production
//! (optional JSON, optional daily-rolling file).

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "floor-server";

/// Initialize the logger with defaults (`info`, text, stdout)
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger
///
/// `RUST_LOG` wins over `log_level` when set. File output is used only when
/// `log_dir` exists.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("floor_server={level},tower_http={level},sqlx=warn")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let file_dir = log_dir.filter(|dir| Path::new(dir).is_dir());

    // try_init: a second call (tests, embedded use) keeps the first subscriber
    let result = match (file_dir, json) {
        (Some(dir), true) => builder
            .json()
            .with_ansi(false)
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            .try_init(),
        (Some(dir), false) => builder
            .with_ansi(false)
            .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            .try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}
