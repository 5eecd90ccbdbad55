//! # Logging
//!
//! Tracing subscriber setup shared by both binaries.
//!
//! Logs go to stderr so stdout stays free for console frames and JSON Lines.
//! When `[logging] dir` is set they go to a daily rolling file instead.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Prefix of rolling log file names
pub const LOG_FILE_PREFIX: &str = "motion-remote.log";

/// Default level, overridable through `RUST_LOG`
fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
}

/// Install the global subscriber.
///
/// The returned guard flushes file output on drop and must be held until exit.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    if config.dir.is_empty() {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&config.dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
