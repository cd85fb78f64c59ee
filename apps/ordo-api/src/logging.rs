//! Logging setup.
//!
//! Console output is always on. When a log directory is configured, a
//! second layer writes plain (non-ANSI) lines to a daily rolling file
//! `<dir>/ordo-api.YYYY-MM-DD` through a non-blocking writer.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LogConfig;

/// File name prefix of the rolling log.
pub const LOG_FILE_PREFIX: &str = "ordo-api";

/// Builds the filter: `RUST_LOG` wins, otherwise the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the lifetime of the process.
pub fn init(config: &LogConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let console_layer = if config.json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = match config.dir.as_deref() {
        Some(dir) => {
            fs::create_dir_all(Path::new(dir))?;

            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = if config.json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer()
                    .with_ansi(false)
                    .with_thread_ids(true)
                    .with_writer(writer)
                    .boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
