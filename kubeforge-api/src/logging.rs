//! Logging setup
//!
//! Console output always; JSON lines into a rolling file when enabled.

use crate::config::LoggingConfig;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "kubeforge.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    /// Unknown names fall back to daily rotation
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. The returned guard flushes the
/// file writer on drop and must be held for the life of the process.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_ansi(true)
        .with_writer(io::stdout);

    if !config.file_logging_enabled {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init()?;
        tracing::info!(level = %config.level, "Logging initialized");
        return Ok(None);
    }

    std::fs::create_dir_all(&config.log_dir)?;
    let file_appender = match LogRotation::parse(&config.rotation) {
        LogRotation::Hourly => rolling::hourly(&config.log_dir, LOG_FILE_PREFIX),
        LogRotation::Daily => rolling::daily(&config.log_dir, LOG_FILE_PREFIX),
        LogRotation::Never => rolling::never(&config.log_dir, LOG_FILE_PREFIX),
    };
    let (writer, guard) = non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_ansi(false)
        .json()
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        level = %config.level,
        log_dir = %config.log_dir.display(),
        rotation = %config.rotation,
        "Logging initialized"
    );

    Ok(Some(guard))
}

/// Log a project store operation
#[macro_export]
macro_rules! log_db_operation {
    ($op:expr, $table:expr) => {
        tracing::debug!(operation = $op, table = $table, "Database operation")
    };
    ($op:expr, $table:expr, $id:expr) => {
        tracing::debug!(
            operation = $op,
            table = $table,
            record_id = $id,
            "Database operation"
        )
    };
}
