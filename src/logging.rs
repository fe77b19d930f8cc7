//! Logging Setup
//!
//! Console logging via tracing-subscriber with an env-filter; optionally
//! mirrors to a daily-rotated file when a log directory is configured.

use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Logging configuration assembled by `main` from CLI flags and env.
#[derive(Debug, Default)]
pub struct LogConfig {
    debug: bool,
    log_dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = Some(dir);
        self
    }
}

/// Initialize the global subscriber. Returns the file writer's guard when
/// file logging is active; the caller must keep it alive for the process
/// lifetime or buffered lines are lost.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_logging(config: LogConfig) -> Result<Option<WorkerGuard>> {
    let default_filter = if config.debug {
        "crabrelay=debug,serenity=warn"
    } else {
        "crabrelay=info,serenity=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, "crabrelay.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to set global subscriber: {e}"))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to set global subscriber: {e}"))?;
            Ok(None)
        }
    }
}
