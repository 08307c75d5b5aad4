//! Logging setup.
//!
//! Every subcommand runs a full-screen TUI, so log output cannot share
//! the terminal: events go to a non-blocking session file under the
//! state path. Setting `logging.to_file = false` redirects them to
//! stderr for debugging outside the alternate screen.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub struct LoggingHandle {
    /// Keeps the background log writer alive; dropping it flushes
    pub _guard: Option<WorkerGuard>,

    /// Path of the session log, when file logging is enabled
    pub log_file_path: Option<PathBuf>,
}

/// Level filter: the --debug flag beats the configured level,
/// RUST_LOG beats both.
fn effective_level(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// One log file per session, named by start time
fn session_log_name() -> String {
    format!("bolsa-{}.log", chrono::Utc::now().format("%Y%m%dT%H%M%SZ"))
}

pub fn init_logging(config: &Config, debug_override: bool) -> Result<LoggingHandle> {
    let spec = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| effective_level(config, debug_override));
    let filter = tracing_subscriber::EnvFilter::new(spec);

    if config.logging.to_file {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)
            .with_context(|| format!("failed to create {}", logs_dir.display()))?;

        let log_filename = session_log_name();
        let log_file_path = logs_dir.join(&log_filename);

        let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(log_file_path),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_debug_flag_overrides_configured_level() {
        let mut config = Config::default();
        config.logging.level = "warn".to_string();

        assert_eq!(effective_level(&config, false), "warn");
        assert_eq!(effective_level(&config, true), "debug");
    }

    #[test]
    fn test_session_log_name_shape() {
        let name = session_log_name();
        assert!(name.starts_with("bolsa-"));
        assert!(name.ends_with(".log"));
    }

    // The global subscriber can only be installed once per process,
    // so the file branch gets a single end-to-end test.
    #[test]
    fn test_file_logging_creates_session_log_under_state_path() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();

        let handle = init_logging(&config, false).unwrap();
        let path = handle.log_file_path.expect("file logging is the default");
        assert!(path.starts_with(config.logs_path()));
        assert!(config.logs_path().is_dir());
    }
}
