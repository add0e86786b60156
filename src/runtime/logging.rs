use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_dir};

const LOG_FILE: &str = "vibetunes.log";
const DEFAULT_FILTER: &str = "info,vibetunes=debug";

/// Directory the rolling log file goes to.
fn log_dir(settings: &LoggingSettings) -> PathBuf {
    settings
        .directory
        .as_ref()
        .map(PathBuf::from)
        .or_else(default_log_dir)
        .unwrap_or_else(std::env::temp_dir)
}

/// `RUST_LOG` first, then the configured directive, then the built-in one.
fn env_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.filter.as_deref().unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a daily rolling file subscriber. The terminal belongs to the TUI,
/// so nothing is written to stdout/stderr.
///
/// The returned guard flushes pending lines on drop; keep it alive for the
/// whole run.
pub fn init(settings: &LoggingSettings) -> anyhow::Result<WorkerGuard> {
    let dir = log_dir(settings);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(env_filter(settings))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install log subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_directory_wins() {
        let settings = LoggingSettings {
            directory: Some("/var/tmp/vt-logs".to_string()),
            filter: None,
        };
        assert_eq!(log_dir(&settings), PathBuf::from("/var/tmp/vt-logs"));
    }

    #[test]
    fn default_directory_is_never_empty() {
        let dir = log_dir(&LoggingSettings::default());
        assert!(!dir.as_os_str().is_empty());
    }
}
