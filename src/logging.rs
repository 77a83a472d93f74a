use std::path::Path;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::BotConfig;

/// Directory used when `LOG_TO_FILE=true`.
pub const LOG_DIR: &str = "logs";
/// File name prefix; daily rotation appends the date, e.g. `bot.log.2026-10-15`.
pub const LOG_FILE: &str = "bot.log";

/// Keeps the file writer flushing; hold it until the process exits.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Map a `LOG_LEVEL` value onto a tracing filter. Case-insensitive.
pub fn parse_log_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

/// Install the global subscriber using the config's log settings.
///
/// `RUST_LOG` takes precedence over `LOG_LEVEL` when set. Console output goes
/// to stderr; with `log_to_file` a daily-rotated copy is written under
/// [`LOG_DIR`] as `bot.log.YYYY-MM-DD`.
pub fn init(config: &BotConfig) -> Result<LogGuard> {
    init_in(config, Path::new(LOG_DIR))
}

/// Like [`init`] with an explicit log directory.
pub fn init_in(config: &BotConfig, log_dir: &Path) -> Result<LogGuard> {
    let level = parse_log_level(&config.log_level);
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(level.unwrap_or(LevelFilter::INFO).into())
            .from_env_lossy()
    };

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let (file, guard) = if config.log_to_file {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE)
            .build(log_dir)
            .with_context(|| format!("failed to create log file in {}", log_dir.display()))?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter());
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()?;

    if level.is_none() {
        warn!("Unrecognized LOG_LEVEL {:?}, using info", config.log_level);
    }
    Ok(LogGuard { _file: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_log_level("INFO"), Some(LevelFilter::INFO));
        assert_eq!(parse_log_level("debug"), Some(LevelFilter::DEBUG));
        assert_eq!(parse_log_level("Warning"), Some(LevelFilter::WARN));
        assert_eq!(parse_log_level(" error "), Some(LevelFilter::ERROR));
        assert_eq!(parse_log_level("trace"), Some(LevelFilter::TRACE));
    }

    #[test]
    fn unwritable_log_dir_is_an_error() {
        let mut env = std::collections::HashMap::new();
        env.insert("SOFTWARE_WS_URL".to_string(), "wss://feed.example.com".to_string());
        env.insert("LOG_TO_FILE".to_string(), "true".to_string());
        let manager = crate::ConfigManager::load(&env).expect("config should load");

        // A path below a regular file can never be created as a directory.
        let blocker = tempfile::NamedTempFile::new().expect("temp file");
        let log_dir = blocker.path().join("logs");

        let err = init_in(manager.config(), &log_dir)
            .err()
            .expect("init should fail for an unwritable directory");
        assert!(err.to_string().contains("failed to create log file"));
    }

    #[test]
    fn unknown_level_is_none() {
        assert_eq!(parse_log_level("verbose"), None);
        assert_eq!(parse_log_level(""), None);
    }
}
