use crate::error::{AppError, ConfigError, Result};
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, Layer, Registry};

#[derive(Debug)]
pub struct LoggerConfig {
    /// Directory for the rolling log file; `None` logs to stderr only.
    pub directory: Option<String>,
    pub file_name: String,
    pub rotation: Rotation,
    pub level: Level,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: "league-scraper.log".to_string(),
            rotation: Rotation::DAILY,
            level: Level::INFO,
        }
    }
}

pub fn init_logging(config: LoggerConfig) -> Result<()> {
    let level_filter = tracing::level_filters::LevelFilter::from_level(config.level);

    // Stdout is reserved for command output.
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .with_filter(level_filter);

    let file_layer = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory).map_err(|e| {
                AppError::Config(ConfigError::InvalidValue(format!(
                    "Failed to create log directory {}: {}",
                    directory, e
                )))
            })?;

            let file_appender =
                RollingFileAppender::new(config.rotation, directory, &config.file_name);

            Some(
                fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .with_filter(level_filter),
            )
        }
        None => None,
    };

    let subscriber = Registry::default().with(stderr_layer).with(file_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        AppError::Config(ConfigError::InvalidValue(format!(
            "Failed to set global subscriber: {}",
            e
        )))
    })?;

    Ok(())
}

pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(AppError::Config(ConfigError::InvalidValue(format!(
            "Invalid log level: {}",
            level
        )))),
    }
}

// Helper macros for consistent logging with error handling
#[macro_export]
macro_rules! log_error {
    // Tag the event with the AppError kind
    ($err:expr => $($arg:tt)*) => {{
        let err: &$crate::error::AppError = &$err;
        tracing::error!(error = %err, kind = err.kind(), $($arg)*)
    }};
    ($($arg:tt)*) => {
        tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}
