//! Structured logging configuration for Setpoint

use std::str::FromStr;

use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration for the Setpoint binary
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: LogLevel,
    /// Include source file and line numbers
    pub include_source: bool,
}

/// Log levels supported by Setpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            include_source: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("SETPOINT_LOG_LEVEL") {
            if let Ok(parsed) = LogLevel::from_str(&level) {
                config.level = parsed;
            }
        }
        if let Ok(source) = std::env::var("SETPOINT_LOG_SOURCE") {
            config.include_source = source.to_lowercase() == "true";
        }
        config
    }

    /// Raise the level to debug, used by the `--verbose` flag.
    pub fn verbose(mut self) -> Self {
        self.level = LogLevel::Debug;
        self
    }
}

/// Initialize the global tracing subscriber. `RUST_LOG` overrides the
/// configured level when set. Fails if a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level: tracing::Level = config.level.into();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(config.include_source)
        .with_line_number(config.include_source)
        .with_writer(std::io::stderr)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("warn").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn verbose_raises_the_default_level() {
        let config = LogConfig::default().verbose();
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn reinitialization_fails_without_panicking() {
        let config = LogConfig::default();
        // No other unit test installs a subscriber, so the first call wins
        // and the second must report the conflict as an error.
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_err());
    }
}
