//! Configuration types.
//!
//! This module defines the runtime configuration used by the library and the
//! enums used for command-line argument parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DB_PATH, DEFAULT_USER_AGENT, FEED_TIMEOUT_SECS, GEO_TIMEOUT_MS, RATE_TIMEOUT_MS,
    TELEGRAM_API_BASE,
};
use crate::geo::GeoStrategy;
use crate::notify::MessageFormat;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// A configuration value that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what would be accepted
    pub message: String,
}

impl ConfigValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Runtime configuration (no CLI dependencies).
///
/// Holds everything the pipeline needs that is not part of the persisted
/// site settings: credentials, timeouts and strategy choices. It is built once
/// at startup and passed explicitly to every component.
///
/// # Examples
///
/// ```no_run
/// use vps_monitor::Config;
///
/// let config = Config {
///     telegram_token: Some("123:abc".to_string()),
///     telegram_chat_id: Some("42".to_string()),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file holding site settings and the notification ledger
    pub db_path: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Telegram bot token; notifications are disabled when absent
    pub telegram_token: Option<String>,

    /// Telegram chat id receiving reminders
    pub telegram_chat_id: Option<String>,

    /// Telegram Bot API base URL
    pub telegram_api_base: String,

    /// Formatting mode used for reminder text
    pub message_format: MessageFormat,

    /// API key for exchangerate-api.com (optional third rate provider)
    pub rate_api_key: Option<String>,

    /// How IP-info providers are combined
    pub geo_strategy: GeoStrategy,

    /// Per-request timeout for IP-info providers, in milliseconds
    pub geo_timeout_ms: u64,

    /// Per-request timeout for rate providers, in milliseconds
    pub rate_timeout_ms: u64,

    /// Feed fetch timeout in seconds
    pub feed_timeout_secs: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Config {
    /// Checks that every timeout is non-zero.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.geo_timeout_ms == 0 {
            return Err(ConfigValidationError::new(
                "geo_timeout_ms",
                "must be greater than 0 (a zero timeout fails every lookup)",
            ));
        }
        if self.rate_timeout_ms == 0 {
            return Err(ConfigValidationError::new(
                "rate_timeout_ms",
                "must be greater than 0 (a zero timeout fails every lookup)",
            ));
        }
        if self.feed_timeout_secs == 0 {
            return Err(ConfigValidationError::new(
                "feed_timeout_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Returns true when both Telegram credentials are present and non-empty.
    pub fn notifications_enabled(&self) -> bool {
        matches!(
            (&self.telegram_token, &self.telegram_chat_id),
            (Some(token), Some(chat)) if !token.trim().is_empty() && !chat.trim().is_empty()
        )
    }

    pub fn geo_timeout(&self) -> Duration {
        Duration::from_millis(self.geo_timeout_ms)
    }

    pub fn rate_timeout(&self) -> Duration {
        Duration::from_millis(self.rate_timeout_ms)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            telegram_token: None,
            telegram_chat_id: None,
            telegram_api_base: TELEGRAM_API_BASE.to_string(),
            message_format: MessageFormat::MarkdownV2,
            rate_api_key: None,
            geo_strategy: GeoStrategy::Race,
            geo_timeout_ms: GEO_TIMEOUT_MS,
            rate_timeout_ms: RATE_TIMEOUT_MS,
            feed_timeout_secs: FEED_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.geo_timeout_ms, 3000);
        assert_eq!(config.rate_timeout_ms, 1000);
        assert_eq!(config.feed_timeout_secs, 10);
        assert_eq!(config.geo_strategy, GeoStrategy::Race);
        assert_eq!(config.message_format, MessageFormat::MarkdownV2);
        assert_eq!(config.db_path, PathBuf::from("./vps_monitor.db"));
        assert!(!config.notifications_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let config = Config {
            geo_timeout_ms: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "geo_timeout_ms");
        assert!(err.message.contains("greater than 0"));

        let config = Config {
            rate_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "rate_timeout_ms");

        let config = Config {
            feed_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "feed_timeout_secs");
    }

    #[test]
    fn test_notifications_require_both_credentials() {
        let mut config = Config {
            telegram_token: Some("123:abc".into()),
            ..Default::default()
        };
        assert!(!config.notifications_enabled());

        config.telegram_chat_id = Some("   ".into());
        assert!(!config.notifications_enabled());

        config.telegram_chat_id = Some("42".into());
        assert!(config.notifications_enabled());
    }
}
