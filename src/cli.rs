//! Command-line interface.
//!
//! Global options map onto [`Config`]; secrets come from the environment
//! (`TGTOKEN`, `TGID`, `RATE_API`), optionally via a `.env` file.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{
    Config, LogFormat, LogLevel, DB_PATH, DEFAULT_CHECK_INTERVAL_MINUTES, DEFAULT_USER_AGENT,
    FEED_TIMEOUT_SECS, GEO_TIMEOUT_MS, RATE_TIMEOUT_MS, TELEGRAM_API_BASE,
};
use crate::geo::GeoStrategy;
use crate::notify::MessageFormat;

/// VPS expiry monitor: enriches a VPS inventory feed and sends Telegram
/// reminders before instances expire.
#[derive(Debug, Parser)]
#[command(
    name = "vps_monitor",
    version,
    about = "Monitors a VPS inventory feed and sends expiry reminders"
)]
pub struct Cli {
    /// Log level: error/warn/info/debug/trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain/json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// SQLite database for settings and the reminder ledger
    #[arg(long, env = "VPS_MONITOR_DB", default_value = DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// Telegram bot token
    #[arg(long, env = "TGTOKEN", hide_env_values = true, global = true)]
    pub telegram_token: Option<String>,

    /// Telegram chat id receiving reminders
    #[arg(long, env = "TGID", global = true)]
    pub telegram_chat_id: Option<String>,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_BASE", default_value = TELEGRAM_API_BASE, global = true)]
    pub telegram_api_base: String,

    /// Reminder markup: plain/markdown-v2/html
    #[arg(long, value_enum, default_value_t = MessageFormat::MarkdownV2, global = true)]
    pub message_format: MessageFormat,

    /// exchangerate-api.com key (enables the third rate provider)
    #[arg(long, env = "RATE_API", hide_env_values = true, global = true)]
    pub rate_api_key: Option<String>,

    /// How IP-info providers are combined: race/merge
    #[arg(long, value_enum, default_value_t = GeoStrategy::Race, global = true)]
    pub geo_strategy: GeoStrategy,

    /// Per-request IP-info timeout in milliseconds
    #[arg(long, default_value_t = GEO_TIMEOUT_MS, global = true)]
    pub geo_timeout_ms: u64,

    /// Per-request exchange rate timeout in milliseconds
    #[arg(long, default_value_t = RATE_TIMEOUT_MS, global = true)]
    pub rate_timeout_ms: u64,

    /// Feed fetch timeout in seconds
    #[arg(long, default_value_t = FEED_TIMEOUT_SECS, global = true)]
    pub feed_timeout_secs: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline once and log the result
    Check,
    /// Serve the dashboard and run the pipeline periodically
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: SocketAddr,

        /// Minutes between scheduled runs
        #[arg(long, default_value_t = DEFAULT_CHECK_INTERVAL_MINUTES, value_parser = clap::value_parser!(u64).range(1..))]
        interval_minutes: u64,
    },
    /// Show or change the stored site settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the stored settings
    Show,
    /// Replace the stored settings
    Set {
        /// Dashboard title (blank for the default)
        #[arg(long, default_value = "")]
        sitename: String,

        /// URL of the VPS inventory JSON feed
        #[arg(long)]
        vpsurl: String,

        /// Reminder threshold in days
        #[arg(long, default_value = "5")]
        days: String,
    },
}

impl Cli {
    /// Runtime configuration from the global options.
    pub fn to_config(&self) -> Config {
        Config {
            db_path: self.db_path.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            telegram_token: self.telegram_token.clone(),
            telegram_chat_id: self.telegram_chat_id.clone(),
            telegram_api_base: self.telegram_api_base.clone(),
            message_format: self.message_format,
            rate_api_key: self.rate_api_key.clone(),
            geo_strategy: self.geo_strategy,
            geo_timeout_ms: self.geo_timeout_ms,
            rate_timeout_ms: self.rate_timeout_ms,
            feed_timeout_secs: self.feed_timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }
}
