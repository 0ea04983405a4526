//! Configuration constants.
//!
//! This module defines the constants used throughout the application:
//! timeouts for every outbound call, sentinels, fallbacks and defaults for
//! the persisted site settings.

/// Sentinel for a geo field no provider could resolve.
pub const UNKNOWN: &str = "Unknown";

// Network operation timeouts
/// Feed fetch timeout in seconds
/// The feed is a single static JSON file, so anything slower than this is treated as upstream failure
pub const FEED_TIMEOUT_SECS: u64 = 10;
/// Per-request timeout for a single IP-info provider call, in milliseconds
pub const GEO_TIMEOUT_MS: u64 = 3000;
/// Per-request timeout for a single exchange-rate provider call, in milliseconds
pub const RATE_TIMEOUT_MS: u64 = 1000;
/// Telegram sendMessage timeout in seconds
pub const DISPATCH_TIMEOUT_SECS: u64 = 5;
/// TCP connection timeout in seconds (applies to every client request)
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 3;

/// USD -> CNY rate used when every rate provider fails.
pub const FALLBACK_RATE_CNY: f64 = 7.29;

// Persisted site settings defaults
/// Site name shown when none has been saved
pub const DEFAULT_SITENAME: &str = "VPS Expiry Monitor";
/// Reminder threshold in days when none (or an invalid value) has been saved
pub const DEFAULT_REMINDER_DAYS: u32 = 5;

// Store keys (config namespace)
pub const KEY_SITENAME: &str = "sitename";
pub const KEY_VPSURL: &str = "vpsurl";
pub const KEY_DAYS: &str = "days";

/// Default SQLite database holding settings and the notification ledger.
pub const DB_PATH: &str = "./vps_monitor.db";

/// Default User-Agent for outbound requests.
///
/// Some IP-info providers reject requests without a User-Agent, so one is
/// always sent.
pub const DEFAULT_USER_AGENT: &str = concat!("vps_monitor/", env!("CARGO_PKG_VERSION"));

/// Telegram Bot API base URL.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Interval between scheduled runs when serving, in minutes.
pub const DEFAULT_CHECK_INTERVAL_MINUTES: u64 = 60;

/// Seconds in one day, used for ceiling day arithmetic.
pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
