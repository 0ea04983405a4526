//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, sentinels, defaults)
//! - Runtime configuration and CLI option types
//! - Persisted site settings

mod constants;
mod site;
mod types;

// Re-export all constants
pub use constants::*;
pub use site::SiteConfig;
pub use types::{Config, ConfigValidationError, LogFormat, LogLevel};
