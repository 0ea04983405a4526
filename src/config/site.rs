//! Persisted site settings.

use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_REMINDER_DAYS, DEFAULT_SITENAME};
use super::types::ConfigValidationError;

/// Settings edited by the operator and stored in the key-value store.
///
/// Read at the start of every pipeline run; `days` bounds which records are
/// eligible for a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub sitename: String,
    pub vpsurl: String,
    pub days: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            sitename: DEFAULT_SITENAME.to_string(),
            vpsurl: String::new(),
            days: DEFAULT_REMINDER_DAYS,
        }
    }
}

impl SiteConfig {
    /// Builds settings from raw stored values, applying defaults.
    ///
    /// A missing or blank site name falls back to the default, and a missing,
    /// non-numeric or zero `days` falls back to the default threshold.
    pub fn from_raw(sitename: Option<&str>, vpsurl: Option<&str>, days: Option<&str>) -> Self {
        let sitename = sitename
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SITENAME)
            .to_string();
        let vpsurl = vpsurl.map(str::trim).unwrap_or_default().to_string();
        let days = days
            .and_then(|d| d.trim().parse::<u32>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_REMINDER_DAYS);
        Self {
            sitename,
            vpsurl,
            days,
        }
    }

    /// Parses a settings update as submitted by an operator.
    ///
    /// Unlike [`SiteConfig::from_raw`], invalid input is rejected rather than
    /// defaulted: the feed URL is required and `days` must be a positive integer.
    pub fn parse_update(
        sitename: &str,
        vpsurl: &str,
        days: &str,
    ) -> Result<Self, ConfigValidationError> {
        let vpsurl = vpsurl.trim();
        if vpsurl.is_empty() {
            return Err(ConfigValidationError::new(
                "vpsurl",
                "the feed URL is required",
            ));
        }
        let days = days
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| {
                ConfigValidationError::new("days", "must be an integer greater than 0")
            })?;
        let sitename = match sitename.trim() {
            "" => DEFAULT_SITENAME.to_string(),
            name => name.to_string(),
        };
        Ok(Self {
            sitename,
            vpsurl: vpsurl.to_string(),
            days,
        })
    }
}
