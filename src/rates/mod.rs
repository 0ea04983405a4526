//! USD->CNY exchange rate lookup.
//!
//! Providers are tried one at a time in a fixed order; the first valid rate
//! wins, and later providers only fill in a missing timestamp. When every
//! provider fails the resolver falls back to a constant rate
//! stamped with the current time, so rate resolution never fails a run.

mod providers;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;

use crate::config::FALLBACK_RATE_CNY;
use crate::error_handling::{record_provider_error, ProcessingStats, ProviderKind, WarningType};
use crate::utils::settle::with_deadline;

pub use providers::{parse_timestamp, RateProvider, RateProviderKind, RateQuote};

/// CNY per 1 USD, with the time the rate was published.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    pub rate_cny: f64,
    pub timestamp: DateTime<Utc>,
    /// Provider name, `None` for the fallback constant
    pub source: Option<String>,
}

impl ExchangeRate {
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self {
            rate_cny: FALLBACK_RATE_CNY,
            timestamp: now,
            source: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source.is_none()
    }
}

pub struct RateResolver {
    client: Arc<reqwest::Client>,
    providers: Vec<RateProvider>,
    timeout: Duration,
    stats: Arc<ProcessingStats>,
}

impl RateResolver {
    pub fn new(
        client: Arc<reqwest::Client>,
        providers: Vec<RateProvider>,
        timeout: Duration,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            client,
            providers,
            timeout,
            stats,
        }
    }

    /// Resolves the current rate. Never fails.
    ///
    /// The first valid rate wins. If its quote carries no timestamp, later
    /// providers are still queried for one; `now` is used only when none does.
    pub async fn resolve(&self, now: DateTime<Utc>) -> ExchangeRate {
        let mut rate: Option<(String, f64)> = None;
        let mut timestamp: Option<DateTime<Utc>> = None;
        let mut failures = 0usize;

        for provider in &self.providers {
            match with_deadline(provider.query(&self.client), self.timeout).await {
                Ok(quote) => {
                    if rate.is_none() {
                        rate = Some((provider.name.clone(), quote.rate_cny));
                    }
                    timestamp = timestamp.or(quote.timestamp);
                    if timestamp.is_some() {
                        break;
                    }
                    debug!("{} quoted no timestamp, trying next provider", provider.name);
                }
                Err(e) => {
                    failures += 1;
                    record_provider_error(&self.stats, ProviderKind::Rate, &provider.name, &e);
                }
            }
        }

        match rate {
            Some((name, rate_cny)) => {
                debug!("USD->CNY rate {} from {}", rate_cny, name);
                ExchangeRate {
                    rate_cny,
                    timestamp: timestamp.unwrap_or(now),
                    source: Some(name),
                }
            }
            None => {
                self.stats.increment_warning(WarningType::RateFallbackUsed);
                warn!(
                    "All {} rate providers failed, using fallback rate {}",
                    failures, FALLBACK_RATE_CNY
                );
                ExchangeRate::fallback(now)
            }
        }
    }
}
