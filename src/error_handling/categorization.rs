//! Error categorization.
//!
//! This module maps provider failures onto the counters tracked by
//! [`ProcessingStats`].

use super::stats::ProcessingStats;
use super::types::{ErrorType, ProviderError};

/// Which family of external provider produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Geo,
    Rate,
}

/// Categorizes a `ProviderError` into an `ErrorType`.
///
/// A `reqwest` timeout surfaces as a request error, so it is folded into the
/// timeout category here: a timeout firing is treated the same as any other
/// timeout regardless of which layer enforced it.
pub fn categorize_provider_error(kind: ProviderKind, error: &ProviderError) -> ErrorType {
    let timed_out = match error {
        ProviderError::Timeout(_) => true,
        ProviderError::Request(e) => e.is_timeout(),
        _ => false,
    };
    match (kind, error) {
        (ProviderKind::Geo, _) if timed_out => ErrorType::GeoProviderTimeout,
        (ProviderKind::Rate, _) if timed_out => ErrorType::RateProviderTimeout,
        (ProviderKind::Geo, ProviderError::Status(_)) => ErrorType::GeoProviderStatus,
        (ProviderKind::Rate, ProviderError::Status(_)) => ErrorType::RateProviderStatus,
        (ProviderKind::Geo, ProviderError::Request(_)) => ErrorType::GeoProviderRequest,
        (ProviderKind::Rate, ProviderError::Request(_)) => ErrorType::RateProviderRequest,
        (ProviderKind::Geo, ProviderError::Malformed(_)) => ErrorType::GeoProviderMalformed,
        (ProviderKind::Rate, ProviderError::Malformed(_)) => ErrorType::RateProviderMalformed,
        (ProviderKind::Geo, _) => ErrorType::GeoProviderEmpty,
        (ProviderKind::Rate, _) => ErrorType::RateProviderEmpty,
    }
}

/// Records a provider failure in the statistics and logs it.
///
/// Provider failures are expected (rate limits, flaky free APIs) and always
/// recovered from, so they log at debug level.
pub fn record_provider_error(
    stats: &ProcessingStats,
    kind: ProviderKind,
    provider: &str,
    error: &ProviderError,
) {
    let error_type = categorize_provider_error(kind, error);
    stats.increment_error(error_type);
    log::debug!("{} [{}]: {}", error_type, provider, error);
}
