//! VPS inventory feed retrieval.
//!
//! A single attempt, no retry: any failure here is fatal to the run and
//! surfaces to the caller with a category-specific hint.

mod request;
mod types;

use std::time::Duration;

use log::{debug, error, info};

use crate::error_handling::PipelineError;

pub use types::{parse_day_or_instant, VpsRecord};

/// Validates the configured feed URL.
///
/// # Errors
///
/// `PipelineError::Config` if the URL is blank, unparsable or not http(s).
pub fn validate_feed_url(url: &str) -> Result<url::Url, PipelineError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::Config(
            "no feed URL configured".to_string(),
        ));
    }
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| PipelineError::Config(format!("invalid feed URL {trimmed:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(PipelineError::Config(format!(
            "unsupported feed URL scheme {scheme:?}"
        ))),
    }
}

/// Fetches and validates the VPS feed.
///
/// # Errors
///
/// - `PipelineError::Config` if `url` is empty or invalid
/// - `PipelineError::Upstream` if the request fails, times out or returns a
///   non-success status
/// - `PipelineError::Format` if the body is not a non-empty JSON array of VPS
///   entries
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<Vec<VpsRecord>, PipelineError> {
    let url = validate_feed_url(url)?;
    debug!("Fetching feed from {}", url);

    let response = request::apply_no_cache(client.get(url.clone()))
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            error!("Feed request to {} failed: {}", url, e);
            PipelineError::Upstream(format!("feed request failed: {e}"))
        })?;

    let status = response.status();
    if !status.is_success() {
        error!("Feed request to {} returned HTTP {}", url, status);
        return Err(PipelineError::Upstream(format!(
            "feed returned HTTP status {}",
            status.as_u16()
        )));
    }

    let body = response.bytes().await.map_err(|e| {
        PipelineError::Upstream(format!("failed to read feed body: {e}"))
    })?;
    let records = parse_feed(&body)?;
    info!("Feed contains {} VPS entries", records.len());
    Ok(records)
}

/// Parses a feed body into records.
///
/// The body must be a JSON array with at least one element, and every element
/// must be a valid VPS entry.
pub fn parse_feed(body: &[u8]) -> Result<Vec<VpsRecord>, PipelineError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| PipelineError::Format(format!("feed is not valid JSON: {e}")))?;

    let serde_json::Value::Array(entries) = value else {
        return Err(PipelineError::Format(
            "feed is not a JSON array".to_string(),
        ));
    };
    if entries.is_empty() {
        return Err(PipelineError::Format("feed array is empty".to_string()));
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry).map_err(|e| {
                PipelineError::Format(format!("feed entry {index} is invalid: {e}"))
            })
        })
        .collect()
}
