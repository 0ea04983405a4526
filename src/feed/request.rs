//! Cache-busting request headers for the feed.

use reqwest::header::{HeaderName, CACHE_CONTROL, EXPIRES, PRAGMA};

/// Headers that stop intermediate caches from serving a stale feed.
///
/// The feed is usually a raw file on a CDN-backed host (GitHub raw, gists,
/// object storage) that caches aggressively; an edited expiry date must show
/// up on the next run.
pub(crate) const NO_CACHE_HEADERS: [(HeaderName, &str); 3] = [
    (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (PRAGMA, "no-cache"),
    (EXPIRES, "0"),
];

/// Applies [`NO_CACHE_HEADERS`] to a request.
pub(crate) fn apply_no_cache(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    NO_CACHE_HEADERS
        .into_iter()
        .fold(builder, |builder, (name, value)| builder.header(name, value))
}
