//! Deadline-bounded combinators for provider calls.
//!
//! Every outbound lookup goes through one of these:
//! - [`with_deadline`] bounds a single call; a timeout becomes an ordinary error
//! - [`first_ok`] races calls and settles on the first success
//!
//! None of them fail fast: an error or timeout from one call never prevents a
//! success from another. Dropping a pending future aborts its request.

use std::future::Future;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};

/// Errors that can represent a call exceeding its deadline.
pub trait TimeoutError {
    fn timed_out(after: Duration) -> Self;
}

impl TimeoutError for crate::error_handling::ProviderError {
    fn timed_out(after: Duration) -> Self {
        crate::error_handling::ProviderError::Timeout(after)
    }
}

/// Runs `fut`, converting an elapsed deadline into `E::timed_out`.
pub async fn with_deadline<T, E, F>(fut: F, limit: Duration) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: TimeoutError,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(E::timed_out(limit)),
    }
}

/// Races all `futs` concurrently, each bounded by `limit`.
///
/// Returns the first `Ok` to complete; the remaining calls are dropped. If
/// every call fails (or there are none), returns all errors in completion
/// order.
pub async fn first_ok<T, E, F, I>(futs: I, limit: Duration) -> Result<T, Vec<E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
    E: TimeoutError,
{
    let mut pending: FuturesUnordered<_> = futs
        .into_iter()
        .map(|fut| with_deadline(fut, limit))
        .collect();

    let mut errors = Vec::new();
    while let Some(result) = pending.next().await {
        match result {
            Ok(value) => return Ok(value),
            Err(e) => errors.push(e),
        }
    }
    Err(errors)
}
