//! Bounded retry for calls against external services.
//!
//! Retry policy lives here at the collaborator boundary; routing logic never
//! loops on a failed generator.

use crate::error::GenerationError;
use std::time::Duration;

/// Attempts per external call.
pub const DEFAULT_ATTEMPTS: usize = 3;

/// Fixed delay between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Run an operation up to `attempts` times with a fixed backoff between
/// failures, returning the first success or the last error.
pub async fn with_retries<T, F, Fut>(
    attempts: usize,
    backoff: Duration,
    label: &str,
    mut operation: F,
) -> Result<T, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, GenerationError>>,
{
    let mut last_error = GenerationError::RequestFailed(format!("{label}: no attempts made"));

    for attempt in 1..=attempts.max(1) {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt < attempts {
                    tracing::warn!(%error, label, attempt, "external call failed, retrying");
                    tokio::time::sleep(backoff).await;
                }
                last_error = error;
            }
        }
    }

    Err(last_error)
}
