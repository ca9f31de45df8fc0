//! Fixed-delay retry for page fetches.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Runs `operation` up to `max_attempts` times, sleeping `delay` between
/// failed attempts.
///
/// Attempts are numbered from 1 and the number is passed to `operation`.
/// At least one attempt is always made, even when `max_attempts` is 0. The
/// delay is flat, and there is no sleep after the last failure. Every
/// [`FetchError`] counts as transient.
///
/// # Errors
///
/// Returns the error from the final attempt once all attempts have failed.
pub async fn retry_with_fixed_delay<T, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts => return Err(err),
            Err(err) => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "fetch failed; retrying after delay"
                );
            }
        }

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
