//! Retry logic with exponential backoff.
//!
//! Thin wrapper over the `backon` crate. Only errors classified as
//! retryable by [`ProviderError::is_retryable`] are retried; the rest
//! return immediately.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use patrimonio_types::config::ReferenceConfig;

use crate::error::{ProviderError, Result};

/// Initial backoff delay between attempts.
const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Backoff cap.
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Executes an async operation with retry using exponential backoff.
///
/// `config.retry_attempts` counts total attempts: the initial call plus
/// retries.
///
/// # Errors
///
/// Returns the last error once attempts are exhausted, or the first
/// non-retryable error immediately.
pub async fn with_retry<F, Fut, T>(config: &ReferenceConfig, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_retries = config.retry_attempts.saturating_sub(1) as usize;

    let backoff = ExponentialBuilder::new()
        .with_min_delay(INITIAL_BACKOFF)
        .with_max_delay(MAX_BACKOFF)
        .with_max_times(max_retries);

    operation
        .retry(backoff)
        .sleep(tokio::time::sleep)
        .when(|err: &ProviderError| err.is_retryable())
        .notify(|err: &ProviderError, dur: Duration| {
            tracing::debug!(
                error = %err,
                backoff_ms = dur.as_millis() as u64,
                "retrying provider call"
            );
        })
        .await
}
