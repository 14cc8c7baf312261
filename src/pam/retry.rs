//! Fixed-interval retry for transient failures

use super::error::{ApiError, ApiResult};
use std::future::Future;
use std::time::Duration;

/// Number of re-dispatches after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Seconds slept between attempts
pub const DEFAULT_REQUEST_SLEEP_SECS: u64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub sleep: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            sleep: Duration::from_secs(DEFAULT_REQUEST_SLEEP_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, sleep: Duration) -> Self {
        Self { max_retries, sleep }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Run `f` until it succeeds, fails permanently, or retries run out.
    ///
    /// Only errors for which [`ApiError::is_retryable`] holds are re-dispatched.
    /// After `max_retries` retries the last error is wrapped in
    /// [`ApiError::RetriesExhausted`].
    pub async fn execute<F, Fut, T>(&self, operation: &str, mut f: F) -> ApiResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let mut retries: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if retries > 0 {
                        tracing::debug!(operation, retries, "succeeded after retries");
                    }
                    return Ok(value);
                },
                Err(err) if err.is_retryable() => {
                    if retries >= self.max_retries {
                        tracing::error!(operation, attempts = retries + 1, error = %err, "retries exhausted");
                        return Err(ApiError::RetriesExhausted {
                            attempts: retries + 1,
                            last: Box::new(err),
                        });
                    }
                    retries += 1;
                    tracing::warn!(
                        operation,
                        retry = retries,
                        max_retries = self.max_retries,
                        sleep_secs = self.sleep.as_secs(),
                        error = %err,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(self.sleep).await;
                },
                Err(err) => return Err(err),
            }
        }
    }
}
