use crate::prelude::*;

use std::future::Future;
use std::time::Duration;

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for reqwest::Error {
    fn is_retryable(&self) -> bool {
        self.is_timeout()
            || self.is_connect()
            || self.status().is_some_and(|s| s.is_server_error())
    }
}

pub struct Error {
    pub error: crate::error::Error,
    pub is_retryable: bool,
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self {
            is_retryable: error.is_retryable(),
            error: error.into(),
        }
    }
}

impl From<Error> for crate::error::Error {
    fn from(e: Error) -> Self {
        e.error
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 5_000,
        }
    }
}

pub const NO_RETRY: RetryOptions = RetryOptions {
    max_retries: 0,
    initial_backoff_ms: 0,
    max_backoff_ms: 0,
};

impl RetryOptions {
    /// Delay before retry number `attempt + 1`, doubling up to the cap.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u64 << attempt.min(16);
        Duration::from_millis(
            self.initial_backoff_ms
                .saturating_mul(factor)
                .min(self.max_backoff_ms),
        )
    }
}

pub async fn run<Ok, Fut, F>(f: F, options: &RetryOptions) -> std::result::Result<Ok, Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<Ok, Error>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable && attempt < options.max_retries => {
                let delay = options.backoff(attempt);
                attempt += 1;
                warn!(
                    "Will retry #{attempt} in {}ms for retryable error: {}",
                    delay.as_millis(),
                    err.error
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
