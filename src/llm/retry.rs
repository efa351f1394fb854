//! Exponential backoff retry for chat-completion calls.

use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use tracing::{debug, warn};

use crate::error::GenerationError;

/// Configuration: 3 total attempts, waits of 1s then 2s.
pub const MAX_ATTEMPTS: u32 = 3;
const INITIAL_INTERVAL_SECS: u64 = 1;
const MAX_INTERVAL_SECS: u64 = 30;
const MULTIPLIER: f64 = 2.0;

/// How many times to attempt a call and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_interval: Duration::from_secs(INITIAL_INTERVAL_SECS),
            multiplier: MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Whether a failed `attempt` (1-based) should be followed by another.
    pub fn should_retry(&self, error: &GenerationError, attempt: u32) -> bool {
        error.is_transient() && attempt < self.max_attempts
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_interval,
            initial_interval: self.initial_interval,
            randomization_factor: 0.0,
            multiplier: self.multiplier,
            max_interval: Duration::from_secs(MAX_INTERVAL_SECS),
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Run `attempt` until it succeeds, fails terminally, or the policy's
/// attempts are used up.
///
/// `attempt` receives the 1-based attempt number. Terminal errors are
/// returned as-is after a single call. When every attempt fails with a
/// transient error the last one is wrapped in
/// [`GenerationError::RetriesExhausted`].
pub async fn retry_with_policy<T, Fut, F>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<T, GenerationError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let mut backoff = policy.backoff();
    let mut attempts = 0;

    loop {
        attempts += 1;

        let error = match attempt(attempts).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !error.is_transient() {
            debug!("Attempt {} failed terminally: {}", attempts, error);
            return Err(error);
        }

        if !policy.should_retry(&error, attempts) {
            warn!("Giving up after {} attempts: {}", attempts, error);
            return Err(GenerationError::RetriesExhausted {
                attempts,
                last: Box::new(error),
            });
        }

        let wait = backoff.next_backoff().unwrap_or(policy.initial_interval);
        warn!(
            "Attempt {}/{} failed: {}. Retrying in {:?}",
            attempts, policy.max_attempts, error, wait
        );
        tokio::time::sleep(wait).await;
    }
}
