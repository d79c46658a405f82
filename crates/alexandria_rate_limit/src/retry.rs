//! Exponential backoff retry for rate-limited requests.

use alexandria_error::{AlexandriaError, AlexandriaResult, ApiError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Configuration for retry behavior with exponential backoff.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial call
    #[serde(default = "default_max_retries")]
    max_retries: u32,

    /// Initial delay in seconds before the first retry
    #[serde(default = "default_base_delay")]
    base_delay: f64,

    /// Ceiling on the computed delay in seconds
    #[serde(default = "default_max_delay")]
    max_delay: f64,

    /// Base for the exponential backoff curve
    #[serde(default = "default_exponential_base")]
    exponential_base: f64,

    /// Jitter fraction in [0, 1] added on top of each delay
    #[serde(default = "default_jitter")]
    jitter: f64,
}

fn default_max_retries() -> u32 {
    5
}

fn default_base_delay() -> f64 {
    1.0
}

fn default_max_delay() -> f64 {
    60.0
}

fn default_exponential_base() -> f64 {
    2.0
}

fn default_jitter() -> f64 {
    0.1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay: default_base_delay(),
            max_delay: default_max_delay(),
            exponential_base: default_exponential_base(),
            jitter: default_jitter(),
        }
    }
}

/// Backoff delay calculator.
///
/// Stateless: each delay is a pure function of the attempt number and an
/// optional server hint, modulo the jitter draw.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a policy from a config.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Delay before retry number `attempt` (0-indexed).
    ///
    /// A positive `retry_after` hint from the server takes precedence over
    /// the backoff curve, and still receives jitter so a herd of throttled
    /// clients does not reconverge on the same instant.
    pub fn calculate_delay(&self, attempt: u32, retry_after: Option<f64>) -> Duration {
        if let Some(hint) = retry_after
            && hint > 0.0
        {
            let jitter_amount = hint * self.config.jitter * fastrand::f64();
            return Duration::from_secs_f64(hint + jitter_amount);
        }

        let exponential = self.config.base_delay * self.config.exponential_base.powi(attempt as i32);
        let delay = exponential.min(self.config.max_delay);
        let jitter_amount = delay * self.config.jitter * fastrand::f64();
        Duration::from_secs_f64(delay + jitter_amount)
    }

    /// Whether another retry is allowed after `attempt` (0-indexed).
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.config.max_retries
    }
}

/// Execute an async operation, retrying rate-limited failures.
///
/// Runs `operation` up to `max_retries + 1` times. Only failures classified
/// as rate limits are retried, sleeping through
/// [`RetryPolicy::calculate_delay`] between attempts; every other error
/// propagates immediately. A rate limit on the final attempt propagates to
/// the caller rather than being swallowed.
///
/// # Examples
///
/// ```
/// use alexandria_rate_limit::{RetryConfig, with_retry};
///
/// # async fn demo() -> alexandria_error::AlexandriaResult<()> {
/// let config = RetryConfig::default().with_max_retries(2);
/// let value = with_retry(&config, || async { Ok::<_, alexandria_error::AlexandriaError>(42) }).await?;
/// assert_eq!(value, 42);
/// # Ok(())
/// # }
/// ```
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> AlexandriaResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AlexandriaResult<T>>,
{
    let policy = RetryPolicy::new(config.clone());
    let mut last_error: Option<AlexandriaError> = None;

    for attempt in 0..=*config.max_retries() {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let rate_limited = err
                    .as_api()
                    .map(|api| api.kind.is_rate_limited())
                    .unwrap_or(false);
                if !rate_limited {
                    return Err(err);
                }

                if !policy.should_retry(attempt) {
                    tracing::warn!(
                        attempts = attempt + 1,
                        "rate limit exceeded after final attempt, giving up"
                    );
                    return Err(err);
                }

                let retry_after = err.as_api().and_then(|api| api.kind.retry_after());
                let delay = policy.calculate_delay(attempt, retry_after);
                tracing::info!(
                    delay_secs = delay.as_secs_f64(),
                    attempt = attempt + 1,
                    max_retries = config.max_retries(),
                    "rate limited, backing off before retry"
                );
                last_error = Some(err);
                tokio::time::sleep(delay).await;
            }
        }
    }

    // Unreachable when the loop logic is correct: the final attempt either
    // returns its value or propagates its error above.
    Err(last_error.unwrap_or_else(|| {
        ApiError::connection_failure("retry loop exited without resolution").into()
    }))
}
