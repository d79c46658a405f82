//! Token bucket for proactive request pacing.

use crate::ApiTier;
use alexandria_error::{AlexandriaResult, ConfigError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket rate limiter.
///
/// Tokens accumulate at `rate` per second up to `capacity` and are spent by
/// [`acquire`](TokenBucket::acquire). The bucket starts full, so a burst of
/// up to `capacity` requests passes without waiting. Refill is lazy: the
/// level is recomputed from elapsed time on each acquisition rather than by
/// a background task.
///
/// One bucket is shared by every caller of a client; all state lives behind
/// an async mutex, and the guard is held across the sleep so waiters are
/// served roughly in arrival order.
#[derive(Debug)]
pub struct TokenBucket {
    rate: f64,
    capacity: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a bucket refilling at `rate` tokens per second with a burst
    /// ceiling of `capacity`.
    ///
    /// Both must be positive: a zero rate would make every depleted
    /// acquisition wait forever.
    pub fn new(rate: f64, capacity: f64) -> AlexandriaResult<Self> {
        if rate.is_nan() || rate <= 0.0 {
            return Err(ConfigError::new(format!(
                "token bucket rate must be positive, got {rate}"
            ))
            .into());
        }
        if capacity.is_nan() || capacity <= 0.0 {
            return Err(ConfigError::new(format!(
                "token bucket capacity must be positive, got {capacity}"
            ))
            .into());
        }
        Ok(Self {
            rate,
            capacity,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        })
    }

    /// Create the bucket matching a rate-limit tier.
    pub fn for_tier(tier: ApiTier) -> Self {
        Self {
            rate: tier.rate(),
            capacity: tier.burst(),
            state: Mutex::new(BucketState {
                tokens: tier.burst(),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Acquire `cost` tokens, suspending until they are available.
    ///
    /// Returns the time waited in seconds, 0.0 when the bucket had enough
    /// tokens. A `cost` above `capacity` is allowed and simply waits
    /// proportionally longer; the level is clamped to zero afterward, never
    /// negative.
    pub async fn acquire(&self, cost: f64) -> f64 {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.rate).min(self.capacity);
        state.last_refill = now;

        if state.tokens >= cost {
            state.tokens -= cost;
            return 0.0;
        }

        let needed = cost - state.tokens;
        let wait = needed / self.rate;
        tracing::debug!(wait_secs = wait, cost, "token bucket depleted, pacing request");

        // Consumed everything available plus the refill we are waiting for.
        tokio::time::sleep(Duration::from_secs_f64(wait)).await;
        state.tokens = 0.0;
        state.last_refill = Instant::now();

        wait
    }

    /// Acquire a single token.
    pub async fn acquire_one(&self) -> f64 {
        self.acquire(1.0).await
    }

    /// Snapshot of the current token level, without refilling.
    pub async fn available(&self) -> f64 {
        self.state.lock().await.tokens
    }

    /// Tokens added per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Maximum burst size.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}
