//! Circuit breaker state machine.

use alexandria_error::ApiError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Configuration for circuit breaker behavior.
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
pub struct CircuitConfig {
    /// Consecutive tripping failures before the circuit opens
    #[serde(default = "default_failure_threshold")]
    failure_threshold: u32,

    /// Seconds the circuit stays open before a trial call is allowed
    #[serde(default = "default_recovery_timeout")]
    recovery_timeout_secs: f64,
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_recovery_timeout() -> f64 {
    60.0
}

impl CircuitConfig {
    /// Recovery window as a [`Duration`].
    pub fn recovery_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.recovery_timeout_secs)
    }
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            recovery_timeout_secs: default_recovery_timeout(),
        }
    }
}

/// Current state of the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum CircuitState {
    /// Requests pass through; consecutive failures are counted.
    Closed,
    /// Requests are rejected without reaching the upstream.
    Open,
    /// The recovery window elapsed; a trial call is probing the upstream.
    HalfOpen,
}

/// Result of a call as seen by the circuit breaker.
///
/// The wrapped operation classifies its own failure before the breaker
/// looks at it, so breaker logic only ever matches on the tag:
///
/// - `Success` — the call worked; counts as a success.
/// - `Rejected` — the upstream answered but refused this request
///   (not-found, rate-limited). Propagated to the caller as an error, yet
///   counts as a success for circuit health: the service is reachable.
/// - `Failed` — transport or server failure; counts toward opening the
///   circuit.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The call succeeded with a payload.
    Success(T),
    /// Client-visible refusal that says nothing about upstream health.
    Rejected(ApiError),
    /// Breaker-worthy failure.
    Failed(ApiError),
}

impl<T> Outcome<T> {
    /// Tag a classified transport result.
    ///
    /// Failures for which [`ApiErrorKind::trips_breaker`] holds become
    /// `Failed`; every other error becomes `Rejected`.
    ///
    /// [`ApiErrorKind::trips_breaker`]: alexandria_error::ApiErrorKind::trips_breaker
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) if err.kind.trips_breaker() => Outcome::Failed(err),
            Err(err) => Outcome::Rejected(err),
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

/// Circuit breaker guarding one upstream service.
///
/// State transitions happen under a lock, but the guarded call itself runs
/// outside it, so closed-circuit traffic is never serialized through the
/// breaker.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// Create a breaker in the `Closed` state.
    pub fn new(config: CircuitConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                failure_count: 0,
                last_failure_time: None,
            }),
        }
    }

    /// Run `operation` through the breaker.
    ///
    /// While the circuit is open and the recovery window has not elapsed,
    /// the operation is not invoked at all and the caller gets a
    /// `CircuitOpen` error. Otherwise the operation runs and its
    /// [`Outcome`] tag drives the state machine; both `Rejected` and
    /// `Failed` arms surface their error to the caller.
    pub async fn call<T, F, Fut>(&self, operation: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome<T>>,
    {
        if !self.try_acquire().await {
            return Err(ApiError::circuit_open());
        }

        match operation().await {
            Outcome::Success(value) => {
                self.record_success().await;
                Ok(value)
            }
            Outcome::Rejected(err) => {
                self.record_success().await;
                Err(err)
            }
            Outcome::Failed(err) => {
                self.record_failure().await;
                Err(err)
            }
        }
    }

    /// Whether a call may proceed right now, transitioning `Open` to
    /// `HalfOpen` when the recovery window has elapsed.
    async fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let elapsed = inner
                    .last_failure_time
                    .map(|at| at.elapsed())
                    .unwrap_or(Duration::MAX);
                if elapsed >= self.config.recovery_timeout() {
                    inner.state = CircuitState::HalfOpen;
                    tracing::info!(
                        elapsed_secs = elapsed.as_secs_f64(),
                        "circuit recovery window elapsed, allowing trial call"
                    );
                    true
                } else {
                    false
                }
            }
        }
    }

    async fn record_success(&self) {
        let mut inner = self.inner.lock().await;
        match inner.state {
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Closed;
                inner.failure_count = 0;
                tracing::info!("trial call succeeded, circuit closed");
            }
            CircuitState::Closed => {
                inner.failure_count = 0;
            }
            CircuitState::Open => {}
        }
    }

    async fn record_failure(&self) {
        let mut inner = self.inner.lock().await;
        inner.failure_count += 1;
        inner.last_failure_time = Some(Instant::now());

        match inner.state {
            CircuitState::Closed => {
                if inner.failure_count >= *self.config.failure_threshold() {
                    inner.state = CircuitState::Open;
                    tracing::warn!(
                        failures = inner.failure_count,
                        recovery_secs = self.config.recovery_timeout_secs(),
                        "failure threshold reached, circuit opened"
                    );
                }
            }
            CircuitState::HalfOpen => {
                inner.state = CircuitState::Open;
                tracing::warn!("trial call failed, circuit reopened");
            }
            CircuitState::Open => {}
        }
    }

    /// Current state of the circuit.
    pub async fn state(&self) -> CircuitState {
        self.inner.lock().await.state
    }

    /// Consecutive tripping failures recorded so far.
    pub async fn failure_count(&self) -> u32 {
        self.inner.lock().await.failure_count
    }

    /// The configuration this breaker was built with.
    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }
}
