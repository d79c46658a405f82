//! Circuit breaker for failing fast during upstream outages.
//!
//! After a run of consecutive transport or server failures the breaker
//! opens and rejects calls immediately, giving the upstream room to
//! recover instead of piling more traffic onto it. Once a recovery window
//! has passed, a trial call probes the service; success closes the circuit
//! again.
//!
//! Calls report their result as a tagged [`Outcome`] so the breaker never
//! inspects error internals: `Failed` counts toward opening the circuit,
//! `Rejected` (not-found, rate-limited) passes through as an ordinary
//! error without implicating upstream health.

#![warn(missing_docs)]

mod breaker;

pub use breaker::{CircuitBreaker, CircuitConfig, CircuitConfigBuilder, CircuitState, Outcome};
