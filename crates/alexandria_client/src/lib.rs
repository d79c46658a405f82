//! Semantic Scholar API client with layered resilience.
//!
//! [`ScholarClient`] wraps the Graph and Recommendations APIs behind a
//! response cache, a token bucket rate limiter, an exponential-backoff
//! retry wrapper, and a circuit breaker. Configuration loads from bundled
//! defaults, user TOML files, and `ALEXANDRIA_`-prefixed environment
//! variables via [`AlexandriaConfig::load`].
//!
//! The HTTP layer sits behind the [`Transport`] trait, so tests can
//! script upstream behavior without a network.

#![warn(missing_docs)]

mod client;
mod config;
mod transport;

pub use client::ScholarClient;
pub use config::{AlexandriaConfig, ApiBase, ApiConfig, ApiConfigBuilder};
pub use transport::{
    ApiRequest, HttpMethod, HttpTransport, RawResponse, Transport, classify_response,
};
