//! Token bucket rate limiting and retry backoff.
//!
//! The Semantic Scholar API expects clients to pace themselves and to back
//! off exponentially when throttled. This crate provides both halves:
//!
//! - [`TokenBucket`] gates requests proactively, before they leave the
//!   process, at a rate chosen by [`ApiTier`] (authenticated keys get a
//!   dedicated 1 req/s lane; anonymous traffic shares a pool that allows
//!   short bursts).
//! - [`RetryPolicy`] and [`with_retry`] react to 429 responses, sleeping
//!   through exponential backoff with jitter and honoring server-supplied
//!   `Retry-After` hints.

#![warn(missing_docs)]

mod bucket;
mod retry;
mod tier;

pub use bucket::TokenBucket;
pub use retry::{RetryConfig, RetryConfigBuilder, RetryPolicy, with_retry};
pub use tier::ApiTier;
