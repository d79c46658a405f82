//! Alexandria: a resilient Semantic Scholar client for research workflows.
//!
//! Alexandria wraps the Semantic Scholar Graph and Recommendations APIs with
//! the protective plumbing a long-running research session needs: token bucket
//! rate limiting, retries with exponential backoff, a circuit breaker, and a
//! TTL + LRU response cache. On top of the client sit a tool registry for
//! paper search, author lookup, and recommendations, a session tracker that
//! remembers every paper fetched, and a BibTeX exporter.
//!
//! # Features
//!
//! - **Rate limiting**: token bucket tuned to the unauthenticated or
//!   authenticated API tier
//! - **Retries**: exponential backoff with jitter, honoring `Retry-After`
//! - **Circuit breaker**: fail fast when the API is struggling
//! - **Response cache**: TTL + LRU, with detail lookups cached longer than
//!   searches
//! - **Paper tracking**: every fetched paper is remembered for the session
//! - **BibTeX export**: tracked papers become citable entries
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use alexandria::{AlexandriaConfig, ScholarClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AlexandriaConfig::load()?;
//!     let client = ScholarClient::new(&config)?;
//!
//!     let results = client
//!         .get(
//!             alexandria::ApiBase::Graph,
//!             "/paper/search",
//!             &[
//!                 ("query".into(), "attention is all you need".into()),
//!                 ("limit".into(), "5".into()),
//!             ],
//!         )
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&results)?);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The workspace is split into focused crates:
//!
//! - `alexandria_error`: shared error types with source location capture
//! - `alexandria_rate_limit`: token bucket and retry policy
//! - `alexandria_breaker`: circuit breaker state machine
//! - `alexandria_cache`: TTL + LRU response cache
//! - `alexandria_client`: HTTP client composing the resilience layers
//! - `alexandria_bibtex`: BibTeX entry generation and export
//! - `alexandria_tools`: tool registry and session paper tracking
//!
//! This crate (`alexandria`) re-exports everything for convenience and ships
//! the `alexandria` command-line binary.

// Error types
pub use alexandria_error::*;

// Resilience primitives
pub use alexandria_breaker::*;
pub use alexandria_cache::*;
pub use alexandria_rate_limit::*;

// Client
pub use alexandria_client::*;

// Collaborators
pub use alexandria_bibtex::*;
pub use alexandria_tools::*;
