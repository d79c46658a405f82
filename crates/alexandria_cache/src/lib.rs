//! Response caching with TTL expiry and LRU eviction.
//!
//! Successful API responses are cached under a digest of the endpoint and
//! query parameters, cutting duplicate traffic against rate-limited
//! upstream endpoints. Detail lookups (a single paper's record changes
//! rarely) live longer than search results. Capacity is bounded; the least
//! recently used entry is evicted first, where both reads and writes count
//! as use.

#![warn(missing_docs)]

mod cache;

pub use cache::{CacheConfig, CacheConfigBuilder, CacheStats, ResponseCache};
