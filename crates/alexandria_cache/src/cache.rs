//! Response cache implementation.

use derive_getters::Getters;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Configuration for the response cache.
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
pub struct CacheConfig {
    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,

    /// TTL in seconds for single-resource detail endpoints
    #[serde(default = "default_detail_ttl")]
    detail_ttl_secs: u64,

    /// TTL in seconds for search and listing endpoints
    #[serde(default = "default_search_ttl")]
    search_ttl_secs: u64,

    /// Maximum number of cached entries
    #[serde(default = "default_max_entries")]
    max_entries: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_detail_ttl() -> u64 {
    3600
}

fn default_search_ttl() -> u64 {
    300
}

fn default_max_entries() -> usize {
    1000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            detail_ttl_secs: default_detail_ttl(),
            search_ttl_secs: default_search_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

/// Point-in-time counters for cache effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Live entries currently stored
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that fell through to the network
    pub misses: u64,
    /// hits / (hits + misses), 0.0 before any lookup
    pub hit_rate: f64,
}

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
    endpoint: String,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

#[derive(Debug)]
struct CacheInner {
    entries: LruCache<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// TTL + LRU cache of successful API responses.
///
/// Keys are a truncated SHA-256 digest of the endpoint and sorted query
/// parameters; identical requests map to identical keys regardless of
/// parameter construction order. All operations serialize through one
/// async mutex. The backing [`LruCache`] gives O(1) promotion on access
/// and O(1) eviction at capacity.
///
/// # Example
///
/// ```
/// use alexandria_cache::{CacheConfig, ResponseCache};
/// use serde_json::json;
///
/// # async fn demo() {
/// let cache = ResponseCache::new(CacheConfig::default());
/// cache.set("/paper/search", None, json!({"total": 0}), None).await;
/// assert!(cache.get("/paper/search", None).await.is_some());
/// # }
/// ```
#[derive(Debug)]
pub struct ResponseCache {
    config: CacheConfig,
    inner: Mutex<CacheInner>,
}

impl ResponseCache {
    /// Create a cache with the given configuration.
    ///
    /// A `max_entries` of zero is treated as one; the store always has
    /// room for at least a single entry.
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);
        tracing::debug!(
            enabled = config.enabled,
            detail_ttl_secs = config.detail_ttl_secs,
            search_ttl_secs = config.search_ttl_secs,
            max_entries = capacity.get(),
            "creating response cache"
        );
        Self {
            config,
            inner: Mutex::new(CacheInner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Look up a cached response.
    ///
    /// Returns `None` when caching is disabled, the key is absent, or the
    /// entry has expired (expired entries are removed on the way out). A
    /// hit promotes the entry to most recently used.
    #[tracing::instrument(skip(self, params), fields(endpoint))]
    pub async fn get(&self, endpoint: &str, params: Option<&[(String, String)]>) -> Option<Value> {
        if !self.config.enabled {
            return None;
        }

        let key = make_key(endpoint, params);
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let expired = match inner.entries.get(&key) {
            None => {
                inner.misses += 1;
                tracing::debug!("cache miss");
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            inner.entries.pop(&key);
            inner.misses += 1;
            tracing::debug!("cache entry expired, removed");
            return None;
        }

        inner.hits += 1;
        tracing::debug!("cache hit");
        inner.entries.get(&key).map(|entry| entry.value.clone())
    }

    /// Store a response.
    ///
    /// No-op when caching is disabled. An explicit `ttl` wins; otherwise
    /// the per-endpoint default applies: paper detail endpoints get the
    /// long TTL, searches and everything else the short one. Inserting at
    /// capacity evicts the least recently used entry.
    #[tracing::instrument(skip(self, params, value), fields(endpoint))]
    pub async fn set(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        value: Value,
        ttl: Option<Duration>,
    ) {
        if !self.config.enabled {
            return;
        }

        let ttl = ttl.unwrap_or_else(|| self.default_ttl_for(endpoint));
        let key = make_key(endpoint, params);
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
            endpoint: endpoint.to_string(),
        };

        let mut inner = self.inner.lock().await;
        if let Some((evicted_key, evicted)) = inner.entries.push(key.clone(), entry)
            && evicted_key != key
        {
            tracing::debug!(endpoint = %evicted.endpoint, "evicted least recently used entry");
        }
        tracing::debug!(ttl_secs = ttl.as_secs_f64(), "cached response");
    }

    /// Remove every entry whose endpoint contains `pattern`.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate(&self, pattern: &str) -> usize {
        let mut inner = self.inner.lock().await;
        let matching: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.endpoint.contains(pattern))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &matching {
            inner.entries.pop(key);
        }

        if !matching.is_empty() {
            tracing::info!(pattern, removed = matching.len(), "invalidated cache entries");
        }
        matching.len()
    }

    /// Drop every entry and reset the hit/miss counters.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        let count = inner.entries.len();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
        tracing::info!(cleared = count, "cleared cache");
    }

    /// Current counters.
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().await;
        let lookups = inner.hits + inner.misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            inner.hits as f64 / lookups as f64
        };
        CacheStats {
            entries: inner.entries.len(),
            hits: inner.hits,
            misses: inner.misses,
            hit_rate,
        }
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn default_ttl_for(&self, endpoint: &str) -> Duration {
        if endpoint.contains("/paper/") && !endpoint.contains("/search") {
            Duration::from_secs(self.config.detail_ttl_secs)
        } else {
            Duration::from_secs(self.config.search_ttl_secs)
        }
    }
}

/// Derive the cache key for an endpoint and parameter set.
///
/// Parameters are sorted so construction order cannot split identical
/// requests across keys. The digest is truncated to 16 hex characters;
/// collisions at that length are accepted as a negligible risk.
fn make_key(endpoint: &str, params: Option<&[(String, String)]>) -> String {
    let mut pairs: Vec<(String, String)> = params.map(|p| p.to_vec()).unwrap_or_default();
    pairs.sort();

    let canonical = serde_json::json!({
        "endpoint": endpoint,
        "params": pairs,
    });

    let digest = Sha256::digest(canonical.to_string().as_bytes());
    hex::encode(digest)[..16].to_string()
}
