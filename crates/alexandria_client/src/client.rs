//! Composition of the resilience layers into the API client.

use crate::config::{AlexandriaConfig, ApiBase, ApiConfig};
use crate::transport::{ApiRequest, HttpTransport, Transport, classify_response};
use alexandria_breaker::{CircuitBreaker, Outcome};
use alexandria_cache::{CacheStats, ResponseCache};
use alexandria_error::AlexandriaResult;
use alexandria_rate_limit::{ApiTier, RetryConfig, TokenBucket, with_retry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Client for the Semantic Scholar Graph and Recommendations APIs.
///
/// Each GET flows through three layers, in order:
/// 1. the response cache, where a hit returns without spending a token;
/// 2. the token bucket, pacing requests to the configured tier;
/// 3. the circuit breaker, which fails fast during upstream outages.
///
/// Successful GET responses are written back to the cache. POST requests
/// skip the cache entirely but share the bucket and breaker.
///
/// All state lives in the instance: two clients built from the same
/// configuration have independent buckets, breakers, and caches.
///
/// # Example
///
/// ```no_run
/// use alexandria_client::{AlexandriaConfig, ApiBase, ScholarClient};
///
/// # async fn demo() -> alexandria_error::AlexandriaResult<()> {
/// let config = AlexandriaConfig::load()?;
/// let client = ScholarClient::new(&config)?;
///
/// let params = vec![("query".to_string(), "attention is all you need".to_string())];
/// let results = client
///     .get_with_retry(ApiBase::Graph, "/paper/search", Some(&params))
///     .await?;
/// println!("{}", results);
/// # Ok(())
/// # }
/// ```
pub struct ScholarClient {
    config: ApiConfig,
    retry: RetryConfig,
    transport: Arc<dyn Transport>,
    limiter: TokenBucket,
    breaker: CircuitBreaker,
    cache: ResponseCache,
}

impl std::fmt::Debug for ScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScholarClient")
            .field("config", &self.config)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ScholarClient {
    /// Build a client from configuration, using the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed, for
    /// example when the configured API key is not a valid header value.
    pub fn new(config: &AlexandriaConfig) -> AlexandriaResult<Self> {
        let transport = HttpTransport::new(config.api.timeout(), config.api.api_key().as_deref())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client around an explicit transport.
    pub fn with_transport(config: &AlexandriaConfig, transport: Arc<dyn Transport>) -> Self {
        let tier = ApiTier::from_api_key(config.api.api_key().as_deref());
        info!(%tier, "initializing Semantic Scholar client");

        Self {
            config: config.api.clone(),
            retry: config.retry.clone(),
            transport,
            limiter: TokenBucket::for_tier(tier),
            breaker: CircuitBreaker::new(config.circuit.clone()),
            cache: ResponseCache::new(config.cache.clone()),
        }
    }

    /// GET from one of the Semantic Scholar APIs.
    ///
    /// # Errors
    ///
    /// Surfaces the classified API error: not-found, rate-limited with an
    /// optional `Retry-After` hint, authentication failure, server error,
    /// connection failure, or a circuit-open rejection.
    #[instrument(skip(self, params))]
    pub async fn get(
        &self,
        base: ApiBase,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> AlexandriaResult<Value> {
        // Cache probe comes first: a hit spends no token and never touches
        // the breaker.
        if let Some(hit) = self.cache.get(endpoint, params).await {
            return Ok(hit);
        }

        let request = ApiRequest::get(self.config.base_url(base), endpoint, params);
        let value = self.breaker.call(|| self.dispatch(request)).await?;

        self.cache.set(endpoint, params, value.clone(), None).await;
        Ok(value)
    }

    /// POST to one of the Semantic Scholar APIs.
    ///
    /// POST responses are never cached.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`get`](Self::get).
    #[instrument(skip(self, params, body))]
    pub async fn post(
        &self,
        base: ApiBase,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        body: Option<Value>,
    ) -> AlexandriaResult<Value> {
        let request = ApiRequest::post(self.config.base_url(base), endpoint, params, body);
        Ok(self.breaker.call(|| self.dispatch(request)).await?)
    }

    /// GET with automatic backoff on rate limits.
    ///
    /// When auto-retry is disabled in the configuration this behaves
    /// identically to [`get`](Self::get).
    pub async fn get_with_retry(
        &self,
        base: ApiBase,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> AlexandriaResult<Value> {
        if !*self.config.enable_auto_retry() {
            return self.get(base, endpoint, params).await;
        }

        with_retry(&self.retry, || self.get(base, endpoint, params)).await
    }

    /// POST with automatic backoff on rate limits.
    ///
    /// When auto-retry is disabled in the configuration this behaves
    /// identically to [`post`](Self::post).
    pub async fn post_with_retry(
        &self,
        base: ApiBase,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        body: Option<Value>,
    ) -> AlexandriaResult<Value> {
        if !*self.config.enable_auto_retry() {
            return self.post(base, endpoint, params, body).await;
        }

        with_retry(&self.retry, || {
            self.post(base, endpoint, params, body.clone())
        })
        .await
    }

    /// Run one request through the token bucket and the transport,
    /// classifying the result for the circuit breaker.
    async fn dispatch(&self, request: ApiRequest) -> Outcome<Value> {
        info!(method = %request.method, endpoint = %request.endpoint, "API request");

        let waited = self.limiter.acquire_one().await;
        if waited > 0.0 {
            debug!(waited_secs = waited, "rate limiter delayed request");
        }

        let result = match self.transport.execute(&request).await {
            Ok(raw) => {
                info!(
                    method = %request.method,
                    endpoint = %request.endpoint,
                    status = raw.status,
                    "API response"
                );
                classify_response(&request.endpoint, raw)
            }
            Err(err) => Err(err),
        };

        Outcome::from_result(result)
    }

    /// Snapshot of the cache counters.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Drop cached responses whose endpoint contains `pattern`, returning
    /// how many were removed.
    pub async fn invalidate_cache(&self, pattern: &str) -> usize {
        self.cache.invalidate(pattern).await
    }

    /// Drop every cached response and reset the counters.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// The HTTP-facing configuration this client was built with.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}
