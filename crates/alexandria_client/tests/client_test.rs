//! Tests for the client's composition of cache, rate limiting, retry, and
//! circuit breaking, driven through a scripted transport.

use alexandria_breaker::CircuitConfig;
use alexandria_client::{
    AlexandriaConfig, ApiBase, ApiConfig, ApiRequest, RawResponse, ScholarClient, Transport,
    classify_response,
};
use alexandria_error::{ApiError, ApiErrorKind};
use alexandria_rate_limit::RetryConfig;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Transport that replays a scripted response sequence.
struct StubTransport {
    responses: Mutex<VecDeque<Result<RawResponse, ApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
    calls: AtomicUsize,
}

impl StubTransport {
    fn new(responses: Vec<Result<RawResponse, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .expect("requests lock")
            .last()
            .cloned()
            .expect("at least one request")
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests lock").push(request.clone());
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::connection_failure("stub script exhausted")))
    }
}

fn ok(body: Value) -> Result<RawResponse, ApiError> {
    Ok(RawResponse {
        status: 200,
        retry_after: None,
        body: body.to_string(),
    })
}

fn status(code: u16) -> Result<RawResponse, ApiError> {
    Ok(RawResponse {
        status: code,
        retry_after: None,
        body: String::new(),
    })
}

fn rate_limited(retry_after: f64) -> Result<RawResponse, ApiError> {
    Ok(RawResponse {
        status: 429,
        retry_after: Some(retry_after),
        body: String::new(),
    })
}

/// Test configuration with fast retries and a tight breaker.
fn test_config() -> AlexandriaConfig {
    AlexandriaConfig {
        retry: RetryConfig::default()
            .with_max_retries(2)
            .with_base_delay(0.005)
            .with_max_delay(0.02)
            .with_jitter(0.0),
        circuit: CircuitConfig::default()
            .with_failure_threshold(2)
            .with_recovery_timeout_secs(60.0),
        ..AlexandriaConfig::default()
    }
}

fn client_with(stub: Arc<StubTransport>) -> ScholarClient {
    ScholarClient::with_transport(&test_config(), stub)
}

#[tokio::test]
async fn test_get_parses_success_body() {
    let stub = StubTransport::new(vec![ok(json!({"total": 1}))]);
    let client = client_with(Arc::clone(&stub));

    let value = client
        .get(ApiBase::Graph, "/paper/search", None)
        .await
        .expect("success");

    assert_eq!(value, json!({"total": 1}));
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_request_carries_base_url_and_params() {
    let stub = StubTransport::new(vec![ok(json!({})), ok(json!({}))]);
    let client = client_with(Arc::clone(&stub));

    let params = vec![("query".to_string(), "attention".to_string())];
    client
        .get(ApiBase::Graph, "/paper/search", Some(&params))
        .await
        .expect("success");

    let request = stub.last_request();
    assert_eq!(
        request.url,
        "https://api.semanticscholar.org/graph/v1/paper/search"
    );
    assert_eq!(request.params, params);

    client
        .post(ApiBase::Recommendations, "/papers/", None, Some(json!({"x": 1})))
        .await
        .expect("success");

    let request = stub.last_request();
    assert_eq!(
        request.url,
        "https://api.semanticscholar.org/recommendations/v1/papers/"
    );
    assert_eq!(request.body, Some(json!({"x": 1})));
}

#[tokio::test]
async fn test_get_serves_repeat_requests_from_cache() {
    let stub = StubTransport::new(vec![ok(json!({"paperId": "abc"}))]);
    let client = client_with(Arc::clone(&stub));

    let first = client
        .get(ApiBase::Graph, "/paper/abc", None)
        .await
        .expect("first request");
    let second = client
        .get(ApiBase::Graph, "/paper/abc", None)
        .await
        .expect("second request");

    assert_eq!(first, second);
    assert_eq!(stub.calls(), 1, "second request must not reach the transport");

    let stats = client.cache_stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_post_is_never_cached() {
    let stub = StubTransport::new(vec![ok(json!(1)), ok(json!(2))]);
    let client = client_with(Arc::clone(&stub));

    client
        .post(ApiBase::Recommendations, "/papers/", None, None)
        .await
        .expect("first post");
    client
        .post(ApiBase::Recommendations, "/papers/", None, None)
        .await
        .expect("second post");

    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_failed_requests_are_not_cached() {
    let stub = StubTransport::new(vec![status(404), ok(json!({"paperId": "abc"}))]);
    let client = client_with(Arc::clone(&stub));

    let err = client
        .get(ApiBase::Graph, "/paper/abc", None)
        .await
        .expect_err("first request fails");
    assert!(err.as_api().expect("api error").kind.is_not_found());

    // The retry hits the transport again instead of a cached error
    let value = client
        .get(ApiBase::Graph, "/paper/abc", None)
        .await
        .expect("second request succeeds");
    assert_eq!(value, json!({"paperId": "abc"}));
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_rate_limit_retries_then_succeeds() {
    let stub = StubTransport::new(vec![rate_limited(0.005), ok(json!({"total": 0}))]);
    let client = client_with(Arc::clone(&stub));

    let value = client
        .get_with_retry(ApiBase::Graph, "/paper/search", None)
        .await
        .expect("retried success");

    assert_eq!(value, json!({"total": 0}));
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_auto_retry_disabled_propagates_rate_limit() {
    let stub = StubTransport::new(vec![rate_limited(3.0)]);
    let config = AlexandriaConfig {
        api: ApiConfig::default().with_enable_auto_retry(false),
        ..test_config()
    };
    let client = ScholarClient::with_transport(&config, stub.clone());

    let err = client
        .get_with_retry(ApiBase::Graph, "/paper/search", None)
        .await
        .expect_err("rate limit surfaces");

    let api = err.as_api().expect("api error");
    assert!(api.kind.is_rate_limited());
    assert_eq!(api.kind.retry_after(), Some(3.0));
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_server_errors_open_the_circuit() {
    let stub = StubTransport::new(vec![status(500), status(503)]);
    let client = client_with(Arc::clone(&stub));

    for _ in 0..2 {
        let err = client
            .get(ApiBase::Graph, "/paper/search", None)
            .await
            .expect_err("server error");
        assert!(err.as_api().expect("api error").kind.trips_breaker());
    }

    // The circuit is now open: no further transport calls
    let err = client
        .get(ApiBase::Graph, "/paper/search", None)
        .await
        .expect_err("rejected");
    assert_eq!(err.as_api().expect("api error").kind, ApiErrorKind::CircuitOpen);
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_not_found_does_not_open_the_circuit() {
    let stub = StubTransport::new(vec![status(404), status(404), status(404), ok(json!(1))]);
    let client = client_with(Arc::clone(&stub));

    for _ in 0..3 {
        let err = client
            .get(ApiBase::Graph, "/paper/missing", None)
            .await
            .expect_err("not found");
        assert!(err.as_api().expect("api error").kind.is_not_found());
    }

    // Threshold is two, yet the circuit never opened
    let value = client
        .get(ApiBase::Graph, "/paper/missing", None)
        .await
        .expect("circuit still closed");
    assert_eq!(value, json!(1));
}

#[tokio::test]
async fn test_invalidate_and_clear_cache() {
    let stub = StubTransport::new(vec![ok(json!(1)), ok(json!(2)), ok(json!(3))]);
    let client = client_with(Arc::clone(&stub));

    client.get(ApiBase::Graph, "/paper/1", None).await.expect("one");
    client.get(ApiBase::Graph, "/author/2", None).await.expect("two");

    assert_eq!(client.invalidate_cache("/paper/").await, 1);

    // The paper entry is gone, so this refetches
    client.get(ApiBase::Graph, "/paper/1", None).await.expect("three");
    assert_eq!(stub.calls(), 3);

    client.clear_cache().await;
    let stats = client.cache_stats().await;
    assert_eq!(stats.entries, 0);
}

#[test]
fn test_classification_taxonomy() {
    let raw = |status: u16, retry_after: Option<f64>, body: &str| RawResponse {
        status,
        retry_after,
        body: body.to_string(),
    };

    let value = classify_response("/paper/1", raw(200, None, "{\"ok\":true}"))
        .expect("valid JSON parses");
    assert_eq!(value, json!({"ok": true}));

    let err = classify_response("/paper/1", raw(200, None, "not json"))
        .expect_err("invalid JSON fails");
    assert!(matches!(err.kind, ApiErrorKind::Other { .. }));

    let err = classify_response("/paper/1", raw(429, Some(2.5), "")).expect_err("throttled");
    assert_eq!(err.kind.retry_after(), Some(2.5));

    let err = classify_response("/paper/1", raw(401, None, "")).expect_err("unauthorized");
    assert_eq!(err.kind, ApiErrorKind::AuthFailure);
    let err = classify_response("/paper/1", raw(403, None, "")).expect_err("forbidden");
    assert_eq!(err.kind, ApiErrorKind::AuthFailure);

    let err = classify_response("/paper/1", raw(404, None, "")).expect_err("missing");
    assert!(err.kind.is_not_found());

    let err = classify_response("/paper/1", raw(503, None, "")).expect_err("unavailable");
    assert_eq!(err.kind, ApiErrorKind::ServerError { status: 503 });

    let err = classify_response("/paper/1", raw(418, None, "teapot")).expect_err("other");
    assert!(matches!(err.kind, ApiErrorKind::Other { status: 418, .. }));
}
