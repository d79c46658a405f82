//! HTTP transport and response classification.
//!
//! The transport executes requests and reports what came back without
//! judging it: an `Err` here always means the exchange itself broke
//! (connect failure, timeout, interrupted body). Mapping HTTP statuses
//! onto the error taxonomy is [`classify_response`]'s job, so scripted
//! transports in tests share the exact classification path production
//! uses.

use alexandria_error::{AlexandriaError, AlexandriaResult, ApiError, ConfigError};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

/// Header carrying the Semantic Scholar API key.
const API_KEY_HEADER: &str = "x-api-key";

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum HttpMethod {
    /// HTTP GET
    #[strum(serialize = "GET")]
    Get,
    /// HTTP POST
    #[strum(serialize = "POST")]
    Post,
}

/// A request to one of the Semantic Scholar APIs.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Fully resolved URL including the base
    pub url: String,
    /// Endpoint path, kept for logging and classification
    pub endpoint: String,
    /// Query parameters
    pub params: Vec<(String, String)>,
    /// JSON body for POST requests
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Build a GET request against `base_url`.
    pub fn get(base_url: &str, endpoint: &str, params: Option<&[(String, String)]>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: format!("{base_url}{endpoint}"),
            endpoint: endpoint.to_string(),
            params: params.map(|p| p.to_vec()).unwrap_or_default(),
            body: None,
        }
    }

    /// Build a POST request against `base_url`.
    pub fn post(
        base_url: &str,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        body: Option<Value>,
    ) -> Self {
        Self {
            method: HttpMethod::Post,
            url: format!("{base_url}{endpoint}"),
            endpoint: endpoint.to_string(),
            params: params.map(|p| p.to_vec()).unwrap_or_default(),
            body,
        }
    }
}

/// An upstream response before classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Numeric `Retry-After` header value in seconds, if one was sent
    pub retry_after: Option<f64>,
    /// Response body text
    pub body: String,
}

/// Abstraction over the HTTP layer.
///
/// The production implementation is [`HttpTransport`]. Tests substitute
/// a scripted transport to drive the client through rate limits, server
/// errors, and outages without a network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a request and return the raw upstream response.
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build the transport with a request timeout and optional API key.
    ///
    /// The key is attached as a default `x-api-key` header and marked
    /// sensitive so it never appears in logs.
    pub fn new(timeout: Duration, api_key: Option<&str>) -> AlexandriaResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = api_key
            && !key.is_empty()
        {
            let mut value = HeaderValue::from_str(key).map_err(|e| {
                AlexandriaError::from(ConfigError::new(format!(
                    "API key is not a valid header value: {}",
                    e
                )))
            })?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AlexandriaError::from(ConfigError::new(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::connection_failure(format!("Request timed out: {}", e))
            } else {
                ApiError::connection_failure(format!(
                    "Failed to connect to Semantic Scholar API: {}",
                    e
                ))
            }
        })?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<f64>().ok());

        let body = response.text().await.map_err(|e| {
            ApiError::connection_failure(format!("Failed to read response body: {}", e))
        })?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Map a raw upstream response onto the error taxonomy.
///
/// Statuses below 400 parse as JSON. 429 becomes a rate limit carrying
/// the `Retry-After` hint, 401 and 403 collapse to an authentication
/// failure, 404 to not-found, and 5xx to a server error. Any other
/// status lands in `Other` with the response text preserved.
pub fn classify_response(endpoint: &str, response: RawResponse) -> Result<Value, ApiError> {
    if response.status < 400 {
        return serde_json::from_str(&response.body).map_err(|e| {
            ApiError::other(
                response.status,
                format!("invalid JSON from {}: {}", endpoint, e),
            )
        });
    }

    match response.status {
        429 => Err(ApiError::rate_limited(response.retry_after)),
        401 | 403 => Err(ApiError::auth_failure()),
        404 => Err(ApiError::not_found()),
        500..=599 => Err(ApiError::server_error(response.status)),
        status => Err(ApiError::other(status, response.body)),
    }
}
