//! Upstream API error taxonomy and classification.

/// Classified failure conditions from the Semantic Scholar API.
///
/// Classification happens once, in the transport layer, and every other
/// component dispatches on this enum: the retry wrapper retries only
/// [`RateLimited`](ApiErrorKind::RateLimited), the circuit breaker counts
/// only the kinds for which [`trips_breaker`](ApiErrorKind::trips_breaker)
/// holds.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ApiErrorKind {
    /// Requested resource does not exist (HTTP 404)
    #[display("Resource not found")]
    NotFound,
    /// Upstream throttled the request (HTTP 429)
    #[display("Rate limit exceeded")]
    RateLimited {
        /// Server-supplied resume hint in seconds, from the Retry-After header
        retry_after: Option<f64>,
    },
    /// Credential rejected (HTTP 401/403)
    #[display("Authentication failed: invalid or missing API key")]
    AuthFailure,
    /// Upstream internal failure (HTTP 5xx)
    #[display("Server error: HTTP {}", status)]
    ServerError {
        /// HTTP status code
        status: u16,
    },
    /// Transport-level failure: connect, timeout, interrupted body
    #[display("Connection failed: {}", _0)]
    ConnectionFailure(String),
    /// Synthesized locally when the circuit breaker rejects a call
    #[display("Service temporarily unavailable: circuit breaker is open")]
    CircuitOpen,
    /// Uncategorized non-success response
    #[display("Unexpected API response: HTTP {}: {}", status, message)]
    Other {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },
}

impl ApiErrorKind {
    /// Whether this failure is an upstream throttle that the retry wrapper
    /// should back off and retry.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiErrorKind::RateLimited { .. })
    }

    /// The server-supplied resume hint, if one was sent.
    pub fn retry_after(&self) -> Option<f64> {
        match self {
            ApiErrorKind::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Whether this failure counts toward opening the circuit breaker.
    ///
    /// Only connectivity and server-side failures qualify. `NotFound` and
    /// `RateLimited` mean the upstream is reachable and functioning, just
    /// refusing this particular request.
    pub fn trips_breaker(&self) -> bool {
        matches!(
            self,
            ApiErrorKind::ServerError { .. } | ApiErrorKind::ConnectionFailure(_)
        )
    }

    /// Whether this is the not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiErrorKind::NotFound)
    }
}

/// API error with source location tracking.
///
/// # Examples
///
/// ```
/// use alexandria_error::{ApiError, ApiErrorKind};
///
/// let err = ApiError::new(ApiErrorKind::ServerError { status: 503 });
/// assert!(err.kind.trips_breaker());
/// assert!(format!("{}", err).contains("HTTP 503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("API Error: {} at line {} in {}", kind, line, file)]
pub struct ApiError {
    /// The kind of error that occurred
    pub kind: ApiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ApiError {
    /// Create a new ApiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ApiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Resource absent upstream.
    #[track_caller]
    pub fn not_found() -> Self {
        Self::new(ApiErrorKind::NotFound)
    }

    /// Upstream throttle, with an optional Retry-After hint in seconds.
    #[track_caller]
    pub fn rate_limited(retry_after: Option<f64>) -> Self {
        Self::new(ApiErrorKind::RateLimited { retry_after })
    }

    /// Credential rejected.
    #[track_caller]
    pub fn auth_failure() -> Self {
        Self::new(ApiErrorKind::AuthFailure)
    }

    /// Upstream 5xx.
    #[track_caller]
    pub fn server_error(status: u16) -> Self {
        Self::new(ApiErrorKind::ServerError { status })
    }

    /// Transport failure.
    #[track_caller]
    pub fn connection_failure(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::ConnectionFailure(message.into()))
    }

    /// Local circuit-breaker rejection.
    #[track_caller]
    pub fn circuit_open() -> Self {
        Self::new(ApiErrorKind::CircuitOpen)
    }

    /// Uncategorized non-success response.
    #[track_caller]
    pub fn other(status: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Other {
            status,
            message: message.into(),
        })
    }
}
