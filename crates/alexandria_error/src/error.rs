//! Top-level error wrapper types.

use crate::{ApiError, ConfigError, ExportError, ToolError};

/// The foundation error enum for the Alexandria workspace.
///
/// # Examples
///
/// ```
/// use alexandria_error::{AlexandriaError, ApiError};
///
/// let api_err = ApiError::server_error(500);
/// let err: AlexandriaError = api_err.into();
/// assert!(format!("{}", err).contains("API Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AlexandriaErrorKind {
    /// Upstream API error
    #[from(ApiError)]
    Api(ApiError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Tool layer error
    #[from(ToolError)]
    Tool(ToolError),
    /// BibTeX export error
    #[from(ExportError)]
    Export(ExportError),
}

impl AlexandriaErrorKind {
    /// The API error, when this is one.
    ///
    /// Callers that need to dispatch on the API taxonomy (retry loops, the
    /// client composition) use this to reach the classified kind.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            AlexandriaErrorKind::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Alexandria error with kind discrimination.
///
/// # Examples
///
/// ```
/// use alexandria_error::{AlexandriaResult, ConfigError};
///
/// fn might_fail() -> AlexandriaResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Alexandria Error: {}", _0)]
pub struct AlexandriaError(Box<AlexandriaErrorKind>);

impl AlexandriaError {
    /// Create a new error from a kind.
    pub fn new(kind: AlexandriaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AlexandriaErrorKind {
        &self.0
    }

    /// The API error, when this wraps one.
    pub fn as_api(&self) -> Option<&ApiError> {
        self.0.as_api()
    }
}

// Generic From implementation for any type that converts to AlexandriaErrorKind
impl<T> From<T> for AlexandriaError
where
    T: Into<AlexandriaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Alexandria operations.
///
/// # Examples
///
/// ```
/// use alexandria_error::{AlexandriaResult, ApiError};
///
/// fn fetch_data() -> AlexandriaResult<String> {
///     Err(ApiError::not_found())?
/// }
/// ```
pub type AlexandriaResult<T> = std::result::Result<T, AlexandriaError>;
