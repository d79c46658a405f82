//! Error types for the Alexandria library.
//!
//! This crate provides the foundation error types used throughout the
//! Alexandria workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use alexandria_error::{AlexandriaResult, ApiError};
//!
//! fn fetch_paper() -> AlexandriaResult<String> {
//!     Err(ApiError::not_found())?
//! }
//!
//! match fetch_paper() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod export;
mod tool;

pub use api::{ApiError, ApiErrorKind};
pub use config::ConfigError;
pub use error::{AlexandriaError, AlexandriaErrorKind, AlexandriaResult};
pub use export::{ExportError, ExportErrorKind};
pub use tool::{ToolError, ToolErrorKind};
