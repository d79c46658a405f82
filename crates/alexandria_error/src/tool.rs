//! Tool layer error types.

/// Specific tool error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ToolErrorKind {
    /// No tool registered under the given name
    #[display("Unknown tool: {}", _0)]
    UnknownTool(String),

    /// Tool input payload failed to deserialize
    #[display("Invalid input for tool '{}': {}", tool, reason)]
    InvalidInput {
        /// The tool name
        tool: String,
        /// Why deserialization or validation failed
        reason: String,
    },
}

/// Tool error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Tool Error: {} at line {} in {}", kind, line, file)]
pub struct ToolError {
    kind: ToolErrorKind,
    line: u32,
    file: &'static str,
}

impl ToolError {
    /// Create a new tool error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ToolErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ToolErrorKind {
        &self.kind
    }
}
