//! BibTeX export error types.

/// Specific export error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ExportErrorKind {
    /// Export requested but nothing has been tracked yet
    #[display("No papers available to export")]
    NoPapers,

    /// Unrecognized citation key format
    #[display("Unknown cite key format: {}", _0)]
    UnknownCiteKeyFormat(String),

    /// Failed to write the exported text
    #[display("Failed to write export output: {}", _0)]
    Io(String),
}

/// Export error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Export Error: {} at line {} in {}", kind, line, file)]
pub struct ExportError {
    kind: ExportErrorKind,
    line: u32,
    file: &'static str,
}

impl ExportError {
    /// Create a new export error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ExportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ExportErrorKind {
        &self.kind
    }
}
