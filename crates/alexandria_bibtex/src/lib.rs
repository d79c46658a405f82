//! BibTeX export for Semantic Scholar paper records.
//!
//! Paper records are the raw JSON values the API returns; nothing here
//! depends on a typed schema. Entry types are auto-detected from
//! publication types and venue names, citation keys are generated in a
//! configurable format, and LaTeX-special characters are escaped on
//! rendering.
//!
//! ```
//! use alexandria_bibtex::{ExportConfig, export_papers};
//! use serde_json::json;
//!
//! let papers = vec![json!({
//!     "paperId": "649def34f8be52c8b66281af98ae884c09aef38b",
//!     "title": "Attention Is All You Need",
//!     "year": 2017,
//!     "venue": "Neural Information Processing Systems",
//!     "publicationTypes": ["Conference"],
//!     "authors": [{"name": "Ashish Vaswani"}],
//! })];
//!
//! let bibtex = export_papers(&papers, &ExportConfig::default());
//! assert!(bibtex.starts_with("@inproceedings{vaswani2017,"));
//! ```

#![warn(missing_docs)]

mod entry;
mod export;

pub use entry::{BibtexEntry, CiteKeyFormat, EntryType, detect_entry_type, generate_cite_key};
pub use export::{
    ExportConfig, ExportConfigBuilder, FieldConfig, FieldConfigBuilder, export_papers,
    paper_to_entry,
};
