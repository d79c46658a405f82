//! Named tool layer over the Semantic Scholar client.
//!
//! Each operation (search, paper details, citations, recommendations,
//! tracking, BibTeX export, cache introspection) is a [`ScholarTool`] that
//! takes and returns JSON payloads, so a serving layer or CLI can dispatch
//! by name. Tools share one client and one session [`PaperTracker`] through
//! a [`ToolContext`].

#![warn(missing_docs)]

mod fields;
mod tools;
mod tracker;

pub use fields::{
    DEFAULT_AUTHOR_FIELDS, DEFAULT_PAPER_FIELDS, PAPER_FIELDS_WITH_TLDR, nested_paper_fields,
};
pub use tools::{
    CacheStatsTool, ClearTrackedPapersTool, ExportBibtexTool, GetAuthorTool,
    GetPaperCitationsTool, GetPaperReferencesTool, GetPaperTool, GetRecommendationsTool,
    GetRelatedPapersTool, ListTrackedPapersTool, ScholarTool, SearchAuthorsTool, SearchPapersTool,
    ToolContext, ToolRegistry,
};
pub use tracker::{PaperTracker, TrackedPaper};
