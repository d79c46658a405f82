//! Field lists requested from the Semantic Scholar API.

/// Paper fields requested by default for comprehensive records.
pub const DEFAULT_PAPER_FIELDS: &str = "paperId,title,abstract,year,citationCount,authors,venue,\
    publicationTypes,openAccessPdf,fieldsOfStudy,journal,externalIds,\
    publicationDate,publicationVenue";

/// Paper fields including the AI-generated TL;DR summary.
pub const PAPER_FIELDS_WITH_TLDR: &str = "paperId,title,abstract,year,citationCount,authors,venue,\
    publicationTypes,openAccessPdf,fieldsOfStudy,journal,externalIds,\
    publicationDate,publicationVenue,tldr";

/// Author fields requested by default.
pub const DEFAULT_AUTHOR_FIELDS: &str =
    "authorId,name,affiliations,paperCount,citationCount,hIndex,externalIds,homepage";

/// Prefixes every default paper field with a nested object name.
///
/// The citations and references endpoints wrap each paper in a container
/// object, so field selection needs names like `citingPaper.title`.
///
/// # Examples
///
/// ```
/// use alexandria_tools::nested_paper_fields;
///
/// let fields = nested_paper_fields("citingPaper");
/// assert!(fields.starts_with("citingPaper.paperId,citingPaper.title"));
/// ```
pub fn nested_paper_fields(prefix: &str) -> String {
    DEFAULT_PAPER_FIELDS
        .split(',')
        .map(|field| format!("{prefix}.{field}"))
        .collect::<Vec<_>>()
        .join(",")
}
