//! BibTeX entry types, citation keys, and rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Venue substrings that mark a paper as conference proceedings.
const CONFERENCE_KEYWORDS: [&str; 16] = [
    "conference",
    "proceedings",
    "symposium",
    "workshop",
    "icml",
    "neurips",
    "nips",
    "iclr",
    "cvpr",
    "iccv",
    "eccv",
    "acl",
    "emnlp",
    "naacl",
    "aaai",
    "ijcai",
];

/// Venue substrings that mark a paper as a journal article.
const JOURNAL_KEYWORDS: [&str; 4] = ["journal", "transactions", "letters", "review"];

/// Leading title words skipped when building `author_year_title` keys.
const STOP_WORDS: [&str; 9] = ["a", "an", "the", "on", "in", "of", "for", "to", "and"];

/// BibTeX entry types for different publication types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EntryType {
    /// Journal article
    Article,
    /// Conference paper
    InProceedings,
    /// Book
    Book,
    /// Chapter or section within a book
    InCollection,
    /// Doctoral thesis
    PhdThesis,
    /// Masters thesis
    MastersThesis,
    /// Technical report
    TechReport,
    /// Anything that fits nowhere else
    Misc,
    /// Unpublished manuscript
    Unpublished,
}

/// How citation keys are generated.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CiteKeyFormat {
    /// First author's last name followed by the year: `vaswani2017`
    #[default]
    AuthorYear,
    /// Author and year plus the first significant title word: `vaswani2017attention`
    AuthorYearTitle,
    /// The Semantic Scholar paper identifier verbatim
    PaperId,
}

/// A single BibTeX entry.
///
/// Fields keep their insertion order so rendered output is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct BibtexEntry {
    /// The BibTeX entry type
    pub entry_type: EntryType,
    /// The citation key
    pub cite_key: String,
    /// Field names and their unescaped values
    pub fields: Vec<(String, String)>,
}

impl BibtexEntry {
    /// Render this entry as BibTeX, escaping field values.
    pub fn to_bibtex(&self) -> String {
        let mut lines = vec![format!("@{}{{{},", self.entry_type, self.cite_key)];

        for (key, value) in &self.fields {
            lines.push(format!("  {} = {{{}}},", key, escape_bibtex(value)));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }
}

/// Escape LaTeX-special characters in a field value.
///
/// Single pass, so replacement text is never re-escaped.
fn escape_bibtex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '{' => escaped.push_str("\\{"),
            '}' => escaped.push_str("\\}"),
            '&' => escaped.push_str("\\&"),
            '%' => escaped.push_str("\\%"),
            '$' => escaped.push_str("\\$"),
            '#' => escaped.push_str("\\#"),
            '_' => escaped.push_str("\\_"),
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

/// Reduce text to lowercase ASCII alphanumerics for use in citation keys.
///
/// Accented characters decompose under NFKD and keep their base letter;
/// everything else is dropped.
fn normalize_for_cite_key(text: &str) -> String {
    text.nfkd()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// A string field from a paper record, treating empty as absent.
pub(crate) fn str_field<'a>(paper: &'a Value, key: &str) -> Option<&'a str> {
    paper
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

/// A string field nested one object deep, treating empty as absent.
pub(crate) fn nested_str<'a>(paper: &'a Value, outer: &str, inner: &str) -> Option<&'a str> {
    paper
        .get(outer)
        .and_then(|value| value.get(inner))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

/// Auto-detect the BibTeX entry type from a paper record.
///
/// The `publicationTypes` field is authoritative when it carries a known
/// type. Otherwise the venue name is scanned for conference and journal
/// markers, and a paper with journal metadata defaults to an article.
pub fn detect_entry_type(paper: &Value) -> EntryType {
    if let Some(types) = paper.get("publicationTypes").and_then(Value::as_array) {
        for pub_type in types.iter().filter_map(Value::as_str) {
            match pub_type {
                "JournalArticle" | "Review" => return EntryType::Article,
                "Conference" => return EntryType::InProceedings,
                "Book" => return EntryType::Book,
                "BookSection" => return EntryType::InCollection,
                "Dataset" | "Patent" => return EntryType::Misc,
                _ => {}
            }
        }
    }

    let venue = str_field(paper, "venue").unwrap_or("").to_lowercase();
    if CONFERENCE_KEYWORDS.iter().any(|kw| venue.contains(kw)) {
        return EntryType::InProceedings;
    }
    if JOURNAL_KEYWORDS.iter().any(|kw| venue.contains(kw)) {
        return EntryType::Article;
    }

    if nested_str(paper, "journal", "name").is_some() {
        return EntryType::Article;
    }

    EntryType::Misc
}

/// Generate a citation key for a paper record.
///
/// Missing pieces fall back to `unknown`, so a paper with no authors and
/// no year still yields a usable (if ugly) key.
pub fn generate_cite_key(paper: &Value, format: CiteKeyFormat) -> String {
    if format == CiteKeyFormat::PaperId {
        return str_field(paper, "paperId").unwrap_or("unknown").to_string();
    }

    let author_part = paper
        .get("authors")
        .and_then(Value::as_array)
        .and_then(|authors| authors.first())
        .and_then(|author| author.get("name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .and_then(|name| name.split_whitespace().last())
        .map(normalize_for_cite_key)
        .unwrap_or_else(|| "unknown".to_string());

    let year_part = paper
        .get("year")
        .and_then(Value::as_i64)
        .map(|year| year.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if format == CiteKeyFormat::AuthorYearTitle {
        let mut title_part = String::new();
        if let Some(title) = str_field(paper, "title") {
            for word in title.split_whitespace() {
                let normalized = normalize_for_cite_key(word);
                if !normalized.is_empty() && !STOP_WORDS.contains(&normalized.as_str()) {
                    title_part = normalized.chars().take(10).collect();
                    break;
                }
            }
        }
        return format!("{author_part}{year_part}{title_part}");
    }

    format!("{author_part}{year_part}")
}
