//! Conversion of paper records to BibTeX and multi-paper export.

use crate::entry::{
    BibtexEntry, CiteKeyFormat, EntryType, detect_entry_type, generate_cite_key, nested_str,
    str_field,
};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

/// Which optional fields to include in exported entries.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct FieldConfig {
    /// Include the abstract field
    #[serde(default)]
    include_abstract: bool,

    /// Include a url field (open-access PDF, falling back to the DOI link)
    #[serde(default = "default_true")]
    include_url: bool,

    /// Include the doi field
    #[serde(default = "default_true")]
    include_doi: bool,

    /// Include a keywords field built from the paper's fields of study
    #[serde(default)]
    include_keywords: bool,

    /// Maximum number of authors before truncating with "and others"
    /// (0 means unlimited)
    #[serde(default)]
    max_authors: usize,
}

fn default_true() -> bool {
    true
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            include_abstract: false,
            include_url: true,
            include_doi: true,
            include_keywords: false,
            max_authors: 0,
        }
    }
}

/// Configuration for BibTeX export.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct ExportConfig {
    /// Optional-field selection
    #[serde(default)]
    fields: FieldConfig,

    /// How citation keys are generated
    #[serde(default)]
    cite_key_format: CiteKeyFormat,
}

/// Convert one paper record to a [`BibtexEntry`].
///
/// Absent or empty fields are simply omitted from the entry. The
/// venue-dependent fields follow the detected entry type: proceedings get
/// `booktitle`, articles get `journal` plus `volume` and `pages` when the
/// record carries them.
pub fn paper_to_entry(paper: &Value, config: &ExportConfig) -> BibtexEntry {
    let entry_type = detect_entry_type(paper);
    let cite_key = generate_cite_key(paper, *config.cite_key_format());

    let mut fields: Vec<(String, String)> = Vec::new();

    if let Some(title) = str_field(paper, "title") {
        fields.push(("title".to_string(), title.to_string()));
    }

    if let Some(authors) = paper.get("authors").and_then(Value::as_array)
        && !authors.is_empty()
    {
        let names: Vec<&str> = authors
            .iter()
            .map(|author| {
                author
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|name| !name.is_empty())
                    .unwrap_or("Unknown")
            })
            .collect();

        let max_authors = *config.fields().max_authors();
        let author_field = if max_authors > 0 && names.len() > max_authors {
            let mut truncated = names[..max_authors].to_vec();
            truncated.push("others");
            truncated.join(" and ")
        } else {
            names.join(" and ")
        };
        fields.push(("author".to_string(), author_field));
    }

    if let Some(year) = paper.get("year").and_then(Value::as_i64) {
        fields.push(("year".to_string(), year.to_string()));
    }

    match entry_type {
        EntryType::InProceedings => {
            if let Some(venue) = str_field(paper, "venue") {
                fields.push(("booktitle".to_string(), venue.to_string()));
            } else if let Some(name) = nested_str(paper, "publicationVenue", "name") {
                fields.push(("booktitle".to_string(), name.to_string()));
            }
        }
        EntryType::Article => {
            if let Some(journal) = nested_str(paper, "journal", "name") {
                fields.push(("journal".to_string(), journal.to_string()));
                if let Some(volume) = nested_str(paper, "journal", "volume") {
                    fields.push(("volume".to_string(), volume.to_string()));
                }
                if let Some(pages) = nested_str(paper, "journal", "pages") {
                    fields.push(("pages".to_string(), pages.to_string()));
                }
            } else if let Some(venue) = str_field(paper, "venue") {
                fields.push(("journal".to_string(), venue.to_string()));
            }
        }
        _ => {}
    }

    if *config.fields().include_abstract()
        && let Some(abstract_text) = str_field(paper, "abstract")
    {
        fields.push(("abstract".to_string(), abstract_text.to_string()));
    }

    if *config.fields().include_doi()
        && let Some(doi) = nested_str(paper, "externalIds", "DOI")
    {
        fields.push(("doi".to_string(), doi.to_string()));
    }

    if *config.fields().include_url() {
        if let Some(url) = nested_str(paper, "openAccessPdf", "url") {
            fields.push(("url".to_string(), url.to_string()));
        } else if let Some(doi) = nested_str(paper, "externalIds", "DOI") {
            fields.push(("url".to_string(), format!("https://doi.org/{doi}")));
        }
    }

    if *config.fields().include_keywords()
        && let Some(fields_of_study) = paper.get("fieldsOfStudy").and_then(Value::as_array)
    {
        let keywords: Vec<&str> = fields_of_study.iter().filter_map(Value::as_str).collect();
        if !keywords.is_empty() {
            fields.push(("keywords".to_string(), keywords.join(", ")));
        }
    }

    let entry = BibtexEntry {
        entry_type,
        cite_key,
        fields,
    };
    debug!(cite_key = %entry.cite_key, entry_type = %entry.entry_type, "generated BibTeX entry");
    entry
}

/// Export paper records to a BibTeX document.
///
/// Entries are separated by blank lines. Colliding citation keys are
/// disambiguated with suffixes running `a` through `y`, then `_27` onward.
pub fn export_papers(papers: &[Value], config: &ExportConfig) -> String {
    let mut entries: Vec<String> = Vec::new();
    let mut seen_keys: HashSet<String> = HashSet::new();

    for paper in papers {
        let mut entry = paper_to_entry(paper, config);

        let original_key = entry.cite_key.clone();
        let mut counter = 0u32;
        while seen_keys.contains(&entry.cite_key) {
            counter += 1;
            entry.cite_key = if counter < 26 {
                let suffix = char::from(b'a' + (counter as u8 - 1));
                format!("{original_key}{suffix}")
            } else {
                format!("{original_key}_{}", counter + 1)
            };
        }

        seen_keys.insert(entry.cite_key.clone());
        entries.push(entry.to_bibtex());
    }

    info!(count = entries.len(), "exported papers to BibTeX");
    entries.join("\n\n")
}
