//! Tests for BibTeX entry generation and export.

use alexandria_bibtex::{
    CiteKeyFormat, EntryType, ExportConfig, FieldConfig, detect_entry_type, export_papers,
    generate_cite_key, paper_to_entry,
};
use serde_json::{Value, json};

fn attention_paper() -> Value {
    json!({
        "paperId": "204e3073870fae3d05bcbc2f6a8e263d9b72e776",
        "title": "Attention Is All You Need",
        "year": 2017,
        "venue": "Neural Information Processing Systems",
        "publicationTypes": ["Conference"],
        "authors": [
            {"authorId": "1", "name": "Ashish Vaswani"},
            {"authorId": "2", "name": "Noam Shazeer"},
            {"authorId": "3", "name": "Niki Parmar"}
        ],
        "externalIds": {"DOI": "10.5555/3295222.3295349"},
        "openAccessPdf": {"url": "https://arxiv.org/pdf/1706.03762.pdf"},
        "fieldsOfStudy": ["Computer Science"],
        "abstract": "The dominant sequence transduction models..."
    })
}

fn journal_paper() -> Value {
    json!({
        "paperId": "abc123",
        "title": "Deep Residual Learning",
        "year": 2016,
        "publicationTypes": ["JournalArticle"],
        "authors": [{"authorId": "9", "name": "Kaiming He"}],
        "journal": {"name": "IEEE TPAMI", "volume": "38", "pages": "1–12"},
        "externalIds": {"DOI": "10.1109/TPAMI.2016.123"}
    })
}

#[test]
fn test_entry_type_from_publication_types() {
    assert_eq!(detect_entry_type(&attention_paper()), EntryType::InProceedings);
    assert_eq!(detect_entry_type(&journal_paper()), EntryType::Article);
    assert_eq!(
        detect_entry_type(&json!({"publicationTypes": ["Book"]})),
        EntryType::Book
    );
    assert_eq!(
        detect_entry_type(&json!({"publicationTypes": ["BookSection"]})),
        EntryType::InCollection
    );
    assert_eq!(
        detect_entry_type(&json!({"publicationTypes": ["Dataset"]})),
        EntryType::Misc
    );
}

#[test]
fn test_entry_type_from_venue_keywords() {
    let conference = json!({"venue": "Proceedings of the 40th ICML"});
    assert_eq!(detect_entry_type(&conference), EntryType::InProceedings);

    let journal = json!({"venue": "Journal of Machine Learning Research"});
    assert_eq!(detect_entry_type(&journal), EntryType::Article);

    // Journal metadata alone implies an article
    let with_journal = json!({"journal": {"name": "Nature"}});
    assert_eq!(detect_entry_type(&with_journal), EntryType::Article);

    assert_eq!(detect_entry_type(&json!({"venue": "arXiv.org"})), EntryType::Misc);
    assert_eq!(detect_entry_type(&json!({})), EntryType::Misc);
}

#[test]
fn test_unknown_publication_type_falls_through_to_venue() {
    let paper = json!({
        "publicationTypes": ["Editorial"],
        "venue": "Proceedings of CVPR"
    });
    assert_eq!(detect_entry_type(&paper), EntryType::InProceedings);
}

#[test]
fn test_cite_key_author_year() {
    let key = generate_cite_key(&attention_paper(), CiteKeyFormat::AuthorYear);
    assert_eq!(key, "vaswani2017");
}

#[test]
fn test_cite_key_author_year_title_skips_stop_words() {
    let paper = json!({
        "title": "On the Limits of Language Modeling",
        "year": 2016,
        "authors": [{"name": "Rafal Jozefowicz"}]
    });
    // "On" and "the" are skipped; "Limits" is the first significant word
    let key = generate_cite_key(&paper, CiteKeyFormat::AuthorYearTitle);
    assert_eq!(key, "jozefowicz2016limits");
}

#[test]
fn test_cite_key_title_word_is_truncated() {
    let paper = json!({
        "title": "Internationalization Considered",
        "year": 2020,
        "authors": [{"name": "Ada Smith"}]
    });
    let key = generate_cite_key(&paper, CiteKeyFormat::AuthorYearTitle);
    assert_eq!(key, "smith2020internatio");
}

#[test]
fn test_cite_key_normalizes_accents() {
    let paper = json!({
        "title": "Grammar Induction",
        "year": 2019,
        "authors": [{"name": "José Hernández-Orallo"}]
    });
    // NFKD keeps the base letter of accented characters
    let key = generate_cite_key(&paper, CiteKeyFormat::AuthorYear);
    assert_eq!(key, "hernandezorallo2019");
}

#[test]
fn test_cite_key_missing_pieces_fall_back() {
    assert_eq!(generate_cite_key(&json!({}), CiteKeyFormat::AuthorYear), "unknownunknown");

    let no_year = json!({"authors": [{"name": "Grace Hopper"}]});
    assert_eq!(generate_cite_key(&no_year, CiteKeyFormat::AuthorYear), "hopperunknown");

    assert_eq!(generate_cite_key(&json!({}), CiteKeyFormat::PaperId), "unknown");
    assert_eq!(
        generate_cite_key(&json!({"paperId": "xyz789"}), CiteKeyFormat::PaperId),
        "xyz789"
    );
}

#[test]
fn test_conference_entry_fields() {
    let entry = paper_to_entry(&attention_paper(), &ExportConfig::default());

    assert_eq!(entry.entry_type, EntryType::InProceedings);
    assert_eq!(entry.cite_key, "vaswani2017");

    let field = |name: &str| {
        entry
            .fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    assert_eq!(field("title"), Some("Attention Is All You Need"));
    assert_eq!(
        field("author"),
        Some("Ashish Vaswani and Noam Shazeer and Niki Parmar")
    );
    assert_eq!(field("year"), Some("2017"));
    assert_eq!(field("booktitle"), Some("Neural Information Processing Systems"));
    assert_eq!(field("doi"), Some("10.5555/3295222.3295349"));

    // Open-access PDF wins over the DOI link
    assert_eq!(field("url"), Some("https://arxiv.org/pdf/1706.03762.pdf"));

    // Abstract is off by default
    assert_eq!(field("abstract"), None);
}

#[test]
fn test_journal_entry_carries_volume_and_pages() {
    let entry = paper_to_entry(&journal_paper(), &ExportConfig::default());

    assert_eq!(entry.entry_type, EntryType::Article);
    let field = |name: &str| {
        entry
            .fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };
    assert_eq!(field("journal"), Some("IEEE TPAMI"));
    assert_eq!(field("volume"), Some("38"));
    assert_eq!(field("pages"), Some("1–12"));
}

#[test]
fn test_url_falls_back_to_doi_link() {
    let entry = paper_to_entry(&journal_paper(), &ExportConfig::default());
    let url = entry
        .fields
        .iter()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.as_str());
    assert_eq!(url, Some("https://doi.org/10.1109/TPAMI.2016.123"));
}

#[test]
fn test_field_toggles() {
    let config = ExportConfig::default().with_fields(
        FieldConfig::default()
            .with_include_abstract(true)
            .with_include_url(false)
            .with_include_doi(false)
            .with_include_keywords(true),
    );

    let entry = paper_to_entry(&attention_paper(), &config);
    let names: Vec<&str> = entry.fields.iter().map(|(key, _)| key.as_str()).collect();

    assert!(names.contains(&"abstract"));
    assert!(names.contains(&"keywords"));
    assert!(!names.contains(&"url"));
    assert!(!names.contains(&"doi"));
}

#[test]
fn test_author_list_truncation() {
    let config = ExportConfig::default()
        .with_fields(FieldConfig::default().with_max_authors(2));

    let entry = paper_to_entry(&attention_paper(), &config);
    let author = entry
        .fields
        .iter()
        .find(|(key, _)| key == "author")
        .map(|(_, value)| value.as_str());
    assert_eq!(author, Some("Ashish Vaswani and Noam Shazeer and others"));
}

#[test]
fn test_missing_fields_are_omitted() {
    let sparse = json!({"paperId": "p1", "title": "Untitled Draft"});
    let entry = paper_to_entry(&sparse, &ExportConfig::default());

    let names: Vec<&str> = entry.fields.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(names, vec!["title"]);
}

#[test]
fn test_rendering_escapes_special_characters() {
    let paper = json!({
        "title": "P & NP: 100% of the $1M_problem {solved}",
        "year": 2021,
        "authors": [{"name": "Alan Turing"}]
    });

    let bibtex = paper_to_entry(&paper, &ExportConfig::default()).to_bibtex();

    assert!(bibtex.contains(r"P \& NP"));
    assert!(bibtex.contains(r"100\% of"));
    assert!(bibtex.contains(r"\$1M\_problem"));
    assert!(bibtex.contains(r"\{solved\}"));
}

#[test]
fn test_export_separates_entries_with_blank_lines() {
    let papers = vec![attention_paper(), journal_paper()];
    let bibtex = export_papers(&papers, &ExportConfig::default());

    let entries: Vec<&str> = bibtex.split("\n\n").collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].starts_with("@inproceedings{vaswani2017,"));
    assert!(entries[1].starts_with("@article{he2016,"));
    assert!(bibtex.ends_with('}'));
}

#[test]
fn test_export_deduplicates_cite_keys() {
    let duplicate = json!({
        "paperId": "p",
        "title": "Something",
        "year": 2020,
        "authors": [{"name": "Ada Smith"}]
    });
    let papers: Vec<Value> = (0..30).map(|_| duplicate.clone()).collect();

    let bibtex = export_papers(&papers, &ExportConfig::default());
    let keys: Vec<String> = bibtex
        .lines()
        .filter(|line| line.starts_with("@misc{"))
        .map(|line| {
            line.trim_start_matches("@misc{")
                .trim_end_matches(',')
                .to_string()
        })
        .collect();

    assert_eq!(keys.len(), 30);
    assert_eq!(keys[0], "smith2020");
    assert_eq!(keys[1], "smith2020a");
    assert_eq!(keys[2], "smith2020b");
    assert_eq!(keys[25], "smith2020y");

    // After the single-letter suffixes run out, numbered suffixes take over
    assert_eq!(keys[26], "smith2020_27");
    assert_eq!(keys[29], "smith2020_30");
}

#[test]
fn test_export_empty_input_is_empty() {
    assert_eq!(export_papers(&[], &ExportConfig::default()), "");
}
