//! BibTeX export tool.

use crate::fields::DEFAULT_PAPER_FIELDS;
use crate::tools::{ScholarTool, ToolContext, is_not_found};
use alexandria_bibtex::{CiteKeyFormat, ExportConfig, FieldConfig, export_papers};
use alexandria_client::ApiBase;
use alexandria_error::{AlexandriaResult, ExportError, ExportErrorKind};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing::warn;

/// Builds the export configuration from tool input.
fn parse_export_config(input: &Value) -> AlexandriaResult<ExportConfig> {
    let mut fields = FieldConfig::default();

    if let Some(include_abstract) = input.get("include_abstract").and_then(Value::as_bool) {
        fields = fields.with_include_abstract(include_abstract);
    }
    if let Some(include_url) = input.get("include_url").and_then(Value::as_bool) {
        fields = fields.with_include_url(include_url);
    }
    if let Some(include_doi) = input.get("include_doi").and_then(Value::as_bool) {
        fields = fields.with_include_doi(include_doi);
    }
    if let Some(include_keywords) = input.get("include_keywords").and_then(Value::as_bool) {
        fields = fields.with_include_keywords(include_keywords);
    }
    if let Some(max_authors) = input.get("max_authors").and_then(Value::as_u64) {
        fields = fields.with_max_authors(max_authors as usize);
    }

    let mut config = ExportConfig::default().with_fields(fields);
    if let Some(raw) = input.get("cite_key_format").and_then(Value::as_str) {
        let format = raw.parse::<CiteKeyFormat>().map_err(|_| {
            ExportError::new(ExportErrorKind::UnknownCiteKeyFormat(raw.to_string()))
        })?;
        config = config.with_cite_key_format(format);
    }

    Ok(config)
}

/// Expands a leading `~/` to the home directory.
fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Exports tracked (or explicitly named) papers as BibTeX.
pub struct ExportBibtexTool {
    ctx: ToolContext,
}

impl ExportBibtexTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Fetches papers by ID when none of the requested IDs are tracked.
    ///
    /// Unknown IDs are skipped; fetched papers are tracked for later calls.
    async fn fetch_papers(&self, paper_ids: &[String]) -> AlexandriaResult<Vec<Value>> {
        let params = vec![("fields".to_string(), DEFAULT_PAPER_FIELDS.to_string())];
        let mut papers = Vec::new();

        for paper_id in paper_ids {
            let endpoint = format!("/paper/{paper_id}");
            match self
                .ctx
                .client
                .get_with_retry(ApiBase::Graph, &endpoint, Some(&params))
                .await
            {
                Ok(paper) => {
                    self.ctx.tracker.track(&paper, self.name()).await;
                    papers.push(paper);
                }
                Err(err) if is_not_found(&err) => {
                    warn!(paper_id = %paper_id, "skipping unknown paper ID during export");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(papers)
    }
}

#[async_trait]
impl ScholarTool for ExportBibtexTool {
    fn name(&self) -> &str {
        "export_bibtex"
    }

    fn description(&self) -> &str {
        "Export tracked papers as BibTeX. Accepts explicit paper IDs (fetching any \
         that were not tracked), a source tool filter, or defaults to every paper \
         tracked this session."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "paper_ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Export only these papers, fetching any that were not tracked"
                },
                "source_tool": {
                    "type": "string",
                    "description": "Export only papers tracked by this tool"
                },
                "include_abstract": {
                    "type": "boolean",
                    "description": "Include abstract fields",
                    "default": false
                },
                "include_url": {
                    "type": "boolean",
                    "description": "Include url fields",
                    "default": true
                },
                "include_doi": {
                    "type": "boolean",
                    "description": "Include doi fields",
                    "default": true
                },
                "include_keywords": {
                    "type": "boolean",
                    "description": "Include keywords built from fields of study",
                    "default": false
                },
                "max_authors": {
                    "type": "integer",
                    "description": "Truncate author lists past this length (0 = unlimited)",
                    "default": 0
                },
                "cite_key_format": {
                    "type": "string",
                    "enum": ["author_year", "author_year_title", "paper_id"],
                    "description": "Citation key style",
                    "default": "author_year"
                },
                "file_path": {
                    "type": "string",
                    "description": "Write the BibTeX to this file instead of returning it"
                }
            }
        })
    }

    async fn execute(&self, input: Value) -> AlexandriaResult<Value> {
        let config = parse_export_config(&input)?;

        let paper_ids: Vec<String> = input
            .get("paper_ids")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let source_tool = input.get("source_tool").and_then(Value::as_str);

        let papers = if !paper_ids.is_empty() {
            let mut selected = self.ctx.tracker.papers_for_ids(&paper_ids).await;
            if selected.is_empty() {
                selected = self.fetch_papers(&paper_ids).await?;
            }
            if selected.is_empty() {
                return Ok(json!({
                    "status": "not_found",
                    "message": "No papers found with the provided IDs. Please verify the paper \
                                IDs are correct, or use list_tracked_papers to see available \
                                papers.",
                }));
            }
            selected
        } else if let Some(tool) = source_tool {
            let selected = self.ctx.tracker.papers_for_tool(tool).await;
            if selected.is_empty() {
                return Ok(json!({
                    "status": "empty",
                    "message": format!(
                        "No papers tracked from '{tool}'. Use search_papers, get_paper, or \
                         other tools to find papers first."
                    ),
                }));
            }
            selected
        } else {
            let selected = self.ctx.tracker.all_papers().await;
            if selected.is_empty() {
                return Ok(json!({
                    "status": "empty",
                    "message": "No papers tracked in this session to export. Use search_papers, \
                                get_paper, get_recommendations, or other tools to find papers \
                                first, then call export_bibtex.",
                }));
            }
            selected
        };

        let bibtex = export_papers(&papers, &config);

        if let Some(path) = input.get("file_path").and_then(Value::as_str) {
            let expanded = expand_path(path);
            let target = std::path::absolute(&expanded).unwrap_or(expanded);

            if let Err(err) = tokio::fs::write(&target, &bibtex).await {
                return Ok(json!({
                    "status": "error",
                    "message": format!(
                        "Error writing to file '{}': {}",
                        target.display(),
                        err
                    ),
                }));
            }

            return Ok(json!({
                "status": "success",
                "count": papers.len(),
                "file_path": target.display().to_string(),
                "message": format!(
                    "Successfully exported {} papers to BibTeX format.\nFile written to: {}",
                    papers.len(),
                    target.display()
                ),
            }));
        }

        Ok(json!({
            "status": "success",
            "count": papers.len(),
            "bibtex": bibtex,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_config_rejects_unknown_cite_key_formats() {
        let input = json!({"cite_key_format": "upside_down"});
        assert!(parse_export_config(&input).is_err());
    }

    #[test]
    fn export_config_parses_field_toggles() {
        let input = json!({
            "include_abstract": true,
            "include_url": false,
            "max_authors": 3,
            "cite_key_format": "paper_id",
        });
        let config = parse_export_config(&input).unwrap();
        assert!(*config.fields().include_abstract());
        assert!(!*config.fields().include_url());
        assert_eq!(*config.fields().max_authors(), 3);
        assert_eq!(*config.cite_key_format(), CiteKeyFormat::PaperId);
    }
}
