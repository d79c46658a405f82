//! Paper search, detail, citation, and reference tools.

use crate::fields::{DEFAULT_PAPER_FIELDS, PAPER_FIELDS_WITH_TLDR, nested_paper_fields};
use crate::tools::{ScholarTool, ToolContext, invalid_input, is_not_found, paper_not_found_message};
use alexandria_client::ApiBase;
use alexandria_error::AlexandriaResult;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Parses a year filter into an inclusive range.
///
/// Accepts "YYYY" or "YYYY-YYYY".
fn parse_year_filter(year: &str) -> Option<(i64, i64)> {
    match year.split_once('-') {
        Some((start, end)) => {
            let min = start.trim().parse().ok()?;
            let max = end.trim().parse().ok()?;
            Some((min, max))
        }
        None => {
            let single = year.trim().parse().ok()?;
            Some((single, single))
        }
    }
}

/// Pulls the nested papers out of a citations or references response.
fn unwrap_nested(data: &[Value], key: &str) -> Vec<Value> {
    data.iter()
        .filter_map(|item| item.get(key))
        .filter(|paper| !paper.is_null())
        .cloned()
        .collect()
}

// ============================================================================
// Tool: Search Papers
// ============================================================================

/// Searches for papers by keyword or phrase.
pub struct SearchPapersTool {
    ctx: ToolContext,
}

impl SearchPapersTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for SearchPapersTool {
    fn name(&self) -> &str {
        "search_papers"
    }

    fn description(&self) -> &str {
        "Search for academic papers by keyword or phrase. Supports year, citation count, \
         and field-of-study filters."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query, e.g. 'transformer attention mechanism'"
                },
                "year": {
                    "type": "string",
                    "description": "Year filter: 'YYYY' or 'YYYY-YYYY'"
                },
                "min_citation_count": {
                    "type": "integer",
                    "description": "Exclude papers with fewer citations"
                },
                "fields_of_study": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Fields to filter by, e.g. ['Computer Science']"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results (1-100)",
                    "default": 10,
                    "minimum": 1,
                    "maximum": 100
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: Value) -> AlexandriaResult<Value> {
        let query = input
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_input(self.name(), "missing 'query'"))?;

        let limit = input
            .get("limit")
            .and_then(Value::as_i64)
            .unwrap_or(10)
            .clamp(1, 100);

        let mut params: Vec<(String, String)> = vec![
            ("query".to_string(), query.to_string()),
            ("fields".to_string(), DEFAULT_PAPER_FIELDS.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];

        if let Some(year) = input.get("year").and_then(Value::as_str) {
            params.push(("year".to_string(), year.to_string()));
        }

        if let Some(min_citations) = input.get("min_citation_count").and_then(Value::as_i64) {
            params.push(("minCitationCount".to_string(), min_citations.to_string()));
        }

        if let Some(fields) = input.get("fields_of_study").and_then(Value::as_array) {
            let joined = fields
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(",");
            if !joined.is_empty() {
                params.push(("fieldsOfStudy".to_string(), joined));
            }
        }

        let response = self
            .ctx
            .client
            .get_with_retry(ApiBase::Graph, "/paper/search", Some(&params))
            .await?;

        let papers = response
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if papers.is_empty() {
            return Ok(json!({
                "status": "empty",
                "message": format!(
                    "No papers found matching '{query}'. Try broadening your search terms, \
                     removing filters, or using different keywords."
                ),
            }));
        }

        self.ctx.tracker.track_many(&papers, self.name()).await;

        Ok(json!({
            "status": "success",
            "count": papers.len(),
            "papers": papers,
        }))
    }
}

// ============================================================================
// Tool: Get Paper
// ============================================================================

/// Fetches detailed metadata for one paper.
pub struct GetPaperTool {
    ctx: ToolContext,
}

impl GetPaperTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for GetPaperTool {
    fn name(&self) -> &str {
        "get_paper"
    }

    fn description(&self) -> &str {
        "Get detailed information about a paper by Semantic Scholar ID, 'DOI:...', \
         or 'ARXIV:...' identifier."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "paper_id": {
                    "type": "string",
                    "description": "Semantic Scholar ID, 'DOI:10.xxxx/xxxxx', or 'ARXIV:xxxx.xxxxx'"
                },
                "include_tldr": {
                    "type": "boolean",
                    "description": "Include the AI-generated TL;DR summary",
                    "default": true
                }
            },
            "required": ["paper_id"]
        })
    }

    async fn execute(&self, input: Value) -> AlexandriaResult<Value> {
        let paper_id = input
            .get("paper_id")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_input(self.name(), "missing 'paper_id'"))?;

        let include_tldr = input
            .get("include_tldr")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let fields = if include_tldr {
            PAPER_FIELDS_WITH_TLDR
        } else {
            DEFAULT_PAPER_FIELDS
        };
        let params = vec![("fields".to_string(), fields.to_string())];

        let endpoint = format!("/paper/{paper_id}");
        let paper = match self
            .ctx
            .client
            .get_with_retry(ApiBase::Graph, &endpoint, Some(&params))
            .await
        {
            Ok(value) => value,
            Err(err) if is_not_found(&err) => {
                return Ok(json!({
                    "status": "not_found",
                    "message": paper_not_found_message(paper_id),
                }));
            }
            Err(err) => return Err(err),
        };

        self.ctx.tracker.track(&paper, self.name()).await;

        Ok(json!({
            "status": "success",
            "paper": paper,
        }))
    }
}

// ============================================================================
// Tool: Get Paper Citations
// ============================================================================

/// Lists papers that cite a given paper.
pub struct GetPaperCitationsTool {
    ctx: ToolContext,
}

impl GetPaperCitationsTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for GetPaperCitationsTool {
    fn name(&self) -> &str {
        "get_paper_citations"
    }

    fn description(&self) -> &str {
        "Get papers that cite a given paper. Useful for finding follow-on work."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "paper_id": {
                    "type": "string",
                    "description": "Semantic Scholar ID, 'DOI:10.xxxx/xxxxx', or 'ARXIV:xxxx.xxxxx'"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of citing papers (1-1000)",
                    "default": 100,
                    "minimum": 1,
                    "maximum": 1000
                },
                "year": {
                    "type": "string",
                    "description": "Year filter: 'YYYY' or 'YYYY-YYYY' (applied client-side)"
                }
            },
            "required": ["paper_id"]
        })
    }

    async fn execute(&self, input: Value) -> AlexandriaResult<Value> {
        let paper_id = input
            .get("paper_id")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_input(self.name(), "missing 'paper_id'"))?;

        let limit = input
            .get("limit")
            .and_then(Value::as_i64)
            .unwrap_or(100)
            .clamp(1, 1000);

        let year = input.get("year").and_then(Value::as_str);
        let year_range = match year {
            Some(raw) => Some(parse_year_filter(raw).ok_or_else(|| {
                invalid_input(self.name(), "year must be 'YYYY' or 'YYYY-YYYY'")
            })?),
            None => None,
        };

        // The citations endpoint has no year parameter, so the filter runs
        // client-side over an enlarged fetch.
        let fetch_limit = if year_range.is_some() {
            (limit * 10).min(1000)
        } else {
            limit
        };

        let params = vec![
            ("fields".to_string(), nested_paper_fields("citingPaper")),
            ("limit".to_string(), fetch_limit.to_string()),
        ];

        let endpoint = format!("/paper/{paper_id}/citations");
        let response = match self
            .ctx
            .client
            .get_with_retry(ApiBase::Graph, &endpoint, Some(&params))
            .await
        {
            Ok(value) => value,
            Err(err) if is_not_found(&err) => {
                return Ok(json!({
                    "status": "not_found",
                    "message": paper_not_found_message(paper_id),
                }));
            }
            Err(err) => return Err(err),
        };

        let data = response
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut papers = unwrap_nested(&data, "citingPaper");

        if let Some((min_year, max_year)) = year_range {
            papers.retain(|paper| {
                paper
                    .get("year")
                    .and_then(Value::as_i64)
                    .is_some_and(|value| (min_year..=max_year).contains(&value))
            });
        }

        papers.truncate(limit as usize);

        if papers.is_empty() {
            let message = match year {
                Some(range) => format!(
                    "No citations found for paper '{paper_id}' in the year range '{range}'. \
                     Try broadening the year range."
                ),
                None => format!(
                    "No citations found for paper '{paper_id}'. This paper may be too new \
                     to have citations, or citations may not yet be indexed."
                ),
            };
            return Ok(json!({"status": "empty", "message": message}));
        }

        self.ctx.tracker.track_many(&papers, self.name()).await;

        Ok(json!({
            "status": "success",
            "count": papers.len(),
            "papers": papers,
        }))
    }
}

// ============================================================================
// Tool: Get Paper References
// ============================================================================

/// Lists papers that a given paper cites.
pub struct GetPaperReferencesTool {
    ctx: ToolContext,
}

impl GetPaperReferencesTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for GetPaperReferencesTool {
    fn name(&self) -> &str {
        "get_paper_references"
    }

    fn description(&self) -> &str {
        "Get papers that a given paper references. Useful for finding foundational work."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "paper_id": {
                    "type": "string",
                    "description": "Semantic Scholar ID, 'DOI:10.xxxx/xxxxx', or 'ARXIV:xxxx.xxxxx'"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of referenced papers (1-1000)",
                    "default": 100,
                    "minimum": 1,
                    "maximum": 1000
                }
            },
            "required": ["paper_id"]
        })
    }

    async fn execute(&self, input: Value) -> AlexandriaResult<Value> {
        let paper_id = input
            .get("paper_id")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_input(self.name(), "missing 'paper_id'"))?;

        let limit = input
            .get("limit")
            .and_then(Value::as_i64)
            .unwrap_or(100)
            .clamp(1, 1000);

        let params = vec![
            ("fields".to_string(), nested_paper_fields("citedPaper")),
            ("limit".to_string(), limit.to_string()),
        ];

        let endpoint = format!("/paper/{paper_id}/references");
        let response = match self
            .ctx
            .client
            .get_with_retry(ApiBase::Graph, &endpoint, Some(&params))
            .await
        {
            Ok(value) => value,
            Err(err) if is_not_found(&err) => {
                return Ok(json!({
                    "status": "not_found",
                    "message": paper_not_found_message(paper_id),
                }));
            }
            Err(err) => return Err(err),
        };

        let data = response
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let papers = unwrap_nested(&data, "citedPaper");

        if papers.is_empty() {
            return Ok(json!({
                "status": "empty",
                "message": format!(
                    "No references found for paper '{paper_id}'. This paper may not have \
                     any references indexed, or it may be a preprint without a reference list."
                ),
            }));
        }

        self.ctx.tracker.track_many(&papers, self.name()).await;

        Ok(json!({
            "status": "success",
            "count": papers.len(),
            "papers": papers,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_filter_parses_single_years_and_ranges() {
        assert_eq!(parse_year_filter("2020"), Some((2020, 2020)));
        assert_eq!(parse_year_filter("2020-2024"), Some((2020, 2024)));
        assert_eq!(parse_year_filter("not a year"), None);
        assert_eq!(parse_year_filter("2020-"), None);
    }

    #[test]
    fn nested_unwrap_skips_missing_and_null_entries() {
        let data = vec![
            json!({"citingPaper": {"paperId": "a"}}),
            json!({"citingPaper": null}),
            json!({"other": {}}),
        ];
        let papers = unwrap_nested(&data, "citingPaper");
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0]["paperId"], "a");
    }
}
