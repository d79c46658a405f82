//! Author search and detail tools.

use crate::fields::{DEFAULT_AUTHOR_FIELDS, DEFAULT_PAPER_FIELDS};
use crate::tools::{ScholarTool, ToolContext, invalid_input, is_not_found};
use alexandria_client::ApiBase;
use alexandria_error::AlexandriaResult;
use async_trait::async_trait;
use serde_json::{Value, json};

// ============================================================================
// Tool: Search Authors
// ============================================================================

/// Searches for authors by name.
pub struct SearchAuthorsTool {
    ctx: ToolContext,
}

impl SearchAuthorsTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for SearchAuthorsTool {
    fn name(&self) -> &str {
        "search_authors"
    }

    fn description(&self) -> &str {
        "Search for authors by name. Returns author IDs, affiliations, and citation metrics."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Author name to search for"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results (1-1000)",
                    "default": 10,
                    "minimum": 1,
                    "maximum": 1000
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
            .clamp(1, 1000);

        let params = vec![
            ("query".to_string(), query.to_string()),
            ("fields".to_string(), DEFAULT_AUTHOR_FIELDS.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];

        let response = self
            .ctx
            .client
            .get_with_retry(ApiBase::Graph, "/author/search", Some(&params))
            .await?;

        let authors = response
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if authors.is_empty() {
            return Ok(json!({
                "status": "empty",
                "message": format!(
                    "No authors found matching '{query}'. Try using the author's full name, \
                     a different spelling, or check for any accents or special characters."
                ),
            }));
        }

        Ok(json!({
            "status": "success",
            "count": authors.len(),
            "authors": authors,
        }))
    }
}

// ============================================================================
// Tool: Get Author
// ============================================================================

/// Fetches detailed metadata for one author, optionally with their papers.
pub struct GetAuthorTool {
    ctx: ToolContext,
}

impl GetAuthorTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for GetAuthorTool {
    fn name(&self) -> &str {
        "get_author"
    }

    fn description(&self) -> &str {
        "Get detailed information about an author by Semantic Scholar author ID, \
         optionally including their papers."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "author_id": {
                    "type": "string",
                    "description": "Semantic Scholar author ID, e.g. '1741101'"
                },
                "include_papers": {
                    "type": "boolean",
                    "description": "Also fetch the author's papers",
                    "default": true
                },
                "papers_limit": {
                    "type": "integer",
                    "description": "Maximum number of papers when include_papers is set",
                    "default": 10
                }
            },
            "required": ["author_id"]
        })
    }

    async fn execute(&self, input: Value) -> AlexandriaResult<Value> {
        let author_id = input
            .get("author_id")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_input(self.name(), "missing 'author_id'"))?;

        let include_papers = input
            .get("include_papers")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let papers_limit = input
            .get("papers_limit")
            .and_then(Value::as_i64)
            .unwrap_or(10);

        let params = vec![("fields".to_string(), DEFAULT_AUTHOR_FIELDS.to_string())];

        let endpoint = format!("/author/{author_id}");
        let mut author = match self
            .ctx
            .client
            .get_with_retry(ApiBase::Graph, &endpoint, Some(&params))
            .await
        {
            Ok(value) => value,
            Err(err) if is_not_found(&err) => {
                return Ok(json!({
                    "status": "not_found",
                    "message": format!(
                        "Author not found with ID '{author_id}'. Please verify the author ID is \
                         correct. You can find author IDs by using the search_authors tool."
                    ),
                }));
            }
            Err(err) => return Err(err),
        };

        if include_papers {
            let papers_params = vec![
                ("fields".to_string(), DEFAULT_PAPER_FIELDS.to_string()),
                ("limit".to_string(), papers_limit.to_string()),
            ];
            let papers_endpoint = format!("/author/{author_id}/papers");
            let papers_response = self
                .ctx
                .client
                .get_with_retry(ApiBase::Graph, &papers_endpoint, Some(&papers_params))
                .await?;

            let papers = papers_response
                .get("data")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            self.ctx.tracker.track_many(&papers, self.name()).await;

            if let Some(object) = author.as_object_mut() {
                object.insert("papers".to_string(), Value::Array(papers));
            }
        }

        Ok(json!({
            "status": "success",
            "author": author,
        }))
    }
}
