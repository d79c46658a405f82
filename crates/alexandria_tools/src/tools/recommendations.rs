//! Recommendation tools backed by the Semantic Scholar recommendations API.

use crate::fields::DEFAULT_PAPER_FIELDS;
use crate::tools::{ScholarTool, ToolContext, invalid_input, is_not_found, paper_not_found_message};
use alexandria_client::ApiBase;
use alexandria_error::AlexandriaResult;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;

// ============================================================================
// Tool: Get Recommendations
// ============================================================================

/// Finds papers similar to a single seed paper.
pub struct GetRecommendationsTool {
    ctx: ToolContext,
}

impl GetRecommendationsTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Fetches one recommendation pool.
    ///
    /// Returns `None` when the seed paper itself is unknown.
    async fn fetch_pool(
        &self,
        endpoint: &str,
        limit: i64,
        pool: &str,
    ) -> AlexandriaResult<Option<Vec<Value>>> {
        let params = vec![
            ("fields".to_string(), DEFAULT_PAPER_FIELDS.to_string()),
            ("limit".to_string(), limit.to_string()),
            ("from".to_string(), pool.to_string()),
        ];

        match self
            .ctx
            .client
            .get_with_retry(ApiBase::Recommendations, endpoint, Some(&params))
            .await
        {
            Ok(response) => Ok(Some(
                response
                    .get("recommendedPapers")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
            )),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl ScholarTool for GetRecommendationsTool {
    fn name(&self) -> &str {
        "get_recommendations"
    }

    fn description(&self) -> &str {
        "Find papers similar to a given paper using ML-based recommendations."
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
                    "description": "Maximum number of recommendations",
                    "default": 10
                },
                "from_pool": {
                    "type": "string",
                    "enum": ["recent", "all-cs"],
                    "description": "Recommendation pool; 'recent' falls back to 'all-cs' when empty",
                    "default": "recent"
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

        let limit = input.get("limit").and_then(Value::as_i64).unwrap_or(10);

        // Unknown pool names fall back to the default rather than erroring.
        let pool = match input.get("from_pool").and_then(Value::as_str) {
            Some("all-cs") => "all-cs",
            _ => "recent",
        };

        let endpoint = format!("/papers/forpaper/{paper_id}");
        let Some(mut papers) = self.fetch_pool(&endpoint, limit, pool).await? else {
            return Ok(json!({
                "status": "not_found",
                "message": paper_not_found_message(paper_id),
            }));
        };

        // An empty "recent" pool is common for older seed papers.
        if papers.is_empty() && pool == "recent" {
            match self.fetch_pool(&endpoint, limit, "all-cs").await? {
                Some(fallback) => papers = fallback,
                None => {
                    return Ok(json!({
                        "status": "not_found",
                        "message": paper_not_found_message(paper_id),
                    }));
                }
            }
        }

        if papers.is_empty() {
            return Ok(json!({
                "status": "empty",
                "message": format!(
                    "No recommendations found for paper '{paper_id}'. Both 'recent' and \
                     'all-cs' pools were tried. This may happen for very new papers, papers \
                     in niche fields, or papers not well-covered in the recommendation \
                     model's training data."
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
// Tool: Get Related Papers
// ============================================================================

/// Finds papers related to multiple positive (and optional negative) examples.
pub struct GetRelatedPapersTool {
    ctx: ToolContext,
}

impl GetRelatedPapersTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for GetRelatedPapersTool {
    fn name(&self) -> &str {
        "get_related_papers"
    }

    fn description(&self) -> &str {
        "Find papers related to multiple example papers, optionally steering away \
         from negative examples."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "positive_paper_ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Paper IDs to find similar papers to (at least one)"
                },
                "negative_paper_ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Paper IDs whose neighbors should rank lower"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of recommendations",
                    "default": 10
                }
            },
            "required": ["positive_paper_ids"]
        })
    }

    async fn execute(&self, input: Value) -> AlexandriaResult<Value> {
        let positives: Vec<String> = input
            .get("positive_paper_ids")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if positives.is_empty() {
            return Ok(json!({
                "status": "error",
                "message": "At least one positive paper ID is required. Please provide one or \
                            more paper IDs as examples of the type of papers you want to find.",
            }));
        }

        let negatives: Vec<String> = input
            .get("negative_paper_ids")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let limit = input.get("limit").and_then(Value::as_i64).unwrap_or(10);

        let mut body = json!({"positivePaperIds": positives});
        if !negatives.is_empty()
            && let Some(object) = body.as_object_mut()
        {
            object.insert("negativePaperIds".to_string(), json!(negatives));
        }

        let params = vec![
            ("fields".to_string(), DEFAULT_PAPER_FIELDS.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];

        let response = match self
            .ctx
            .client
            .post_with_retry(ApiBase::Recommendations, "/papers/", Some(&params), Some(body))
            .await
        {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "related paper lookup failed");
                let ids = positives
                    .iter()
                    .map(|id| format!("'{id}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                return Ok(json!({
                    "status": "not_found",
                    "message": format!(
                        "Could not find recommendations for the provided paper IDs ({ids}). \
                         Please verify that all IDs are valid. \
                         For DOIs, use format 'DOI:10.xxxx/xxxxx'. \
                         For ArXiv IDs, use format 'ARXIV:xxxx.xxxxx'."
                    ),
                }));
            }
        };

        let papers = response
            .get("recommendedPapers")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if papers.is_empty() {
            return Ok(json!({
                "status": "empty",
                "message": "No recommendations found for the provided papers. This may happen \
                            if the papers are too niche, too new, or not well-covered in the \
                            recommendation model's training data. Try using different seed \
                            papers.",
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
