//! Session tracking tools.

use crate::tools::{ScholarTool, ToolContext};
use alexandria_error::AlexandriaResult;
use async_trait::async_trait;
use serde_json::{Value, json};

// ============================================================================
// Tool: List Tracked Papers
// ============================================================================

/// Lists papers tracked during this session.
pub struct ListTrackedPapersTool {
    ctx: ToolContext,
}

impl ListTrackedPapersTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for ListTrackedPapersTool {
    fn name(&self) -> &str {
        "list_tracked_papers"
    }

    fn description(&self) -> &str {
        "List papers tracked in this session, optionally filtered by the tool \
         that found them."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "source_tool": {
                    "type": "string",
                    "description": "Only list papers tracked by this tool, e.g. 'search_papers'"
                }
            }
        })
    }

    async fn execute(&self, input: Value) -> AlexandriaResult<Value> {
        let source_tool = input.get("source_tool").and_then(Value::as_str);

        let papers = match source_tool {
            Some(tool) => self.ctx.tracker.papers_for_tool(tool).await,
            None => self.ctx.tracker.all_papers().await,
        };

        if papers.is_empty() {
            let message = match source_tool {
                Some(tool) => format!(
                    "No papers tracked from '{tool}'. Use search_papers, get_paper, or \
                     other tools to find papers first."
                ),
                None => "No papers tracked in this session. Use search_papers, get_paper, \
                         get_recommendations, or other tools to find papers first."
                    .to_string(),
            };
            return Ok(json!({"status": "empty", "message": message}));
        }

        Ok(json!({
            "status": "success",
            "count": papers.len(),
            "by_tool": self.ctx.tracker.tool_summary().await,
            "papers": papers,
        }))
    }
}

// ============================================================================
// Tool: Clear Tracked Papers
// ============================================================================

/// Clears the session's tracked papers.
pub struct ClearTrackedPapersTool {
    ctx: ToolContext,
}

impl ClearTrackedPapersTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for ClearTrackedPapersTool {
    fn name(&self) -> &str {
        "clear_tracked_papers"
    }

    fn description(&self) -> &str {
        "Clear all papers tracked in this session."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> AlexandriaResult<Value> {
        let count = self.ctx.tracker.len().await;
        self.ctx.tracker.clear().await;

        Ok(json!({
            "status": "success",
            "message": format!("Cleared {count} tracked papers from this session."),
        }))
    }
}
