//! Cache introspection tool.

use crate::tools::{ScholarTool, ToolContext};
use alexandria_error::AlexandriaResult;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Reports response cache statistics.
pub struct CacheStatsTool {
    ctx: ToolContext,
}

impl CacheStatsTool {
    /// Creates the tool over a shared context.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ScholarTool for CacheStatsTool {
    fn name(&self) -> &str {
        "cache_stats"
    }

    fn description(&self) -> &str {
        "Report response cache statistics: entry count, hits, misses, and hit rate."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> AlexandriaResult<Value> {
        let stats = self.ctx.client.cache_stats().await;

        Ok(json!({
            "status": "success",
            "entries": stats.entries,
            "hits": stats.hits,
            "misses": stats.misses,
            "hit_rate": stats.hit_rate,
        }))
    }
}
