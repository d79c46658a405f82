//! Tool implementations and the registry that dispatches them.

mod authors;
mod cache;
mod export;
mod papers;
mod recommendations;
mod tracking;

pub use authors::{GetAuthorTool, SearchAuthorsTool};
pub use cache::CacheStatsTool;
pub use export::ExportBibtexTool;
pub use papers::{GetPaperCitationsTool, GetPaperReferencesTool, GetPaperTool, SearchPapersTool};
pub use recommendations::{GetRecommendationsTool, GetRelatedPapersTool};
pub use tracking::{ClearTrackedPapersTool, ListTrackedPapersTool};

use crate::tracker::PaperTracker;
use alexandria_client::ScholarClient;
use alexandria_error::{AlexandriaError, AlexandriaResult, ToolError, ToolErrorKind};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Trait for callable Semantic Scholar tools.
#[async_trait]
pub trait ScholarTool: Send + Sync {
    /// Returns the tool name.
    fn name(&self) -> &str;

    /// Returns the tool description.
    fn description(&self) -> &str;

    /// Returns the input schema as JSON Schema.
    fn input_schema(&self) -> Value;

    /// Executes the tool with the given input.
    async fn execute(&self, input: Value) -> AlexandriaResult<Value>;
}

/// Shared state handed to every tool at construction.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// The composed API client.
    pub client: Arc<ScholarClient>,
    /// The session paper tracker.
    pub tracker: Arc<PaperTracker>,
}

impl ToolContext {
    /// Creates a context over a shared client and tracker.
    pub fn new(client: Arc<ScholarClient>, tracker: Arc<PaperTracker>) -> Self {
        Self { client, tracker }
    }
}

/// Registry for managing tools.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ScholarTool>>,
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Creates a registry with the full tool set over the given context.
    pub fn with_context(ctx: ToolContext) -> Self {
        let mut registry = Self::new();

        // Paper tools
        registry.register(Arc::new(SearchPapersTool::new(ctx.clone())));
        registry.register(Arc::new(GetPaperTool::new(ctx.clone())));
        registry.register(Arc::new(GetPaperCitationsTool::new(ctx.clone())));
        registry.register(Arc::new(GetPaperReferencesTool::new(ctx.clone())));

        // Author tools
        registry.register(Arc::new(SearchAuthorsTool::new(ctx.clone())));
        registry.register(Arc::new(GetAuthorTool::new(ctx.clone())));

        // Recommendation tools
        registry.register(Arc::new(GetRecommendationsTool::new(ctx.clone())));
        registry.register(Arc::new(GetRelatedPapersTool::new(ctx.clone())));

        // Session tools
        registry.register(Arc::new(ListTrackedPapersTool::new(ctx.clone())));
        registry.register(Arc::new(ClearTrackedPapersTool::new(ctx.clone())));
        registry.register(Arc::new(ExportBibtexTool::new(ctx.clone())));
        registry.register(Arc::new(CacheStatsTool::new(ctx)));

        info!("tool registry initialized with {} tools", registry.len());
        registry
    }

    /// Registers a tool.
    pub fn register(&mut self, tool: Arc<dyn ScholarTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Gets a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ScholarTool>> {
        self.tools.get(name).cloned()
    }

    /// Lists all registered tools.
    pub fn list(&self) -> Vec<Arc<dyn ScholarTool>> {
        self.tools.values().cloned().collect()
    }

    /// Executes a tool by name.
    ///
    /// # Errors
    ///
    /// Returns an unknown-tool error when no tool is registered under the
    /// name, otherwise whatever the tool execution returns.
    pub async fn execute(&self, name: &str, input: Value) -> AlexandriaResult<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::new(ToolErrorKind::UnknownTool(name.to_string())))?;

        tool.execute(input).await
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds an invalid-input error for a tool, keeping the caller's location.
#[track_caller]
pub(crate) fn invalid_input(tool: &str, reason: impl Into<String>) -> AlexandriaError {
    ToolError::new(ToolErrorKind::InvalidInput {
        tool: tool.to_string(),
        reason: reason.into(),
    })
    .into()
}

/// Whether the error is a classified not-found response.
pub(crate) fn is_not_found(err: &AlexandriaError) -> bool {
    err.as_api().is_some_and(|api| api.kind.is_not_found())
}

/// Guidance message for an unknown paper ID.
pub(crate) fn paper_not_found_message(paper_id: &str) -> String {
    format!(
        "Paper not found with ID '{paper_id}'. Please verify the ID is correct. \
         For DOIs, use format 'DOI:10.xxxx/xxxxx'. \
         For ArXiv IDs, use format 'ARXIV:xxxx.xxxxx'."
    )
}
