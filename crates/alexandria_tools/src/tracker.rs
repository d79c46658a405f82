//! Session-scoped paper tracking.
//!
//! Every tool that returns papers records them here so a later
//! `export_bibtex` call can pick them up without refetching.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// One tracked paper with provenance.
#[derive(Debug, Clone)]
pub struct TrackedPaper {
    /// The raw paper payload as returned by the API.
    pub record: Value,
    /// Name of the tool that produced the record.
    pub source_tool: String,
    /// When the record was last tracked.
    pub tracked_at: DateTime<Utc>,
}

/// Collects papers returned by tool calls, keyed by `paperId`.
///
/// Re-tracking a known paper replaces its record and refreshes the source
/// tool and timestamp. Instances are shared behind an `Arc`; there is no
/// global tracker.
#[derive(Debug, Default)]
pub struct PaperTracker {
    papers: Mutex<HashMap<String, TrackedPaper>>,
}

impl PaperTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one paper.
    ///
    /// Records without a non-empty `paperId` are skipped.
    pub async fn track(&self, record: &Value, source_tool: &str) {
        let Some(paper_id) = record
            .get("paperId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
        else {
            debug!(source_tool, "skipping record without a paperId");
            return;
        };

        let mut papers = self.papers.lock().await;
        papers.insert(
            paper_id.to_string(),
            TrackedPaper {
                record: record.clone(),
                source_tool: source_tool.to_string(),
                tracked_at: Utc::now(),
            },
        );
        debug!(paper_id, source_tool, "tracked paper");
    }

    /// Records every paper in the slice.
    pub async fn track_many(&self, records: &[Value], source_tool: &str) {
        for record in records {
            self.track(record, source_tool).await;
        }
    }

    /// All tracked paper records, oldest first.
    pub async fn all_papers(&self) -> Vec<Value> {
        let papers = self.papers.lock().await;
        let mut tracked: Vec<&TrackedPaper> = papers.values().collect();
        tracked.sort_by_key(|paper| paper.tracked_at);
        tracked
            .into_iter()
            .map(|paper| paper.record.clone())
            .collect()
    }

    /// Records tracked by the named tool, oldest first.
    pub async fn papers_for_tool(&self, source_tool: &str) -> Vec<Value> {
        let papers = self.papers.lock().await;
        let mut tracked: Vec<&TrackedPaper> = papers
            .values()
            .filter(|paper| paper.source_tool == source_tool)
            .collect();
        tracked.sort_by_key(|paper| paper.tracked_at);
        tracked
            .into_iter()
            .map(|paper| paper.record.clone())
            .collect()
    }

    /// Records for the requested IDs, in request order.
    ///
    /// IDs that were never tracked are silently skipped.
    pub async fn papers_for_ids(&self, paper_ids: &[String]) -> Vec<Value> {
        let papers = self.papers.lock().await;
        paper_ids
            .iter()
            .filter_map(|id| papers.get(id))
            .map(|paper| paper.record.clone())
            .collect()
    }

    /// The tracked entry for a paper ID.
    pub async fn get(&self, paper_id: &str) -> Option<TrackedPaper> {
        self.papers.lock().await.get(paper_id).cloned()
    }

    /// Whether the paper ID has been tracked.
    pub async fn is_tracked(&self, paper_id: &str) -> bool {
        self.papers.lock().await.contains_key(paper_id)
    }

    /// Number of tracked papers.
    pub async fn len(&self) -> usize {
        self.papers.lock().await.len()
    }

    /// Whether nothing has been tracked yet.
    pub async fn is_empty(&self) -> bool {
        self.papers.lock().await.is_empty()
    }

    /// Drops every tracked paper.
    pub async fn clear(&self) {
        self.papers.lock().await.clear();
    }

    /// Count of tracked papers per source tool.
    pub async fn tool_summary(&self) -> HashMap<String, usize> {
        let papers = self.papers.lock().await;
        let mut summary: HashMap<String, usize> = HashMap::new();
        for paper in papers.values() {
            *summary.entry(paper.source_tool.clone()).or_insert(0) += 1;
        }
        summary
    }
}
