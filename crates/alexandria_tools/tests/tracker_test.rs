//! Tests for session paper tracking.

use alexandria_tools::PaperTracker;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_track_and_get() {
    let tracker = PaperTracker::new();
    let paper = json!({"paperId": "p1", "title": "First"});

    tracker.track(&paper, "search_papers").await;

    assert_eq!(tracker.len().await, 1);
    assert!(tracker.is_tracked("p1").await);
    assert!(!tracker.is_tracked("p2").await);

    let tracked = tracker.get("p1").await.expect("tracked entry");
    assert_eq!(tracked.record, paper);
    assert_eq!(tracked.source_tool, "search_papers");
}

#[tokio::test]
async fn test_records_without_paper_id_are_skipped() {
    let tracker = PaperTracker::new();

    tracker.track(&json!({"title": "no id"}), "search_papers").await;
    tracker.track(&json!({"paperId": ""}), "search_papers").await;
    tracker.track(&json!({"paperId": 42}), "search_papers").await;

    assert!(tracker.is_empty().await);
}

#[tokio::test]
async fn test_retracking_replaces_the_record() {
    let tracker = PaperTracker::new();

    tracker
        .track(&json!({"paperId": "p1", "title": "Sparse"}), "search_papers")
        .await;
    tracker
        .track(
            &json!({"paperId": "p1", "title": "Sparse", "abstract": "Full detail"}),
            "get_paper",
        )
        .await;

    assert_eq!(tracker.len().await, 1, "same ID stays a single entry");

    let tracked = tracker.get("p1").await.expect("tracked entry");
    assert_eq!(tracked.source_tool, "get_paper");
    assert_eq!(tracked.record["abstract"], "Full detail");
}

#[tokio::test]
async fn test_all_papers_returns_oldest_first() {
    let tracker = PaperTracker::new();

    for id in ["first", "second", "third"] {
        tracker.track(&json!({"paperId": id}), "search_papers").await;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let papers = tracker.all_papers().await;
    let ids: Vec<&str> = papers
        .iter()
        .filter_map(|paper| paper["paperId"].as_str())
        .collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_papers_for_tool_filters_by_source() {
    let tracker = PaperTracker::new();

    tracker.track(&json!({"paperId": "s1"}), "search_papers").await;
    tracker.track(&json!({"paperId": "r1"}), "get_recommendations").await;
    tracker.track(&json!({"paperId": "s2"}), "search_papers").await;

    let from_search = tracker.papers_for_tool("search_papers").await;
    assert_eq!(from_search.len(), 2);

    assert!(tracker.papers_for_tool("get_paper").await.is_empty());
}

#[tokio::test]
async fn test_papers_for_ids_keeps_request_order() {
    let tracker = PaperTracker::new();

    tracker.track(&json!({"paperId": "a"}), "search_papers").await;
    tracker.track(&json!({"paperId": "b"}), "search_papers").await;
    tracker.track(&json!({"paperId": "c"}), "search_papers").await;

    let ids = vec!["c".to_string(), "missing".to_string(), "a".to_string()];
    let papers = tracker.papers_for_ids(&ids).await;

    let returned: Vec<&str> = papers
        .iter()
        .filter_map(|paper| paper["paperId"].as_str())
        .collect();
    assert_eq!(returned, vec!["c", "a"], "request order, unknown IDs skipped");
}

#[tokio::test]
async fn test_clear_empties_the_tracker() {
    let tracker = PaperTracker::new();
    tracker.track(&json!({"paperId": "p1"}), "search_papers").await;

    tracker.clear().await;

    assert!(tracker.is_empty().await);
    assert!(tracker.get("p1").await.is_none());
}

#[tokio::test]
async fn test_tool_summary_counts_per_source() {
    let tracker = PaperTracker::new();

    tracker.track(&json!({"paperId": "s1"}), "search_papers").await;
    tracker.track(&json!({"paperId": "s2"}), "search_papers").await;
    tracker.track(&json!({"paperId": "r1"}), "get_recommendations").await;

    let summary = tracker.tool_summary().await;
    assert_eq!(summary.get("search_papers"), Some(&2));
    assert_eq!(summary.get("get_recommendations"), Some(&1));
    assert_eq!(summary.len(), 2);
}
