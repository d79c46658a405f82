//! Tests for configuration loading and defaults.

use alexandria_client::{AlexandriaConfig, ApiBase, ApiConfig};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_default_configuration() {
    let config = AlexandriaConfig::default();

    assert_eq!(config.log_level, "info");
    assert_eq!(
        config.api.base_url(ApiBase::Graph),
        "https://api.semanticscholar.org/graph/v1"
    );
    assert_eq!(
        config.api.base_url(ApiBase::Recommendations),
        "https://api.semanticscholar.org/recommendations/v1"
    );
    assert_eq!(config.api.timeout(), Duration::from_secs(30));
    assert!(*config.api.enable_auto_retry());
    assert!(!config.api.has_api_key());

    assert_eq!(*config.retry.max_retries(), 5);
    assert_eq!(*config.retry.base_delay(), 1.0);
    assert_eq!(*config.retry.max_delay(), 60.0);
    assert_eq!(*config.retry.jitter(), 0.1);

    assert_eq!(*config.circuit.failure_threshold(), 5);
    assert_eq!(config.circuit.recovery_timeout(), Duration::from_secs(60));

    assert!(*config.cache.enabled());
    assert_eq!(*config.cache.detail_ttl_secs(), 3600);
    assert_eq!(*config.cache.search_ttl_secs(), 300);
    assert_eq!(*config.cache.max_entries(), 1000);
}

#[test]
fn test_from_file_overrides_keep_other_defaults() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    write!(
        file,
        r#"
log_level = "debug"

[api]
timeout_secs = 5

[cache]
max_entries = 10
"#
    )
    .expect("write temp config");

    let config = AlexandriaConfig::from_file(file.path()).expect("load config");

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.api.timeout(), Duration::from_secs(5));
    assert_eq!(*config.cache.max_entries(), 10);

    // Everything not mentioned in the file keeps its default
    assert!(*config.api.enable_auto_retry());
    assert_eq!(*config.retry.max_retries(), 5);
    assert_eq!(*config.cache.detail_ttl_secs(), 3600);
}

#[test]
fn test_from_file_missing_path_errors() {
    let result = AlexandriaConfig::from_file("/nonexistent/alexandria.toml");
    assert!(result.is_err());
}

#[test]
fn test_from_file_invalid_toml_errors() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    write!(file, "log_level = [unterminated").expect("write temp config");

    assert!(AlexandriaConfig::from_file(file.path()).is_err());
}

#[test]
fn test_api_key_presence() {
    let config = ApiConfig::default();
    assert!(!config.has_api_key());

    let config = ApiConfig::default().with_api_key(Some("key".to_string()));
    assert!(config.has_api_key());

    let config = ApiConfig::default().with_api_key(Some(String::new()));
    assert!(!config.has_api_key(), "empty key counts as absent");
}
