//! Tests for the circuit breaker state machine.

use alexandria_breaker::{CircuitBreaker, CircuitConfig, CircuitState, Outcome};
use alexandria_error::{ApiError, ApiErrorKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn config(failure_threshold: u32, recovery_secs: f64) -> CircuitConfig {
    CircuitConfig::default()
        .with_failure_threshold(failure_threshold)
        .with_recovery_timeout_secs(recovery_secs)
}

async fn fail_once(breaker: &CircuitBreaker) {
    let result: Result<(), ApiError> = breaker
        .call(|| async { Outcome::Failed(ApiError::server_error(503)) })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_starts_closed() {
    let breaker = CircuitBreaker::new(config(5, 60.0));
    assert_eq!(breaker.state().await, CircuitState::Closed);
    assert_eq!(breaker.failure_count().await, 0);
}

#[tokio::test]
async fn test_opens_after_failure_threshold() {
    let breaker = CircuitBreaker::new(config(2, 60.0));

    fail_once(&breaker).await;
    assert_eq!(breaker.state().await, CircuitState::Closed);

    fail_once(&breaker).await;
    assert_eq!(breaker.state().await, CircuitState::Open);
}

#[tokio::test]
async fn test_open_circuit_rejects_without_calling() {
    let breaker = CircuitBreaker::new(config(1, 60.0));
    fail_once(&breaker).await;

    let invoked = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&invoked);

    let result: Result<(), ApiError> = breaker
        .call(|| async move {
            flag.store(true, Ordering::SeqCst);
            Outcome::Success(())
        })
        .await;

    let err = result.expect_err("open circuit should reject");
    assert_eq!(err.kind, ApiErrorKind::CircuitOpen);
    assert!(!invoked.load(Ordering::SeqCst), "operation must not run while open");
}

#[tokio::test]
async fn test_success_resets_failure_count() {
    let breaker = CircuitBreaker::new(config(2, 60.0));

    fail_once(&breaker).await;
    assert_eq!(breaker.failure_count().await, 1);

    let result: Result<i32, ApiError> = breaker.call(|| async { Outcome::Success(7) }).await;
    assert_eq!(result.expect("success passes through"), 7);
    assert_eq!(breaker.failure_count().await, 0);

    // The earlier failure no longer counts toward the threshold
    fail_once(&breaker).await;
    assert_eq!(breaker.state().await, CircuitState::Closed);
}

#[tokio::test]
async fn test_rejected_outcome_does_not_trip() {
    // Threshold of one: a single tripping failure would open the circuit
    let breaker = CircuitBreaker::new(config(1, 60.0));

    let result: Result<(), ApiError> = breaker
        .call(|| async { Outcome::Rejected(ApiError::not_found()) })
        .await;

    // The caller still sees the error
    let err = result.expect_err("rejection propagates");
    assert!(err.kind.is_not_found());

    // But circuit health is untouched
    assert_eq!(breaker.state().await, CircuitState::Closed);
    assert_eq!(breaker.failure_count().await, 0);
}

#[tokio::test]
async fn test_trial_call_closes_after_recovery() {
    let breaker = CircuitBreaker::new(config(1, 0.05));
    fail_once(&breaker).await;
    assert_eq!(breaker.state().await, CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(80)).await;

    let result: Result<i32, ApiError> = breaker.call(|| async { Outcome::Success(1) }).await;
    assert_eq!(result.expect("trial call passes"), 1);
    assert_eq!(breaker.state().await, CircuitState::Closed);
}

#[tokio::test]
async fn test_failed_trial_reopens() {
    let breaker = CircuitBreaker::new(config(1, 0.05));
    fail_once(&breaker).await;

    tokio::time::sleep(Duration::from_millis(80)).await;

    // The trial call is allowed through and fails
    fail_once(&breaker).await;
    assert_eq!(breaker.state().await, CircuitState::Open);

    // Back to rejecting until the next window elapses
    let result: Result<(), ApiError> = breaker
        .call(|| async { Outcome::Success(()) })
        .await;
    assert_eq!(
        result.expect_err("reopened circuit rejects").kind,
        ApiErrorKind::CircuitOpen
    );
}

#[test]
fn test_outcome_classification() {
    assert!(matches!(
        Outcome::from_result(Ok(1)),
        Outcome::Success(1)
    ));

    // Server and connection failures count toward opening the circuit
    assert!(matches!(
        Outcome::<()>::from_result(Err(ApiError::server_error(500))),
        Outcome::Failed(_)
    ));
    assert!(matches!(
        Outcome::<()>::from_result(Err(ApiError::connection_failure("refused"))),
        Outcome::Failed(_)
    ));

    // Refusals say nothing about upstream health
    assert!(matches!(
        Outcome::<()>::from_result(Err(ApiError::not_found())),
        Outcome::Rejected(_)
    ));
    assert!(matches!(
        Outcome::<()>::from_result(Err(ApiError::rate_limited(Some(2.0)))),
        Outcome::Rejected(_)
    ));
    assert!(matches!(
        Outcome::<()>::from_result(Err(ApiError::auth_failure())),
        Outcome::Rejected(_)
    ));
}
