//! Tests for the token bucket rate limiter.

use alexandria_rate_limit::{ApiTier, TokenBucket};

#[tokio::test]
async fn test_burst_passes_without_waiting() {
    let bucket = TokenBucket::new(10.0, 5.0).expect("valid bucket");

    // A full bucket serves its entire burst capacity immediately
    for _ in 0..5 {
        let waited = bucket.acquire_one().await;
        assert_eq!(waited, 0.0, "burst acquisition should not wait");
    }

    assert!(bucket.available().await < 1.0, "burst should drain the bucket");
}

#[tokio::test]
async fn test_depleted_bucket_paces_requests() {
    // High refill rate keeps the forced wait tiny
    let bucket = TokenBucket::new(100.0, 1.0).expect("valid bucket");

    let first = bucket.acquire_one().await;
    assert_eq!(first, 0.0, "first request spends the initial token");

    let second = bucket.acquire_one().await;
    assert!(second > 0.0, "second request should wait for a refill");
    assert!(second < 1.0, "wait should be about one refill interval");
}

#[tokio::test]
async fn test_cost_above_capacity_is_allowed() {
    let bucket = TokenBucket::new(100.0, 1.0).expect("valid bucket");

    // Costs above capacity wait proportionally instead of deadlocking
    let waited = bucket.acquire(3.0).await;
    assert!(waited > 0.0);

    // The level clamps at zero rather than going negative
    assert!(bucket.available().await >= 0.0);
}

#[tokio::test]
async fn test_tokens_refill_over_time() {
    let bucket = TokenBucket::new(200.0, 2.0).expect("valid bucket");

    bucket.acquire(2.0).await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    // ~20ms at 200 tokens/sec refills the full capacity of 2
    let waited = bucket.acquire_one().await;
    assert_eq!(waited, 0.0, "refilled bucket should not wait");
}

#[test]
fn test_rejects_non_positive_rate() {
    assert!(TokenBucket::new(0.0, 5.0).is_err());
    assert!(TokenBucket::new(-1.0, 5.0).is_err());
    assert!(TokenBucket::new(f64::NAN, 5.0).is_err());
}

#[test]
fn test_rejects_non_positive_capacity() {
    assert!(TokenBucket::new(1.0, 0.0).is_err());
    assert!(TokenBucket::new(1.0, -2.0).is_err());
    assert!(TokenBucket::new(1.0, f64::NAN).is_err());
}

#[test]
fn test_tier_from_api_key() {
    assert_eq!(ApiTier::from_api_key(Some("secret")), ApiTier::Authenticated);
    assert_eq!(ApiTier::from_api_key(Some("")), ApiTier::Anonymous);
    assert_eq!(ApiTier::from_api_key(None), ApiTier::Anonymous);
}

#[test]
fn test_bucket_matches_tier_limits() {
    let authenticated = TokenBucket::for_tier(ApiTier::Authenticated);
    assert_eq!(authenticated.rate(), 1.0);
    assert_eq!(authenticated.capacity(), 1.0);

    let anonymous = TokenBucket::for_tier(ApiTier::Anonymous);
    assert_eq!(anonymous.rate(), 10.0);
    assert_eq!(anonymous.capacity(), 20.0);
}
