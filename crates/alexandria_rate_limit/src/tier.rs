//! Rate-limit tiers for the Semantic Scholar API.

/// Which rate-limit lane a client occupies.
///
/// Semantic Scholar serves keyed clients a dedicated request-per-second
/// allowance, while anonymous clients share a pool (5,000 requests per 5
/// minutes) that tolerates short bursts. The tier fixes the token bucket's
/// refill rate and burst capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ApiTier {
    /// An API key is configured: 1 request per second, no burst headroom.
    Authenticated,
    /// No API key: conservative share of the anonymous pool with burst room.
    Anonymous,
}

impl ApiTier {
    /// Pick the tier from the presence of an API key.
    pub fn from_api_key(api_key: Option<&str>) -> Self {
        match api_key {
            Some(key) if !key.is_empty() => ApiTier::Authenticated,
            _ => ApiTier::Anonymous,
        }
    }

    /// Tokens added per second for this tier.
    pub fn rate(&self) -> f64 {
        match self {
            ApiTier::Authenticated => 1.0,
            ApiTier::Anonymous => 10.0,
        }
    }

    /// Burst capacity for this tier.
    pub fn burst(&self) -> f64 {
        match self {
            ApiTier::Authenticated => 1.0,
            ApiTier::Anonymous => 20.0,
        }
    }
}
