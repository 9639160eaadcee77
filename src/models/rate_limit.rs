use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /rate_limit`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitResponse {
    pub rate: RateLimitStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub limit: u64,
    pub remaining: u64,
    /// Epoch seconds at which the quota resets.
    pub reset: i64,
}

impl RateLimitStatus {
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.reset, 0)
    }

    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> u64 {
        (self.reset - now.timestamp()).max(0) as u64
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate_limit_resource() {
        let response: RateLimitResponse = serde_json::from_str(
            r#"{"resources": {}, "rate": {"limit": 60, "remaining": 0, "used": 60, "reset": 1700000000}}"#,
        )
        .unwrap();
        assert_eq!(
            response.rate,
            RateLimitStatus { limit: 60, remaining: 0, reset: 1_700_000_000 }
        );
        assert!(response.rate.is_exhausted());
    }

    #[test]
    fn test_seconds_until_reset() {
        let status = RateLimitStatus { limit: 5000, remaining: 10, reset: 1_700_000_120 };
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(status.seconds_until_reset(now), 120);
        let later = DateTime::from_timestamp(1_700_000_500, 0).unwrap();
        assert_eq!(status.seconds_until_reset(later), 0);
        assert_eq!(status.reset_at().unwrap().timestamp(), 1_700_000_120);
    }
}
