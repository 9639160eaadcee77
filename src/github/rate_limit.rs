use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Quota headers GitHub attaches to every API response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaHeaders {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    pub reset: Option<i64>,
    pub retry_after: Option<u64>,
}

impl QuotaHeaders {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: parse_header(headers, "x-ratelimit-limit"),
            remaining: parse_header(headers, "x-ratelimit-remaining"),
            reset: parse_header(headers, "x-ratelimit-reset"),
            retry_after: parse_header(headers, RETRY_AFTER.as_str()),
        }
    }

    /// Seconds to wait before retrying, if `status` is a rate-limit rejection.
    ///
    /// Primary limit: a 403/429 with `x-ratelimit-remaining: 0`, waiting until
    /// `x-ratelimit-reset`. Secondary limit: a 403/429 with `Retry-After`.
    pub fn retry_after_secs(&self, status: u16, now: DateTime<Utc>) -> Option<u64> {
        if status != 403 && status != 429 {
            return None;
        }

        if self.remaining == Some(0) {
            let wait = match self.reset {
                Some(reset) => (reset - now.timestamp()).max(0) as u64,
                None => self.retry_after.unwrap_or(0),
            };
            return Some(wait);
        }

        self.retry_after
    }
}

fn parse_header<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_exhausted_quota_waits_until_reset() {
        let now = Utc::now();
        let reset = (now.timestamp() + 120).to_string();
        let quota = QuotaHeaders::from_headers(&headers(&[
            ("x-ratelimit-limit", "60"),
            ("x-ratelimit-remaining", "0"),
            ("x-ratelimit-reset", &reset),
        ]));
        assert_eq!(quota.limit, Some(60));
        assert_eq!(quota.retry_after_secs(403, now), Some(120));
    }

    #[test]
    fn test_reset_in_the_past_is_zero_wait() {
        let now = Utc::now();
        let reset = (now.timestamp() - 5).to_string();
        let quota = QuotaHeaders::from_headers(&headers(&[
            ("x-ratelimit-remaining", "0"),
            ("x-ratelimit-reset", &reset),
        ]));
        assert_eq!(quota.retry_after_secs(403, now), Some(0));
    }

    #[test]
    fn test_forbidden_with_quota_left_is_not_rate_limited() {
        let quota = QuotaHeaders::from_headers(&headers(&[("x-ratelimit-remaining", "42")]));
        assert_eq!(quota.retry_after_secs(403, Utc::now()), None);
        assert_eq!(QuotaHeaders::default().retry_after_secs(403, Utc::now()), None);
    }

    #[test]
    fn test_secondary_limit_uses_retry_after() {
        let quota = QuotaHeaders::from_headers(&headers(&[
            ("x-ratelimit-remaining", "17"),
            ("retry-after", "30"),
        ]));
        assert_eq!(quota.retry_after_secs(429, Utc::now()), Some(30));
        assert_eq!(quota.retry_after_secs(403, Utc::now()), Some(30));
    }

    #[test]
    fn test_other_statuses_are_ignored() {
        let quota = QuotaHeaders::from_headers(&headers(&[
            ("x-ratelimit-remaining", "0"),
            ("x-ratelimit-reset", "0"),
        ]));
        assert_eq!(quota.retry_after_secs(500, Utc::now()), None);
        assert_eq!(quota.retry_after_secs(200, Utc::now()), None);
    }
}
