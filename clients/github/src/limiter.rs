//! Rate-limit bookkeeping: one budget tracker per quota window plus the
//! leaky-bucket-of-one throttle for search requests.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use dev_profile::api::{ApiBudget, Error};
use dev_profile::types::RateLimitInfo;
use log::{debug, info};
use reqwest::header::HeaderMap;
use tokio::time::Instant;

/// Tracks one rate-limit window from response metadata. The client holds
/// two of these, one per [`ApiBudget`]; they are never persisted across
/// runs and stay empty until the first response of their kind.
#[derive(Debug)]
pub(crate) struct BudgetTracker {
    budget: ApiBudget,
    info: Option<RateLimitInfo>,
}

impl BudgetTracker {
    pub(crate) fn new(budget: ApiBudget) -> Self {
        BudgetTracker { budget, info: None }
    }

    pub(crate) fn info(&self) -> Option<RateLimitInfo> {
        self.info
    }

    /// Refreshes the window snapshot when all four headers are present.
    /// Called on every response, success or failure.
    pub(crate) fn update(&mut self, headers: &HeaderMap) {
        let limit = read_header(headers, "x-ratelimit-limit");
        let remaining = read_header(headers, "x-ratelimit-remaining");
        let reset = read_header(headers, "x-ratelimit-reset");
        let used = read_header(headers, "x-ratelimit-used");
        if let (Some(limit), Some(remaining), Some(reset), Some(used)) =
            (limit, remaining, reset, used)
        {
            debug!(
                "{} budget: {}/{} used, {} remaining",
                self.budget, used, limit, remaining
            );
            self.info = Some(RateLimitInfo {
                limit,
                remaining,
                reset,
                used,
            });
        }
    }

    /// Builds the exhaustion error for a 403 on this budget. Without a
    /// reset header the reset is assumed to be a minute away.
    pub(crate) fn exhausted(&self, headers: &HeaderMap) -> Error {
        let reset = read_header::<i64>(headers, "x-ratelimit-reset")
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_else(|| Utc::now() + chrono::Duration::seconds(60));
        Error::RateLimited {
            budget: self.budget,
            reset,
        }
    }
}

fn read_header<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}

/// Enforces a minimum spacing between consecutive search requests. Only
/// the most recent request's timestamp is remembered, so bursts are capped
/// at one request per interval boundary.
#[derive(Debug)]
pub(crate) struct SearchThrottle {
    min_interval: Duration,
    last_search: Option<Instant>,
}

impl SearchThrottle {
    pub(crate) fn new(authenticated: bool) -> Self {
        let max_per_minute = if authenticated { 30 } else { 10 };
        SearchThrottle {
            min_interval: Duration::from_millis(60_000 / max_per_minute),
            last_search: None,
        }
    }

    pub(crate) async fn wait(&mut self) {
        if let Some(last) = self.last_search {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let delay = self.min_interval - elapsed;
                info!("Search throttle wait: {} ms", delay.as_millis());
                tokio::time::sleep(delay).await;
            }
        }
        self.last_search = Some(Instant::now());
    }
}

/// Extracts the last page number from a `Link` pagination header, e.g.
/// `<https://api.github.com/repos/a/b/commits?page=2>; rel="next",
///  <https://api.github.com/repos/a/b/commits?page=237>; rel="last"`.
pub(crate) fn last_page(link: &str) -> Option<u64> {
    let part = link.split(',').find(|part| part.contains(r#"rel="last""#))?;
    let start = part.find('<')? + 1;
    let end = part.find('>')?;
    let url = url::Url::parse(&part[start..end]).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == "page")
        .and_then(|(_, value)| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn rate_limit_headers(limit: &str, remaining: &str, reset: &str, used: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_str(limit).unwrap());
        headers.insert(
            "x-ratelimit-remaining",
            HeaderValue::from_str(remaining).unwrap(),
        );
        headers.insert("x-ratelimit-reset", HeaderValue::from_str(reset).unwrap());
        headers.insert("x-ratelimit-used", HeaderValue::from_str(used).unwrap());
        headers
    }

    #[test]
    fn update_requires_all_four_headers() {
        let mut tracker = BudgetTracker::new(ApiBudget::Core);
        assert_eq!(tracker.info(), None);

        let mut partial = HeaderMap::new();
        partial.insert("x-ratelimit-limit", HeaderValue::from_static("5000"));
        tracker.update(&partial);
        assert_eq!(tracker.info(), None);

        tracker.update(&rate_limit_headers("5000", "4999", "1700000000", "1"));
        assert_eq!(
            tracker.info(),
            Some(RateLimitInfo {
                limit: 5000,
                remaining: 4999,
                reset: 1700000000,
                used: 1,
            })
        );
    }

    #[test]
    fn exhausted_reads_reset_from_headers() {
        let tracker = BudgetTracker::new(ApiBudget::Search);
        let headers = rate_limit_headers("30", "0", "1700000000", "30");

        match tracker.exhausted(&headers) {
            Error::RateLimited { budget, reset } => {
                assert_eq!(budget, ApiBudget::Search);
                assert_eq!(reset.timestamp(), 1700000000);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn exhausted_defaults_to_a_minute_from_now() {
        let tracker = BudgetTracker::new(ApiBudget::Core);
        let before = Utc::now();

        match tracker.exhausted(&HeaderMap::new()) {
            Error::RateLimited { budget, reset } => {
                assert_eq!(budget, ApiBudget::Core);
                assert!(reset >= before + chrono::Duration::seconds(60));
                assert!(reset <= Utc::now() + chrono::Duration::seconds(61));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_enforces_minimum_spacing() {
        let mut throttle = SearchThrottle::new(false);

        let start = Instant::now();
        throttle.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO, "first search never waits");

        throttle.wait().await;
        assert_eq!(
            start.elapsed(),
            Duration::from_secs(6),
            "unauthenticated spacing is 60s / 10"
        );

        tokio::time::advance(Duration::from_secs(10)).await;
        let idle = Instant::now();
        throttle.wait().await;
        assert_eq!(idle.elapsed(), Duration::ZERO, "no wait after the interval passed");
    }

    #[tokio::test(start_paused = true)]
    async fn authenticated_throttle_is_two_seconds() {
        let mut throttle = SearchThrottle::new(true);
        throttle.wait().await;
        let start = Instant::now();
        throttle.wait().await;
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn last_page_from_link_header() {
        let link = r#"<https://api.github.com/repos/a/b/commits?author=u&per_page=1&page=2>; rel="next", <https://api.github.com/repos/a/b/commits?author=u&per_page=1&page=237>; rel="last""#;
        assert_eq!(last_page(link), Some(237));

        let only_prev = r#"<https://api.github.com/repos/a/b/commits?page=1>; rel="prev""#;
        assert_eq!(last_page(only_prev), None);
        assert_eq!(last_page(""), None);
    }
}
