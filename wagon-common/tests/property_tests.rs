//! Property-based tests for wagon-common.
//!
//! Tests validate:
//! - Retry eligibility depends only on status and retries already performed
//! - `X-RateLimit-Reset` always wins over `Retry-After`
//! - Malformed header values never escape as errors
//! - Properties text round-trips arbitrary keys and values

use std::time::Duration;

use proptest::prelude::*;
use reqwest::StatusCode;
use reqwest::header::{HeaderName, HeaderValue};
use test_utils::{
    header_seconds_strategy, non_numeric_header_strategy, non_retryable_status_strategy, property_key_strategy,
    property_value_strategy, retryable_status_strategy,
};
use wagon_common::{HttpResponse, Properties, RateLimitRetryStrategy, RetryDecision};

fn with_header(response: HttpResponse, name: &'static str, value: &str) -> HttpResponse {
    response.with_header(HeaderName::from_static(name), HeaderValue::from_str(value).unwrap())
}

fn rate_limited() -> HttpResponse {
    HttpResponse::new(StatusCode::TOO_MANY_REQUESTS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_retry_only_below_limit(status in retryable_status_strategy(), retries in 0u32..20) {
        let strategy = RateLimitRetryStrategy::with_defaults();
        let status = StatusCode::from_u16(status).unwrap();
        prop_assert_eq!(strategy.should_retry(status, retries), retries < 5);
    }

    #[test]
    fn prop_other_statuses_never_retry(status in non_retryable_status_strategy(), retries in 0u32..5) {
        let strategy = RateLimitRetryStrategy::with_defaults();
        let response = HttpResponse::new(StatusCode::from_u16(status).unwrap());
        prop_assert_eq!(strategy.decide(&response, retries), RetryDecision::Stop);
    }

    #[test]
    fn prop_rate_limit_reset_wins(reset in header_seconds_strategy(), after in header_seconds_strategy()) {
        let strategy = RateLimitRetryStrategy::with_defaults();
        let response = with_header(rate_limited(), "retry-after", &after.to_string());
        let response = with_header(response, "x-ratelimit-reset", &reset.to_string());
        prop_assert_eq!(strategy.retry_interval(&response), Duration::from_secs(reset));
    }

    #[test]
    fn prop_retry_after_used_alone(after in header_seconds_strategy()) {
        let strategy = RateLimitRetryStrategy::with_defaults();
        let response = with_header(rate_limited(), "retry-after", &after.to_string());
        prop_assert_eq!(strategy.retry_interval(&response), Duration::from_secs(after));
    }

    #[test]
    fn prop_non_numeric_uses_default(value in non_numeric_header_strategy(), after in header_seconds_strategy()) {
        let strategy = RateLimitRetryStrategy::with_defaults();
        let reset_only = with_header(rate_limited(), "x-ratelimit-reset", &value);
        prop_assert_eq!(strategy.retry_interval(&reset_only), Duration::from_millis(5000));

        let both = with_header(reset_only, "retry-after", &after.to_string());
        prop_assert_eq!(strategy.retry_interval(&both), Duration::from_millis(5000));
    }

    #[test]
    fn prop_properties_round_trip(
        entries in prop::collection::btree_map(property_key_strategy(), property_value_strategy(), 0..10)
    ) {
        let properties: Properties = entries.clone().into_iter().collect();
        let parsed = Properties::parse(&properties.to_text("round trip"));
        prop_assert_eq!(parsed.len(), entries.len());
        for (key, value) in &entries {
            prop_assert_eq!(parsed.get(key), Some(value.as_str()));
        }
    }
}
