//! Shared proptest generators.

use proptest::prelude::*;

/// Known HERE token endpoints.
pub const KNOWN_TOKEN_ENDPOINTS: [&str; 6] = [
    "https://account.api.here.com/oauth2/token",
    "https://stg.account.api.here.com/oauth2/token",
    "https://account.hereapi.cn/oauth2/token",
    "https://account.sit.hereapi.cn/oauth2/token",
    "https://elb.cn-northwest-1.account.hereapi.cn/oauth2/token",
    "https://elb.cn-northwest-1.account.sit.hereapi.cn/oauth2/token",
];

/// Generate one of the known token endpoints.
pub fn token_endpoint_strategy() -> impl Strategy<Value = String> {
    proptest::sample::select(KNOWN_TOKEN_ENDPOINTS.to_vec()).prop_map(ToString::to_string)
}

/// Generate token endpoints outside the known set.
pub fn unknown_token_endpoint_strategy() -> impl Strategy<Value = String> {
    "[a-z]{3,12}\\.example\\.(com|org)".prop_map(|host| format!("https://{host}/oauth2/token"))
}

/// Generate statuses the retry strategy acts on.
pub fn retryable_status_strategy() -> impl Strategy<Value = u16> {
    prop_oneof![Just(408u16), Just(429u16), Just(500u16)]
}

/// Generate valid statuses the retry strategy never acts on.
pub fn non_retryable_status_strategy() -> impl Strategy<Value = u16> {
    (100u16..600).prop_filter("retryable status", |s| !matches!(s, 408 | 429 | 500))
}

/// Generate header values that are a clean run of digits.
pub fn header_seconds_strategy() -> impl Strategy<Value = u64> {
    0u64..100_000
}

/// Generate visible header values that are not a clean run of digits.
pub fn non_numeric_header_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z]{1,10}",
        "-[0-9]{1,5}",
        "[0-9]{1,3}\\.[0-9]{1,3}",
        "[0-9]{1,3}[a-z]{1,3}",
        Just("Wed, 21 Oct 2015 07:28:00 GMT".to_string()),
    ]
}

/// Generate Maven style group ids.
pub fn group_id_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9]{1,8}", 1..4).prop_map(|segments| segments.join("."))
}

/// Generate artifact ids.
pub fn artifact_id_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{1,15}"
}

/// Generate versions, sometimes empty.
pub fn version_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        "[0-9]{1,2}\\.[0-9]{1,2}-SNAPSHOT",
    ]
}

/// Generate `group/artifact/version/file` resource paths.
pub fn resource_path_strategy() -> impl Strategy<Value = (String, String, String, String)> {
    (
        group_id_strategy(),
        artifact_id_strategy(),
        version_strategy(),
        "[a-z0-9.-]{1,20}\\.(jar|pom|xml|sha1)",
    )
}

/// Generate slash separated paths that do not have exactly four segments.
pub fn invalid_resource_path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::collection::vec("[a-z0-9.]{1,8}", 1..4),
        prop::collection::vec("[a-z0-9.]{1,8}", 5..9),
    ]
    .prop_map(|segments| segments.join("/"))
}

/// Generate properties keys, including characters that need escaping.
pub fn property_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9.:=/ #!_-]{1,30}"
}

/// Generate properties values, including non-ASCII text.
pub fn property_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9.:=/ #!\\\\é漢-]{0,40}"
}
