//! Rate-limit aware retry strategy and the retrying transport.
//!
//! The strategy retries `408`, `429` and `500` responses a fixed number of
//! times, waiting for the interval announced by the server. `X-RateLimit-Reset`
//! takes precedence over `Retry-After`; when neither carries a usable value the
//! configured default interval applies.
//!
//! The strategy itself holds no per-request state. The retry loop in
//! [`RetryingTransport`] owns the attempt counter and hands each response to
//! [`RateLimitRetryStrategy::decide`], so one strategy can serve any number of
//! concurrent request loops.

use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, ToStrError};
use tracing::{debug, info, warn};

use crate::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Endpoint specific header announcing when the rate limit resets, in seconds.
pub const X_RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

/// Standard header announcing how long to wait, in seconds.
pub const RETRY_AFTER_HEADER: &str = "Retry-After";

/// Maximum retries for a single logical request.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Interval used when no usable header is present.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(5000);

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Wait used when the response carries no usable header
    pub default_interval: Duration,
    /// Statuses that trigger a retry
    pub retryable_statuses: Vec<StatusCode>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            default_interval: DEFAULT_RETRY_INTERVAL,
            retryable_statuses: vec![
                StatusCode::REQUEST_TIMEOUT,
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::INTERNAL_SERVER_ERROR,
            ],
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with custom max retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Create a new retry config with custom default interval.
    #[must_use]
    pub const fn with_default_interval(mut self, interval: Duration) -> Self {
        self.default_interval = interval;
        self
    }

    /// Create a new retry config with a custom retryable status set.
    #[must_use]
    pub fn with_retryable_statuses(mut self, statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        self.retryable_statuses = statuses.into_iter().collect();
        self
    }
}

/// Outcome of inspecting one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Send the request again after waiting the given interval
    Retry(Duration),
    /// Hand the response to the caller
    Stop,
}

/// Decides whether a response should be retried and for how long to wait.
#[derive(Debug, Clone, Default)]
pub struct RateLimitRetryStrategy {
    config: RetryConfig,
}

impl RateLimitRetryStrategy {
    /// Create a new strategy with the given configuration.
    #[must_use]
    pub const fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Create a strategy with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RetryConfig::default())
    }

    /// Get the maximum number of retries.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// Get the default retry interval.
    #[must_use]
    pub const fn default_interval(&self) -> Duration {
        self.config.default_interval
    }

    /// Check if a response with the given status should be retried.
    ///
    /// `retries` is the number of retries already performed for this request.
    #[must_use]
    pub fn should_retry(&self, status: StatusCode, retries: u32) -> bool {
        retries < self.config.max_retries && self.config.retryable_statuses.contains(&status)
    }

    /// Inspect one response of a request loop.
    #[must_use]
    pub fn decide(&self, response: &HttpResponse, retries: u32) -> RetryDecision {
        if self.should_retry(response.status(), retries) {
            RetryDecision::Retry(self.retry_interval(response))
        } else {
            RetryDecision::Stop
        }
    }

    /// Compute the wait before retrying the given response.
    ///
    /// Never fails: malformed or unreadable headers fall back to the default
    /// interval.
    #[must_use]
    pub fn retry_interval(&self, response: &HttpResponse) -> Duration {
        match interval_from_headers(response.headers()) {
            Ok(Some(interval)) => {
                info!(
                    status = response.status().as_u16(),
                    wait_secs = interval.as_secs(),
                    "Request failed, retrying after server provided interval"
                );
                interval
            }
            Ok(None) => self.config.default_interval,
            Err(e) => {
                warn!(error = %e, "Unexpected error reading retry headers, falling back to default interval");
                self.config.default_interval
            }
        }
    }
}

fn interval_from_headers(headers: &HeaderMap) -> Result<Option<Duration>, ToStrError> {
    let (name, value) = if let Some(value) = headers.get(X_RATE_LIMIT_RESET_HEADER) {
        (X_RATE_LIMIT_RESET_HEADER, value)
    } else if let Some(value) = headers.get(RETRY_AFTER_HEADER) {
        (RETRY_AFTER_HEADER, value)
    } else {
        return Ok(None);
    };

    let value = value.to_str()?;
    match parse_seconds(value) {
        Some(seconds) => Ok(Some(Duration::from_secs(seconds))),
        None => {
            warn!(header = name, value, "Header has a non-numeric value, numeric value expected");
            Ok(None)
        }
    }
}

/// Parse a clean run of ASCII digits as seconds.
fn parse_seconds(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Transport decorator that re-sends requests according to a
/// [`RateLimitRetryStrategy`].
///
/// Transport errors are returned immediately; only responses are retried.
/// When retries run out the last response is returned as-is.
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    strategy: RateLimitRetryStrategy,
}

impl<T> RetryingTransport<T> {
    /// Wrap `inner` with the given strategy.
    #[must_use]
    pub const fn new(inner: T, strategy: RateLimitRetryStrategy) -> Self {
        Self { inner, strategy }
    }

    /// The wrapped transport.
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    /// The retry strategy.
    #[must_use]
    pub const fn strategy(&self) -> &RateLimitRetryStrategy {
        &self.strategy
    }
}

impl<T: HttpTransport> HttpTransport for RetryingTransport<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut retries = 0;
        loop {
            let response = self.inner.execute(request)?;
            match self.strategy.decide(&response, retries) {
                RetryDecision::Retry(wait) => {
                    retries += 1;
                    debug!(
                        method = %request.method,
                        url = %request.url,
                        status = response.status().as_u16(),
                        retry = retries,
                        wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        "Retrying request"
                    );
                    thread::sleep(wait);
                }
                RetryDecision::Stop => return Ok(response),
            }
        }
    }
}
