//! Shared plumbing for the artifact wagon.
//!
//! This crate provides centralized implementations for:
//! - Transport error type with retryability classification
//! - Blocking HTTP client configuration, proxy pass-through and the
//!   `HttpTransport` seam used by every outbound call
//! - Rate-limit aware retry strategy and the retrying transport decorator
//! - Java-properties codec used by the credentials file and the URL cache
//! - Tracing subscriber initialisation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod properties;
pub mod retry;
pub mod tracing_config;

pub use error::TransportError;
pub use http::{HttpConfig, HttpRequest, HttpResponse, HttpTransport, ProxyConfig, build_http_client};
pub use properties::Properties;
pub use retry::{RateLimitRetryStrategy, RetryConfig, RetryDecision, RetryingTransport};
pub use tracing_config::{TracingConfig, init_tracing};
