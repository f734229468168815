//! Transport-level error type.
//!
//! Every outbound exchange made through an [`HttpTransport`](crate::HttpTransport)
//! fails with this type, classified as retryable or not so callers can tell a
//! flaky network from a broken request.

use thiserror::Error;

/// Error raised while building or executing an HTTP exchange.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed inside the client
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request could not be built (bad header value, bad URL)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Remote side could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Operation timed out
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl TransportError {
    /// Check if this error is retryable.
    ///
    /// # Examples
    ///
    /// ```
    /// use wagon_common::TransportError;
    ///
    /// assert!(TransportError::unavailable("connection reset").is_retryable());
    /// assert!(!TransportError::invalid_request("bad header").is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::Unavailable(_) | Self::Timeout(_) => true,
            Self::Serialization(_) | Self::InvalidRequest(_) => false,
        }
    }

    /// Create an unavailable error with the given message.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid request error with the given message.
    #[must_use]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(TransportError::unavailable("down").is_retryable());
        assert!(TransportError::Timeout("read".to_string()).is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!TransportError::invalid_request("header").is_retryable());
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!TransportError::from(parse).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = TransportError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Service unavailable: connection refused");
    }
}
