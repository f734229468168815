//! Wagon error types using thiserror 2.0.
//!
//! `ResolveError` covers Artifact Service URL resolution; `WagonError` covers
//! everything a caller of the client can observe.

use reqwest::StatusCode;
use thiserror::Error;
use wagon_common::TransportError;

/// Failure to resolve the Artifact Service URL for a token endpoint.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No tier knows the endpoint
    #[error("No Artifact Service URL found for token endpoint: {0}")]
    NotFound(String),

    /// Token endpoint is not in the known endpoint table
    #[error("Unknown token endpoint: {0}")]
    UnknownEndpoint(String),

    /// Lookup API answered with a non-200 status
    #[error("Unable to resolve Artifact Service URL. Status: {0}")]
    Status(StatusCode),

    /// Lookup API answered 200 without a body
    #[error("Lookup API returned an empty body")]
    EmptyBody,

    /// Lookup API body is not a descriptor array
    #[error("Error during resolving Artifact Service URL: {0}")]
    Parse(#[from] serde_json::Error),

    /// Lookup API returned an empty descriptor array
    #[error("No Artifact Service URL found via Lookup API")]
    NoServices,

    /// First descriptor carries an empty `baseURL`
    #[error("Lookup API returned an empty Artifact Service base URL")]
    EmptyBaseUrl,

    /// Lookup request could not be executed
    #[error("Error during resolving Artifact Service URL: {0}")]
    Transport(#[from] TransportError),
}

impl ResolveError {
    /// Check if error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Status(status) => status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS,
            _ => false,
        }
    }
}

/// Errors surfaced by the artifact wagon.
#[derive(Error, Debug)]
pub enum WagonError {
    /// HTTP exchange failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Minting the bearer token failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid configuration or credentials
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Local I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact Service URL resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Unexpected response status
    #[error("Unexpected status {status} for {url}: {message}")]
    Status {
        /// Response status
        status: StatusCode,
        /// Request URL
        url: String,
        /// Service error message, if any
        message: String,
    },

    /// Requested resource does not exist or is not accessible
    #[error("Resource does not exist: {0}")]
    ResourceNotFound(String),
}

/// Result type for wagon operations.
pub type WagonResult<T> = Result<T, WagonError>;

impl WagonError {
    /// Check if error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Resolve(e) => e.is_retryable(),
            Self::Status { status, .. } => status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS,
            _ => false,
        }
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a resource not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::ResourceNotFound(path.into())
    }
}
