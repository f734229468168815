//! Wagon configuration.

use std::path::PathBuf;

use secrecy::SecretString;
use wagon_common::{HttpConfig, RetryConfig};

use crate::credentials::CredentialsSource;

/// Artifact wagon configuration.
#[derive(Debug, Clone)]
pub struct WagonConfig {
    /// Where credentials are read from
    pub credentials: CredentialsSource,
    /// Per-repository access key id override
    pub username: Option<String>,
    /// Per-repository access key secret override
    pub password: Option<SecretString>,
    /// URL cache file location, `None` for the shared temp file
    pub url_cache_path: Option<PathBuf>,
    /// HTTP client settings
    pub http: HttpConfig,
    /// Retry policy
    pub retry: RetryConfig,
}

impl Default for WagonConfig {
    fn default() -> Self {
        Self {
            credentials: CredentialsSource::from_env(),
            username: None,
            password: None,
            url_cache_path: None,
            http: HttpConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl WagonConfig {
    /// Read credentials from the given file instead of the environment/home default.
    #[must_use]
    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials.path = Some(path.into());
        self.credentials.inline = None;
        self
    }

    /// Use inline credentials text.
    #[must_use]
    pub fn with_credentials_string(mut self, text: impl Into<String>) -> Self {
        self.credentials.inline = Some(text.into());
        self
    }

    /// Override the access key id and secret for this repository.
    #[must_use]
    pub fn with_authentication(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Use a dedicated URL cache file.
    #[must_use]
    pub fn with_url_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.url_cache_path = Some(path.into());
        self
    }

    /// Set HTTP client settings.
    #[must_use]
    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}
