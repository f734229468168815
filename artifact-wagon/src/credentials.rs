//! HERE credentials loading.
//!
//! Credentials are a properties document. The inline `HERE_CREDENTIALS_STRING`
//! wins when set; otherwise the first of the explicit path,
//! `HERE_CREDENTIALS_FILE` and `~/.here/credentials.properties` is read. A
//! missing or unreadable file yields empty credentials so that the failure
//! surfaces later, when a token is actually needed.

use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use wagon_common::Properties;

/// Environment variable holding the credentials file path.
pub const HERE_CREDENTIALS_FILE_ENV: &str = "HERE_CREDENTIALS_FILE";
/// Environment variable holding inline credentials text.
pub const HERE_CREDENTIALS_STRING_ENV: &str = "HERE_CREDENTIALS_STRING";
/// Default credentials location relative to the home directory.
pub const HERE_CREDENTIALS_PATH: &str = ".here/credentials.properties";

/// Token endpoint URL key.
pub const HERE_ENDPOINT_URL_KEY: &str = "here.token.endpoint.url";
/// Access key id key.
pub const HERE_ACCESS_ID_KEY: &str = "here.access.key.id";
/// Access key secret key.
pub const HERE_ACCESS_SECRET_KEY: &str = "here.access.key.secret";
/// User id key.
pub const HERE_USER_ID_KEY: &str = "here.user.id";
/// Client id key.
pub const HERE_CLIENT_ID_KEY: &str = "here.client.id";

/// Where credentials are read from.
#[derive(Debug, Clone, Default)]
pub struct CredentialsSource {
    /// Inline properties text, takes precedence over any file
    pub inline: Option<String>,
    /// Explicit file path
    pub path: Option<PathBuf>,
    /// Path taken from the environment
    pub env_path: Option<PathBuf>,
    /// Home directory used for the default path
    pub home_dir: Option<PathBuf>,
}

impl CredentialsSource {
    /// Source populated from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            inline: non_empty_env(HERE_CREDENTIALS_STRING_ENV),
            path: None,
            env_path: non_empty_env(HERE_CREDENTIALS_FILE_ENV).map(PathBuf::from),
            home_dir: dirs::home_dir(),
        }
    }

    /// The file that would be read when no inline credentials are set.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            debug!(path = %path.display(), "Using configured credentials file");
            return Some(path.clone());
        }
        if let Some(path) = &self.env_path {
            debug!(env = HERE_CREDENTIALS_FILE_ENV, path = %path.display(), "Using credentials file from environment");
            return Some(path.clone());
        }
        self.home_dir.as_ref().map(|home| home.join(HERE_CREDENTIALS_PATH))
    }

    /// Load credentials. Never fails.
    #[must_use]
    pub fn load(&self) -> Credentials {
        if let Some(inline) = &self.inline {
            debug!(env = HERE_CREDENTIALS_STRING_ENV, "Using inline credentials");
            return Credentials::from_properties(Properties::parse(inline));
        }

        match self.file_path() {
            Some(path) => Credentials::load_file(&path),
            None => {
                warn!("No home directory available, continuing without credentials");
                Credentials::default()
            }
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// HERE account credentials.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Token endpoint URL
    pub token_endpoint_url: Option<String>,
    /// Access key id
    pub access_key_id: Option<String>,
    /// Access key secret
    pub access_key_secret: Option<SecretString>,
    /// User id
    pub user_id: Option<String>,
    /// Client id
    pub client_id: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token_endpoint_url", &self.token_endpoint_url)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &self.access_key_secret.as_ref().map(|_| "[REDACTED]"))
            .field("user_id", &self.user_id)
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl Credentials {
    /// Build credentials from parsed properties.
    #[must_use]
    pub fn from_properties(properties: Properties) -> Self {
        let value = |key: &str| {
            properties
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };

        Self {
            token_endpoint_url: value(HERE_ENDPOINT_URL_KEY),
            access_key_id: value(HERE_ACCESS_ID_KEY),
            access_key_secret: value(HERE_ACCESS_SECRET_KEY).map(SecretString::from),
            user_id: value(HERE_USER_ID_KEY),
            client_id: value(HERE_CLIENT_ID_KEY),
        }
    }

    /// Read a credentials file, returning empty credentials if it cannot be read.
    #[must_use]
    pub fn load_file(path: &Path) -> Self {
        debug!(path = %path.display(), "Attempting to read credentials file");
        match Properties::load(path) {
            Ok(properties) => Self::from_properties(properties),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unable to read credentials file");
                Self::default()
            }
        }
    }

    /// Replace the access key id and secret with non-empty overrides.
    #[must_use]
    pub fn with_overrides(mut self, username: Option<&str>, password: Option<&SecretString>) -> Self {
        if let Some(username) = username.filter(|u| !u.is_empty()) {
            self.access_key_id = Some(username.to_string());
        }
        if let Some(password) = password.filter(|p| !p.expose_secret().is_empty()) {
            self.access_key_secret = Some(password.clone());
        }
        self
    }
}
