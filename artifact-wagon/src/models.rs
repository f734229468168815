//! Wire types for the Lookup, Artifact and token APIs.

use serde::{Deserialize, Serialize};

/// One API descriptor returned by the Lookup API.
///
/// `baseURL` is required; the other fields default when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupPlatformApisResponse {
    /// API name
    #[serde(default)]
    pub api: String,
    /// API version
    #[serde(default)]
    pub version: String,
    /// Service base URL
    #[serde(rename = "baseURL")]
    pub base_url: String,
    /// Free-form API parameters
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// Group/artifact registration returned by `register/{group}/{artifact}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterResponse {
    /// Group id
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// HRN prefix of the artifact
    pub hrn_prefix: String,
    /// HRN prefix of the group
    pub group_hrn_prefix: String,
    /// Whether the registration was created by the request
    pub created: bool,
}

/// Error body returned by the Artifact Service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceExceptionResponse {
    /// Status text
    pub status: String,
    /// Human readable message
    pub message: String,
    /// Service error code
    pub code: String,
}

/// Successful token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Error body returned by the token endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct TokenErrorResponse {
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub message: Option<String>,
}

impl TokenErrorResponse {
    pub(crate) fn describe(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
    }
}
