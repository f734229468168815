//! Flat `group/artifact/version/file` resource paths and their HRN rewrite.

use std::fmt;

use crate::error::WagonError;

/// Version segment used when a path carries no version.
pub const NO_VERSION: &str = "NONE";

/// Coordinates parsed from a `group/artifact/version/file` resource path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    /// Group id, kept as a single segment
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// Version, may be empty
    pub version: String,
    /// File name
    pub file: String,
}

impl Artifact {
    /// Parse a four-segment resource path.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            [group, artifact, version, file] => Some(Self {
                group_id: (*group).to_string(),
                artifact_id: (*artifact).to_string(),
                version: (*version).to_string(),
                file: (*file).to_string(),
            }),
            _ => None,
        }
    }

    /// Path below the Artifact Service base URL for this artifact's file.
    #[must_use]
    pub fn hrn_path(&self, group_hrn_prefix: &str) -> String {
        let version = if self.version.is_empty() { NO_VERSION } else { &self.version };
        format!("{group_hrn_prefix}:{}:{version}/{}", self.artifact_id, self.file)
    }

    /// Registration lookup path, `register/{group}/{artifact}`, unencoded.
    #[must_use]
    pub fn register_path(&self) -> String {
        format!("register/{}/{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.group_id, self.artifact_id, self.version, self.file)
    }
}

/// Outcome of rewriting a resource path for download.
#[derive(Debug)]
pub enum PathResolution {
    /// Rewritten path below the Artifact Service base URL
    Resolved(String),
    /// The group/artifact is not registered or not visible
    NotFound(String),
    /// The path is not `group/artifact/version/file`
    Invalid(String),
    /// The registration lookup could not be completed
    TransportError(WagonError),
}

impl PathResolution {
    /// The rewritten path, if resolved.
    #[must_use]
    pub fn resolved(&self) -> Option<&str> {
        match self {
            Self::Resolved(path) => Some(path),
            _ => None,
        }
    }
}
