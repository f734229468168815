//! Repository layouts.
//!
//! [`HereLayout`] wraps any [`RepositoryLayout`], computes artifact and
//! metadata locations itself (group id kept as one path segment) and forwards
//! everything else to the wrapped layout.

use crate::artifact::NO_VERSION;
use crate::error::{WagonError, WagonResult};

/// Coordinates of an artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactCoordinates {
    /// Group id
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// Resolved version, used in the file name
    pub version: String,
    /// Base version, used as the directory (differs for timestamped snapshots)
    pub base_version: String,
    /// Optional classifier
    pub classifier: Option<String>,
    /// File extension, may be empty
    pub extension: String,
}

impl ArtifactCoordinates {
    /// Coordinates for a release artifact.
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        let version = version.into();
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            base_version: version.clone(),
            version,
            classifier: None,
            extension: extension.into(),
        }
    }

    /// Set the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into()).filter(|c| !c.is_empty());
        self
    }

    /// Set the base version.
    #[must_use]
    pub fn with_base_version(mut self, base_version: impl Into<String>) -> Self {
        self.base_version = base_version.into();
        self
    }

    fn file_name(&self) -> String {
        let mut name = format!("{}-{}", self.artifact_id, self.version);
        if let Some(classifier) = &self.classifier {
            name.push('-');
            name.push_str(classifier);
        }
        if !self.extension.is_empty() {
            name.push('.');
            name.push_str(&self.extension);
        }
        name
    }
}

/// Coordinates of a repository metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetadataCoordinates {
    /// Group id
    pub group_id: String,
    /// Artifact id, empty for group-level metadata
    pub artifact_id: String,
    /// Version, empty for artifact-level metadata
    pub version: String,
    /// Metadata type, used as the file name
    pub kind: String,
}

/// Maps coordinates to repository paths.
pub trait RepositoryLayout: Send + Sync {
    /// Layout id.
    fn id(&self) -> &str;

    /// Path of an artifact file.
    fn artifact_location(&self, artifact: &ArtifactCoordinates) -> String;

    /// Path of a metadata file.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot place the metadata.
    fn metadata_location(&self, metadata: &MetadataCoordinates) -> WagonResult<String>;

    /// Checksum file paths accompanying `location`.
    fn checksum_locations(&self, location: &str) -> Vec<String>;
}

/// Standard Maven 2 layout: group id dots become directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct Maven2Layout;

impl RepositoryLayout for Maven2Layout {
    fn id(&self) -> &str {
        "default"
    }

    fn artifact_location(&self, artifact: &ArtifactCoordinates) -> String {
        format!(
            "{}/{}/{}/{}",
            artifact.group_id.replace('.', "/"),
            artifact.artifact_id,
            artifact.base_version,
            artifact.file_name()
        )
    }

    fn metadata_location(&self, metadata: &MetadataCoordinates) -> WagonResult<String> {
        let mut path = metadata.group_id.replace('.', "/");
        for segment in [&metadata.artifact_id, &metadata.version] {
            if !segment.is_empty() {
                path.push('/');
                path.push_str(segment);
            }
        }
        path.push('/');
        path.push_str(&metadata.kind);
        Ok(path)
    }

    fn checksum_locations(&self, location: &str) -> Vec<String> {
        vec![format!("{location}.sha1"), format!("{location}.md5")]
    }
}

/// HERE layout over an inner layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct HereLayout<L> {
    inner: L,
}

impl<L: RepositoryLayout> HereLayout<L> {
    /// Wrap `inner`.
    #[must_use]
    pub const fn new(inner: L) -> Self {
        Self { inner }
    }

    /// The wrapped layout.
    #[must_use]
    pub const fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: RepositoryLayout> RepositoryLayout for HereLayout<L> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn artifact_location(&self, artifact: &ArtifactCoordinates) -> String {
        format!(
            "{}/{}/{}/{}",
            artifact.group_id,
            artifact.artifact_id,
            artifact.base_version,
            artifact.file_name()
        )
    }

    fn metadata_location(&self, metadata: &MetadataCoordinates) -> WagonResult<String> {
        if metadata.group_id.is_empty() {
            return Err(WagonError::invalid_config("Metadata group id is required"));
        }
        if metadata.artifact_id.is_empty() {
            return Err(WagonError::invalid_config("Metadata artifact id is required"));
        }
        let version = if metadata.version.is_empty() { NO_VERSION } else { &metadata.version };
        Ok(format!(
            "{}/{}/{version}/{}",
            metadata.group_id, metadata.artifact_id, metadata.kind
        ))
    }

    fn checksum_locations(&self, location: &str) -> Vec<String> {
        self.inner.checksum_locations(location)
    }
}
