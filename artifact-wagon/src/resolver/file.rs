use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};
use wagon_common::Properties;

use super::ServiceUrlResolver;
use crate::error::ResolveError;

/// Name of the shared cache file inside the temp directory.
pub const DEFAULT_CACHE_FILE_NAME: &str = "artifact_wagon_url_cache.properties";

/// Age after which the whole cache file is discarded.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

const CACHE_FILE_COMMENT: &str = "Artifact Service URL cache";

/// Tier persisted to a properties file shared by every process on the host.
///
/// The file's creation time is the age of every entry in it. Where the
/// filesystem does not report creation time the modification time is used
/// instead; every write-back rewrites the file, so on such filesystems each
/// write-back restarts the expiry window and the file only expires once no
/// write-back has happened for `max_age`. I/O failures are logged and
/// reported as misses. Empty entries are misses.
#[derive(Debug, Clone)]
pub struct FileResolver {
    path: PathBuf,
    max_age: Duration,
}

impl FileResolver {
    /// Resolver using the shared file in the system temp directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(std::env::temp_dir().join(DEFAULT_CACHE_FILE_NAME))
    }

    /// Resolver using a specific file.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Set the age after which the file is discarded.
    #[must_use]
    pub const fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Cache file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file if missing; recreate it empty once it is too old.
    fn prepare(&self) -> io::Result<()> {
        if create_empty(&self.path)? {
            debug!(path = %self.path.display(), "Created URL cache file");
            return Ok(());
        }

        let metadata = fs::metadata(&self.path)?;
        let born = metadata.created().or_else(|_| metadata.modified())?;
        let age = SystemTime::now().duration_since(born).unwrap_or_default();
        if age > self.max_age {
            debug!(path = %self.path.display(), age_secs = age.as_secs(), "URL cache file expired, recreating");
            fs::remove_file(&self.path)?;
            create_empty(&self.path)?;
        }
        Ok(())
    }

    fn load(&self) -> io::Result<Properties> {
        self.prepare()?;
        Properties::load(&self.path)
    }

    fn store(&self, token_endpoint: &str, url: &str) -> io::Result<()> {
        let mut properties = self.load()?;
        properties.insert(token_endpoint, url);
        properties.store(&self.path, CACHE_FILE_COMMENT)
    }
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` if the file was created, `false` if it already existed.
fn create_empty(path: &Path) -> io::Result<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

impl ServiceUrlResolver for FileResolver {
    fn name(&self) -> &'static str {
        "file"
    }

    fn resolve(&self, token_endpoint: &str) -> Result<Option<String>, ResolveError> {
        match self.load() {
            Ok(properties) => Ok(properties
                .get(token_endpoint)
                .filter(|url| !url.is_empty())
                .map(ToString::to_string)),
            Err(e) => {
                warn!(path = %self.path.display(), "Unable to read Artifact Service URL cache file");
                debug!(error = %e, "URL cache read failure");
                Ok(None)
            }
        }
    }

    fn after_url_resolved(&self, token_endpoint: &str, url: &str) {
        if let Err(e) = self.store(token_endpoint, url) {
            warn!(path = %self.path.display(), "Unable to write Artifact Service URL cache file");
            debug!(error = %e, "URL cache write failure");
        }
    }
}
