use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::debug;

use super::ServiceUrlResolver;
use crate::error::ResolveError;

type UrlMap = Arc<RwLock<HashMap<String, String>>>;

static SHARED: LazyLock<UrlMap> = LazyLock::new(UrlMap::default);

/// Process-lifetime tier. No expiry, last write wins.
#[derive(Debug, Clone)]
pub struct InMemoryResolver {
    urls: UrlMap,
}

impl InMemoryResolver {
    /// Resolver backed by the process-wide map.
    #[must_use]
    pub fn shared() -> Self {
        Self {
            urls: Arc::clone(&SHARED),
        }
    }

    /// Resolver with its own empty map.
    #[must_use]
    pub fn isolated() -> Self {
        Self {
            urls: UrlMap::default(),
        }
    }

    /// Number of cached endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.read().len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.read().is_empty()
    }
}

impl Default for InMemoryResolver {
    fn default() -> Self {
        Self::shared()
    }
}

impl ServiceUrlResolver for InMemoryResolver {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn resolve(&self, token_endpoint: &str) -> Result<Option<String>, ResolveError> {
        Ok(self.urls.read().get(token_endpoint).cloned())
    }

    fn after_url_resolved(&self, token_endpoint: &str, url: &str) {
        debug!(token_endpoint, url, "Caching Artifact Service URL in memory");
        self.urls.write().insert(token_endpoint.to_string(), url.to_string());
    }
}
