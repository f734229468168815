use std::path::PathBuf;

use tracing::{debug, instrument};
use wagon_common::HttpTransport;

use super::{FileResolver, InMemoryResolver, LookupResolver, ServiceUrlResolver};
use crate::error::ResolveError;

/// Ordered tiers consulted fastest first.
///
/// On a hit every tier that was consulted before it and missed is notified,
/// in reverse order, so slower results flow back into faster tiers. An empty
/// URL counts as a miss.
pub struct ResolverChain {
    tiers: Vec<Box<dyn ServiceUrlResolver>>,
}

impl ResolverChain {
    /// Chain over the given tiers.
    #[must_use]
    pub fn new(tiers: Vec<Box<dyn ServiceUrlResolver>>) -> Self {
        Self { tiers }
    }

    /// Memory, file and lookup tiers. `cache_path` overrides the shared temp file.
    #[must_use]
    pub fn standard<T>(transport: T, cache_path: Option<PathBuf>) -> Self
    where
        T: HttpTransport + 'static,
    {
        let file = cache_path.map_or_else(FileResolver::new, FileResolver::with_path);
        Self::new(vec![
            Box::new(InMemoryResolver::shared()),
            Box::new(file),
            Box::new(LookupResolver::new(transport)),
        ])
    }

    /// Tier names in consultation order.
    pub fn tier_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tiers.iter().map(|tier| tier.name())
    }

    /// Resolve the Artifact Service URL for a token endpoint.
    ///
    /// # Errors
    ///
    /// Returns the first tier error, or `NotFound` if every tier missed.
    #[instrument(skip(self))]
    pub fn resolve(&self, token_endpoint: &str) -> Result<String, ResolveError> {
        for (index, tier) in self.tiers.iter().enumerate() {
            debug!(tier = tier.name(), "Consulting resolver");
            if let Some(url) = tier.resolve(token_endpoint)?.filter(|url| !url.is_empty()) {
                debug!(tier = tier.name(), url = %url, "Artifact Service URL resolved");
                for missed in self.tiers[..index].iter().rev() {
                    missed.after_url_resolved(token_endpoint, &url);
                }
                return Ok(url);
            }
        }
        Err(ResolveError::NotFound(token_endpoint.to_string()))
    }
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tier_names()).finish()
    }
}
