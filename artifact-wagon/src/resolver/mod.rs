//! Artifact Service URL resolution.
//!
//! Three tiers of different lifetimes answer the same question: what is the
//! Artifact Service base URL for a given token endpoint? [`ResolverChain`]
//! consults them fastest first and writes a hit back to every tier that missed.

mod chain;
mod endpoints;
mod file;
mod lookup;
mod memory;

pub use chain::ResolverChain;
pub use endpoints::EndpointTable;
pub use file::{DEFAULT_CACHE_FILE_NAME, DEFAULT_MAX_AGE, FileResolver};
pub use lookup::{ARTIFACT_API_LOOKUP_PATH, LookupResolver};
pub use memory::InMemoryResolver;

use crate::error::ResolveError;

/// One tier of the resolver chain.
pub trait ServiceUrlResolver: Send + Sync {
    /// Short tier name used in logs.
    fn name(&self) -> &'static str;

    /// Look up the Artifact Service URL for `token_endpoint`.
    ///
    /// `Ok(None)` is a miss; cache tiers never return errors.
    ///
    /// # Errors
    ///
    /// Returns an error if an authoritative tier fails.
    fn resolve(&self, token_endpoint: &str) -> Result<Option<String>, ResolveError>;

    /// Called when a later tier resolved `token_endpoint` after this one missed.
    fn after_url_resolved(&self, token_endpoint: &str, url: &str);
}

impl<R: ServiceUrlResolver + ?Sized> ServiceUrlResolver for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resolve(&self, token_endpoint: &str) -> Result<Option<String>, ResolveError> {
        (**self).resolve(token_endpoint)
    }

    fn after_url_resolved(&self, token_endpoint: &str, url: &str) {
        (**self).after_url_resolved(token_endpoint, url);
    }
}
