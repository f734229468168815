//! Bearer token minting and the per-client authorization cache.

mod oauth;
mod token_cache;

pub use oauth::{HereAccountMinter, OAuthParams, authorization_header, signature_base_string};
pub use token_cache::AuthorizationCache;

use secrecy::SecretString;

use crate::error::WagonResult;

/// Obtains a new bearer token.
pub trait TokenMinter: Send + Sync {
    /// Mint a token.
    ///
    /// # Errors
    ///
    /// Returns an error if no token could be obtained.
    fn mint(&self) -> WagonResult<SecretString>;
}

impl<M: TokenMinter + ?Sized> TokenMinter for Box<M> {
    fn mint(&self) -> WagonResult<SecretString> {
        (**self).mint()
    }
}

impl<M: TokenMinter + ?Sized> TokenMinter for std::sync::Arc<M> {
    fn mint(&self) -> WagonResult<SecretString> {
        (**self).mint()
    }
}
