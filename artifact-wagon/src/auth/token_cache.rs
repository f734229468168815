use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use secrecy::SecretString;
use tracing::{debug, info, warn};

use super::TokenMinter;
use crate::error::{WagonError, WagonResult};

#[derive(Default)]
struct Slot {
    token: Option<SecretString>,
    last_failure: Option<String>,
}

/// Mints a bearer token at most once and hands the same token to every caller.
///
/// Minting happens while holding the lock, so concurrent callers block until
/// the first attempt finishes. If that attempt fails, the callers that were
/// already waiting on it get the same failure; later callers try again.
pub struct AuthorizationCache<M> {
    minter: M,
    slot: Mutex<Slot>,
    failures: AtomicU64,
}

impl<M: TokenMinter> AuthorizationCache<M> {
    /// Create an empty cache around `minter`.
    #[must_use]
    pub fn new(minter: M) -> Self {
        Self {
            minter,
            slot: Mutex::new(Slot::default()),
            failures: AtomicU64::new(0),
        }
    }

    /// The token, minting it on first use.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the attempt this caller observed failed.
    pub fn get_or_mint(&self) -> WagonResult<SecretString> {
        let failures_seen = self.failures.load(Ordering::Acquire);
        let mut slot = self.slot.lock();

        if let Some(token) = &slot.token {
            return Ok(token.clone());
        }

        if self.failures.load(Ordering::Acquire) != failures_seen {
            let message = slot.last_failure.clone().unwrap_or_default();
            return Err(WagonError::auth_failed(message));
        }

        debug!("Attempting to authenticate with HERE Account");
        match self.minter.mint() {
            Ok(token) => {
                info!("Obtained bearer token");
                slot.token = Some(token.clone());
                slot.last_failure = None;
                Ok(token)
            }
            Err(e) => {
                let message = match e {
                    WagonError::AuthenticationFailed(message) => message,
                    other => other.to_string(),
                };
                warn!(error = %message, "Error authenticating HERE credentials");
                slot.last_failure = Some(message.clone());
                self.failures.fetch_add(1, Ordering::Release);
                Err(WagonError::auth_failed(message))
            }
        }
    }

    /// Whether a token has been minted.
    #[must_use]
    pub fn is_minted(&self) -> bool {
        self.slot.lock().token.is_some()
    }

    /// The wrapped minter.
    #[must_use]
    pub const fn minter(&self) -> &M {
        &self.minter
    }
}

impl<M> std::fmt::Debug for AuthorizationCache<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationCache")
            .field("failures", &self.failures.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
