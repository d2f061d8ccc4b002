//! Bearer credential storage

use crate::error::{Error, Result};
use crate::storage::{KeyValueStore, TOKEN_KEY};
use std::sync::Arc;
use tracing::{debug, warn};

/// Credential sent when no user is logged in.
pub const PLACEHOLDER_TOKEN: &str = "demo_token";

/// Reads and writes the bearer credential in a [`KeyValueStore`].
///
/// No expiry or well-formedness checks are made: a token is either
/// present or it is not.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist `token`, replacing any previous credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails to write.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.store.set(TOKEN_KEY, token)?;
        debug!("Stored bearer credential");
        Ok(())
    }

    /// The stored credential, if any.
    ///
    /// A store that cannot be read counts as holding no credential.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read credential: {}", e);
                None
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The credential to put in an `Authorization: Bearer` header.
    ///
    /// Falls back to [`PLACEHOLDER_TOKEN`] instead of failing.
    #[must_use]
    pub fn bearer(&self) -> String {
        self.token()
            .unwrap_or_else(|| PLACEHOLDER_TOKEN.to_string())
    }

    /// Remove the credential. The thread mirror is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails to remove it.
    pub fn clear_token(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        debug!("Cleared bearer credential");
        Ok(())
    }

    /// Gate for anything that needs a logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] when no credential is stored.
    pub fn ensure_authenticated(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }
}
