use super::store::CredentialStore;
use crate::errors::ApiError;
use secrecy::SecretString;
use std::{fmt, sync::Arc};
use tracing::{info, warn};

/// Explicit session handle injected into the API client, the guard and views.
///
/// Cloning is cheap; all clones share the same credential store. Writes happen
/// only at login and logout, which a single operator cannot run concurrently,
/// so last-write-wins is sufficient.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn CredentialStore>,
}

impl SessionContext {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Current token, if any.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the store cannot be read.
    pub fn token(&self) -> Result<Option<SecretString>, ApiError> {
        self.store.get()
    }

    /// True when a token is stored. Unreadable storage counts as signed out.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        match self.store.get() {
            Ok(token) => token.is_some(),
            Err(err) => {
                warn!("credential store unreadable, treating session as absent: {err}");
                false
            }
        }
    }

    /// Token for a protected request.
    ///
    /// # Errors
    /// Returns `ApiError::MissingCredential` when no token is stored.
    pub fn require_token(&self) -> Result<SecretString, ApiError> {
        self.store.get()?.ok_or(ApiError::MissingCredential)
    }

    /// Starts a session after a successful login.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the token cannot be persisted.
    pub fn init(&self, token: SecretString) -> Result<(), ApiError> {
        self.store.set(&token)?;
        info!("session started");
        Ok(())
    }

    /// Ends the session locally.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the token cannot be removed.
    pub fn teardown(&self) -> Result<(), ApiError> {
        self.store.clear()?;
        info!("session cleared");
        Ok(())
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
