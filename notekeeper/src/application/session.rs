// src/application/session.rs
use crate::constants::SESSION_TOKEN_KEY;
use crate::domain::ClientError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Persistent string storage with one value per key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// Holds the session token. Presence of a token is the authentication signal;
/// its validity is decided by the server.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Current token, read from storage on every call.
    pub fn token(&self) -> Option<String> {
        match self.store.get(SESSION_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    pub fn login(&self, token: &str) -> Result<(), ClientError> {
        self.store.set(SESSION_TOKEN_KEY, token)?;
        info!("Session token stored");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.remove(SESSION_TOKEN_KEY)?;
        debug!("Session token removed");
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
