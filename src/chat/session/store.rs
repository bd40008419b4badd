//! Session token storage abstraction.

use std::future::Future;
use std::pin::Pin;
use std::sync::RwLock;

use crate::chat::error::{StoreError, StoreResult};
use crate::chat::message::SessionToken;

/// Boxed future type for store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Durable slot holding at most one session token.
pub trait SessionStore: Send + Sync {
    /// Read the stored token, if any.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn get(&self) -> StoreFuture<'_, StoreResult<Option<SessionToken>>>;

    /// Store a token, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn set(&self, token: &SessionToken) -> StoreFuture<'_, StoreResult<()>>;
}

/// Process-local store. The token lives as long as the value.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<SessionToken>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`.
    #[must_use]
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            slot: RwLock::new(Some(token)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> StoreFuture<'_, StoreResult<Option<SessionToken>>> {
        Box::pin(async move {
            let slot = self.slot.read().map_err(|_| StoreError::Poisoned)?;
            Ok(slot.clone())
        })
    }

    fn set(&self, token: &SessionToken) -> StoreFuture<'_, StoreResult<()>> {
        let token = token.clone();
        Box::pin(async move {
            let mut slot = self.slot.write().map_err(|_| StoreError::Poisoned)?;
            *slot = Some(token);
            Ok(())
        })
    }
}
