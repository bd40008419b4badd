//! Lazy acquisition and reuse of the anonymous session token.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::chat::api::GuideApi;
use crate::chat::error::{ChatError, ChatResult};
use crate::chat::message::SessionToken;

use super::store::SessionStore;

/// Owns the single session token for a storage slot.
///
/// Token creation is single-flight: concurrent callers that find the slot
/// empty wait for one creation request and then reuse its token.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn GuideApi>,
    creation: Mutex<()>,
}

impl SessionManager {
    /// Create a manager over `store`, creating sessions through `api`.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, api: Arc<dyn GuideApi>) -> Self {
        Self {
            store,
            api,
            creation: Mutex::new(()),
        }
    }

    /// Return the stored token, creating and storing one if none exists.
    ///
    /// # Errors
    /// Returns [`ChatError::SessionCreation`] if the service refuses or is
    /// unreachable, and [`ChatError::Storage`] if the slot cannot be used.
    pub async fn ensure_token(&self) -> ChatResult<SessionToken> {
        if let Some(token) = self.store.get().await? {
            debug!("Reusing session {}", token.redacted());
            return Ok(token);
        }

        let _guard = self.creation.lock().await;

        // Another caller may have filled the slot while we waited.
        if let Some(token) = self.store.get().await? {
            debug!("Session {} created by concurrent request", token.redacted());
            return Ok(token);
        }

        let token = self
            .api
            .create_session()
            .await
            .map_err(ChatError::SessionCreation)?;
        self.store.set(&token).await?;
        info!("Started chat session {}", token.redacted());

        Ok(token)
    }
}
