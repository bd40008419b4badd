//! Message and token types for the conversation.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl Default for MessageId {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl MessageId {
    /// Create a new random identifier.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single chat bubble. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier.
    pub id: MessageId,
    /// Message body.
    pub text: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// `true` if written by the local user.
    pub is_own: bool,
}

impl Message {
    /// Create a message authored by the local user, stamped now.
    #[must_use]
    pub fn own(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            timestamp: Utc::now(),
            is_own: true,
        }
    }

    /// Create a message received from the guide, stamped now.
    #[must_use]
    pub fn remote(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            timestamp: Utc::now(),
            is_own: false,
        }
    }
}

/// Opaque anonymous session token issued by the guide service.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix safe to put in logs.
    #[must_use]
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{prefix}…")
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.redacted()).finish()
    }
}

/// Record of an own message whose round trip failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// The own message that got no reply.
    pub message_id: MessageId,
    /// Human-readable cause.
    pub reason: String,
}
