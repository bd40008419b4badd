//! Anonymous chat client for the guide service.
//!
//! This module provides:
//! - Session token acquisition and reuse over a pluggable store
//! - The HTTP client for the two guide endpoints
//! - The conversation controller and its message sequence

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod message;
pub mod session;

pub use api::{ChatRequest, ChatResponse, GuideApi, HttpGuideClient, SessionResponse};
pub use config::{ChatConfig, StorageConfig, UiConfig};
pub use controller::{Conversation, Dispatcher, PendingTurn};
pub use error::{ApiError, ChatError, ChatResult, StoreError, StoreResult};
pub use message::{DeliveryFailure, Message, MessageId, SessionToken};
pub use session::{MemorySessionStore, SessionManager, SessionStore, SqliteSessionStore};
