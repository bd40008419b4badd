//! Session token lifecycle: storage backends and the lazy manager.

pub mod manager;
pub mod sqlite_store;
pub mod store;

pub use manager::SessionManager;
pub use sqlite_store::SqliteSessionStore;
pub use store::{MemorySessionStore, SessionStore, StoreFuture};
