//! `SQLite`-backed key/value storage for the session token.

use chrono::Utc;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::chat::config::StorageConfig;
use crate::chat::error::StoreResult;
use crate::chat::message::SessionToken;

use super::store::{SessionStore, StoreFuture};

/// `SQLite` implementation of the session store.
pub struct SqliteSessionStore {
    conn: Connection,
    table: String,
    key: String,
}

impl SqliteSessionStore {
    /// Open (or create) the database at the configured path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn open(config: &StorageConfig) -> StoreResult<Self> {
        let conn = Connection::open(&config.sqlite_path).await?;
        Self::init(conn, config).await
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns an error if the database cannot be created.
    pub async fn open_in_memory(config: &StorageConfig) -> StoreResult<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn, config).await
    }

    async fn init(conn: Connection, config: &StorageConfig) -> StoreResult<Self> {
        let table = config.table.clone();
        let table_name = table.clone();

        conn.call(move |conn| {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table_name} (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at INTEGER NOT NULL
                )"
            ))?;
            Ok(())
        })
        .await?;

        Ok(Self {
            conn,
            table,
            key: config.token_key.clone(),
        })
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self) -> StoreFuture<'_, StoreResult<Option<SessionToken>>> {
        Box::pin(async move {
            let table = self.table.clone();
            let key = self.key.clone();

            let value = self
                .conn
                .call(move |conn| {
                    let mut stmt =
                        conn.prepare(&format!("SELECT value FROM {table} WHERE key = ?1"))?;
                    let value: Option<String> = stmt
                        .query_row(rusqlite::params![key], |row| row.get(0))
                        .optional()?;
                    Ok(value)
                })
                .await?;

            Ok(value.map(SessionToken::new))
        })
    }

    fn set(&self, token: &SessionToken) -> StoreFuture<'_, StoreResult<()>> {
        let value = token.as_str().to_string();
        Box::pin(async move {
            let table = self.table.clone();
            let key = self.key.clone();
            let updated_at = Utc::now().timestamp_millis();

            self.conn
                .call(move |conn| {
                    conn.execute(
                        &format!(
                            "INSERT OR REPLACE INTO {table} (key, value, updated_at)
                             VALUES (?1, ?2, ?3)"
                        ),
                        rusqlite::params![key, value, updated_at],
                    )?;
                    Ok(())
                })
                .await?;

            Ok(())
        })
    }
}
