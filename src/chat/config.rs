//! Configuration for the chat client.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::chat::error::{ChatError, ChatResult};

/// Environment variable overriding the guide service base URL.
const URL_ENV: &str = "GUIDE_CHAT_URL";
/// Environment variable overriding the `SQLite` token database path.
const DB_ENV: &str = "GUIDE_CHAT_DB";
/// Environment variable overriding the transcript width.
const WIDTH_ENV: &str = "GUIDE_CHAT_WIDTH";
/// Environment variable overriding the viewport height.
const HEIGHT_ENV: &str = "GUIDE_CHAT_HEIGHT";

/// Largest accepted transcript width or height.
const MAX_DIMENSION: usize = 500;

/// Default guide service host.
const DEFAULT_BASE_URL: &str = "http://ceritaborobudur.my.id";

/// Top-level configuration for the chat client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the guide service.
    pub base_url: String,
    /// Path of the session-creation endpoint.
    pub session_path: String,
    /// Path of the chat endpoint.
    pub chat_path: String,
    /// Request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
    /// Token storage settings.
    pub storage: StorageConfig,
    /// Presentation settings.
    pub ui: UiConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_path: "/api/chat/session".to_string(),
            chat_path: "/api/chat/chat".to_string(),
            request_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            storage: StorageConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl ChatConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from defaults plus `GUIDE_CHAT_*` environment overrides.
    ///
    /// Unparsable numeric overrides are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(URL_ENV) {
            config.base_url = url;
        }
        if let Ok(path) = std::env::var(DB_ENV) {
            config.storage.sqlite_path = PathBuf::from(path);
        }
        if let Some(width) = env_usize(WIDTH_ENV) {
            config.ui.width = width;
        }
        if let Some(height) = env_usize(HEIGHT_ENV) {
            config.ui.height = height;
        }
        config
    }

    /// Set the guide service base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the `SQLite` file holding the session token.
    #[must_use]
    pub fn with_sqlite_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.sqlite_path = path.into();
        self
    }

    /// Set the welcome text shown before any exchange.
    #[must_use]
    pub fn with_welcome_text(mut self, text: impl Into<String>) -> Self {
        self.ui.welcome_text = text.into();
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        Url::parse(&self.base_url)
            .map_err(|e| ChatError::InvalidConfig(format!("base_url: {e}")))?;

        for (name, path) in [
            ("session_path", &self.session_path),
            ("chat_path", &self.chat_path),
        ] {
            if !path.starts_with('/') {
                return Err(ChatError::InvalidConfig(format!(
                    "{name} must start with '/'"
                )));
            }
        }

        if self.storage.token_key.is_empty() {
            return Err(ChatError::InvalidConfig(
                "storage.token_key must not be empty".to_string(),
            ));
        }

        if !is_sql_identifier(&self.storage.table) {
            return Err(ChatError::InvalidConfig(
                "storage.table must match [A-Za-z_][A-Za-z0-9_]*".to_string(),
            ));
        }

        for (name, value) in [("ui.width", self.ui.width), ("ui.height", self.ui.height)] {
            if !(1..=MAX_DIMENSION).contains(&value) {
                return Err(ChatError::InvalidConfig(format!(
                    "{name} must be in 1..={MAX_DIMENSION}"
                )));
            }
        }

        Ok(())
    }
}

/// Token storage settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` database path.
    pub sqlite_path: PathBuf,
    /// Key/value table name.
    pub table: String,
    /// Key under which the session token is stored.
    pub token_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("guide_chat.sqlite"),
            table: "chat_storage".to_string(),
            token_key: "chatToken".to_string(),
        }
    }
}

/// Presentation settings for the terminal front-end.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UiConfig {
    /// Header title.
    pub title: String,
    /// Header subtitle.
    pub subtitle: String,
    /// Synthetic first message from the guide.
    pub welcome_text: String,
    /// Footer disclaimer.
    pub disclaimer: String,
    /// Hint shown while the input is empty.
    pub placeholder: String,
    /// Transcript width in columns.
    pub width: usize,
    /// Visible transcript lines.
    pub height: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "BorobuGuide".to_string(),
            subtitle: "Percakapan sekali pakai • Tidak ada data yang disimpan".to_string(),
            welcome_text:
                "Selamat datang di Borobudur! Say hello buat chattingan sama gweh, Borobuguide"
                    .to_string(),
            disclaimer: "Pesan bersifat anonim. Pesan tidak disimpan atau dilacak.".to_string(),
            placeholder: "Type your message...".to_string(),
            width: 72,
            height: 20,
        }
    }
}

/// Table names are pasted into SQL, so only plain identifiers are allowed.
fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
