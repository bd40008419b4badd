//! Error types for the chat client.

use thiserror::Error;

/// Errors raised while talking to the guide service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connect, timeout, broken body).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus {
        /// Path of the endpoint that failed.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The body could not be decoded or lacked a required field.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        /// Path of the endpoint that failed.
        endpoint: String,
        /// What was wrong with the body.
        reason: String,
    },

    /// The configured base URL or path does not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl ApiError {
    /// Whether re-submitting the same message could reasonably succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            Self::MalformedResponse { .. } | Self::InvalidUrl(_) | Self::HttpClient(_) => false,
        }
    }
}

/// Errors raised by session token storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` storage error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),

    /// The in-memory slot lock was poisoned by a panicking writer.
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Convenience result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced to the conversation layer.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Creating a new anonymous session failed.
    #[error("could not start a chat session: {0}")]
    SessionCreation(#[source] ApiError),

    /// Sending a message or reading its reply failed.
    #[error("message was not delivered: {0}")]
    Send(#[source] ApiError),

    /// Reading or writing the stored token failed.
    #[error("session storage error: {0}")]
    Storage(#[from] StoreError),

    /// Invalid configuration values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ChatError {
    /// Check if the user may retry by submitting again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::SessionCreation(err) | Self::Send(err) => err.is_transient(),
            Self::Storage(_) | Self::InvalidConfig(_) => false,
        }
    }
}

/// Convenience result alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
