//! HTTP client for the guide service.
//!
//! Two JSON endpoints are used:
//! - `POST {session_path}` with an empty body, answering `{"token": "..."}`.
//! - `POST {chat_path}` with `{"message", "token"}`, answering `{"response": "..."}`.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::chat::config::ChatConfig;
use crate::chat::error::ApiError;
use crate::chat::message::SessionToken;

/// Boxed future type for API operations.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Chat request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Session token correlating the turns.
    pub token: String,
}

/// Chat response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The guide's reply.
    pub response: String,
}

/// Session creation response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Newly issued session token.
    pub token: String,
}

/// Remote guide service.
pub trait GuideApi: Send + Sync {
    /// Ask the service for a fresh anonymous session token.
    ///
    /// # Errors
    /// Returns an error if the request fails or the body has no usable token.
    fn create_session(&self) -> ApiFuture<'_, Result<SessionToken, ApiError>>;

    /// Send one message and wait for the guide's reply text.
    ///
    /// # Errors
    /// Returns an error if the request fails or the body has no reply.
    fn send_message<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> ApiFuture<'a, Result<String, ApiError>>;
}

/// `reqwest` implementation of [`GuideApi`].
pub struct HttpGuideClient {
    client: reqwest::Client,
    session_url: Url,
    chat_url: Url,
}

impl HttpGuideClient {
    /// Build a client for the configured service.
    ///
    /// # Errors
    /// Returns an error if the URLs are invalid or the HTTP client cannot be built.
    pub fn new(config: &ChatConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)?;
        let session_url = base.join(&config.session_path)?;
        let chat_url = base.join(&config.chat_path)?;
        let client = Self::build_client(config)?;

        Ok(Self {
            client,
            session_url,
            chat_url,
        })
    }

    /// URL used for session creation.
    #[must_use]
    pub const fn session_url(&self) -> &Url {
        &self.session_url
    }

    /// URL used for chat turns.
    #[must_use]
    pub const fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    fn build_client(config: &ChatConfig) -> Result<reqwest::Client, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let ua = format!("guide-chat/{}", env!("CARGO_PKG_VERSION"));
        if let Ok(ua_value) = HeaderValue::from_str(&ua) {
            headers.insert(USER_AGENT, ua_value);
        }

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ApiError::HttpClient(e.to_string()))
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        endpoint: &Url,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                endpoint: endpoint.path().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse {
            endpoint: endpoint.path().to_string(),
            reason: e.to_string(),
        })
    }
}

impl GuideApi for HttpGuideClient {
    fn create_session(&self) -> ApiFuture<'_, Result<SessionToken, ApiError>> {
        Box::pin(async move {
            debug!("POST {}", self.session_url);
            let response = self.client.post(self.session_url.clone()).send().await?;
            let body: SessionResponse = Self::read_json(response, &self.session_url).await?;

            if body.token.is_empty() {
                return Err(ApiError::MalformedResponse {
                    endpoint: self.session_url.path().to_string(),
                    reason: "empty token".to_string(),
                });
            }

            Ok(SessionToken::new(body.token))
        })
    }

    fn send_message<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> ApiFuture<'a, Result<String, ApiError>> {
        Box::pin(async move {
            debug!(
                "POST {} ({} chars)",
                self.chat_url,
                request.message.chars().count()
            );
            let response = self
                .client
                .post(self.chat_url.clone())
                .json(request)
                .send()
                .await?;
            let body: ChatResponse = Self::read_json(response, &self.chat_url).await?;
            Ok(body.response)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;

    #[derive(Default)]
    struct MockGuide {
        session_calls: Mutex<usize>,
        chat_bodies: Mutex<Vec<ChatRequest>>,
    }

    async fn create_session(State(state): State<Arc<MockGuide>>) -> Json<serde_json::Value> {
        *state.session_calls.lock().unwrap() += 1;
        Json(serde_json::json!({ "token": "T1" }))
    }

    async fn chat(
        State(state): State<Arc<MockGuide>>,
        Json(request): Json<ChatRequest>,
    ) -> Json<serde_json::Value> {
        let reply = format!("echo: {}", request.message);
        state.chat_bodies.lock().unwrap().push(request);
        Json(serde_json::json!({ "response": reply }))
    }

    async fn spawn(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn client_for(addr: SocketAddr) -> HttpGuideClient {
        let config = ChatConfig::new().with_base_url(format!("http://{addr}"));
        HttpGuideClient::new(&config).unwrap()
    }

    #[test]
    fn test_urls_are_joined() {
        let client = HttpGuideClient::new(&ChatConfig::default()).unwrap();
        assert_eq!(
            client.session_url().as_str(),
            "http://ceritaborobudur.my.id/api/chat/session"
        );
        assert_eq!(
            client.chat_url().as_str(),
            "http://ceritaborobudur.my.id/api/chat/chat"
        );
    }

    #[tokio::test]
    async fn test_session_and_chat_round_trip() {
        let state = Arc::new(MockGuide::default());
        let router = Router::new()
            .route("/api/chat/session", post(create_session))
            .route("/api/chat/chat", post(chat))
            .with_state(Arc::clone(&state));
        let client = client_for(spawn(router).await);

        let token = client.create_session().await.unwrap();
        assert_eq!(token.as_str(), "T1");

        let request = ChatRequest {
            message: "hi".to_string(),
            token: token.as_str().to_string(),
        };
        let reply = client.send_message(&request).await.unwrap();

        assert_eq!(reply, "echo: hi");
        assert_eq!(*state.session_calls.lock().unwrap(), 1);
        assert_eq!(state.chat_bodies.lock().unwrap().as_slice(), &[request]);
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let router = Router::new().route(
            "/api/chat/session",
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let client = client_for(spawn(router).await);

        let err = client.create_session().await.unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus { status: 503, .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let router = Router::new().route(
            "/api/chat/chat",
            post(|| async { Json(serde_json::json!({ "reply": "wrong field" })) }),
        );
        let client = client_for(spawn(router).await);

        let request = ChatRequest {
            message: "hi".to_string(),
            token: "T1".to_string(),
        };
        let err = client.send_message(&request).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_empty_token_is_malformed() {
        let router = Router::new().route(
            "/api/chat/session",
            post(|| async { Json(serde_json::json!({ "token": "" })) }),
        );
        let client = client_for(spawn(router).await);

        let err = client.create_session().await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(addr).create_session().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
