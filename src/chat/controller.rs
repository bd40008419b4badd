//! Conversation controller: owns the message sequence and drives each turn.
//!
//! A turn has three phases so a front-end can redraw between them:
//! 1. [`Conversation::begin_submit`] appends the own message and clears the input.
//! 2. [`Dispatcher::deliver`] obtains the token and sends the message.
//! 3. [`Conversation::complete`] appends the reply or records the failure.
//!
//! [`Conversation::submit`] runs all three in sequence.

use std::sync::Arc;

use tracing::warn;

use crate::chat::api::{ChatRequest, GuideApi};
use crate::chat::error::{ChatError, ChatResult};
use crate::chat::message::{DeliveryFailure, Message, MessageId};
use crate::chat::session::SessionManager;

/// An own message that has been appended but not yet answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTurn {
    /// Identifier of the own message.
    pub message_id: MessageId,
    /// Trimmed text to send.
    pub text: String,
}

/// Network half of a turn. Cheap to clone; does not borrow the conversation.
#[derive(Clone)]
pub struct Dispatcher {
    session: Arc<SessionManager>,
    api: Arc<dyn GuideApi>,
}

impl Dispatcher {
    /// Ensure a session token exists and send the turn's text with it.
    ///
    /// # Errors
    /// Returns [`ChatError::SessionCreation`] or [`ChatError::Storage`] if no
    /// token could be obtained, and [`ChatError::Send`] if the chat call fails.
    pub async fn deliver(&self, turn: &PendingTurn) -> ChatResult<String> {
        let token = self.session.ensure_token().await?;
        let request = ChatRequest {
            message: turn.text.clone(),
            token: token.as_str().to_string(),
        };
        self.api
            .send_message(&request)
            .await
            .map_err(ChatError::Send)
    }
}

/// Ordered, append-only conversation with the guide.
pub struct Conversation {
    messages: Vec<Message>,
    input: String,
    failures: Vec<DeliveryFailure>,
    last_error: Option<String>,
    dispatcher: Dispatcher,
}

impl Conversation {
    /// Start a conversation holding only the synthetic welcome message.
    #[must_use]
    pub fn new(
        welcome_text: impl Into<String>,
        session: Arc<SessionManager>,
        api: Arc<dyn GuideApi>,
    ) -> Self {
        Self {
            messages: vec![Message::remote(welcome_text)],
            input: String::new(),
            failures: Vec::new(),
            last_error: None,
            dispatcher: Dispatcher { session, api },
        }
    }

    /// All messages in chronological order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current composer contents.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the composer contents.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Mutable access to the composer contents for key handling.
    pub const fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// Whether the current input would be sent (send control enabled).
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Own messages that never received a reply.
    #[must_use]
    pub fn failures(&self) -> &[DeliveryFailure] {
        &self.failures
    }

    /// Failure recorded for `id`, if its round trip failed.
    #[must_use]
    pub fn failure_for(&self, id: MessageId) -> Option<&DeliveryFailure> {
        self.failures.iter().find(|f| f.message_id == id)
    }

    /// Error from the most recent turn, cleared when the next turn starts.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Handle for the network half of a turn.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Append the current input as an own message and clear the input.
    ///
    /// Returns `None` (and changes nothing) for blank input.
    pub fn begin_submit(&mut self) -> Option<PendingTurn> {
        let text = self.input.trim();
        if text.is_empty() {
            return None;
        }

        let message = Message::own(text);
        let turn = PendingTurn {
            message_id: message.id,
            text: message.text.clone(),
        };
        self.messages.push(message);
        self.input.clear();
        self.last_error = None;

        Some(turn)
    }

    /// Finish a turn with the outcome of [`Dispatcher::deliver`].
    ///
    /// # Errors
    /// Returns the delivery error after recording it against the own message.
    pub fn complete(&mut self, turn: PendingTurn, result: ChatResult<String>) -> ChatResult<()> {
        match result {
            Ok(reply) => {
                self.messages.push(Message::remote(reply));
                Ok(())
            }
            Err(err) => {
                warn!("Message {} not delivered: {err}", turn.message_id);
                let reason = err.to_string();
                self.failures.push(DeliveryFailure {
                    message_id: turn.message_id,
                    reason: reason.clone(),
                });
                self.last_error = Some(reason);
                Err(err)
            }
        }
    }

    /// Send the current input and append the reply.
    ///
    /// Blank input is ignored and returns `Ok(())` without any network call.
    ///
    /// # Errors
    /// Returns an error if the token could not be obtained or the message
    /// was not delivered. The own message stays in the sequence.
    pub async fn send_input(&mut self) -> ChatResult<()> {
        let Some(turn) = self.begin_submit() else {
            return Ok(());
        };
        let result = self.dispatcher.deliver(&turn).await;
        self.complete(turn, result)
    }

    /// Set the input to `text` and send it.
    ///
    /// # Errors
    /// See [`Conversation::send_input`].
    pub async fn submit(&mut self, text: &str) -> ChatResult<()> {
        self.set_input(text);
        self.send_input().await
    }
}
