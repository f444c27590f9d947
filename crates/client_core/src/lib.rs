use std::sync::Arc;

use chrono::Utc;
use shared::domain::{Message, MessageId, MessageMetadata, MessageStatus, Sender};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod classify;
pub mod interpret;
pub mod transport;

pub use transport::{ChatTransport, HttpChatTransport};

/// Notification emitted by a [`ChatSession`]. Exactly one settlement
/// event is emitted per exchange outcome, so observers never see a state
/// where the user message is `Sent` but the assistant reply is missing.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A user message entered the timeline in `Sending` state.
    MessageQueued(Message),
    /// The exchange settled: user message marked `Sent`, assistant reply
    /// appended.
    ExchangeCompleted { user: Message, assistant: Message },
    /// The exchange settled with a failure: user message marked `Error`,
    /// no assistant reply.
    ExchangeFailed { user: Message, error: String },
    /// The surfaced error slot was dismissed.
    ErrorCleared,
}

/// How one accepted `send` call settled.
#[derive(Debug, Clone)]
pub enum SendOutcome {
    Delivered(Message),
    Failed(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an exchange is already in flight for this session")]
    ExchangeInFlight,
}

struct SessionState {
    messages: Vec<Message>,
    current_error: Option<String>,
    in_flight: Option<MessageId>,
}

/// Owns the ordered message timeline for one chat session and drives the
/// send → transport → interpret → append cycle. The presentation layer
/// consumes it read-only, via [`ChatSession::subscribe_events`] or the
/// snapshot accessors.
pub struct ChatSession {
    user_id: String,
    transport: Arc<dyn ChatTransport>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl ChatSession {
    pub fn new(user_id: impl Into<String>, transport: Arc<dyn ChatTransport>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            user_id: user_id.into(),
            transport,
            inner: Mutex::new(SessionState {
                messages: Vec::new(),
                current_error: None,
                in_flight: None,
            }),
            events,
        })
    }

    /// Sends one already-validated user message through the transport and
    /// settles the timeline with the outcome.
    ///
    /// The user message is appended in `Sending` state before any network
    /// activity, so callers can render it immediately. At most one
    /// exchange may be outstanding; a second call while one is in flight
    /// is rejected rather than queued. Transport failures are not
    /// returned as `Err`: they settle the originating message into
    /// `Error` state and come back as [`SendOutcome::Failed`].
    pub async fn send(&self, text: &str) -> Result<SendOutcome, SessionError> {
        let user_message = {
            let mut guard = self.inner.lock().await;
            if guard.in_flight.is_some() {
                return Err(SessionError::ExchangeInFlight);
            }
            let message = Message {
                id: MessageId::new(),
                text: text.to_string(),
                sender: Sender::User,
                timestamp: Utc::now(),
                status: MessageStatus::Sending,
                metadata: None,
            };
            guard.in_flight = Some(message.id);
            guard.messages.push(message.clone());
            message
        };
        let _ = self
            .events
            .send(SessionEvent::MessageQueued(user_message.clone()));

        match self.transport.exchange(&self.user_id, text).await {
            Ok(envelope) => {
                let assistant = Message {
                    id: MessageId::new(),
                    text: interpret::interpret(&envelope),
                    sender: Sender::Assistant,
                    timestamp: envelope.timestamp,
                    status: MessageStatus::Delivered,
                    metadata: envelope
                        .metadata
                        .as_ref()
                        .and_then(shared::protocol::ResponseMetadata::action)
                        .map(MessageMetadata::TaskAction),
                };
                let mut user = user_message;
                user.status = MessageStatus::Sent;
                {
                    let mut guard = self.inner.lock().await;
                    settle_user_message(&mut guard, &user);
                    guard.messages.push(assistant.clone());
                    guard.in_flight = None;
                }
                info!(user_id = %self.user_id, "chat exchange delivered");
                let _ = self.events.send(SessionEvent::ExchangeCompleted {
                    user,
                    assistant: assistant.clone(),
                });
                Ok(SendOutcome::Delivered(assistant))
            }
            Err(err) => {
                let user_facing = classify::user_message(&err);
                let mut user = user_message;
                user.status = MessageStatus::Error;
                user.metadata = Some(MessageMetadata::ErrorMessage(user_facing.clone()));
                {
                    let mut guard = self.inner.lock().await;
                    settle_user_message(&mut guard, &user);
                    guard.current_error = Some(user_facing.clone());
                    guard.in_flight = None;
                }
                warn!(user_id = %self.user_id, code = ?err.code, "chat exchange failed: {err}");
                let _ = self.events.send(SessionEvent::ExchangeFailed {
                    user,
                    error: user_facing.clone(),
                });
                Ok(SendOutcome::Failed(user_facing))
            }
        }
    }

    /// Dismisses the surfaced error without touching the timeline.
    /// Idempotent.
    pub async fn clear_error(&self) {
        let cleared = {
            let mut guard = self.inner.lock().await;
            guard.current_error.take().is_some()
        };
        if cleared {
            let _ = self.events.send(SessionEvent::ErrorCleared);
        }
    }

    /// Snapshot of the timeline in send order.
    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.messages.clone()
    }

    /// The currently surfaced error, if any.
    pub async fn current_error(&self) -> Option<String> {
        self.inner.lock().await.current_error.clone()
    }

    /// Whether an exchange is outstanding.
    pub async fn is_loading(&self) -> bool {
        self.inner.lock().await.in_flight.is_some()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

/// Writes the settled user message back into its timeline slot. The
/// timeline is append-only, so the originating entry is always present;
/// searching from the tail finds it first.
fn settle_user_message(state: &mut SessionState, settled: &Message) {
    if let Some(slot) = state
        .messages
        .iter_mut()
        .rev()
        .find(|message| message.id == settled.id)
    {
        *slot = settled.clone();
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
