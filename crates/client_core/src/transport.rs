use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use shared::{
    error::{ApiErrorBody, ChatApiError, ErrorCode},
    protocol::{ChatRequest, ChatResponse},
};
use tracing::debug;

/// One request/response round trip for a single user message. The session
/// controller never needs to distinguish transport-internal failure
/// modes: every failure arrives as a [`ChatApiError`].
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn exchange(&self, user_id: &str, text: &str) -> Result<ChatResponse, ChatApiError>;
}

/// HTTP transport posting to `{base_url}/{user_id}/chat`. Performs
/// exactly one round trip per call; no retries, batching, or pipelining.
pub struct HttpChatTransport {
    http: Client,
    base_url: String,
}

impl HttpChatTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured client, e.g. one with a request timeout.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn exchange(&self, user_id: &str, text: &str) -> Result<ChatResponse, ChatApiError> {
        let request = ChatRequest {
            message: text.to_string(),
            timestamp: Utc::now(),
        };

        let response = self
            .http
            .post(format!("{}/{user_id}/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(classify_send_failure)?;

        let status = response.status();
        if !status.is_success() {
            // The backend is expected to send a structured error body;
            // anything else collapses to the unknown-error fallback.
            let body: ApiErrorBody = response
                .json()
                .await
                .unwrap_or_else(|_| ApiErrorBody::new(ErrorCode::UnknownError, "Request failed"));
            debug!(%status, code = ?body.code, "chat backend rejected exchange");
            return Err(body.into());
        }

        response.json::<ChatResponse>().await.map_err(|err| {
            ChatApiError::new(
                ErrorCode::UnknownError,
                format!("malformed chat response body: {err}"),
            )
        })
    }
}

fn classify_send_failure(err: reqwest::Error) -> ChatApiError {
    if err.is_timeout() {
        ChatApiError::new(ErrorCode::TimeoutError, "chat request timed out")
    } else {
        // No response reached the client: connection refused, DNS
        // failure, broken stream.
        ChatApiError::new(ErrorCode::NetworkError, err.to_string())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
