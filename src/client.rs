//! Caller side of the chat endpoint.
//!
//! [`ChatClient`] posts the latest message plus a trailing window of the
//! conversation to the proxy. When the proxy cannot be reached at all it can
//! answer through an in-process [`ChatProxy`] instead, which composes the
//! upstream request with the same builder. Upstream credentials only ever
//! live inside that proxy, never in the client.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::ChatError;
use crate::proxy::ChatProxy;
use crate::web::models::ClientTurn;

/// Prior turns forwarded with each message.
pub const HISTORY_WINDOW: usize = 10;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("chat proxy answered {status}: {error}")]
    Rejected { status: u16, error: String },

    #[error("chat proxy reply had no message")]
    MissingMessage,

    #[error("could not reach chat proxy: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("in-process fallback failed: {0}")]
    Fallback(#[source] ChatError),
}

/// The most recent `window` turns, oldest dropped first.
pub fn recent_history(turns: &[ClientTurn], window: usize) -> &[ClientTurn] {
    &turns[turns.len().saturating_sub(window)..]
}

pub struct ChatClient {
    http: Client,
    endpoint: String,
    fallback: Option<Arc<ChatProxy>>,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            fallback: None,
        })
    }

    /// Answer through `proxy` when the endpoint is unreachable.
    pub fn with_fallback(mut self, proxy: Arc<ChatProxy>) -> Self {
        self.fallback = Some(proxy);
        self
    }

    pub async fn send(
        &self,
        message: &str,
        conversation: &[ClientTurn],
    ) -> Result<String, ClientError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        let history = recent_history(conversation, HISTORY_WINDOW);

        match self.post(message, history).await {
            // Only transport failures fall back; an error the proxy answered with stands.
            Err(ClientError::Transport(e)) => match &self.fallback {
                Some(proxy) => {
                    warn!("Chat proxy unreachable ({}), answering in-process", e);
                    proxy
                        .reply(message, history)
                        .await
                        .map(|response| response.message)
                        .map_err(ClientError::Fallback)
                }
                None => Err(ClientError::Transport(e)),
            },
            other => other,
        }
    }

    async fn post(&self, message: &str, history: &[ClientTurn]) -> Result<String, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "message": message, "history": history }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let error = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                error,
            });
        }

        let body: Value = response.json().await?;
        body.get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(ClientError::MissingMessage)
    }
}
