//! The chat proxy: validate, compose, forward, normalize.

use std::sync::Arc;

use log::{error, info, warn};
use serde_json::Value;
use uuid::Uuid;

use crate::config::UpstreamConfig;
use crate::error::{ChatError, Result};
use crate::upstream::payload::{build_payload, SYSTEM_PROMPT};
use crate::upstream::{extract_completion, CompletionTransport, RawReply};
use crate::web::models::{timestamp_now, ChatRequest, ChatResponse, ClientTurn};

const MESSAGE_REQUIRED: &str = "Message is required";
const HISTORY_INVALID: &str = "History must be a list of conversation turns";

/// Stateless request handler. Holds only read-only configuration and the
/// upstream transport, so one instance serves every request.
pub struct ChatProxy {
    config: UpstreamConfig,
    transport: Arc<dyn CompletionTransport>,
}

impl ChatProxy {
    pub fn new(config: UpstreamConfig, transport: Arc<dyn CompletionTransport>) -> Self {
        Self { config, transport }
    }

    /// Handle a raw JSON request body.
    pub async fn handle(&self, body: &[u8]) -> Result<ChatResponse> {
        let request = match parse_request(body) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected chat request: {}", e);
                return Err(e);
            }
        };
        self.reply(&request.message, &request.history).await
    }

    /// Forward one message with its history and normalize the outcome.
    pub async fn reply(&self, message: &str, history: &[ClientTurn]) -> Result<ChatResponse> {
        let request_id = Uuid::new_v4();

        match self.forward(message, history).await {
            Ok(content) => {
                let timestamp = timestamp_now();
                info!(
                    "Chat request {} succeeded: message_length={} response_length={} \
                     history_length={} timestamp={}",
                    request_id,
                    message.chars().count(),
                    content.chars().count(),
                    history.len(),
                    timestamp
                );
                Ok(ChatResponse {
                    message: content,
                    timestamp,
                })
            }
            Err(e) => {
                error!("Chat request {} failed ({:?}): {}", request_id, e.kind(), e);
                Err(e)
            }
        }
    }

    async fn forward(&self, message: &str, history: &[ClientTurn]) -> Result<String> {
        let credentials = self.config.credentials()?;
        let payload = build_payload(SYSTEM_PROMPT, history, message);

        let reply = self
            .transport
            .post(credentials.endpoint, credentials.api_key, &payload)
            .await?;

        interpret_reply(reply)
    }
}

/// Validate a request body into a [`ChatRequest`].
pub fn parse_request(body: &[u8]) -> Result<ChatRequest> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ChatError::InvalidInput(MESSAGE_REQUIRED))?;

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .ok_or(ChatError::InvalidInput(MESSAGE_REQUIRED))?
        .to_string();

    let history = match value.get("history") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => serde_json::from_value::<Vec<ClientTurn>>(raw.clone())
            .map_err(|_| ChatError::InvalidInput(HISTORY_INVALID))?,
    };

    Ok(ChatRequest { message, history })
}

/// Map an upstream status and body onto the completion text or an error.
pub fn interpret_reply(reply: RawReply) -> Result<String> {
    if reply.is_success() {
        return extract_completion(&reply.body);
    }

    let RawReply { status, body } = reply;
    Err(match status {
        401 => ChatError::CredentialsRejected { status, body },
        429 => ChatError::Throttled { status, body },
        _ => ChatError::UpstreamStatus { status, body },
    })
}
