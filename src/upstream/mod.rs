pub mod payload;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::error::{ChatError, Result};
use payload::UpstreamPayload;

/// Status and body of an upstream reply, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

impl RawReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one composed payload to the completion endpoint.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        payload: &UpstreamPayload,
    ) -> Result<RawReply>;
}

/// Azure OpenAI chat-completions over HTTP.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        payload: &UpstreamPayload,
    ) -> Result<RawReply> {
        debug!("Sending {} messages upstream", payload.messages.len());

        let response = self
            .client
            .post(endpoint)
            .header("api-key", api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawReply { status, body })
    }
}

/// Pull `choices[0].message.content` out of a successful reply body.
pub fn extract_completion(body: &str) -> Result<String> {
    let response_json: Value = serde_json::from_str(body)
        .map_err(|e| ChatError::InvalidUpstreamResponse(format!("{e}: {body}")))?;

    response_json
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ChatError::InvalidUpstreamResponse(body.to_string()))
}
