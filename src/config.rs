use std::env;

use anyhow::{Context, Result};

use crate::error::ChatError;

pub const ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";
pub const API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";

/// Upstream secrets. Either may be absent; that is reported per request.
#[derive(Debug, Clone, Default)]
pub struct UpstreamConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

/// Endpoint and key, both present.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub endpoint: &'a str,
    pub api_key: &'a str,
}

impl UpstreamConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: non_empty(Some(endpoint.into())),
            api_key: non_empty(Some(api_key.into())),
        }
    }

    pub fn from_env() -> Self {
        Self {
            endpoint: non_empty(env::var(ENDPOINT_VAR).ok()),
            api_key: non_empty(env::var(API_KEY_VAR).ok()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.endpoint.is_some() && self.api_key.is_some()
    }

    pub fn credentials(&self) -> Result<Credentials<'_>, ChatError> {
        match (self.endpoint.as_deref(), self.api_key.as_deref()) {
            (Some(endpoint), Some(api_key)) => Ok(Credentials { endpoint, api_key }),
            _ => Err(ChatError::MissingConfiguration),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            Err(_) => 8080,
        };

        Ok(Self {
            host,
            port,
            upstream: UpstreamConfig::from_env(),
        })
    }
}
