pub mod client;
pub mod config;
pub mod error;
pub mod proxy;
pub mod upstream;
pub mod web;

pub use client::{recent_history, ChatClient, ClientError, HISTORY_WINDOW};
pub use config::{AppConfig, UpstreamConfig};
pub use error::{ChatError, ErrorKind};
pub use proxy::ChatProxy;
pub use upstream::payload::{build_payload, compose_messages, UpstreamPayload, SYSTEM_PROMPT};
pub use upstream::{CompletionTransport, HttpTransport};
