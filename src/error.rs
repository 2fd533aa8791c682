use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::web::models::{timestamp_now, ErrorBody};

/// Coarse failure classes surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    MethodNotAllowed,
    ConfigurationError,
    Throttled,
    UpstreamUnavailable,
    InvalidUpstreamResponse,
    InternalError,
}

/// Failures of a single chat request. `Display` carries the diagnostic
/// detail for server logs; callers only ever see [`ChatError::public_message`].
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid request: {0}")]
    InvalidInput(&'static str),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("upstream endpoint or API key not configured")]
    MissingConfiguration,

    #[error("upstream rejected credentials (status {status}): {body}")]
    CredentialsRejected { status: u16, body: String },

    #[error("upstream throttled request (status {status}): {body}")]
    Throttled { status: u16, body: String },

    #[error("upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("upstream transport error: {0}")]
    Transport(String),

    #[error("invalid upstream response: {0}")]
    InvalidUpstreamResponse(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::InvalidInput(_) => ErrorKind::InvalidInput,
            ChatError::MethodNotAllowed(_) => ErrorKind::MethodNotAllowed,
            ChatError::MissingConfiguration | ChatError::CredentialsRejected { .. } => {
                ErrorKind::ConfigurationError
            }
            ChatError::Throttled { .. } => ErrorKind::Throttled,
            ChatError::UpstreamStatus { .. } | ChatError::Transport(_) => {
                ErrorKind::UpstreamUnavailable
            }
            ChatError::InvalidUpstreamResponse(_) => ErrorKind::InvalidUpstreamResponse,
            ChatError::Internal(_) => ErrorKind::InternalError,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            ChatError::InvalidInput(message) => *message,
            ChatError::MethodNotAllowed(_) => "Method not allowed",
            ChatError::MissingConfiguration => "Server configuration error",
            ChatError::CredentialsRejected { .. } => "Authentication failed with AI service",
            ChatError::Throttled { .. } => "AI service is busy. Please try again in a moment.",
            ChatError::UpstreamStatus { .. } | ChatError::Transport(_) => {
                "AI service temporarily unavailable"
            }
            ChatError::InvalidUpstreamResponse(_) => "Invalid response from AI service",
            ChatError::Internal(_) => "Internal server error. Please try again later.",
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ChatError::Internal(format!("could not build upstream request: {e}"))
        } else {
            ChatError::Transport(e.to_string())
        }
    }
}

impl ResponseError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::Throttled => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::ConfigurationError
            | ErrorKind::UpstreamUnavailable
            | ErrorKind::InvalidUpstreamResponse
            | ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.public_message().to_string(),
            timestamp: Some(timestamp_now()),
        })
    }
}
