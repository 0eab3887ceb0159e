//! Client error types

use stats_common::AppError;
use stats_core::DomainError;
use tokio_tungstenite::tungstenite;

use crate::protocol::CloseCode;

/// REST client errors
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat server returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl RestError {
    /// Whether the server answered 404
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

impl From<RestError> for DomainError {
    fn from(err: RestError) -> Self {
        DomainError::HistoryFetchError(err.to_string())
    }
}

impl From<RestError> for AppError {
    fn from(err: RestError) -> Self {
        AppError::chat_server(err)
    }
}

/// Gateway connection errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Malformed gateway frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Expected Hello as the first frame")]
    ExpectedHello,

    #[error("Heartbeat was not acknowledged")]
    HeartbeatTimeout,

    #[error("Session invalidated by the server")]
    InvalidSession,

    #[error("Gateway closed the connection ({code}): {reason}")]
    Closed { code: u16, reason: String },
}

impl GatewayError {
    /// Whether reconnecting cannot help
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Closed { code, .. } => {
                CloseCode::from_u16(*code).is_some_and(|c| !c.is_reconnectable())
            }
            _ => false,
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::chat_server(err)
    }
}
