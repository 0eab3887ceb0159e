//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Message not found: {message_id} in channel {channel_id}")]
    MessageNotFound {
        channel_id: Snowflake,
        message_id: Snowflake,
    },

    #[error("Member not found in guild: {0}")]
    MemberNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid stat type: {0}")]
    InvalidStatKind(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing role: {0}")]
    MissingRole(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Counter store error: {0}")]
    StoreError(String),

    #[error("History fetch error: {0}")]
    HistoryFetchError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::MessageNotFound { .. } => "UNKNOWN_MESSAGE",
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::InvalidStatKind(_) => "INVALID_STAT_KIND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::MissingRole(_) => "MISSING_ROLE",
            Self::StoreError(_) => "STORE_ERROR",
            Self::HistoryFetchError(_) => "HISTORY_FETCH_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChannelNotFound(_) | Self::MessageNotFound { .. } | Self::MemberNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidStatKind(_) | Self::InvalidArgument(_))
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::MissingRole(_))
    }

    /// Check if this error came from the counter store
    pub fn is_store(&self) -> bool {
        matches!(self, Self::StoreError(_))
    }

    /// Check if this error came from the chat history feed
    pub fn is_history(&self) -> bool {
        matches!(
            self,
            Self::HistoryFetchError(_) | Self::MessageNotFound { .. } | Self::ChannelNotFound(_)
        )
    }
}

impl From<crate::value_objects::StatKindParseError> for DomainError {
    fn from(err: crate::value_objects::StatKindParseError) -> Self {
        Self::InvalidStatKind(err.0)
    }
}
