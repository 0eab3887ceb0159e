//! Stat kinds and scopes, and the counter-store keys they map to.

use std::fmt;

use crate::value_objects::Snowflake;

/// Hash key holding the per-channel watermarks (channel id -> message id)
pub const WATERMARK_KEY: &str = "most_recent";

/// Plain key holding the process start-up timestamp
pub const STARTUP_KEY: &str = "startup";

/// Which family of counters a query or update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    /// Messages per channel
    Message,
    /// Custom-emote reactions per emote
    Emote,
}

impl StatKind {
    /// Key suffix used in the counter store
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Message => "messages",
            Self::Emote => "emotes",
        }
    }

    /// Strictly parse an operator-supplied stat name
    pub fn parse(s: &str) -> Result<Self, StatKindParseError> {
        match s.trim().to_lowercase().as_str() {
            "m" | "msg" | "msgs" | "message" | "messages" => Ok(Self::Message),
            "e" | "emote" | "emotes" | "emoji" | "emojis" => Ok(Self::Emote),
            _ => Err(StatKindParseError(s.to_string())),
        }
    }
}

impl Default for StatKind {
    fn default() -> Self {
        Self::Emote
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatKind {
    type Err = StatKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Unrecognized stat name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stat type '{0}' (expected one of: messages, emotes)")]
pub struct StatKindParseError(pub String);

/// Whose counters a query reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatScope {
    /// Server-wide counters
    Global,
    /// Counters of a single user
    User(Snowflake),
}

impl StatScope {
    /// Counter-store key for this scope and kind
    ///
    /// `"messages"` / `"emotes"` for the global scope,
    /// `"<user-id>:messages"` / `"<user-id>:emotes"` per user.
    #[must_use]
    pub fn key(&self, kind: StatKind) -> String {
        match self {
            Self::Global => kind.as_str().to_string(),
            Self::User(user_id) => format!("{user_id}:{kind}"),
        }
    }
}
