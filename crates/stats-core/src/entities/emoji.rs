//! Emoji value - standard unicode emoji or guild-specific custom emote
//!
//! The chat server stores reactions as plain strings. Custom emotes use the
//! Discord encodings `name:id`, `<:name:id>` and `<a:name:id>` (animated);
//! anything else is a standard emoji.

use std::fmt;

use crate::value_objects::Snowflake;

/// A reaction emoji
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Emoji {
    /// Standard unicode emoji (e.g. "👍")
    Unicode(String),
    /// Guild-specific custom emote
    Custom {
        name: String,
        id: Snowflake,
        animated: bool,
    },
}

impl Emoji {
    /// Parse the wire representation used by the chat server
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::parse_custom(raw).unwrap_or_else(|| Self::Unicode(raw.to_string()))
    }

    fn parse_custom(raw: &str) -> Option<Self> {
        let (body, animated) = match raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            Some(inner) => match inner.strip_prefix("a:") {
                Some(rest) => (rest, true),
                None => (inner.strip_prefix(':')?, false),
            },
            None => (raw, false),
        };

        let (name, id) = body.rsplit_once(':')?;
        if name.is_empty() || name.contains(':') {
            return None;
        }
        let id = Snowflake::parse(id).ok()?;

        Some(Self::Custom {
            name: name.to_string(),
            id,
            animated,
        })
    }

    /// Whether this is a guild-specific custom emote
    #[inline]
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    /// Name used as the counter field
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Unicode(s) => s,
            Self::Custom { name, .. } => name,
        }
    }

    /// Representation expected by the reaction endpoints (`name:id` for custom emotes)
    #[must_use]
    pub fn api_name(&self) -> String {
        match self {
            Self::Unicode(s) => s.clone(),
            Self::Custom { name, id, .. } => format!("{name}:{id}"),
        }
    }
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode(s) => f.write_str(s),
            Self::Custom {
                name,
                id,
                animated: true,
            } => write!(f, "<a:{name}:{id}>"),
            Self::Custom { name, id, .. } => write!(f, "<:{name}:{id}>"),
        }
    }
}
