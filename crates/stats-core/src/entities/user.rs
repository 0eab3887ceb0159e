//! User entity - a chat participant as seen by the bot

use crate::value_objects::Snowflake;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
    pub bot: bool,
}

impl User {
    /// Create a new human user
    pub fn new(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator: "0000".to_string(),
            bot: false,
        }
    }

    /// Create a new automated (bot) account
    pub fn new_bot(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            bot: true,
            ..Self::new(id, username)
        }
    }

    /// Get the full tag: username#discriminator
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    /// Check if user is an automated account
    #[inline]
    pub fn is_bot(&self) -> bool {
        self.bot
    }

    /// Mention syntax understood by the chat clients
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}
