//! Guild member and role entities - used for command permission checks

use super::User;
use crate::value_objects::Snowflake;

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
}

impl Role {
    /// Create a new role
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Guild member entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub user: User,
    pub nickname: Option<String>,
    pub roles: Vec<Snowflake>,
}

impl GuildMember {
    /// Name shown in chat (nickname, then username)
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.user.username)
    }

    /// Check whether the member holds a role with the given name
    ///
    /// Role names are compared exactly, as the chat server does.
    pub fn has_role_named(&self, role_name: &str, guild_roles: &[Role]) -> bool {
        guild_roles
            .iter()
            .filter(|role| role.name == role_name)
            .any(|role| self.roles.contains(&role.id))
    }
}
