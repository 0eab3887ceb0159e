//! Command parsing

use stats_core::{DomainError, Snowflake, StatKind};

/// A recognized operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Global report, or one report per mentioned user
    GetStats {
        kind: StatKind,
        users: Vec<Snowflake>,
    },
    /// Snapshot, clear and rebuild everything (admin only)
    StoreStats,
    /// Incremental rebuild from the watermarks
    AddStats,
    /// Store-free reaction tally over recent history
    CalcStats {
        msg_limit: Option<usize>,
        response_size: Option<usize>,
    },
    RandomUser,
    RandomEmote,
}

impl Command {
    /// Parse a chat message
    ///
    /// Returns `Ok(None)` for messages without the prefix and for unknown
    /// command names. Bad arguments to a known command are an error.
    pub fn parse(content: &str, prefix: &str) -> Result<Option<Self>, DomainError> {
        let Some(rest) = content.trim_start().strip_prefix(prefix) else {
            return Ok(None);
        };
        let mut args = rest.split_whitespace();
        let Some(name) = args.next() else {
            return Ok(None);
        };

        let command = match name {
            "get-stats" => {
                let kind = match args.next() {
                    Some(arg) if !is_mention(arg) => StatKind::parse(arg)?,
                    _ => StatKind::default(),
                };
                Self::GetStats {
                    kind,
                    users: parse_mentions(rest),
                }
            }
            "store-stats" => Self::StoreStats,
            "add-stats" => Self::AddStats,
            "calc-stats" => Self::CalcStats {
                msg_limit: args.next().map(|a| parse_count("msg_limit", a)).transpose()?,
                response_size: args
                    .next()
                    .map(|a| parse_count("response_size", a))
                    .transpose()?,
            },
            "random-user" => Self::RandomUser,
            "random-emote" => Self::RandomEmote,
            _ => return Ok(None),
        };

        Ok(Some(command))
    }

    /// Name as typed after the prefix
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GetStats { .. } => "get-stats",
            Self::StoreStats => "store-stats",
            Self::AddStats => "add-stats",
            Self::CalcStats { .. } => "calc-stats",
            Self::RandomUser => "random-user",
            Self::RandomEmote => "random-emote",
        }
    }

    /// Whether the caller must hold the admin role
    #[must_use]
    pub const fn requires_admin(&self) -> bool {
        matches!(self, Self::StoreStats)
    }
}

fn parse_count(name: &str, raw: &str) -> Result<usize, DomainError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DomainError::InvalidArgument(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
    }
}

fn is_mention(token: &str) -> bool {
    mention_id(token).is_some()
}

fn mention_id(token: &str) -> Option<Snowflake> {
    let inner = token.strip_prefix("<@")?.strip_suffix('>')?;
    let digits = inner.strip_prefix('!').unwrap_or(inner);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Snowflake::parse(digits).ok()
}

/// User mentions (`<@id>` or `<@!id>`) in order of appearance, without repeats
pub fn parse_mentions(content: &str) -> Vec<Snowflake> {
    let mut users = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find("<@") {
        let candidate = &rest[start..];
        let Some(end) = candidate.find('>') else {
            break;
        };
        if let Some(id) = mention_id(&candidate[..=end]) {
            if !users.contains(&id) {
                users.push(id);
            }
        }
        rest = &candidate[2..];
    }

    users
}
