//! Domain entities

mod channel;
mod emoji;
mod member;
mod message;
mod user;

pub use channel::{Channel, ChannelType};
pub use emoji::Emoji;
pub use member::{GuildMember, Role};
pub use message::{Message, MessageReaction};
pub use user::User;
