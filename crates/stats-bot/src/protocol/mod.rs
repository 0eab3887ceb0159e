//! Gateway protocol definitions
//!
//! Client-side view of the chat server's WebSocket protocol: op codes, frame
//! format, close codes and the dispatch events the bot consumes.

mod close_codes;
mod events;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use events::{GatewayEvent, GuildRef, MessageCreateEvent, ReactionPayload, ReadyEvent, UserPayload};
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties};
