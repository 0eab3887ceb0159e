//! Chat server clients
//!
//! REST for history and replies, WebSocket gateway for live events.

mod dto;
mod error;
mod gateway;
mod rest;

pub use error::{GatewayError, RestError};
pub use gateway::GatewayClient;
pub use rest::RestChatClient;
