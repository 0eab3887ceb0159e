//! Gateway operation codes

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gateway operation codes as seen by a client
///
/// Codes the bot never acts on are kept as `Other` instead of failing the
/// whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Event dispatched by the server
    Dispatch,
    /// Keep-alive, sent by either side
    Heartbeat,
    /// Session authentication, sent by the client
    Identify,
    /// Server asks the client to reconnect
    Reconnect,
    /// Session rejected by the server
    InvalidSession,
    /// First frame after connecting
    Hello,
    /// Heartbeat acknowledged
    HeartbeatAck,
    /// Any other code
    Other(u8),
}

impl From<u8> for OpCode {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            5 => Self::Reconnect,
            7 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => Self::Other(other),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        match op {
            OpCode::Dispatch => 0,
            OpCode::Heartbeat => 1,
            OpCode::Identify => 2,
            OpCode::Reconnect => 5,
            OpCode::InvalidSession => 7,
            OpCode::Hello => 10,
            OpCode::HeartbeatAck => 11,
            OpCode::Other(value) => value,
        }
    }
}

impl Serialize for OpCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*self))
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u8::deserialize(deserializer).map(Self::from)
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Dispatch => "Dispatch",
            Self::Heartbeat => "Heartbeat",
            Self::Identify => "Identify",
            Self::Reconnect => "Reconnect",
            Self::InvalidSession => "InvalidSession",
            Self::Hello => "Hello",
            Self::HeartbeatAck => "HeartbeatAck",
            Self::Other(_) => "Other",
        };
        write!(f, "{name} ({})", u8::from(*self))
    }
}
