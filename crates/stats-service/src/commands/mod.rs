//! Operator command surface
//!
//! Prefixed text commands parsed from chat messages and dispatched to the
//! stats services.

pub mod parser;
pub mod surface;

pub use parser::{parse_mentions, Command};
pub use surface::{error_reply, CommandInvocation, CommandSurface, SurfaceSettings};
