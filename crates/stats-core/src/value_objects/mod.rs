//! Value objects - immutable domain primitives

mod snowflake;
mod stat_kind;

pub use snowflake::{Snowflake, SnowflakeParseError};
pub use stat_kind::{StatKind, StatKindParseError, StatScope, STARTUP_KEY, WATERMARK_KEY};
