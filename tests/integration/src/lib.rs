//! Integration test utilities for the stats bot
//!
//! This crate provides an in-memory chat server and helpers for running the
//! stats services end to end, against the in-memory store or a real Redis.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
