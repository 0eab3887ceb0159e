//! # stats-service
//!
//! Application layer: counting events into the store, walking channel
//! history, rebuilding counters, reporting, and the operator command surface.

pub mod commands;
pub mod services;

pub use commands::{Command, CommandInvocation, CommandSurface, SurfaceSettings};
pub use services::{
    ChannelWalker, EventCounter, NoopObserver, RebuildObserver, RebuildSummary, Rebuilder,
    ReactionTally, Report, ReportEntry, Reporter, ServiceError, ServiceResult, StartupRecord,
    StatsContext, WalkOutcome, WatermarkTracker,
};
