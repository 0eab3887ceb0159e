//! Port traits (interfaces) for the infrastructure the core depends on

mod ports;

pub use ports::{ChatClient, CounterStore, HistoryQuery, PortResult, MAX_PAGE_SIZE};
