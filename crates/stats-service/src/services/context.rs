//! Service context - dependency container for the stats services
//!
//! Holds the counter store and chat client handles built at start-up.

use std::sync::Arc;

use stats_core::{ChatClient, CounterStore};

/// Service context shared by every stats service
///
/// Cloning is cheap: both handles are reference counted.
#[derive(Clone)]
pub struct StatsContext {
    store: Arc<dyn CounterStore>,
    chat: Arc<dyn ChatClient>,
}

impl StatsContext {
    /// Create a new context from explicit handles
    pub fn new(store: Arc<dyn CounterStore>, chat: Arc<dyn ChatClient>) -> Self {
        Self { store, chat }
    }

    /// Counter store
    #[inline]
    pub fn store(&self) -> &dyn CounterStore {
        self.store.as_ref()
    }

    /// Chat server client
    #[inline]
    pub fn chat(&self) -> &dyn ChatClient {
        self.chat.as_ref()
    }
}

impl std::fmt::Debug for StatsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsContext").finish_non_exhaustive()
    }
}
