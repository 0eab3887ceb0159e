//! Gateway event handlers

mod events;

pub use events::EventHandler;
