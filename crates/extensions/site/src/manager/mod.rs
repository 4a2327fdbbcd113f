//! Browser instance manager.
//!
//! Launches Chrome with a persistent profile (so the site login survives
//! between runs) or attaches to one already listening on the debug port.

mod manager_core;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
