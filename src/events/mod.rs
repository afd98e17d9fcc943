//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Network events: CRM API page fetches
//! - Terminal events: User input and ticks

pub mod network;
pub mod terminal;
