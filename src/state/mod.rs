//! Application state management module.
//!
//! This module contains the core state management for the application, including:
//! - Main `State` struct that owns one collection per screen
//! - Navigation types (`Screen`)
//! - State error handling

mod error;
mod navigation;

pub use error::StateError;
pub use navigation::Screen;

#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::State;
