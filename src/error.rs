//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::config::ConfigError;
pub use crate::crm::CrmError;
pub use crate::state::StateError;

/// Main application error type.
///
/// Wraps the module-level errors with `#[from]` conversions so `?` works
/// across layers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// CRM API errors
    #[error("CRM API error: {0}")]
    Crm(#[from] CrmError),

    /// State management errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Runtime creation errors
    #[error("Failed to create runtime: {0}")]
    RuntimeCreation(String),
}
