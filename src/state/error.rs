//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The current page has no rows
    #[error("Nothing to export on this page")]
    NothingToExport,

    /// The screen has no filter in the requested slot
    #[error("{screen} has no filter #{slot}")]
    NoSuchFilter { screen: &'static str, slot: usize },

    /// The screen does not filter by date
    #[error("{0} cannot be filtered by date")]
    DateRangeUnsupported(&'static str),

    /// Network worker is gone
    #[error("Network worker is not running")]
    NetworkUnavailable,
}
