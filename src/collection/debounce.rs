//! Quiet-period filter for free-text input.

use std::time::{Duration, Instant};

/// Default quiet period before search input is committed.
///
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Holds back the latest value until no new value arrived for `quiet`.
///
/// Time is passed in by the caller so the terminal tick drives it and
/// tests can use synthetic instants.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Record a new value, restarting the quiet timer.
    ///
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Emit the pending value if the quiet period has elapsed.
    ///
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.quiet => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Emit the pending value immediately.
    ///
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drop the pending value without emitting it.
    ///
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Debouncer::new(DEFAULT_QUIET_PERIOD)
    }
}
