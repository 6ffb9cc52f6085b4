//! Trigger and status traits

use crate::state::Outcome;

/// Source of recovery requests (typically a debounced push button)
pub trait Trigger {
    /// Poll for a new activation request
    ///
    /// Implementations debounce; a `true` return is treated as one
    /// deliberate press.
    fn activation_requested(&mut self) -> bool;
}

/// Human-visible result signal
pub trait StatusIndicator {
    /// Called once when a session leaves IDLE
    fn session_started(&mut self) {}

    /// Render the outcome of a finished session
    ///
    /// Called exactly once per session.
    fn report_result(&mut self, outcome: Outcome);
}
