//! Inter-task communication
//!
//! The rescue task owns the HVSP lines; the status task owns the LED. The
//! only thing they share is the outcome of the last session.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use hvsp_core::traits::StatusIndicator;
use hvsp_core::Outcome;

/// Outcome of the last finished session
pub static RESULT_SIGNAL: Signal<CriticalSectionRawMutex, Outcome> = Signal::new();

/// Status indicator that forwards results to the status task
pub struct SignalIndicator;

impl StatusIndicator for SignalIndicator {
    fn report_result(&mut self, outcome: Outcome) {
        RESULT_SIGNAL.signal(outcome);
    }
}
