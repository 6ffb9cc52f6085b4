//! Session guard
//!
//! Trips when a session has waited longer than its budget.

use crate::state::ErrorKind;

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// All conditions normal
    Ok,
    /// Safety condition violated
    Fault(ErrorKind),
}

/// Time budget check for one session
#[derive(Debug, Clone)]
pub struct SessionGuard {
    budget_us: u64,
    tripped: bool,
}

impl SessionGuard {
    pub fn new(budget_ms: u32) -> Self {
        Self {
            budget_us: budget_ms as u64 * 1_000,
            tripped: false,
        }
    }

    /// Re-arm for a new session
    pub fn reset(&mut self) {
        self.tripped = false;
    }

    /// Check elapsed session time
    ///
    /// Reports the overrun once; later checks in the same session return
    /// `Ok` so teardown is not interrupted.
    pub fn check(&mut self, elapsed_us: u64) -> SafetyStatus {
        if self.tripped || elapsed_us <= self.budget_us {
            return SafetyStatus::Ok;
        }
        self.tripped = true;
        SafetyStatus::Fault(ErrorKind::SessionOverrun)
    }
}
