//! Per-attempt session record

use heapless::Vec;

use super::machine::{ErrorKind, Outcome};
use crate::hvsp::{FusePair, Readiness};

/// Errors kept per session; one of each kind at most
pub const MAX_SESSION_ERRORS: usize = 4;

/// One recovery attempt, created on activation and dropped after the
/// outcome is reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Composed signature bytes 1 and 2, once read
    pub signature: Option<u16>,
    pub fuses_before: Option<FusePair>,
    pub fuses_after: Option<FusePair>,
    pub readiness: Readiness,
    pub errors: Vec<ErrorKind, MAX_SESSION_ERRORS>,
    pub outcome: Option<Outcome>,
    /// At least one fuse write sequence went out
    pub writes_issued: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            signature: None,
            fuses_before: None,
            fuses_after: None,
            readiness: Readiness::Unknown,
            errors: Vec::new(),
            outcome: None,
            writes_issued: false,
        }
    }

    /// Record an error, ignoring repeats of the same kind
    pub fn record(&mut self, kind: ErrorKind) {
        if !self.errors.contains(&kind) {
            // Capacity matches the number of kinds
            let _ = self.errors.push(kind);
        }
    }

    pub fn has_error(&self, kind: ErrorKind) -> bool {
        self.errors.contains(&kind)
    }

    /// Outcome to report for a session cut short by a fault
    ///
    /// Once a write went out the fuse contents are unknown, so the session
    /// cannot report a plain rejection.
    pub fn aborted_outcome(&self) -> Outcome {
        if self.writes_issued {
            Outcome::VerifyMismatch
        } else {
            Outcome::Rejected
        }
    }

    /// Outcome decided so far, falling back to the aborted outcome
    pub fn final_outcome(&self) -> Outcome {
        self.outcome.unwrap_or_else(|| self.aborted_outcome())
    }
}
