//! Events that trigger state transitions

use super::machine::ErrorKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Debounced activation request accepted
    Activate,

    // Power sequencing
    /// Settle delay elapsed and 12 V applied to RESET
    PowerSettled,
    /// HVSP bring-up delay elapsed
    BringUpElapsed,

    // Identification
    /// Signature matched the target profile
    TargetIdentified,
    /// Signature did not match, or the target never became ready
    TargetRejected,

    // Programming
    /// Fuse writes issued and read back
    FusesWritten,
    /// Rejection logged, nothing written
    RejectionRecorded,

    // Teardown
    /// Programming voltage and supply removed, cooldown elapsed
    PowerRemoved,

    /// Session guard tripped; skip straight to teardown
    Fault(ErrorKind),
}
