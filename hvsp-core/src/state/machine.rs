//! State machine definition

use super::events::Event;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting for a trigger; lines released
    Idle,
    /// Lines set up, supply on, programming voltage not yet applied
    PoweringUp,
    /// 12 V on RESET, waiting out the HVSP bring-up delay
    AwaitingReady,
    /// Reading the target signature
    Identifying,
    /// Writing and verifying fuses
    Programming,
    /// Target not identified; write path skipped
    Rejected,
    /// Removing programming voltage and supply
    Finalizing,
}

/// Faults a session can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// DATA_OUT never went high within the bounded wait
    ReadinessTimeout,
    /// Signature did not match the target profile
    IdentityMismatch,
    /// Fuse read-back differs from the written values
    VerifyMismatch,
    /// Session exceeded its time budget
    SessionOverrun,
}

/// Result reported once per finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// Fuses written and read back as intended
    Success,
    /// Target absent or not an ATtiny13; nothing written
    Rejected,
    /// Writes issued but read-back disagrees
    VerifyMismatch,
}

impl State {
    /// Check if a session is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self, State::Idle)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Idle, Activate) => PoweringUp,

            (PoweringUp, PowerSettled) => AwaitingReady,

            (AwaitingReady, BringUpElapsed) => Identifying,

            (Identifying, TargetIdentified) => Programming,
            (Identifying, TargetRejected) => Rejected,

            (Programming, FusesWritten) => Finalizing,

            (Rejected, RejectionRecorded) => Finalizing,

            (Finalizing, PowerRemoved) => Idle,

            // A fault anywhere in the session still has to tear down
            (PoweringUp | AwaitingReady | Identifying | Programming | Rejected, Fault(_)) => {
                Finalizing
            }

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flow() {
        let state = State::Idle
            .transition(Event::Activate)
            .transition(Event::PowerSettled)
            .transition(Event::BringUpElapsed);
        assert_eq!(state, State::Identifying);

        let state = state.transition(Event::TargetIdentified);
        assert_eq!(state, State::Programming);

        let state = state.transition(Event::FusesWritten);
        assert_eq!(state, State::Finalizing);

        assert_eq!(state.transition(Event::PowerRemoved), State::Idle);
    }

    #[test]
    fn test_rejection_flow() {
        let state = State::Identifying.transition(Event::TargetRejected);
        assert_eq!(state, State::Rejected);
        assert_eq!(state.transition(Event::RejectionRecorded), State::Finalizing);
    }

    #[test]
    fn test_activate_ignored_while_busy() {
        let states = [
            State::PoweringUp,
            State::AwaitingReady,
            State::Identifying,
            State::Programming,
            State::Rejected,
            State::Finalizing,
        ];

        for state in states {
            assert_eq!(state.transition(Event::Activate), state);
        }
    }

    #[test]
    fn test_fault_jumps_to_finalizing() {
        let states = [
            State::PoweringUp,
            State::AwaitingReady,
            State::Identifying,
            State::Programming,
            State::Rejected,
        ];

        for state in states {
            let next = state.transition(Event::Fault(ErrorKind::SessionOverrun));
            assert_eq!(next, State::Finalizing);
        }
    }

    #[test]
    fn test_fault_ignored_when_idle_or_finalizing() {
        let fault = Event::Fault(ErrorKind::ReadinessTimeout);
        assert_eq!(State::Idle.transition(fault), State::Idle);
        assert_eq!(State::Finalizing.transition(fault), State::Finalizing);
    }

    #[test]
    fn test_no_shortcut_to_programming() {
        assert_eq!(State::Idle.transition(Event::TargetIdentified), State::Idle);
        assert_eq!(
            State::AwaitingReady.transition(Event::TargetIdentified),
            State::AwaitingReady
        );
        assert_eq!(
            State::Rejected.transition(Event::TargetIdentified),
            State::Rejected
        );
    }
}
