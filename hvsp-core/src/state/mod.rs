//! Recovery session state machine
//!
//! One session walks IDLE → POWERING_UP → AWAITING_READY → IDENTIFYING →
//! {PROGRAMMING | REJECTED} → FINALIZING → IDLE. The machine is explicit,
//! finite and deterministic; side effects live in [`crate::rescue`].

pub mod events;
pub mod machine;
pub mod session;

pub use events::Event;
pub use machine::{ErrorKind, Outcome, State};
pub use session::Session;
