//! Session safety
//!
//! Keeps programming voltage from staying on a target indefinitely: all
//! waiting inside a session is metered and checked against a budget.

pub mod metered;
pub mod monitor;

pub use metered::MeteredDelay;
pub use monitor::{SafetyStatus, SessionGuard};
