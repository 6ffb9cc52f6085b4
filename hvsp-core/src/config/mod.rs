//! Configuration types
//!
//! Board-agnostic configuration: pin assignment table, protocol timing and
//! the target profile the rescue writes.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
