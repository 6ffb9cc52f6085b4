//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod rescue;
pub mod status;

pub use rescue::{rescue_task, Lines, POLL_INTERVAL_MS};
pub use status::status_task;
