//! Hardware abstraction traits
//!
//! These traits define the interface between the recovery logic and the
//! board: the five HVSP lines, the activation trigger and the result
//! indicator. Timing comes from `embedded_hal::delay::DelayNs`.

pub mod lines;
pub mod status;

pub use lines::{Direction, HvspLines, Level, Line};
pub use status::{StatusIndicator, Trigger};
