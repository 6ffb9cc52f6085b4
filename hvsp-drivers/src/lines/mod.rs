//! HVSP line drivers

pub mod gpio;

pub use gpio::{GpioLines, LinePins};
