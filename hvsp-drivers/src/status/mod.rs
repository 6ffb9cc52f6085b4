//! Result indicators

pub mod led;

pub use led::{BlinkPattern, StatusLed};
