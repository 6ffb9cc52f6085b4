//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in hvsp-core, built on
//! the pin traits from hvsp-hal:
//!
//! - [`lines::GpioLines`]: the five HVSP lines plus optional supply switch
//! - [`trigger::DebouncedButton`]: push button activation trigger
//! - [`status::StatusLed`]: single LED with per-outcome blink patterns

#![no_std]
#![deny(unsafe_code)]

pub mod lines;
pub mod status;
pub mod trigger;

pub use lines::GpioLines;
pub use status::{BlinkPattern, StatusLed};
pub use trigger::DebouncedButton;
