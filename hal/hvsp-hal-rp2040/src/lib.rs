//! RP2040-specific HAL for the HVSP rescue firmware
//!
//! This crate provides RP2040 implementations of the `hvsp-hal` pin traits
//! plus the pieces needed for config-driven pin assignment:
//!
//! - GPIO newtypes over `embassy-rp` pins
//! - Pin bank to take pins by number at runtime
//! - Pin string parsing

#![no_std]

pub mod gpio;
pub mod pins;

pub use gpio::{parse_pin_string, RpFlex, RpInput, RpOutput, GPIO_COUNT};
pub use pins::{PinBank, PinError};
