//! Board-agnostic core logic for the HVSP rescue firmware
//!
//! This crate contains everything that does not depend on a specific
//! microcontroller:
//!
//! - Line, trigger and status traits the hardware layer implements
//! - The HVSP bit engine and command layer
//! - ATtiny13 fuse descriptors and fuse bit decoding
//! - The recovery session state machine and the driver that runs it
//! - Session time budget guard
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod hvsp;
pub mod rescue;
pub mod safety;
pub mod state;
pub mod traits;

#[cfg(test)]
mod mock;

pub use rescue::Rescuer;
pub use state::{ErrorKind, Outcome, State};
