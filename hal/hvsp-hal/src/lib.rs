//! HVSP Rescue Hardware Abstraction Layer
//!
//! This crate defines the pin traits that chip-specific HALs implement so
//! the line drivers in `hvsp-drivers` can bit-bang the HVSP waveform on
//! any microcontroller.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  hvsp-firmware                          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hvsp-drivers (GpioLines, button, LED)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hvsp-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  hvsp-hal-    │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::FlexPin`] - Pins whose direction changes at runtime

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{FlexPin, InputPin, OutputPin};
