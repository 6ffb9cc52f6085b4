//! High-Voltage Serial Programming
//!
//! Three layers, leaf-first:
//!
//! - [`frame`]: the 11-bit wire framing
//! - [`engine`]: the bit engine that clocks one frame pair per `shift`
//! - [`commands`]: signature and fuse command sequences built from shifts
//!
//! [`fuse`] holds the fuse descriptors and bit decoding for the ATtiny13.

pub mod commands;
pub mod engine;
pub mod frame;
pub mod fuse;

pub use commands::HvspCommands;
pub use engine::{BitEngine, Readiness, Shifter};
pub use frame::{frame, unframe, FRAME_BITS};
pub use fuse::{Fuse, FuseDescriptor, FusePair, HighFuse, LowFuse, HFUSE, LFUSE};
