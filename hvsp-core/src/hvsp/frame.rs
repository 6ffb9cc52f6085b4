//! HVSP frame format
//!
//! Each shift moves one 11-bit frame per line, MSB first:
//!
//! ```text
//! bit  10     9 ........ 2    1   0
//!     ┌─────┬──────────────┬───────┐
//!     │  0  │   payload    │ 0   0 │
//!     └─────┴──────────────┴───────┘
//!     start                  stop
//! ```

/// Clock pulses per shift
pub const FRAME_BITS: u8 = 11;

/// Position of the payload's LSB within a frame
pub const PAYLOAD_SHIFT: u8 = 2;

/// Frame a payload byte for transmission
pub const fn frame(payload: u8) -> u16 {
    (payload as u16) << PAYLOAD_SHIFT
}

/// Extract the payload byte from a sampled 11-bit response
///
/// The start bit (bit 10) falls off the top of the byte.
pub const fn unframe(response: u16) -> u8 {
    (response >> PAYLOAD_SHIFT) as u8
}
