//! Status LED
//!
//! One LED shows the session result as a blink pattern:
//!
//! | Outcome        | Pattern                 |
//! |----------------|-------------------------|
//! | Success        | one long blink (2 s)    |
//! | Rejected       | three slow blinks       |
//! | VerifyMismatch | ten fast blinks         |

use hvsp_core::Outcome;
use hvsp_hal::OutputPin;

/// Repeated on/off blink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkPattern {
    pub blinks: u8,
    pub on_ms: u32,
    pub off_ms: u32,
}

impl BlinkPattern {
    pub const SUCCESS: Self = Self {
        blinks: 1,
        on_ms: 2_000,
        off_ms: 0,
    };

    pub const REJECTED: Self = Self {
        blinks: 3,
        on_ms: 300,
        off_ms: 300,
    };

    pub const VERIFY_MISMATCH: Self = Self {
        blinks: 10,
        on_ms: 60,
        off_ms: 60,
    };

    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Self::SUCCESS,
            Outcome::Rejected => Self::REJECTED,
            Outcome::VerifyMismatch => Self::VERIFY_MISMATCH,
        }
    }

    /// `(led_on, hold_ms)` steps, for callers that wait asynchronously
    pub fn steps(&self) -> impl Iterator<Item = (bool, u32)> + '_ {
        (0..self.blinks).flat_map(move |_| [(true, self.on_ms), (false, self.off_ms)])
    }
}

/// Single status LED
pub struct StatusLed<P> {
    pin: P,
    /// If true, LED on = pin LOW
    inverted: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Create a status LED, initially off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut led = Self { pin, inverted };
        led.set_on(false);
        led
    }

    pub fn set_on(&mut self, on: bool) {
        self.pin.set_state(on != self.inverted);
    }
}
