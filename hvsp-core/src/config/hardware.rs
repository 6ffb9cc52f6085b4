//! Hardware configuration types
//!
//! Pin assignment table for the HVSP lines, the status LED and the
//! activation button.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::ConfigError;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }
}

/// Pin assignment table
///
/// The defaults match the reference board: a Pico with the 12 V switch
/// transistor on GPIO2, the target's SCI/SDO/SII/SDI on GPIO3..6, the
/// target VCC switch on GPIO7, the on-board LED and a button to ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinMap {
    /// 12 V level shifter control (pin LOW = 12 V on RESET)
    pub reset: PinConfig,
    /// Target SCI
    pub clock: PinConfig,
    /// Target SDO
    pub data_out: PinConfig,
    /// Target SII
    pub instr_in: PinConfig,
    /// Target SDI
    pub data_in: PinConfig,
    /// Target VCC switch, if the board has one
    pub supply: Option<PinConfig>,
    /// Status LED
    pub led: PinConfig,
    /// Activation button
    pub button: PinConfig,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            reset: PinConfig::new(2),
            clock: PinConfig::new(3),
            data_out: PinConfig::with_pullup(4),
            instr_in: PinConfig::new(5),
            data_in: PinConfig::new(6),
            supply: Some(PinConfig::new(7)),
            led: PinConfig::new(25),
            button: PinConfig {
                pin: 15,
                inverted: true,
                pull_up: true,
            },
        }
    }
}

impl PinMap {
    /// Number of entries in the table (supply counted even when absent)
    pub const SLOTS: usize = 8;

    /// Pin numbers in use, in table order
    pub fn pins(&self) -> [Option<u8>; Self::SLOTS] {
        [
            Some(self.reset.pin),
            Some(self.clock.pin),
            Some(self.data_out.pin),
            Some(self.instr_in.pin),
            Some(self.data_in.pin),
            self.supply.map(|s| s.pin),
            Some(self.led.pin),
            Some(self.button.pin),
        ]
    }

    /// Check that no GPIO is assigned twice
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = self.pins();
        for (i, a) in pins.iter().enumerate() {
            let Some(a) = a else { continue };
            if pins[i + 1..].iter().any(|b| *b == Some(*a)) {
                return Err(ConfigError::DuplicatePin(*a));
            }
        }
        Ok(())
    }
}
