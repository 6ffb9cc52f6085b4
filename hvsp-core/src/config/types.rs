//! Timing, target and top-level configuration types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::PinMap;

/// Configuration version written by this firmware
pub const CONFIG_VERSION: u8 = 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The same GPIO is assigned to two functions
    DuplicatePin(u8),
    /// Clock half period must be at least 1 µs
    ZeroHalfPeriod,
    /// Readiness poll interval must be non-zero and below the timeout
    InvalidReadyPoll,
    /// Unsupported configuration version
    VersionMismatch,
}

/// HVSP timing contract
///
/// All values are minimums; the timing source may wait longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Half period of the serial clock (5 µs gives ~100 kHz)
    pub half_period_us: u32,
    /// Supply/RESET settle time before 12 V is applied
    pub settle_us: u32,
    /// Hold time after 12 V is applied, before SDO is released
    pub hv_assert_us: u32,
    /// Delay before the target's SDO is meaningful
    pub bring_up_us: u32,
    /// Upper bound on the wait for SDO to go high
    pub ready_timeout_us: u32,
    /// SDO polling interval during the readiness wait
    pub ready_poll_us: u32,
    /// Minimum quiet time after a session, before the next trigger
    pub cooldown_ms: u32,
    /// Maximum time a session may spend waiting before it is forced to
    /// finalize
    pub session_budget_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            half_period_us: 5,
            settle_us: 20,
            hv_assert_us: 10,
            bring_up_us: 300,
            ready_timeout_us: 5_000,
            ready_poll_us: 10,
            cooldown_ms: 1_000,
            session_budget_ms: 250,
        }
    }
}

impl TimingConfig {
    /// Check the timing values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.half_period_us == 0 {
            return Err(ConfigError::ZeroHalfPeriod);
        }
        if self.ready_poll_us == 0 || self.ready_poll_us > self.ready_timeout_us {
            return Err(ConfigError::InvalidReadyPoll);
        }
        Ok(())
    }

    /// Number of SDO polls that fit in the readiness timeout
    pub fn ready_polls(&self) -> u32 {
        (self.ready_timeout_us / self.ready_poll_us.max(1)).max(1)
    }
}

/// Device the rescue is valid for, and the fuse values it restores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TargetProfile {
    /// Signature bytes 1 and 2, composed big-endian
    pub signature: u16,
    /// Low fuse value to write
    pub lfuse: u8,
    /// High fuse value to write
    pub hfuse: u8,
}

/// ATtiny13/13A with factory fuses: 9.6 MHz internal RC with CKDIV8,
/// SPIEN programmed, RESET pin enabled, debugWIRE and BOD off
pub const ATTINY13: TargetProfile = TargetProfile {
    signature: 0x9007,
    lfuse: 0x6A,
    hfuse: 0xFF,
};

/// Complete rescue configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RescueConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Pin assignment table
    pub pins: PinMap,
    /// Protocol timing
    pub timing: TimingConfig,
    /// Button debounce time
    pub debounce_ms: u32,
}

impl Default for RescueConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            pins: PinMap::default(),
            timing: TimingConfig::default(),
            debounce_ms: 30,
        }
    }
}

impl RescueConfig {
    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        self.pins.validate()?;
        self.timing.validate()
    }
}
