//! Fuse descriptors and fuse bit layout for the ATtiny13
//!
//! AVR fuse bits are active-low: 0 means programmed.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Write selector for the low fuse (SII bytes of the two write frames)
pub const LFUSE: u16 = 0x646C;
/// Write selector for the high fuse
pub const HFUSE: u16 = 0x747C;
/// Write selector for the extended fuse (not present on the ATtiny13)
pub const EFUSE: u16 = 0x666E;

/// Fuse bytes addressable over HVSP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fuse {
    Low,
    High,
    Extended,
}

/// SII byte pairs that select a fuse for writing and for reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FuseDescriptor {
    pub write_selector: u16,
    pub read_selector: u16,
}

impl Fuse {
    pub const fn descriptor(self) -> FuseDescriptor {
        match self {
            Fuse::Low => FuseDescriptor {
                write_selector: LFUSE,
                read_selector: 0x686C,
            },
            Fuse::High => FuseDescriptor {
                write_selector: HFUSE,
                read_selector: 0x7A7E,
            },
            Fuse::Extended => FuseDescriptor {
                write_selector: EFUSE,
                read_selector: 0x6A6E,
            },
        }
    }
}

/// Low and high fuse bytes read together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FusePair {
    pub low: u8,
    pub high: u8,
}

impl FusePair {
    pub const fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }
}

/// Clock source selected by CKSEL1:0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSelect {
    /// External clock on CLKI
    External,
    /// Calibrated internal RC at 4.8 MHz
    Internal4M8,
    /// Calibrated internal RC at 9.6 MHz
    Internal9M6,
    /// Watchdog oscillator at 128 kHz
    Internal128k,
}

impl From<u8> for ClockSelect {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => ClockSelect::External,
            0b01 => ClockSelect::Internal4M8,
            0b10 => ClockSelect::Internal9M6,
            _ => ClockSelect::Internal128k,
        }
    }
}

/// Decoded low fuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LowFuse {
    /// Serial programming (ISP) enabled
    pub spi_enabled: bool,
    /// EEPROM preserved through chip erase
    pub eeprom_save: bool,
    /// Watchdog always on
    pub watchdog_on: bool,
    /// System clock divided by 8
    pub clock_div8: bool,
    /// Start-up time (SUT1:0, raw)
    pub startup_time: u8,
    pub clock_select: ClockSelect,
}

impl From<u8> for LowFuse {
    fn from(value: u8) -> Self {
        Self {
            spi_enabled: value & (1 << 7) == 0,
            eeprom_save: value & (1 << 6) == 0,
            watchdog_on: value & (1 << 5) == 0,
            clock_div8: value & (1 << 4) == 0,
            startup_time: (value >> 2) & 0b11,
            clock_select: ClockSelect::from(value),
        }
    }
}

impl LowFuse {
    /// ISP cannot reach the part: SPIEN is unprogrammed or the part runs
    /// from an external clock nobody provides
    pub fn locks_out_isp(&self) -> bool {
        !self.spi_enabled || self.clock_select == ClockSelect::External
    }
}

/// Brown-out detector trigger level (BODLEVEL1:0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BrownOutLevel {
    V4_3,
    V2_7,
    V1_8,
    Disabled,
}

impl From<u8> for BrownOutLevel {
    fn from(value: u8) -> Self {
        match (value >> 1) & 0b11 {
            0b00 => BrownOutLevel::V4_3,
            0b01 => BrownOutLevel::V2_7,
            0b10 => BrownOutLevel::V1_8,
            _ => BrownOutLevel::Disabled,
        }
    }
}

/// Decoded high fuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HighFuse {
    /// Self-programming (SPM) enabled
    pub self_program: bool,
    /// debugWIRE enabled
    pub debug_wire: bool,
    pub brown_out: BrownOutLevel,
    /// RESET pin turned into a GPIO
    pub reset_disabled: bool,
}

impl From<u8> for HighFuse {
    fn from(value: u8) -> Self {
        Self {
            self_program: value & (1 << 4) == 0,
            debug_wire: value & (1 << 3) == 0,
            brown_out: BrownOutLevel::from(value),
            reset_disabled: value & 1 == 0,
        }
    }
}

impl HighFuse {
    /// RESET is unavailable to ISP (disabled outright or taken by debugWIRE)
    pub fn locks_out_isp(&self) -> bool {
        self.reset_disabled || self.debug_wire
    }
}
