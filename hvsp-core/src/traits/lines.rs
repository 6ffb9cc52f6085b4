//! HVSP line traits

/// Logical HVSP lines, named from the target's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Control pin of the 12 V level shifter on the target's RESET pin
    Reset,
    /// Serial clock input (SCI)
    Clock,
    /// Serial data output of the target (SDO), read by the programmer
    DataOut,
    /// Serial instruction input (SII)
    InstrIn,
    /// Serial data input (SDI)
    DataIn,
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Push-pull output
    Output,
    /// Input with the internal pull-up enabled
    InputPullUp,
}

/// Logic level on a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Level of bit `bit` in `value`
    pub const fn of_bit(value: u16, bit: u8) -> Self {
        if (value >> bit) & 1 == 1 {
            Level::High
        } else {
            Level::Low
        }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// The five GPIO lines an HVSP session drives
///
/// Levels are pin levels as seen by the programmer MCU. Any inversion
/// introduced by level shifters on the board is the implementation's
/// concern, except for `Line::Reset`, whose "12 V on" level is LOW at the
/// pin (see [`crate::rescue::HV_ON_LEVEL`]).
pub trait HvspLines {
    /// Set the direction of a line
    fn configure(&mut self, line: Line, direction: Direction);

    /// Drive a line
    ///
    /// On a line that is currently an input the level is latched and
    /// applied when the line becomes an output.
    fn drive(&mut self, line: Line, level: Level);

    /// Read a line configured as input
    fn read(&mut self, line: Line) -> Level;

    /// Switch the target's supply voltage, if the board controls it
    fn set_supply(&mut self, _on: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_of_bit() {
        assert_eq!(Level::of_bit(0b100, 2), Level::High);
        assert_eq!(Level::of_bit(0b100, 1), Level::Low);
        assert_eq!(Level::of_bit(0x400, 10), Level::High);
    }

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(Level::High.is_high());
        assert!(!Level::Low.is_high());
    }
}
