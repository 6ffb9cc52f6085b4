//! GPIO pin wrappers and pin string parsing
//!
//! Newtypes over `embassy-rp` GPIO drivers that implement the `hvsp-hal`
//! pin traits.

use embassy_rp::gpio::{AnyPin, Flex, Input, Level, Output, Pull};
use embassy_rp::Peri;
use hvsp_core::config::PinConfig;
use hvsp_hal::{FlexPin, InputPin, OutputPin};

/// Number of user GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// Bidirectional pin used for the HVSP lines
pub struct RpFlex {
    pin: Flex<'static>,
    output: bool,
}

impl RpFlex {
    /// Create a flex pin, starting as an input with pull-up
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        let mut flex = Self {
            pin: Flex::new(pin),
            output: false,
        };
        flex.set_as_input_pullup();
        flex
    }
}

impl OutputPin for RpFlex {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

impl InputPin for RpFlex {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

impl FlexPin for RpFlex {
    fn set_as_output(&mut self) {
        self.pin.set_pull(Pull::None);
        self.pin.set_as_output();
        self.output = true;
    }

    fn set_as_input_pullup(&mut self) {
        self.pin.set_as_input();
        self.pin.set_pull(Pull::Up);
        self.output = false;
    }

    fn is_output(&self) -> bool {
        self.output
    }
}

/// Push-pull output (supply switch, LED)
pub struct RpOutput(Output<'static>);

impl RpOutput {
    /// Create an output at the inactive level for `inverted`
    pub fn new(pin: Peri<'static, AnyPin>, inverted: bool) -> Self {
        let initial = if inverted { Level::High } else { Level::Low };
        Self(Output::new(pin, initial))
    }
}

impl OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Input (activation button)
pub struct RpInput(Input<'static>);

impl RpInput {
    pub fn new(pin: Peri<'static, AnyPin>, pull_up: bool) -> Self {
        let pull = if pull_up { Pull::Up } else { Pull::None };
        Self(Input::new(pin, pull))
    }
}

impl InputPin for RpInput {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio11" -> pin 11
/// - "!gpio12" -> pin 12, inverted (active-low)
/// - "^gpio4" -> pin 4, internal pull-up
/// - "!^gpio15" or "^!gpio15" -> both
pub fn parse_pin_string(s: &str) -> Option<PinConfig> {
    let mut s = s.trim();
    let mut config = PinConfig::default();

    loop {
        if let Some(rest) = s.strip_prefix('!') {
            config.inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            config.pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let pin: u8 = s.strip_prefix("gpio")?.parse().ok()?;
    if pin as usize >= GPIO_COUNT {
        return None;
    }
    config.pin = pin;
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin_string() {
        assert_eq!(parse_pin_string("gpio11"), Some(PinConfig::new(11)));
        assert_eq!(parse_pin_string("!gpio12"), Some(PinConfig::inverted(12)));
        assert_eq!(parse_pin_string("^gpio4"), Some(PinConfig::with_pullup(4)));
        assert_eq!(parse_pin_string(" gpio0 "), Some(PinConfig::new(0)));
        assert_eq!(parse_pin_string("gpio29"), Some(PinConfig::new(29)));

        let both = PinConfig {
            pin: 15,
            inverted: true,
            pull_up: true,
        };
        assert_eq!(parse_pin_string("!^gpio15"), Some(both));
        assert_eq!(parse_pin_string("^!gpio15"), Some(both));

        // Invalid
        assert_eq!(parse_pin_string("gpio30"), None);
        assert_eq!(parse_pin_string("pin11"), None);
        assert_eq!(parse_pin_string("gpio"), None);
        assert_eq!(parse_pin_string(""), None);
    }
}
