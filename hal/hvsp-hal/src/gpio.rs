//! GPIO pin abstractions
//!
//! Provides traits for digital input, output and direction-switching pins
//! that can be implemented by chip-specific HALs.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin whose direction can be switched at runtime
///
/// HVSP needs this for the target's data output line, which the programmer
/// drives low while 12 V is applied and then samples for the rest of the
/// session.
pub trait FlexPin: OutputPin + InputPin {
    /// Switch to push-pull output, keeping the last set level
    fn set_as_output(&mut self);

    /// Switch to input with the internal pull-up enabled
    fn set_as_input_pullup(&mut self);

    /// Check if the pin is currently an output
    fn is_output(&self) -> bool;
}
