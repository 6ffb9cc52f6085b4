//! GPIO-backed HVSP lines
//!
//! Maps the five logical lines onto direction-switchable pins. Each line
//! can be inverted to account for level shifters on the board; the 12 V
//! switch polarity on RESET is already handled by the session driver, so
//! only invert RESET on boards whose switch is non-inverting.

use hvsp_core::config::PinMap;
use hvsp_core::traits::{Direction, HvspLines, Level, Line};
use hvsp_hal::{FlexPin, OutputPin};

/// The five pins of an HVSP connector
pub struct LinePins<P> {
    pub reset: P,
    pub clock: P,
    pub data_out: P,
    pub instr_in: P,
    pub data_in: P,
}

/// HVSP lines over GPIO pins
pub struct GpioLines<P, S> {
    pins: LinePins<P>,
    /// Per-line inversion, indexed by `slot`
    inverted: [bool; 5],
    supply: Option<S>,
    supply_inverted: bool,
}

fn slot(line: Line) -> usize {
    match line {
        Line::Reset => 0,
        Line::Clock => 1,
        Line::DataOut => 2,
        Line::InstrIn => 3,
        Line::DataIn => 4,
    }
}

impl<P: FlexPin, S: OutputPin> GpioLines<P, S> {
    /// Create lines with no inversion and no supply switch
    pub fn new(pins: LinePins<P>) -> Self {
        Self {
            pins,
            inverted: [false; 5],
            supply: None,
            supply_inverted: false,
        }
    }

    /// Create lines using the inversion flags of a pin map
    ///
    /// `supply` should be the pin named by `map.supply`, if any.
    pub fn from_map(pins: LinePins<P>, supply: Option<S>, map: &PinMap) -> Self {
        let mut lines = Self::new(pins)
            .inverted(Line::Reset, map.reset.inverted)
            .inverted(Line::Clock, map.clock.inverted)
            .inverted(Line::DataOut, map.data_out.inverted)
            .inverted(Line::InstrIn, map.instr_in.inverted)
            .inverted(Line::DataIn, map.data_in.inverted);
        if let Some(pin) = supply {
            let inverted = map.supply.map(|s| s.inverted).unwrap_or(false);
            lines = lines.with_supply(pin, inverted);
        }
        lines
    }

    pub fn inverted(mut self, line: Line, inverted: bool) -> Self {
        self.inverted[slot(line)] = inverted;
        self
    }

    /// Attach a target VCC switch; it starts switched off
    pub fn with_supply(mut self, pin: S, inverted: bool) -> Self {
        self.supply = Some(pin);
        self.supply_inverted = inverted;
        self.set_supply(false);
        self
    }

    pub fn has_supply(&self) -> bool {
        self.supply.is_some()
    }

    fn pin(&mut self, line: Line) -> &mut P {
        match line {
            Line::Reset => &mut self.pins.reset,
            Line::Clock => &mut self.pins.clock,
            Line::DataOut => &mut self.pins.data_out,
            Line::InstrIn => &mut self.pins.instr_in,
            Line::DataIn => &mut self.pins.data_in,
        }
    }
}

impl<P: FlexPin, S: OutputPin> HvspLines for GpioLines<P, S> {
    fn configure(&mut self, line: Line, direction: Direction) {
        let pin = self.pin(line);
        match direction {
            Direction::Output => pin.set_as_output(),
            Direction::InputPullUp => pin.set_as_input_pullup(),
        }
    }

    fn drive(&mut self, line: Line, level: Level) {
        let high = level.is_high() != self.inverted[slot(line)];
        self.pin(line).set_state(high);
    }

    fn read(&mut self, line: Line) -> Level {
        let inverted = self.inverted[slot(line)];
        Level::from(self.pin(line).is_high() != inverted)
    }

    fn set_supply(&mut self, on: bool) {
        let inverted = self.supply_inverted;
        if let Some(pin) = self.supply.as_mut() {
            pin.set_state(on != inverted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hvsp_core::config::PinConfig;
    use hvsp_hal::InputPin;

    /// Mock GPIO pin for testing
    #[derive(Default)]
    struct MockPin {
        high: bool,
        output: bool,
        /// Level seen on the pad while the pin is an input
        external: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    impl InputPin for MockPin {
        fn is_high(&self) -> bool {
            if self.output {
                self.high
            } else {
                self.external
            }
        }
    }

    impl FlexPin for MockPin {
        fn set_as_output(&mut self) {
            self.output = true;
        }

        fn set_as_input_pullup(&mut self) {
            self.output = false;
        }

        fn is_output(&self) -> bool {
            self.output
        }
    }

    fn pins() -> LinePins<MockPin> {
        LinePins {
            reset: MockPin::default(),
            clock: MockPin::default(),
            data_out: MockPin::default(),
            instr_in: MockPin::default(),
            data_in: MockPin::default(),
        }
    }

    #[test]
    fn test_drive_and_configure() {
        let mut lines: GpioLines<MockPin, MockPin> = GpioLines::new(pins());
        lines.configure(Line::Clock, Direction::Output);
        lines.drive(Line::Clock, Level::High);
        assert!(lines.pins.clock.is_output());
        assert!(lines.pins.clock.is_set_high());

        lines.configure(Line::DataOut, Direction::InputPullUp);
        assert!(!lines.pins.data_out.is_output());
    }

    #[test]
    fn test_inverted_line() {
        let mut lines: GpioLines<MockPin, MockPin> =
            GpioLines::new(pins()).inverted(Line::Reset, true);
        lines.drive(Line::Reset, Level::Low);
        assert!(lines.pins.reset.is_set_high());
        lines.drive(Line::Reset, Level::High);
        assert!(lines.pins.reset.is_set_low());
    }

    #[test]
    fn test_read_data_out() {
        let mut lines: GpioLines<MockPin, MockPin> = GpioLines::new(pins());
        lines.configure(Line::DataOut, Direction::InputPullUp);
        lines.pins.data_out.external = true;
        assert_eq!(lines.read(Line::DataOut), Level::High);

        let mut lines = lines.inverted(Line::DataOut, true);
        assert_eq!(lines.read(Line::DataOut), Level::Low);
    }

    #[test]
    fn test_supply_starts_off() {
        let mut lines = GpioLines::new(pins()).with_supply(
            MockPin {
                high: true,
                ..Default::default()
            },
            false,
        );
        assert!(lines.has_supply());
        assert!(!lines.supply.as_ref().unwrap().is_set_high());

        lines.set_supply(true);
        assert!(lines.supply.as_ref().unwrap().is_set_high());
    }

    #[test]
    fn test_active_low_supply() {
        let mut lines = GpioLines::new(pins()).with_supply(MockPin::default(), true);
        assert!(lines.supply.as_ref().unwrap().is_set_high());
        lines.set_supply(true);
        assert!(lines.supply.as_ref().unwrap().is_set_low());
    }

    #[test]
    fn test_no_supply_is_noop() {
        let mut lines: GpioLines<MockPin, MockPin> = GpioLines::new(pins());
        lines.set_supply(true);
        assert!(!lines.has_supply());
    }

    #[test]
    fn test_from_map() {
        let mut map = PinMap::default();
        map.clock = PinConfig::inverted(3);
        map.supply = Some(PinConfig::inverted(7));

        let mut lines = GpioLines::from_map(pins(), Some(MockPin::default()), &map);
        lines.drive(Line::Clock, Level::Low);
        assert!(lines.pins.clock.is_set_high());
        lines.drive(Line::DataIn, Level::Low);
        assert!(lines.pins.data_in.is_set_low());
        assert!(lines.supply.as_ref().unwrap().is_set_high());
    }

    #[test]
    fn test_runs_a_session() {
        use hvsp_core::{Outcome, Rescuer};

        struct NoDelay;
        impl embedded_hal::delay::DelayNs for NoDelay {
            fn delay_ns(&mut self, _ns: u32) {}
        }

        // No target attached: SDO floats low, so the session is rejected
        let lines = GpioLines::new(pins()).with_supply(MockPin::default(), false);
        let mut rescuer = Rescuer::new(lines, NoDelay, Default::default());
        assert!(rescuer.activate());
        assert_eq!(rescuer.run_session(), Some(Outcome::Rejected));

        let (lines, _) = rescuer.release();
        assert!(lines.pins.reset.is_set_high());
        assert!(lines.supply.as_ref().unwrap().is_set_low());
    }
}
