//! Debounced push button
//!
//! Polled at a fixed interval. A level change is accepted once it has been
//! read the same way for `threshold` consecutive samples; only the
//! released → pressed edge counts as an activation.

use hvsp_core::traits::Trigger;
use hvsp_hal::InputPin;

pub struct DebouncedButton<P> {
    pin: P,
    active_low: bool,
    threshold: u8,
    /// Consecutive samples that disagree with `pressed`
    count: u8,
    pressed: bool,
}

impl<P: InputPin> DebouncedButton<P> {
    /// Create a button that needs `threshold` stable samples per change
    ///
    /// The current level is taken as the starting state, so a button held
    /// at boot does not fire until it has been released.
    pub fn new(pin: P, active_low: bool, threshold: u8) -> Self {
        let mut button = Self {
            pin,
            active_low,
            threshold: threshold.max(1),
            count: 0,
            pressed: false,
        };
        button.pressed = button.raw_pressed();
        button
    }

    /// Create a button from a debounce time and the polling interval
    pub fn with_debounce_ms(pin: P, active_low: bool, debounce_ms: u32, poll_ms: u32) -> Self {
        let samples = debounce_ms.div_ceil(poll_ms.max(1));
        Self::new(pin, active_low, samples.min(u8::MAX as u32) as u8)
    }

    fn raw_pressed(&self) -> bool {
        self.pin.is_high() != self.active_low
    }

    /// Take one sample; returns `true` on a debounced press
    pub fn sample(&mut self) -> bool {
        if self.raw_pressed() == self.pressed {
            self.count = 0;
            return false;
        }

        self.count += 1;
        if self.count < self.threshold {
            return false;
        }

        self.count = 0;
        self.pressed = !self.pressed;
        self.pressed
    }

    /// Debounced state
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl<P: InputPin> Trigger for DebouncedButton<P> {
    fn activation_requested(&mut self) -> bool {
        self.sample()
    }
}
