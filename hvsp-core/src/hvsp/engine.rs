//! HVSP bit engine
//!
//! One `shift` clocks a frame out on SDI and SII in parallel while
//! sampling one response bit per pulse on SDO.

use embedded_hal::delay::DelayNs;

use super::frame::{frame, unframe, FRAME_BITS};
use crate::config::TimingConfig;
use crate::traits::{HvspLines, Level, Line};

/// Something that can perform an HVSP shift
///
/// The command layer is written against this trait so it can be tested
/// without lines or timing.
pub trait Shifter {
    /// Clock `sdi` out on DATA_IN and `sii` out on INSTR_IN, returning the
    /// byte sampled on DATA_OUT
    fn shift(&mut self, sdi: u8, sii: u8) -> u8;

    /// Wait (bounded) for the target to signal ready on DATA_OUT
    ///
    /// Returns `false` if the target never became ready.
    fn wait_ready(&mut self) -> bool {
        true
    }
}

/// Whether the target has signalled ready since mode entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Readiness {
    /// Not checked yet
    Unknown,
    /// DATA_OUT read high
    Ready,
    /// DATA_OUT stayed low for the whole timeout
    TimedOut,
}

/// Bit-banged HVSP engine over borrowed lines and timing source
///
/// Lives for one session stage; [`BitEngine::resume`] carries the
/// readiness state across stages so the initial wait happens once per
/// session.
pub struct BitEngine<'a, L, D> {
    lines: &'a mut L,
    delay: &'a mut D,
    timing: TimingConfig,
    readiness: Readiness,
}

impl<'a, L: HvspLines, D: DelayNs> BitEngine<'a, L, D> {
    /// Create an engine right after programming mode entry
    pub fn new(lines: &'a mut L, delay: &'a mut D, timing: TimingConfig) -> Self {
        Self::resume(lines, delay, timing, Readiness::Unknown)
    }

    /// Create an engine continuing a session
    pub fn resume(
        lines: &'a mut L,
        delay: &'a mut D,
        timing: TimingConfig,
        readiness: Readiness,
    ) -> Self {
        Self {
            lines,
            delay,
            timing,
            readiness,
        }
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    fn poll_ready(&mut self) -> bool {
        for _ in 0..self.timing.ready_polls() {
            if self.lines.read(Line::DataOut).is_high() {
                return true;
            }
            self.delay.delay_us(self.timing.ready_poll_us);
        }
        self.lines.read(Line::DataOut).is_high()
    }

    fn clock_pulse(&mut self) {
        self.lines.drive(Line::Clock, Level::High);
        self.delay.delay_us(self.timing.half_period_us);
        self.lines.drive(Line::Clock, Level::Low);
        self.delay.delay_us(self.timing.half_period_us);
    }
}

impl<L: HvspLines, D: DelayNs> Shifter for BitEngine<'_, L, D> {
    fn shift(&mut self, sdi: u8, sii: u8) -> u8 {
        match self.readiness {
            Readiness::Ready => {}
            Readiness::TimedOut => return 0,
            Readiness::Unknown => {
                if !self.wait_ready() {
                    return 0;
                }
            }
        }

        let sdi_frame = frame(sdi);
        let sii_frame = frame(sii);
        let mut response: u16 = 0;

        for bit in (0..FRAME_BITS).rev() {
            self.lines.drive(Line::DataIn, Level::of_bit(sdi_frame, bit));
            self.lines.drive(Line::InstrIn, Level::of_bit(sii_frame, bit));
            response <<= 1;
            if self.lines.read(Line::DataOut).is_high() {
                response |= 1;
            }
            self.clock_pulse();
        }

        trace!("shift sdi={=u8:#x} sii={=u8:#x} -> {=u16:#x}", sdi, sii, response);
        unframe(response)
    }

    fn wait_ready(&mut self) -> bool {
        if self.readiness == Readiness::TimedOut {
            return false;
        }
        if self.poll_ready() {
            self.readiness = Readiness::Ready;
            true
        } else {
            warn!("SDO stayed low for {=u32} us", self.timing.ready_timeout_us);
            self.readiness = Readiness::TimedOut;
            false
        }
    }
}
