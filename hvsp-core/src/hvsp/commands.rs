//! HVSP command sequences
//!
//! Every command is a fixed list of `(sdi, sii)` shifts. The SII byte
//! selects the operation, the SDI byte carries its operand.

use super::engine::Shifter;
use super::fuse::{Fuse, FusePair};

/// SII: load command
pub const LOAD_COMMAND: u8 = 0x4C;
/// SII: load address low byte
pub const LOAD_ADDRESS_LOW: u8 = 0x0C;
/// SII: load data low byte
pub const LOAD_DATA_LOW: u8 = 0x2C;

/// SDI command code: read signature and calibration bytes
pub const CMD_READ_SIGNATURE: u8 = 0x08;
/// SDI command code: read fuse and lock bits
pub const CMD_READ_FUSES: u8 = 0x04;
/// SDI command code: write fuse bits
pub const CMD_WRITE_FUSES: u8 = 0x40;

/// SII pair that clocks a signature byte out on SDO
pub const SIGNATURE_READ_SELECTOR: u16 = 0x686C;

const fn split(selector: u16) -> (u8, u8) {
    ((selector >> 8) as u8, selector as u8)
}

/// Logical HVSP commands, available on anything that can shift
pub trait HvspCommands: Shifter {
    /// Read signature byte `index` (0..=2)
    fn read_signature_byte(&mut self, index: u8) -> u8 {
        let (hi, lo) = split(SIGNATURE_READ_SELECTOR);
        self.shift(CMD_READ_SIGNATURE, LOAD_COMMAND);
        self.shift(index, LOAD_ADDRESS_LOW);
        self.shift(0x00, hi);
        self.shift(0x00, lo)
    }

    /// Read the part-specific signature bytes 1 and 2 as `(b1 << 8) | b2`
    ///
    /// Byte 0 is the Atmel vendor code and is not part of the identity
    /// check. An unresponsive target reads as `0x0000`.
    fn read_signature(&mut self) -> u16 {
        let high = self.read_signature_byte(1);
        let low = self.read_signature_byte(2);
        let signature = ((high as u16) << 8) | low as u16;
        debug!("signature {=u16:#x}", signature);
        signature
    }

    /// Read a fuse byte through its read selector
    fn read_fuse(&mut self, read_selector: u16) -> u8 {
        let (hi, lo) = split(read_selector);
        self.shift(CMD_READ_FUSES, LOAD_COMMAND);
        self.shift(0x00, hi);
        self.shift(0x00, lo)
    }

    /// Write `value` to the fuse behind `write_selector`
    ///
    /// Returns once the target reports the write complete, or the bounded
    /// wait gives up.
    fn write_fuse(&mut self, write_selector: u16, value: u8) -> bool {
        let (hi, lo) = split(write_selector);
        self.shift(CMD_WRITE_FUSES, LOAD_COMMAND);
        self.shift(value, LOAD_DATA_LOW);
        self.shift(0x00, hi);
        self.shift(0x00, lo);
        debug!("wrote {=u8:#x} via {=u16:#x}", value, write_selector);
        self.wait_ready()
    }

    /// Read the low and high fuse
    fn read_fuses(&mut self) -> FusePair {
        let low = self.read_fuse(Fuse::Low.descriptor().read_selector);
        let high = self.read_fuse(Fuse::High.descriptor().read_selector);
        FusePair::new(low, high)
    }
}

impl<T: Shifter + ?Sized> HvspCommands for T {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::hvsp::fuse::{HFUSE, LFUSE};
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Shifter that records every call and plays back canned responses
    #[derive(Default)]
    pub struct MockShifter {
        pub shifts: Vec<(u8, u8)>,
        pub responses: VecDeque<u8>,
        pub ready_waits: usize,
    }

    impl MockShifter {
        pub fn answering(responses: &[u8]) -> Self {
            Self {
                responses: responses.iter().copied().collect(),
                ..Self::default()
            }
        }

        /// Number of complete fuse-write sequences issued
        pub fn fuse_writes(&self) -> usize {
            self.shifts
                .iter()
                .filter(|&&shift| shift == (CMD_WRITE_FUSES, LOAD_COMMAND))
                .count()
        }
    }

    impl Shifter for MockShifter {
        fn shift(&mut self, sdi: u8, sii: u8) -> u8 {
            self.shifts.push((sdi, sii));
            self.responses.pop_front().unwrap_or(0)
        }

        fn wait_ready(&mut self) -> bool {
            self.ready_waits += 1;
            true
        }
    }

    #[test]
    fn test_write_lfuse_sequence() {
        let mut shifter = MockShifter::default();
        assert!(shifter.write_fuse(LFUSE, 0x6A));

        assert_eq!(
            shifter.shifts,
            [(0x40, 0x4C), (0x6A, 0x2C), (0x00, 0x64), (0x00, 0x6C)]
        );
        assert_eq!(shifter.ready_waits, 1);
    }

    #[test]
    fn test_write_hfuse_sequence() {
        let mut shifter = MockShifter::default();
        shifter.write_fuse(HFUSE, 0xFF);

        assert_eq!(
            shifter.shifts,
            [(0x40, 0x4C), (0xFF, 0x2C), (0x00, 0x74), (0x00, 0x7C)]
        );
    }

    #[test]
    fn test_signature_composition() {
        // byte 1 is returned by the 4th shift, byte 2 by the 8th
        let mut shifter = MockShifter::answering(&[0, 0, 0, 0x90, 0, 0, 0, 0x07]);
        assert_eq!(shifter.read_signature(), 0x9007);

        assert_eq!(
            shifter.shifts,
            [
                (0x08, 0x4C),
                (0x01, 0x0C),
                (0x00, 0x68),
                (0x00, 0x6C),
                (0x08, 0x4C),
                (0x02, 0x0C),
                (0x00, 0x68),
                (0x00, 0x6C),
            ]
        );
    }

    #[test]
    fn test_read_fuse_sequence() {
        let mut shifter = MockShifter::answering(&[0, 0, 0x6A]);
        assert_eq!(shifter.read_fuse(0x686C), 0x6A);
        assert_eq!(shifter.shifts, [(0x04, 0x4C), (0x00, 0x68), (0x00, 0x6C)]);
    }

    #[test]
    fn test_read_fuses_uses_both_selectors() {
        let mut shifter = MockShifter::answering(&[0, 0, 0x6A, 0, 0, 0xFF]);
        assert_eq!(shifter.read_fuses(), FusePair::new(0x6A, 0xFF));
        assert_eq!(shifter.shifts[4], (0x00, 0x7A));
        assert_eq!(shifter.shifts[5], (0x00, 0x7E));
        assert_eq!(shifter.fuse_writes(), 0);
    }

    #[test]
    fn test_silent_target_reads_zero_signature() {
        let mut shifter = MockShifter::default();
        assert_eq!(shifter.read_signature(), 0x0000);
    }
}
