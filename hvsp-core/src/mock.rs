//! Test doubles shared by the unit tests
//!
//! `MockTarget` models an ATtiny13 on the far end of the five HVSP lines:
//! it latches SDI/SII on rising SCI edges, decodes each completed frame
//! pair and shifts read data out on SDO during the following frame.

use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::hvsp::{frame, unframe, FRAME_BITS};
use crate::traits::{Direction, HvspLines, Level, Line};

/// Delay that only records what was asked of it
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
    pub calls: usize,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.calls += 1;
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += us as u64 * 1_000;
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
        self.calls += 1;
    }
}

fn index(line: Line) -> usize {
    match line {
        Line::Reset => 0,
        Line::Clock => 1,
        Line::DataOut => 2,
        Line::InstrIn => 3,
        Line::DataIn => 4,
    }
}

/// Simulated HVSP target
pub struct MockTarget {
    pub directions: [Direction; 5],
    pub levels: [Level; 5],
    pub supply: bool,
    /// Every call into the line interface
    pub activity: usize,
    /// Drive calls in order
    pub drives: Vec<(Line, Level)>,
    pub clock_falls: usize,
    /// Rising SCI edges seen while SDO was not an input
    pub sdo_violations: usize,

    /// Target answers at all (false = absent or dead device)
    pub responsive: bool,
    /// Read SDO back as whatever SDI is driven to
    pub echo: bool,
    /// Fuse writes are acknowledged but not applied
    pub ignore_writes: bool,
    /// SDO reads that stay low after a fuse write
    pub busy_reads_per_write: u32,

    pub signature: [u8; 3],
    pub lfuse: u8,
    pub hfuse: u8,
    pub efuse: u8,
    /// (write selector, value) for every committed fuse write
    pub writes: Vec<(u16, u8)>,
    /// (sdi, sii) for every completed frame pair
    pub frames: Vec<(u8, u8)>,

    bits: u8,
    sdi_acc: u16,
    sii_acc: u16,
    out_frame: u16,
    busy_reads: u32,
    command: u8,
    address: u8,
    data: u8,
    armed: Option<u8>,
}

impl MockTarget {
    /// A responsive ATtiny13 with a clock fuse that locks out ISP
    pub fn attiny13() -> Self {
        Self {
            directions: [Direction::InputPullUp; 5],
            levels: [Level::Low; 5],
            supply: false,
            activity: 0,
            drives: Vec::new(),
            clock_falls: 0,
            sdo_violations: 0,
            responsive: true,
            echo: false,
            ignore_writes: false,
            busy_reads_per_write: 3,
            signature: [0x1E, 0x90, 0x07],
            lfuse: 0x68,
            hfuse: 0xFE,
            efuse: 0xFF,
            writes: Vec::new(),
            frames: Vec::new(),
            bits: 0,
            sdi_acc: 0,
            sii_acc: 0,
            out_frame: 0,
            busy_reads: 0,
            command: 0,
            address: 0,
            data: 0,
            armed: None,
        }
    }

    pub fn with_signature(sig: u16) -> Self {
        let mut target = Self::attiny13();
        target.signature[1] = (sig >> 8) as u8;
        target.signature[2] = sig as u8;
        target
    }

    pub fn absent() -> Self {
        let mut target = Self::attiny13();
        target.responsive = false;
        target
    }

    pub fn echo() -> Self {
        let mut target = Self::attiny13();
        target.echo = true;
        target
    }

    /// Hold SDO low for the first `reads` readiness reads
    pub fn busy_at_start(mut self, reads: u32) -> Self {
        self.busy_reads = reads;
        self
    }

    pub fn level(&self, line: Line) -> Level {
        self.levels[index(line)]
    }

    pub fn direction(&self, line: Line) -> Direction {
        self.directions[index(line)]
    }

    /// Frames whose instruction is "load data low byte" (fuse write payload)
    pub fn write_payload_frames(&self) -> usize {
        self.frames.iter().filter(|(_, sii)| *sii == 0x2C).count()
    }

    fn rising_edge(&mut self) {
        if self.direction(Line::DataOut) != Direction::InputPullUp {
            self.sdo_violations += 1;
        }
        self.sdi_acc = (self.sdi_acc << 1) | self.level(Line::DataIn).is_high() as u16;
        self.sii_acc = (self.sii_acc << 1) | self.level(Line::InstrIn).is_high() as u16;
        self.bits += 1;

        if self.bits == FRAME_BITS {
            let sdi = unframe(self.sdi_acc);
            let sii = unframe(self.sii_acc);
            self.bits = 0;
            self.sdi_acc = 0;
            self.sii_acc = 0;
            self.frames.push((sdi, sii));
            self.out_frame = self.decode(sdi, sii).map(frame).unwrap_or(0);
        }
    }

    /// Apply one frame pair; returns the byte to shift out next frame
    fn decode(&mut self, sdi: u8, sii: u8) -> Option<u8> {
        match sii {
            0x4C => self.command = sdi,
            0x0C => self.address = sdi,
            0x2C => self.data = sdi,
            0x68 if self.command == 0x08 => {
                return self.signature.get(self.address as usize).copied();
            }
            0x68 if self.command == 0x04 => return Some(self.lfuse),
            0x7A if self.command == 0x04 => return Some(self.hfuse),
            0x6A if self.command == 0x04 => return Some(self.efuse),
            0x64 | 0x74 | 0x66 if self.command == 0x40 => self.armed = Some(sii),
            0x6C | 0x7C | 0x6E => {
                if let Some(arm) = self.armed.take() {
                    self.commit(((arm as u16) << 8) | sii as u16);
                }
            }
            _ => {}
        }
        None
    }

    fn commit(&mut self, selector: u16) {
        self.writes.push((selector, self.data));
        self.busy_reads = self.busy_reads_per_write;
        if self.ignore_writes {
            return;
        }
        match selector {
            0x646C => self.lfuse = self.data,
            0x747C => self.hfuse = self.data,
            0x666E => self.efuse = self.data,
            _ => {}
        }
    }
}

impl HvspLines for MockTarget {
    fn configure(&mut self, line: Line, direction: Direction) {
        self.activity += 1;
        self.directions[index(line)] = direction;
    }

    fn drive(&mut self, line: Line, level: Level) {
        self.activity += 1;
        self.drives.push((line, level));
        let previous = self.levels[index(line)];
        self.levels[index(line)] = level;

        if line == Line::Clock {
            match (previous, level) {
                (Level::Low, Level::High) => self.rising_edge(),
                (Level::High, Level::Low) => self.clock_falls += 1,
                _ => {}
            }
        }
    }

    fn read(&mut self, line: Line) -> Level {
        self.activity += 1;
        if line != Line::DataOut || self.direction(line) == Direction::Output {
            return self.level(line);
        }
        if !self.responsive {
            return Level::Low;
        }
        if self.bits == 0 {
            // Between frames SDO is the RDY/BSY flag
            if self.busy_reads > 0 {
                self.busy_reads -= 1;
                return Level::Low;
            }
            return Level::High;
        }
        if self.echo {
            return self.level(Line::DataIn);
        }
        Level::of_bit(self.out_frame, FRAME_BITS - 1 - self.bits)
    }

    fn set_supply(&mut self, on: bool) {
        self.activity += 1;
        self.supply = on;
    }
}
