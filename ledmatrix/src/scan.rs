//! Row-by-row scan-out sequencing.
//!
//! Each tick shows exactly one row. The column word goes out inverted, since
//! the column drivers sink current, and is followed by a one-hot row select
//! with bit 31 selecting row 0. Both words are sent most significant byte
//! first. Only after both are in the chain does the latch pulse, so the
//! outputs change in one step.

use scopeguard::defer;

use crate::frame::{SharedFrame, ROWS};
use crate::priority;
use crate::ticks::Ticks;
use crate::util::measurement;

/// A byte-wide, blocking path into the shift-register chain.
pub trait ShiftChain {
    /// Shifts one byte into the chain, returning once it has been accepted.
    fn send_byte(&mut self, byte: u8);

    /// Transfers the chain's contents to its outputs.
    fn latch(&mut self);

    fn send_u16(&mut self, word: u16) {
        for &b in &word.to_be_bytes() {
            self.send_byte(b);
        }
    }

    fn send_u32(&mut self, word: u32) {
        for &b in &word.to_be_bytes() {
            self.send_byte(b);
        }
    }
}

/// Row select word for `index`.
pub fn row_select(index: usize) -> u32 {
    0x8000_0000 >> index
}

/// Scan position, owned by the ISR.
#[derive(Debug, Default)]
pub struct ScanOut {
    index: usize,
}

impl ScanOut {
    pub const fn new() -> Self {
        ScanOut { index: 0 }
    }

    /// Row that the next `step` will display.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Runs one tick: counts it on `clock`, drives the current row of `frame`
    /// into `chain`, and moves on to the next row.
    pub fn step(
        &mut self,
        frame: &SharedFrame,
        clock: &Ticks,
        chain: &mut impl ShiftChain,
        priority: &priority::I0,
    ) {
        measurement::sig_scan_set();
        defer! {
            measurement::sig_scan_clear()
        }

        clock.advance(priority);

        let row = frame.row(self.index, priority);
        chain.send_u16(!row);
        chain.send_u32(row_select(self.index));
        chain.latch();

        self.index = (self.index + 1) % ROWS;
    }
}
