//! The frame shared between thread mode and the scan-out ISR.
//!
//! A frame is 32 rows of 16 bits. Bit 15 is the leftmost column and a set bit
//! is a lit LED. Rows are stored as individual atomics: the ISR may observe a
//! frame that is half old and half new for one refresh, but never a torn row.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::priority;

/// One row of the display.
pub type Row = u16;

/// Number of rows on the display.
pub const ROWS: usize = 32;

/// A complete frame, top row first.
pub type Frame = [Row; ROWS];

#[allow(clippy::declare_interior_mutable_const)]
const DARK: AtomicU16 = AtomicU16::new(0);

pub struct SharedFrame {
    rows: [AtomicU16; ROWS],
}

impl SharedFrame {
    /// Creates a frame with every LED off.
    pub const fn new() -> Self {
        SharedFrame { rows: [DARK; ROWS] }
    }

    /// Replaces the displayed frame.
    pub fn publish(&self, frame: &Frame, _: &priority::Thread) {
        for (dst, &src) in self.rows.iter().zip(frame.iter()) {
            dst.store(src, Ordering::Relaxed);
        }
    }

    /// Reads one row for scan-out.
    ///
    /// # Panics
    ///
    /// If `index` is not less than `ROWS`.
    pub fn row(&self, index: usize, _: &impl priority::InterruptPriority) -> Row {
        self.rows[index].load(Ordering::Relaxed)
    }

    /// Copies out the frame as last published.
    #[cfg(test)]
    pub(crate) fn snapshot(&self, _: &priority::Thread) -> Frame {
        let mut frame = [0; ROWS];
        for (dst, src) in frame.iter_mut().zip(self.rows.iter()) {
            *dst = src.load(Ordering::Relaxed);
        }
        frame
    }
}
