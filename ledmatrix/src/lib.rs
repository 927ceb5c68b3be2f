//! Scan-out driver for a 16-column, 32-row LED matrix fed through a chain of
//! shift registers.
//!
//! The application composes whole frames in thread mode and publishes them to
//! [`FRAME`]. A periodic timer interrupt walks the frame one row per tick,
//! shifting the (inverted) column pattern and a one-hot row select out over
//! SPI, then pulsing the chain's latch. Each interrupt also advances
//! [`CLOCK`], which is the only time base the application gets.
//!
//! Everything that touches hardware lives behind `target_os = "none"`; the
//! frame, clock, and scan sequencing are plain Rust and are tested on the host.

#![cfg_attr(not(test), no_std)]

pub mod frame;
pub mod priority;
pub mod scan;
pub mod ticks;
pub mod timing;
pub mod util;

pub use frame::{Frame, Row, SharedFrame, ROWS};
pub use ticks::{Instant, Ticks};

cfg_if::cfg_if! {
    if #[cfg(target_os = "none")] {
        mod driver;
        pub use driver::*;
    }
}

/// The frame currently being scanned out.
///
/// Thread mode publishes into this; the scan-out ISR reads one row per tick.
pub static FRAME: SharedFrame = SharedFrame::new();

/// Tick counter advanced once per scan-out interrupt.
pub static CLOCK: Ticks = Ticks::new();
