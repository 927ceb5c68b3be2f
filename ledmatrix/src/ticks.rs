//! The tick clock.
//!
//! The scan-out ISR is the only writer. The counter is free-running and wraps;
//! consumers hold `Instant`s and compare with wrapping subtraction rather than
//! resetting shared counters.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::priority;

/// A point on the tick clock.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Instant(u32);

impl Instant {
    pub const fn from_ticks(ticks: u32) -> Self {
        Instant(ticks)
    }

    pub fn ticks(self) -> u32 {
        self.0
    }

    /// Number of ticks from `earlier` to `self`, correct across wraparound as
    /// long as the real distance is under 2^32 ticks.
    pub fn ticks_since(self, earlier: Instant) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// The instant `n` ticks later.
    pub fn after(self, n: u32) -> Instant {
        Instant(self.0.wrapping_add(n))
    }
}

pub struct Ticks {
    count: AtomicU32,
}

impl Ticks {
    pub const fn new() -> Self {
        Ticks {
            count: AtomicU32::new(0),
        }
    }

    pub fn now(&self) -> Instant {
        Instant(self.count.load(Ordering::Relaxed))
    }

    /// Counts one tick. Only the scan-out ISR gets to do this.
    pub fn advance(&self, _: &priority::I0) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_counts() {
        let ticks = Ticks::new();
        let p = unsafe { priority::I0::new() };
        let start = ticks.now();
        for _ in 0..10 {
            ticks.advance(&p);
        }
        assert_eq!(ticks.now().ticks_since(start), 10);
    }

    #[test]
    fn elapsed_across_wrap() {
        let before = Instant::from_ticks(u32::max_value() - 2);
        let after = before.after(5);
        assert_eq!(after.ticks(), 2);
        assert_eq!(after.ticks_since(before), 5);
    }
}
