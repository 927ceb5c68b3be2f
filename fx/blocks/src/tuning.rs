//! Game timing knobs. All durations are in scan-out ticks.

use smart_default::SmartDefault;

#[derive(Clone, Debug, SmartDefault)]
pub struct Tuning {
    /// The descent period is `(descent_base - level) * 2` ticks.
    #[default = 500]
    pub descent_base: u16,
    /// Input repeat window is the descent period divided by this.
    #[default = 4]
    pub debounce_divisor: u16,
    /// Length of each half of a game-over blink.
    #[default = 500]
    pub blink_ticks: u32,
    #[default = 5]
    pub blinks: u8,
    /// Pause between the start press and the first piece.
    #[default = 250]
    pub start_delay: u32,
}

impl Tuning {
    pub fn descent_period(&self, level: u16) -> u32 {
        u32::from(self.descent_base.saturating_sub(level)) << 1
    }

    pub fn input_window(&self, level: u16) -> u32 {
        self.descent_period(level) / u32::from(u16::max(self.debounce_divisor, 1))
    }
}
