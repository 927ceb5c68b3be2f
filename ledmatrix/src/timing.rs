//! Tick timer and shift-chain clock configuration.

/// Settings for the scan-out tick and the SPI link that feeds the chain.
#[derive(Clone, Debug)]
pub struct Timing {
    /// Frequency of the clock feeding TIM2, in Hz.
    pub timer_clock_hz: u32,
    /// TIM2 prescaler; the counter runs at `timer_clock_hz / (prescaler + 1)`.
    pub prescaler: u16,
    /// TIM2 auto-reload; an update fires every `reload + 1` counts.
    pub reload: u32,
    /// SPI1 baud-rate code (`BR` field): SCK is PCLK2 / 2^(code + 1).
    pub spi_baud_code: u8,
}

impl Timing {
    /// Length of one tick, in microseconds.
    pub fn tick_us(&self) -> u32 {
        let counts = u64::from(self.prescaler) + 1;
        let counts = counts * (u64::from(self.reload) + 1);
        (counts * 1_000_000 / u64::from(self.timer_clock_hz)) as u32
    }

    /// Complete frames shown per second, rounded down.
    pub fn refresh_hz(&self) -> u32 {
        1_000_000 / (self.tick_us() * crate::ROWS as u32)
    }
}

/// 512 microsecond tick from the reset-default 16 MHz HSI: 1 MHz counter,
/// 512 counts. SPI runs at HSI / 16.
pub static TICK_512US: Timing = Timing {
    timer_clock_hz: 16_000_000,
    prescaler: 15,
    reload: 511,
    spi_baud_code: 0b011,
};
