//! The shift chain as seen through SPI1.

use stm32f4::stm32f407 as device;

use crate::scan::ShiftChain;

pub struct SpiChain {
    spi: device::SPI1,
    /// Owns PA4, the latch.
    gpioa: device::GPIOA,
}

impl SpiChain {
    pub fn new(spi: device::SPI1, gpioa: device::GPIOA) -> Self {
        SpiChain { spi, gpioa }
    }
}

impl ShiftChain for SpiChain {
    fn send_byte(&mut self, byte: u8) {
        while self.spi.sr.read().txe().bit_is_clear() {
            // busy wait
        }
        // Safety: DR takes any value; only the low 8 bits go out.
        self.spi.dr.write(|w| unsafe { w.bits(u32::from(byte)) });
    }

    fn latch(&mut self) {
        // The last byte must have left the shifter, not just the buffer.
        while self.spi.sr.read().txe().bit_is_clear() {}
        while self.spi.sr.read().bsy().bit_is_set() {}

        self.gpioa.bsrr.write(|w| w.bs4().set_bit());
        self.gpioa.bsrr.write(|w| w.br4().set_bit());
    }
}
