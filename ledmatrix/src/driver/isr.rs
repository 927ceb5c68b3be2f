//! The scan-out ISR.

use stm32f4::stm32f407 as device;

use super::spi::SpiChain;
use crate::priority;
use crate::scan::ScanOut;
use crate::util::loan::{Loan, LoanGuard};

/// Everything the ISR needs, donated by `Matrix::start`.
pub struct ScanHw {
    pub tim2: device::TIM2,
    pub chain: SpiChain,
    pub scan: ScanOut,
}

pub static SCAN_HW: Loan<ScanHw> = Loan::new();

/// Scan-out ISR: call this from `TIM2`.
///
/// This is the only ISR the driver needs. Wire it up like so:
///
/// ```
/// use stm32f4::interrupt;
///
/// #[interrupt]
/// fn TIM2() {
///     ledmatrix::tim2_scan_isr()
/// }
/// ```
pub fn scan_isr() {
    let mut hw = acquire_hw(&SCAN_HW);
    // Acknowledge IRQ so it doesn't re-occur.
    hw.tim2.sr.modify(|_, w| w.uif().clear_bit());

    // Safety: we are the scan-out interrupt.
    let p = unsafe { priority::I0::new() };
    let ScanHw { chain, scan, .. } = &mut *hw;
    scan.step(&crate::FRAME, &crate::CLOCK, chain, &p);
}

/// Takes the hardware loaned to the ISR.
///
/// # Panics
///
/// If the loan is busy or empty, which means the IRQ was unmasked before the
/// hardware was donated, or a previous invocation leaked its guard.
fn acquire_hw<T: Send>(loan: &Loan<T>) -> LoanGuard<T> {
    loan.try_borrow().expect("scan hardware unavailable at ISR")
}
