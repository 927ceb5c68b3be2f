//! STM32F407 bring-up and the scan-out handle.
//!
//! Pin assignments:
//!
//! - PA5: SPI1 SCK to the shift chain clock.
//! - PA7: SPI1 MOSI to the shift chain data input.
//! - PA4: chain latch, pulsed high after each row.
//! - PC0-PC3: buttons (right, rotate, left, down), pulled up, pressed = low.

mod isr;
mod spi;

use core::sync::atomic::{AtomicBool, Ordering};

use cortex_m::peripheral as cm;
use stm32f4::stm32f407 as device;

use crate::scan::ScanOut;
use crate::timing::Timing;
use crate::util::measurement;

pub use self::isr::scan_isr as tim2_scan_isr;

/// Driver handle.
///
/// Obtain one from [`init`] or [`take_hardware`]; only one ever exists. Like
/// any typestate handle, the parameter `S` decides what it can do:
///
/// - `Matrix<Idle>` holds the SPI link and tick timer, not yet running.
///   [`start`] consumes it and returns a `Matrix<Live>`.
/// - `Matrix<Live>` has handed that hardware to the scan-out ISR, and offers
///   tick synchronization.
///
/// Button sampling is available in both.
///
/// [`init`]: fn.init.html
/// [`take_hardware`]: fn.take_hardware.html
/// [`start`]: #method.start
pub struct Matrix<S> {
    nvic: cm::NVIC,
    gpioc: device::GPIOC,

    mode_state: S,
}

/// Driver mode right after initialization, before [`start`].
///
/// [`start`]: struct.Matrix.html#method.start
pub struct Idle {
    gpioa: device::GPIOA,
    spi1: device::SPI1,
    tim2: device::TIM2,
}

/// Driver mode once scan-out is running.
pub struct Live(());

/// Operations valid in any driver state.
impl<S> Matrix<S> {
    /// Samples the button port. Bits 0-3 are the levels of PC0-PC3; a pressed
    /// button reads as 0.
    pub fn button_levels(&self) -> u8 {
        (self.gpioc.idr.read().bits() & 0xF) as u8
    }
}

impl Matrix<Idle> {
    /// Programs the shift-chain link and tick timer from `timing`, hands them
    /// to the scan-out ISR, and starts the tick.
    pub fn start(mut self, timing: &Timing) -> Matrix<Live> {
        let Idle { gpioa, spi1, tim2 } = self.mode_state;

        configure_spi(&spi1, timing);
        configure_tick_timer(&tim2, timing);
        // Timer runs, but its IRQ stays masked until the ISR has hardware.
        tim2.cr1.modify(|_, w| w.cen().set_bit());

        isr::SCAN_HW
            .donate(isr::ScanHw {
                tim2,
                chain: spi::SpiChain::new(spi1, gpioa),
                scan: ScanOut::new(),
            })
            .unwrap();

        unmask_tick_irq(&mut self.nvic);

        Matrix {
            nvic: self.nvic,
            gpioc: self.gpioc,
            mode_state: Live(()),
        }
    }
}

impl Matrix<Live> {
    /// Sleeps until the scan-out ISR has counted at least one more tick.
    pub fn sync_to_tick(&self) {
        let start = crate::CLOCK.now();
        while crate::CLOCK.now() == start {
            cortex_m::asm::wfi()
        }
    }

    /// Samples timer phase and tick count. Human reaction times make this a
    /// usable seed when read at a button press.
    pub fn jitter(&self) -> u64 {
        // Safety: reads of the counter have no side effects.
        let phase = unsafe { &*device::TIM2::ptr() }.cnt.read().bits();
        u64::from(crate::CLOCK.now().ticks()) << 32 | u64::from(phase)
    }
}

/// Starts up the matrix driver, taking possession of all hardware
/// peripherals.
///
/// ```
/// let matrix = ledmatrix::take_hardware();
/// ```
///
/// This is shorthand for [`init`] for programs that need nothing else from
/// the chip. Programs that want ITM logging should call [`init`].
///
/// [`init`]: fn.init.html
pub fn take_hardware() -> Matrix<Idle> {
    let cp = cortex_m::peripheral::Peripherals::take().unwrap();
    let p = device::Peripherals::take().unwrap();

    init(
        cp.NVIC, &p.RCC, &p.DBG, p.GPIOA, p.GPIOC, p.SPI1, p.TIM2,
    )
}

/// Records when a driver instance has been initialized. This is only allowed to
/// happen once.
static DRIVER_INIT_FLAG: AtomicBool = AtomicBool::new(false);

/// Initializes the driver using the given peripherals.
///
/// The peripherals are left configured but idle: the tick timer is not
/// running and its interrupt is masked. Call [`Matrix::start`] to begin
/// scan-out.
///
/// # Panics
///
/// If called more than once.
///
/// [`Matrix::start`]: struct.Matrix.html#method.start
pub fn init(
    mut nvic: cm::NVIC,
    rcc: &device::RCC,
    dbg: &device::DBG,
    gpioa: device::GPIOA,
    gpioc: device::GPIOC,
    spi1: device::SPI1,
    tim2: device::TIM2,
) -> Matrix<Idle> {
    let previous_instance = DRIVER_INIT_FLAG.swap(true, Ordering::SeqCst);
    assert_eq!(previous_instance, false);

    // Safety: interrupts that could touch RCC or GPIOC are not yet enabled.
    unsafe {
        measurement::init();
    }

    mask_tick_irq(&mut nvic);

    rcc.ahb1enr.modify(|_, w| w.gpioaen().enabled().gpiocen().enabled());
    rcc.apb1enr.modify(|_, w| w.tim2en().enabled());
    rcc.apb2enr.modify(|_, w| w.spi1en().enabled());
    cortex_m::asm::dmb(); // ensure peripherals are powered before we touch them

    // Hold the tick while the debugger has us halted, or the display freezes
    // on one row at full brightness.
    dbg.dbgmcu_apb1_fz
        .modify(|_, w| w.dbg_tim2_stop().set_bit());

    // Buttons.
    gpioc.moder.modify(|_, w| {
        w.moder0()
            .input()
            .moder1()
            .input()
            .moder2()
            .input()
            .moder3()
            .input()
    });
    gpioc.pupdr.modify(|_, w| {
        w.pupdr0()
            .pull_up()
            .pupdr1()
            .pull_up()
            .pupdr2()
            .pull_up()
            .pupdr3()
            .pull_up()
    });

    // Shift chain: latch idles low.
    gpioa.bsrr.write(|w| w.br4().set_bit());
    gpioa.ospeedr.modify(|_, w| {
        w.ospeedr4()
            .high_speed()
            .ospeedr5()
            .high_speed()
            .ospeedr7()
            .high_speed()
    });
    gpioa.afrl.modify(|_, w| w.afrl5().af5().afrl7().af5());
    gpioa.moder.modify(|_, w| {
        w.moder4()
            .output()
            .moder5()
            .alternate()
            .moder7()
            .alternate()
    });

    Matrix {
        nvic,
        gpioc,
        mode_state: Idle { gpioa, spi1, tim2 },
    }
}

/// Master mode, software slave select, LSB first: the chain's first register
/// expects column 0 to arrive first.
fn configure_spi(spi: &device::SPI1, timing: &Timing) {
    spi.cr1.write(|w| {
        // Safety: any three-bit value is a valid divisor code.
        unsafe {
            w.br().bits(timing.spi_baud_code);
        }
        w.mstr()
            .set_bit()
            .lsbfirst()
            .set_bit()
            .ssm()
            .set_bit()
            .ssi()
            .set_bit()
    });
    spi.cr1.modify(|_, w| w.spe().set_bit());
}

fn configure_tick_timer(tim: &device::TIM2, timing: &Timing) {
    // Safety: PSC and ARR accept any value.
    tim.psc.write(|w| unsafe { w.bits(u32::from(timing.prescaler)) });
    tim.arr.write(|w| unsafe { w.bits(timing.reload) });
    // Force an update so the prescaler takes effect now, then discard the
    // flag it raises.
    tim.egr.write(|w| w.ug().set_bit());
    tim.sr.modify(|_, w| w.uif().clear_bit());
    tim.dier.write(|w| w.uie().set_bit());
}

fn mask_tick_irq(nvic: &mut cm::NVIC) {
    nvic.disable(device::Interrupt::TIM2);
    cortex_m::asm::dmb();
    cortex_m::asm::isb();
    cm::NVIC::unpend(device::Interrupt::TIM2);
}

fn unmask_tick_irq(nvic: &mut cm::NVIC) {
    nvic.enable(device::Interrupt::TIM2);
    cortex_m::asm::dmb();
    cortex_m::asm::isb();
}
