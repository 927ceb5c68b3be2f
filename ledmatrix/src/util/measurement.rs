//! Performance measurement support using GPIOs, compiled out unless the
//! `measurement` feature is set.
//!
//! Like any debug facility, this bypasses hardware ownership entirely. The
//! signals live on pins the board leaves free:
//!
//! - Scan: C8, high while the scan-out ISR runs.
//! - Poll: C9, high while the application advances its game state.
//!
//! On the host these are all no-ops.

/// Sets up the measurement subsystem.
///
/// Note: if the `measurement` feature is enabled, this will power on GPIOC and
/// configure pins 8 and 9 as outputs.
///
/// # Safety
///
/// This is safe *as long as* it's not preempted. If interrupts are enabled, and
/// interrupts attempt to configure either RCC or GPIOC, their updates may be
/// reverted. Call this from early in `main` and you're good.
pub unsafe fn init() {
    #[cfg(all(feature = "measurement", target_os = "none"))]
    {
        use stm32f4::stm32f407 as device;
        let rcc = &*device::RCC::ptr();
        let gpioc = &*device::GPIOC::ptr();

        rcc.ahb1enr.modify(|_, w| w.gpiocen().set_bit());

        gpioc
            .pupdr
            .modify(|_, w| w.pupdr8().floating().pupdr9().floating());
        gpioc.ospeedr.modify(|_, w| {
            w.ospeedr8().very_high_speed().ospeedr9().very_high_speed()
        });
        gpioc
            .moder
            .modify(|_, w| w.moder8().output().moder9().output())
    }
}

cfg_if::cfg_if! {
    if #[cfg(all(target_os = "none", feature = "measurement"))] {
        use stm32f4::stm32f407 as device;

        fn write_gpioc_bsrr<F>(op: F)
        where
            F: FnOnce(&mut device::gpioi::bsrr::W) -> &mut device::gpioi::bsrr::W,
        {
            // Safety: writes to this register are atomic and idempotent.
            unsafe { &*device::GPIOC::ptr() }.bsrr.write(op);
        }
    }
}

pub fn sig_scan_set() {
    #[cfg(all(target_os = "none", feature = "measurement"))]
    write_gpioc_bsrr(|w| w.bs8().set_bit());
}

pub fn sig_scan_clear() {
    #[cfg(all(target_os = "none", feature = "measurement"))]
    write_gpioc_bsrr(|w| w.br8().set_bit());
}

pub fn sig_poll_set() {
    #[cfg(all(target_os = "none", feature = "measurement"))]
    write_gpioc_bsrr(|w| w.bs9().set_bit());
}

pub fn sig_poll_clear() {
    #[cfg(all(target_os = "none", feature = "measurement"))]
    write_gpioc_bsrr(|w| w.br9().set_bit());
}
