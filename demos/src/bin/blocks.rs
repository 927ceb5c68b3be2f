//! Falling blocks on the 16x32 LED matrix.
//!
//! Buttons: PC1 starts the game and rotates, PC2 moves left, PC0 moves right,
//! PC3 drops. Events are logged on ITM stimulus port 0.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(all(target_os = "none", feature = "panic-halt"))]
extern crate panic_halt;
#[cfg(all(target_os = "none", feature = "panic-itm"))]
extern crate panic_itm;

#[cfg(target_os = "none")]
mod firmware {
    use cortex_m::iprintln;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use stm32f4::stm32f407 as device;
    use stm32f4::stm32f407::interrupt;

    use ledmatrix::priority;
    use ledmatrix::timing::TICK_512US;
    use ledmatrix::util::measurement;
    use ledmatrix_fx_blocks as fx;

    #[cortex_m_rt::entry]
    fn main() -> ! {
        let mut cp = cortex_m::peripheral::Peripherals::take().unwrap();
        let p = device::Peripherals::take().unwrap();

        let matrix = ledmatrix::init(
            cp.NVIC, &p.RCC, &p.DBG, p.GPIOA, p.GPIOC, p.SPI1, p.TIM2,
        )
        .start(&TICK_512US);

        let stim = &mut cp.ITM.stim[0];
        iprintln!(
            stim,
            "scan-out running: {} us/tick, {} Hz refresh",
            TICK_512US.tick_us(),
            TICK_512US.refresh_hz()
        );

        let thread = priority::Thread::new_checked().unwrap();
        // Placeholder until the start press gives us something better.
        let mut game =
            fx::Game::new(SmallRng::seed_from_u64(0), fx::Tuning::default());
        ledmatrix::FRAME.publish(game.frame(), &thread);

        loop {
            matrix.sync_to_tick();
            let now = ledmatrix::CLOCK.now();
            let held = fx::Buttons::from_port(matrix.button_levels());

            measurement::sig_poll_set();
            let update = game.poll(now, held);
            measurement::sig_poll_clear();

            if let Some(fx::Phase::Starting) = update.entered {
                let seed = matrix.jitter();
                game.reseed(SmallRng::seed_from_u64(seed));
                iprintln!(stim, "start pressed, seed {:#x}", seed);
            }
            if update.redraw {
                ledmatrix::FRAME.publish(game.frame(), &thread);
            }
            if update.cleared > 0 {
                iprintln!(
                    stim,
                    "cleared {} line(s): score {}, level {}",
                    update.cleared,
                    game.score().points(),
                    game.score().level()
                );
            }
            match update.entered {
                Some(fx::Phase::Playing) => iprintln!(stim, "play"),
                Some(fx::Phase::GameOver) => iprintln!(
                    stim,
                    "game over at tick {}, score {}",
                    now.ticks(),
                    game.score().points()
                ),
                Some(fx::Phase::Halted) => {
                    iprintln!(stim, "final score {}", game.score().points())
                }
                _ => (),
            }
        }
    }

    /// Wires up the TIM2 handler expected by the driver.
    #[interrupt]
    fn TIM2() {
        ledmatrix::tim2_scan_isr()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("blocks runs on the STM32F407; build for thumbv7em-none-eabihf");
}
