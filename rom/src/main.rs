#![no_std]
#![no_main]

use gba_hal::{
    debug_log::{DebugLogger, LOGGER},
    regs::Mmio,
};
use lander::{Game, GameConfig};

mod boot;

/// Route `log` to the emulator console, if there is one.
fn install_logger() {
    unsafe {
        if DebugLogger::detect() && log::set_logger_racy(&LOGGER).is_ok() {
            log::set_max_level_racy(LOGGER.max_level);
        }
    }
}

pub fn main() -> ! {
    install_logger();
    log::info!("lander {}", env!("CARGO_PKG_VERSION"));

    let mut hw = unsafe { Mmio::new() };

    let mut game = match Game::new(GameConfig::DEFAULT) {
        Ok(game) => game,
        Err(e) => panic!("{e}"),
    };
    if let Err(e) = game.load_assets(&mut hw) {
        panic!("{e}");
    }

    game.run(&mut hw)
}
