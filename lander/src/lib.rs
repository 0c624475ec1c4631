//! # Lander
//!
//! A side-scrolling lunar lander. Steer with the D-pad, burn the main
//! engine with A, and touch down gently on a flat pad for 250 points.
//!
//! The crate is hardware-agnostic: [`Game`] drives anything implementing
//! [`gba_hal::Hardware`], which is the memory-mapped console on the
//! cartridge and an in-memory fake in tests.
//!
//! ```ignore
//! let mut game = Game::new(GameConfig::DEFAULT)?;
//! game.load_assets(&mut hw)?;
//! game.run(&mut hw)
//! ```

#![no_std]

use core::fmt;

use gba_hal::{background::UploadError, oam::PoolError};

pub mod assets;
pub mod config;
pub mod fixed;
pub mod game;
pub mod lander;
pub mod terrain;
pub mod thruster;
pub mod ui;

pub use config::GameConfig;
pub use game::Game;

/// Anything that can go wrong before the first frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InitError {
    Sprites(PoolError),
    Upload(UploadError),
}

impl From<PoolError> for InitError {
    fn from(e: PoolError) -> Self {
        InitError::Sprites(e)
    }
}

impl From<UploadError> for InitError {
    fn from(e: UploadError) -> Self {
        InitError::Upload(e)
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Sprites(e) => write!(f, "sprite setup failed: {e}"),
            InitError::Upload(e) => write!(f, "background upload failed: {e}"),
        }
    }
}
