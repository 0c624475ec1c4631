//! # Lander HAL
//!
//! Hardware abstraction layer for a tile-and-sprite handheld: four tiled
//! background layers, a 128-entry hardware sprite table, a DMA block-copy
//! engine, and an active-low keypad.
//!
//! ## The Game Loop
//!
//! Everything the game touches goes through the [`Hardware`](hw::Hardware)
//! capability trait. A frame looks like this:
//!
//! ```ignore
//! loop {
//!     // 1. Sample the keypad
//!     keypad.sample(hw);
//!
//!     // 2. Mutate sprite descriptors and scroll offsets in RAM
//!     update_game(&keypad, &mut pool, &mut scroll);
//!
//!     // 3. Wait for vblank (scanline 160)
//!     hw.wait_vblank();
//!
//!     // 4. Commit: one DMA of the whole sprite table, then scroll registers
//!     pool.commit(hw);
//!     scroll.commit(hw);
//! }
//! ```
//!
//! Nothing is written to video memory between steps 1 and 3, so the
//! display never shows a half-updated frame.
//!
//! ## Hardware Overview
//!
//! | Feature | Details |
//! |---------|------|
//! | Display | 240×160 pixels, 15-bit color |
//! | Backgrounds | 4 tiled layers, 8×8 tiles, 256-color mode |
//! | Sprites | 128 descriptors, 8×8 up to 64×64 |
//! | Palettes | 256 entries for backgrounds, 256 for sprites |
//! | VRAM | 64KB background + 32KB sprite tiles |
//! | DMA | 4 channels, bulk copies use channel 3 |
//!
//! ## Unsafe Boundary
//!
//! Raw pointers are only dereferenced in [`regs`], [`dma`] and
//! [`debug_log`]. Game code above [`hw::Hardware`] never computes an address.

#![no_std]

pub mod background;
pub mod debug_log;
pub mod display;
pub mod dma;
pub mod hw;
pub mod input;
pub mod oam;
pub mod regs;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use hw::{Hardware, Port, Region};

/// Visible screen width in pixels.
pub const SCREEN_WIDTH: i32 = 240;
/// Visible screen height in pixels.
pub const SCREEN_HEIGHT: i32 = 160;
/// First scanline of the vertical blank.
pub const VBLANK_LINE: u16 = 160;
