//! # Hardware Capability Interface
//!
//! The game never sees an address. It talks to the console through named
//! 16-bit [`Port`]s and bulk-copies into named memory [`Region`]s.
//!
//! [`Mmio`](crate::regs::Mmio) implements [`Hardware`] over the real
//! memory map; the `fake` feature provides an in-memory implementation for
//! host tests.

use crate::{VBLANK_LINE, display::Layer};

/// A 16-bit register port.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Port {
    /// Mode, layer enables, sprite mapping.
    DisplayControl,
    /// Blanking flags and interrupt enables.
    DisplayStatus,
    /// Current scanline (read-only). 160..=227 is vertical blank.
    Scanline,
    /// Per-layer tile/map block selection, priority, color mode.
    BgControl(Layer),
    /// Per-layer horizontal scroll (write-only on hardware).
    BgHScroll(Layer),
    /// Per-layer vertical scroll (write-only on hardware).
    BgVScroll(Layer),
    /// Button state, active-low.
    KeyInput,
}

/// A destination for bulk transfers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Region {
    /// Sprite attribute memory, 128 × 4 half-words.
    Oam,
    /// Background palette, 256 entries.
    BgPalette,
    /// Sprite palette, 256 entries.
    ObjPalette,
    /// Background tile graphics, one of 4 × 16KB blocks.
    CharBlock(u8),
    /// Background tilemap, one of 32 × 2KB blocks.
    ScreenBlock(u8),
    /// Sprite tile graphics, 32KB.
    ObjTiles,
}

/// Half-words in background VRAM (64KB).
pub const BG_VRAM_HALFWORDS: usize = 0x8000;
/// Half-words in sprite tile VRAM (32KB).
pub const OBJ_VRAM_HALFWORDS: usize = 0x4000;
/// Half-words in one character block.
pub const CHAR_BLOCK_HALFWORDS: usize = 0x2000;
/// Half-words in one screen block.
pub const SCREEN_BLOCK_HALFWORDS: usize = 0x400;

pub const CHAR_BLOCKS: u8 = 4;
pub const SCREEN_BLOCKS: u8 = 32;

impl Region {
    /// Absolute bus address of the first half-word.
    pub const fn address(self) -> usize {
        match self {
            Region::Oam => 0x0700_0000,
            Region::BgPalette => 0x0500_0000,
            Region::ObjPalette => 0x0500_0200,
            Region::CharBlock(_) | Region::ScreenBlock(_) | Region::ObjTiles => {
                0x0600_0000 + self.vram_offset() * 2
            }
        }
    }

    /// Offset into video memory, in half-words. Palettes and OAM are not VRAM and return 0.
    pub const fn vram_offset(self) -> usize {
        match self {
            Region::CharBlock(n) => n as usize * CHAR_BLOCK_HALFWORDS,
            Region::ScreenBlock(n) => n as usize * SCREEN_BLOCK_HALFWORDS,
            Region::ObjTiles => BG_VRAM_HALFWORDS,
            Region::Oam | Region::BgPalette | Region::ObjPalette => 0,
        }
    }

    /// Half-words addressable from the start of the region to the end of
    /// the memory it lives in. Char and screen blocks overlap, just like
    /// on hardware.
    pub const fn halfwords(self) -> usize {
        match self {
            Region::Oam => 512,
            Region::BgPalette | Region::ObjPalette => 256,
            Region::CharBlock(_) | Region::ScreenBlock(_) => {
                BG_VRAM_HALFWORDS.saturating_sub(self.vram_offset())
            }
            Region::ObjTiles => OBJ_VRAM_HALFWORDS,
        }
    }

    pub const fn is_valid(self) -> bool {
        match self {
            Region::CharBlock(n) => n < CHAR_BLOCKS,
            Region::ScreenBlock(n) => n < SCREEN_BLOCKS,
            _ => true,
        }
    }
}

/// Read/write access to the console.
pub trait Hardware {
    fn read(&self, port: Port) -> u16;

    fn write(&mut self, port: Port, value: u16);

    /// Copy `src` into `region`, starting `offset` half-words in, without a
    /// CPU copy loop. Completes before returning.
    fn bulk_copy(&mut self, region: Region, offset: usize, src: &[u16]);

    /// Block until the next vertical blank begins.
    ///
    /// If called while already inside vblank, waits for the *next* one, so
    /// two calls never return within the same blanking interval.
    fn wait_vblank(&mut self) {
        while self.read(Port::Scanline) >= VBLANK_LINE {}
        while self.read(Port::Scanline) < VBLANK_LINE {}
    }
}
