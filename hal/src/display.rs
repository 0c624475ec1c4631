//! # Display Control Registers
//!
//! ## DisplayControl (`Port::DisplayControl`)
//!
//! | Flag       | Effect                                              |
//! |------------|-----------------------------------------------------|
//! | `MODE_*`   | Video mode; mode 0 is four regular tiled layers     |
//! | `OBJ_1D`   | Sprite tiles laid out linearly instead of as a 2D sheet |
//! | `BG0..BG3` | Enable a background layer                           |
//! | `OBJ`      | Enable the sprite engine                            |
//!
//! ## BgControl (`Port::BgControl(layer)`)
//!
//! ```text
//! bit  15-14  13   12-8          7      6       5-4  3-2         1-0
//!      size   wrap screen block  256col mosaic  -    char block  priority
//! ```

use bit_field::BitField;

bitflags::bitflags! {
    /// Display control flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DisplayControl: u16 {
        const MODE_0       = 0b0000_0000_0000_0000;
        const MODE_1       = 0b0000_0000_0000_0001;
        const MODE_2       = 0b0000_0000_0000_0010;
        /// Frame select for the bitmap modes.
        const PAGE         = 0b0000_0000_0001_0000;
        /// Sprite tiles are indexed linearly (1D) rather than as a 32×32 sheet.
        const OBJ_1D       = 0b0000_0000_0100_0000;
        /// Blank the screen; VRAM is freely accessible.
        const FORCED_BLANK = 0b0000_0000_1000_0000;
        const BG0          = 0b0000_0001_0000_0000;
        const BG1          = 0b0000_0010_0000_0000;
        const BG2          = 0b0000_0100_0000_0000;
        const BG3          = 0b0000_1000_0000_0000;
        /// Enable the sprite engine.
        const OBJ          = 0b0001_0000_0000_0000;
    }
}

/// One of the four tiled background layers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Layer {
    Bg0,
    Bg1,
    Bg2,
    Bg3,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Bg0, Layer::Bg1, Layer::Bg2, Layer::Bg3];

    pub const fn index(self) -> usize {
        match self {
            Layer::Bg0 => 0,
            Layer::Bg1 => 1,
            Layer::Bg2 => 2,
            Layer::Bg3 => 3,
        }
    }

    /// The display-control bit that turns this layer on.
    pub const fn enable_flag(self) -> DisplayControl {
        match self {
            Layer::Bg0 => DisplayControl::BG0,
            Layer::Bg1 => DisplayControl::BG1,
            Layer::Bg2 => DisplayControl::BG2,
            Layer::Bg3 => DisplayControl::BG3,
        }
    }
}

/// Tilemap dimensions of a regular background, in tiles.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BgSize {
    /// 32×32 tiles, one screen block.
    S32x32,
    /// 64×32 tiles, two screen blocks side by side.
    S64x32,
    /// 32×64 tiles, two screen blocks stacked.
    S32x64,
    /// 64×64 tiles, four screen blocks.
    S64x64,
}

impl BgSize {
    pub const fn bits(self) -> u16 {
        match self {
            BgSize::S32x32 => 0,
            BgSize::S64x32 => 1,
            BgSize::S32x64 => 2,
            BgSize::S64x64 => 3,
        }
    }

    /// Width and height in tiles.
    pub const fn tiles(self) -> (usize, usize) {
        match self {
            BgSize::S32x32 => (32, 32),
            BgSize::S64x32 => (64, 32),
            BgSize::S32x64 => (32, 64),
            BgSize::S64x64 => (64, 64),
        }
    }

    /// Width and height in pixels. Scroll offsets wrap at these.
    pub const fn pixels(self) -> (usize, usize) {
        let (w, h) = self.tiles();
        (w * 8, h * 8)
    }
}

/// Background control register contents.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BgControl {
    pub priority: u8,
    pub char_block: u8,
    pub screen_block: u8,
    pub size: BgSize,
    pub color_256: bool,
}

impl BgControl {
    pub fn bits(&self) -> u16 {
        let mut value = 0u16;
        value.set_bits(0..2, self.priority as u16 & 0b11);
        value.set_bits(2..4, self.char_block as u16 & 0b11);
        value.set_bit(7, self.color_256);
        value.set_bits(8..13, self.screen_block as u16 & 0b1_1111);
        value.set_bits(14..16, self.size.bits());
        value
    }
}

/// Pack a 5-bit-per-channel color into the native BGR555 layout.
pub const fn rgb15(r: u8, g: u8, b: u8) -> u16 {
    (r as u16 & 0x1F) | ((g as u16 & 0x1F) << 5) | ((b as u16 & 0x1F) << 10)
}
