//! # Tiled Backgrounds
//!
//! Background graphics are uploaded once at startup: palette, tile pixels
//! into a character block, tilemap into a screen block, then the layer's
//! control register. After that the only per-frame state is the scroll
//! offset, kept in a [`ScrollState`] and written after the vblank wait.
//!
//! ```ignore
//! let terrain = BgLayer::new(Layer::Bg0, BgControl { .. });
//! terrain.upload(hw, &tiles, &map, &palette)?;
//!
//! loop {
//!     scroll.set(Layer::Bg0, camera_x, camera_y);
//!     hw.wait_vblank();
//!     scroll.commit(hw);
//! }
//! ```

use core::fmt;

use crate::{
    display::{BgControl, Layer},
    hw::{CHAR_BLOCKS, Hardware, Port, Region, SCREEN_BLOCK_HALFWORDS, SCREEN_BLOCKS},
};

/// Precomputed 8bpp tile pixels, as delivered by the offline asset tool.
#[derive(Debug, Copy, Clone)]
pub struct TileAsset<'a> {
    /// Sheet width in pixels.
    pub width: usize,
    /// Sheet height in pixels.
    pub height: usize,
    /// Two pixels per half-word.
    pub data: &'a [u16],
}

impl TileAsset<'_> {
    /// Half-words covered by the declared dimensions.
    pub const fn halfwords(&self) -> usize {
        self.width * self.height / 2
    }
}

/// A tilemap of `width × height` entries, row-major.
#[derive(Debug, Copy, Clone)]
pub struct MapAsset<'a> {
    pub width: usize,
    pub height: usize,
    pub entries: &'a [u16],
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Tile data is shorter than declared, or overruns background VRAM.
    TilesTooLarge { halfwords: usize, available: usize },
    /// Map dimensions don't match the layer size, or the data is short.
    MapTooLarge { entries: usize, available: usize },
    PaletteTooLarge { colors: usize },
    /// Char or screen block index out of range.
    InvalidBlock,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TilesTooLarge { halfwords, available } => write!(
                f,
                "tile data does not fit: {halfwords} half-words, {available} available"
            ),
            Self::MapTooLarge { entries, available } => write!(
                f,
                "tilemap does not fit: {entries} entries, {available} available"
            ),
            Self::PaletteTooLarge { colors } => {
                write!(f, "palette has {colors} colors, at most 256 allowed")
            }
            Self::InvalidBlock => write!(f, "char or screen block out of range"),
        }
    }
}

/// A background layer and the blocks it reads from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BgLayer {
    pub layer: Layer,
    pub control: BgControl,
}

impl BgLayer {
    pub const fn new(layer: Layer, control: BgControl) -> Self {
        Self { layer, control }
    }

    /// Check that `tiles`, `map` and `palette` fit this layer's blocks.
    pub fn validate(
        &self,
        tiles: &TileAsset,
        map: &MapAsset,
        palette: &[u16],
    ) -> Result<(), UploadError> {
        let char_region = Region::CharBlock(self.control.char_block);
        let screen_region = Region::ScreenBlock(self.control.screen_block);
        if self.control.char_block >= CHAR_BLOCKS || self.control.screen_block >= SCREEN_BLOCKS {
            return Err(UploadError::InvalidBlock);
        }

        if palette.len() > 256 {
            return Err(UploadError::PaletteTooLarge { colors: palette.len() });
        }

        let halfwords = tiles.halfwords();
        let available = char_region.halfwords();
        if halfwords > available || halfwords > tiles.data.len() {
            return Err(UploadError::TilesTooLarge { halfwords, available });
        }

        let (cols, rows) = self.control.size.tiles();
        let entries = map.width * map.height;
        let available = (cols * rows).min(screen_region.halfwords());
        if map.width != cols || map.height != rows || entries > map.entries.len() {
            return Err(UploadError::MapTooLarge { entries, available });
        }
        if entries > available {
            return Err(UploadError::MapTooLarge { entries, available });
        }
        Ok(())
    }

    /// Palette, tiles, map, then the control register.
    pub fn upload<H: Hardware + ?Sized>(
        &self,
        hw: &mut H,
        tiles: &TileAsset,
        map: &MapAsset,
        palette: &[u16],
    ) -> Result<(), UploadError> {
        self.validate(tiles, map, palette)?;

        hw.bulk_copy(Region::BgPalette, 0, palette);
        hw.bulk_copy(
            Region::CharBlock(self.control.char_block),
            0,
            &tiles.data[..tiles.halfwords()],
        );
        // Maps wider than 32 tiles are stored as consecutive 32×32 screen blocks
        let screen = Region::ScreenBlock(self.control.screen_block);
        let (cols, rows) = self.control.size.tiles();
        let mut block = 0;
        for block_row in (0..rows).step_by(32) {
            for block_col in (0..cols).step_by(32) {
                for row in 0..32 {
                    let start = (block_row + row) * map.width + block_col;
                    hw.bulk_copy(screen, block + row * 32, &map.entries[start..start + 32]);
                }
                block += SCREEN_BLOCK_HALFWORDS;
            }
        }
        hw.write(Port::BgControl(self.layer), self.control.bits());

        log::info!(
            "{:?} uploaded: {}×{} px tiles, {}×{} map, {} colors",
            self.layer,
            tiles.width,
            tiles.height,
            map.width,
            map.height,
            palette.len()
        );
        Ok(())
    }
}

/// Scroll offset of one layer, in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ScrollOffset {
    pub x: i16,
    pub y: i16,
}

/// Per-layer scroll offsets, committed to hardware once per frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ScrollState {
    offsets: [ScrollOffset; 4],
    enabled: [bool; 4],
}

impl ScrollState {
    pub const fn new() -> Self {
        Self {
            offsets: [ScrollOffset { x: 0, y: 0 }; 4],
            enabled: [false; 4],
        }
    }

    /// Only enabled layers are written by [`commit`](Self::commit).
    pub fn enable(&mut self, layer: Layer) {
        self.enabled[layer.index()] = true;
    }

    pub fn set(&mut self, layer: Layer, x: i16, y: i16) {
        self.offsets[layer.index()] = ScrollOffset { x, y };
    }

    pub fn get(&self, layer: Layer) -> ScrollOffset {
        self.offsets[layer.index()]
    }

    /// Write every enabled layer's offset. Call after the vblank wait.
    pub fn commit<H: Hardware + ?Sized>(&self, hw: &mut H) {
        for layer in Layer::ALL {
            if !self.enabled[layer.index()] {
                continue;
            }
            let offset = self.offsets[layer.index()];
            hw.write(Port::BgHScroll(layer), offset.x as u16 & 0x1FF);
            hw.write(Port::BgVScroll(layer), offset.y as u16 & 0x1FF);
        }
    }
}
