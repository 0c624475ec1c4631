//! # Sprite Table
//!
//! The sprite engine reads 128 descriptors of four half-words each from
//! OAM. [`SpritePool`] keeps a shadow copy of the whole table in RAM, hands
//! out slots from a monotonic cursor, and moves the table to OAM in a
//! single bulk transfer once per frame.
//!
//! ## Descriptor Layout
//!
//! ```text
//! attr0  15-14 shape | 13 256col | 12 mosaic | 11-10 gfx mode | 9-8 render mode | 7-0 y
//! attr1  15-14 size  | 13 vflip  | 12 hflip  | 11-9 affine   | 8-0 x
//! attr2  15-12 palette bank | 11-10 priority | 9-0 tile index
//! attr3  affine parameter (unused)
//! ```
//!
//! Accessors mask their own sub-field and leave every other bit alone, so
//! moving a sprite never disturbs its mode, flip or palette bits.
//!
//! ```ignore
//! let mut pool = SpritePool::new();
//! let ship = pool.allocate(SpriteDesc::new(116, 20, SpriteSize::S8x8, 0))?;
//! pool.set_position(ship, 120, 24);
//! pool.set_tile_offset(ship, 2);
//!
//! hw.wait_vblank();
//! pool.commit(hw);
//! ```

use core::{fmt, ops::Range};

use bit_field::BitField;
use bytemuck::{Pod, Zeroable};

use crate::{
    SCREEN_HEIGHT, SCREEN_WIDTH,
    background::{TileAsset, UploadError},
    hw::{Hardware, Region},
};

/// Hardware sprite descriptors.
pub const NUM_SPRITES: usize = 128;

const Y: Range<usize> = 0..8;
const COLOR_256: usize = 13;
const SHAPE: Range<usize> = 14..16;

const X: Range<usize> = 0..9;
const H_FLIP: usize = 12;
const V_FLIP: usize = 13;
const SIZE: Range<usize> = 14..16;

const TILE: Range<usize> = 0..10;
const PRIORITY: Range<usize> = 10..12;

/// Mask `value` to the width of `range` so `set_bits` never sees overflow.
#[inline(always)]
fn fit(value: i32, range: &Range<usize>) -> u16 {
    (value as u16) & ((1u16 << (range.end - range.start)) - 1)
}

/// The 12 sprite dimensions the hardware can draw, width × height.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpriteSize {
    S8x8,
    S16x16,
    S32x32,
    S64x64,
    S16x8,
    S32x8,
    S32x16,
    S64x32,
    S8x16,
    S8x32,
    S16x32,
    S32x64,
}

impl SpriteSize {
    /// `(shape, size)` bits for attr0 and attr1.
    pub const fn shape_size_bits(self) -> (u16, u16) {
        match self {
            SpriteSize::S8x8 => (0, 0),
            SpriteSize::S16x16 => (0, 1),
            SpriteSize::S32x32 => (0, 2),
            SpriteSize::S64x64 => (0, 3),
            SpriteSize::S16x8 => (1, 0),
            SpriteSize::S32x8 => (1, 1),
            SpriteSize::S32x16 => (1, 2),
            SpriteSize::S64x32 => (1, 3),
            SpriteSize::S8x16 => (2, 0),
            SpriteSize::S8x32 => (2, 1),
            SpriteSize::S16x32 => (2, 2),
            SpriteSize::S32x64 => (2, 3),
        }
    }
}

/// One hardware sprite descriptor.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct ObjAttr {
    pub attr0: u16,
    pub attr1: u16,
    pub attr2: u16,
    pub attr3: u16,
}

impl ObjAttr {
    /// A fresh 256-color descriptor, palette bank 0, regular rendering.
    pub fn encode(desc: &SpriteDesc) -> ObjAttr {
        let (shape, size) = desc.size.shape_size_bits();
        let mut attr = ObjAttr::default();

        attr.attr0.set_bits(Y, fit(desc.y, &Y));
        attr.attr0.set_bit(COLOR_256, true);
        attr.attr0.set_bits(SHAPE, shape);

        attr.attr1.set_bits(X, fit(desc.x, &X));
        attr.attr1.set_bit(H_FLIP, desc.h_flip);
        attr.attr1.set_bit(V_FLIP, desc.v_flip);
        attr.attr1.set_bits(SIZE, size);

        attr.attr2.set_bits(TILE, fit(desc.tile as i32, &TILE));
        attr.attr2.set_bits(PRIORITY, fit(desc.priority as i32, &PRIORITY));
        attr
    }

    /// Parked below and right of the visible area.
    pub const fn offscreen() -> ObjAttr {
        ObjAttr {
            attr0: SCREEN_HEIGHT as u16,
            attr1: SCREEN_WIDTH as u16,
            attr2: 0,
            attr3: 0,
        }
    }

    pub fn x(&self) -> i32 {
        self.attr1.get_bits(X) as i32
    }

    pub fn y(&self) -> i32 {
        self.attr0.get_bits(Y) as i32
    }

    pub fn tile(&self) -> u16 {
        self.attr2.get_bits(TILE)
    }

    pub fn priority(&self) -> u8 {
        self.attr2.get_bits(PRIORITY) as u8
    }

    pub fn h_flip(&self) -> bool {
        self.attr1.get_bit(H_FLIP)
    }

    pub fn v_flip(&self) -> bool {
        self.attr1.get_bit(V_FLIP)
    }

    /// Sets the 9-bit x and 8-bit y fields. Out-of-range values wrap, which
    /// is how the hardware expects partially off-screen sprites.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.attr0.set_bits(Y, fit(y, &Y));
        self.attr1.set_bits(X, fit(x, &X));
    }

    /// Sets the low 10 bits of attr2; priority and palette bank stay.
    pub fn set_tile_offset(&mut self, offset: u16) {
        self.attr2.set_bits(TILE, fit(offset as i32, &TILE));
    }

    pub fn set_flip(&mut self, h_flip: bool, v_flip: bool) {
        self.attr1.set_bit(H_FLIP, h_flip);
        self.attr1.set_bit(V_FLIP, v_flip);
    }
}

/// Everything needed to fill a fresh descriptor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpriteDesc {
    pub x: i32,
    pub y: i32,
    pub size: SpriteSize,
    pub h_flip: bool,
    pub v_flip: bool,
    pub tile: u16,
    pub priority: u8,
}

impl SpriteDesc {
    /// Unflipped, priority 0.
    pub const fn new(x: i32, y: i32, size: SpriteSize, tile: u16) -> Self {
        Self { x, y, size, h_flip: false, v_flip: false, tile, priority: 0 }
    }

    pub const fn flipped(mut self, h_flip: bool, v_flip: bool) -> Self {
        self.h_flip = h_flip;
        self.v_flip = v_flip;
        self
    }

    pub const fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

/// Index of an allocated descriptor. Only valid for the pool that issued it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpriteHandle(u8);

impl SpriteHandle {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Every descriptor has been handed out since the last `clear_all`.
    Exhausted { capacity: usize },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { capacity } => {
                write!(f, "sprite pool exhausted: all {capacity} descriptors allocated")
            }
        }
    }
}

/// Shadow copy of the hardware sprite table.
pub struct SpritePool {
    table: [ObjAttr; NUM_SPRITES],
    next: usize,
}

impl Default for SpritePool {
    fn default() -> Self {
        Self::new()
    }
}

impl SpritePool {
    /// An empty pool with every descriptor parked off-screen.
    pub fn new() -> Self {
        let mut pool = Self {
            table: [ObjAttr::default(); NUM_SPRITES],
            next: 0,
        };
        pool.clear_all();
        pool
    }

    /// Reset the cursor to slot 0 and park every descriptor off-screen.
    pub fn clear_all(&mut self) {
        self.next = 0;
        self.table.fill(ObjAttr::offscreen());
        log::debug!("sprite pool cleared");
    }

    /// Number of descriptors handed out since the last `clear_all`.
    pub fn allocated(&self) -> usize {
        self.next
    }

    /// Take the next free slot and encode `desc` into it.
    ///
    /// The cursor never wraps: once 128 slots are taken every further call
    /// fails until `clear_all`.
    pub fn allocate(&mut self, desc: SpriteDesc) -> Result<SpriteHandle, PoolError> {
        if self.next >= NUM_SPRITES {
            return Err(PoolError::Exhausted { capacity: NUM_SPRITES });
        }
        let handle = SpriteHandle(self.next as u8);
        self.next += 1;
        self.table[handle.index()] = ObjAttr::encode(&desc);
        Ok(handle)
    }

    /// Allocate `N` consecutive sprites in a horizontal row, `step` pixels apart.
    ///
    /// Either all `N` slots are taken or none are.
    pub fn allocate_row<const N: usize>(
        &mut self,
        first: SpriteDesc,
        step: i32,
    ) -> Result<[SpriteHandle; N], PoolError> {
        if self.next + N > NUM_SPRITES {
            return Err(PoolError::Exhausted { capacity: NUM_SPRITES });
        }
        let base = self.next;
        self.next += N;
        Ok(core::array::from_fn(|i| {
            let desc = SpriteDesc { x: first.x + step * i as i32, ..first };
            self.table[base + i] = ObjAttr::encode(&desc);
            SpriteHandle((base + i) as u8)
        }))
    }

    pub fn attr(&self, handle: SpriteHandle) -> &ObjAttr {
        &self.table[handle.index()]
    }

    pub fn set_position(&mut self, handle: SpriteHandle, x: i32, y: i32) {
        self.table[handle.index()].set_position(x, y);
    }

    /// Move by a relative offset, reading the current position back out of
    /// the descriptor.
    pub fn move_by(&mut self, handle: SpriteHandle, dx: i32, dy: i32) {
        let attr = &self.table[handle.index()];
        let (x, y) = (attr.x(), attr.y());
        self.set_position(handle, x + dx, y + dy);
    }

    pub fn set_tile_offset(&mut self, handle: SpriteHandle, offset: u16) {
        self.table[handle.index()].set_tile_offset(offset);
    }

    pub fn set_flip(&mut self, handle: SpriteHandle, h_flip: bool, v_flip: bool) {
        self.table[handle.index()].set_flip(h_flip, v_flip);
    }

    /// Park a sprite just outside the visible area. Other bits are kept.
    pub fn hide(&mut self, handle: SpriteHandle) {
        self.set_position(handle, SCREEN_WIDTH, SCREEN_HEIGHT);
    }

    pub fn as_halfwords(&self) -> &[u16] {
        bytemuck::cast_slice(&self.table[..])
    }

    /// Move the whole table to OAM in one bulk transfer.
    ///
    /// Call at most once per frame, after the vblank wait.
    pub fn commit<H: Hardware + ?Sized>(&self, hw: &mut H) {
        hw.bulk_copy(Region::Oam, 0, self.as_halfwords());
    }
}

/// Upload sprite tile graphics and the sprite palette. Runs once at startup.
///
/// Nothing is written unless the sheet's declared size fits its data and
/// sprite VRAM, and the palette fits the sprite palette.
pub fn load_graphics<H: Hardware + ?Sized>(
    hw: &mut H,
    tiles: &TileAsset,
    palette: &[u16],
) -> Result<(), UploadError> {
    let halfwords = tiles.halfwords();
    let available = Region::ObjTiles.halfwords();
    if halfwords > available || halfwords > tiles.data.len() {
        return Err(UploadError::TilesTooLarge { halfwords, available });
    }
    if palette.len() > Region::ObjPalette.halfwords() {
        return Err(UploadError::PaletteTooLarge { colors: palette.len() });
    }

    hw.bulk_copy(Region::ObjPalette, 0, palette);
    hw.bulk_copy(Region::ObjTiles, 0, &tiles.data[..halfwords]);
    log::info!(
        "sprite graphics loaded: {}x{} sheet, {} colors",
        tiles.width,
        tiles.height,
        palette.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeHardware;

    fn desc() -> SpriteDesc {
        SpriteDesc::new(100, 50, SpriteSize::S16x32, 6)
            .flipped(true, false)
            .priority(2)
    }

    #[test]
    fn encode_matches_register_layout() {
        let attr = ObjAttr::encode(&desc());
        assert_eq!(attr.attr0, 50 | (1 << 13) | (2 << 14));
        assert_eq!(attr.attr1, 100 | (1 << 12) | (2 << 14));
        assert_eq!(attr.attr2, 6 | (2 << 10));
        assert_eq!(attr.attr3, 0);
    }

    #[test]
    fn size_table() {
        assert_eq!(SpriteSize::S8x8.shape_size_bits(), (0, 0));
        assert_eq!(SpriteSize::S64x64.shape_size_bits(), (0, 3));
        assert_eq!(SpriteSize::S32x8.shape_size_bits(), (1, 1));
        assert_eq!(SpriteSize::S64x32.shape_size_bits(), (1, 3));
        assert_eq!(SpriteSize::S8x32.shape_size_bits(), (2, 1));
        assert_eq!(SpriteSize::S32x64.shape_size_bits(), (2, 3));
    }

    #[test]
    fn set_position_keeps_other_bits() {
        let mut attr = ObjAttr::encode(&desc());
        attr.attr2 |= 0xF000; // palette bank
        attr.attr3 = 0xBEEF;
        let before = attr;

        attr.set_position(-3, 300);

        assert_eq!(attr.attr0 & 0xFF00, before.attr0 & 0xFF00);
        assert_eq!(attr.attr1 & 0xFE00, before.attr1 & 0xFE00);
        assert_eq!(attr.attr2, before.attr2);
        assert_eq!(attr.attr3, before.attr3);
        assert_eq!(attr.x(), 0x1FD);
        assert_eq!(attr.y(), 300 & 0xFF);
    }

    #[test]
    fn set_tile_offset_keeps_priority_and_palette() {
        let mut attr = ObjAttr::encode(&desc());
        attr.attr2 |= 0xA000;
        let before = attr;

        attr.set_tile_offset(0xFFFF);

        assert_eq!(attr.tile(), 0x3FF);
        assert_eq!(attr.attr2 & 0xFC00, before.attr2 & 0xFC00);
        assert_eq!(attr.attr0, before.attr0);
        assert_eq!(attr.attr1, before.attr1);
    }

    #[test]
    fn move_by_reads_back_position() {
        let mut pool = SpritePool::new();
        let handle = pool.allocate(desc()).unwrap();
        pool.move_by(handle, 5, -10);
        assert_eq!(pool.attr(handle).x(), 105);
        assert_eq!(pool.attr(handle).y(), 40);
        assert!(pool.attr(handle).h_flip());
    }

    #[test]
    fn clear_all_restarts_indices() {
        let mut pool = SpritePool::new();
        for _ in 0..17 {
            pool.allocate(desc()).unwrap();
        }
        pool.clear_all();

        let a = pool.allocate(desc()).unwrap();
        let b = pool.allocate(desc()).unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn clear_all_parks_every_slot() {
        let mut pool = SpritePool::new();
        pool.allocate(desc()).unwrap();
        pool.clear_all();
        for chunk in pool.as_halfwords().chunks(4) {
            assert_eq!(chunk[0], SCREEN_HEIGHT as u16);
            assert_eq!(chunk[1], SCREEN_WIDTH as u16);
        }
    }

    #[test]
    fn pool_does_not_wrap() {
        let mut pool = SpritePool::new();
        for i in 0..NUM_SPRITES {
            assert_eq!(pool.allocate(desc()).unwrap().index(), i);
        }
        assert_eq!(
            pool.allocate(desc()),
            Err(PoolError::Exhausted { capacity: NUM_SPRITES })
        );
    }

    #[test]
    fn allocate_row_is_all_or_nothing() {
        let mut pool = SpritePool::new();
        let row: [SpriteHandle; 4] = pool.allocate_row(desc(), 8).unwrap();
        assert_eq!(row.map(|h| pool.attr(h).x()), [100, 108, 116, 124]);

        for _ in 0..NUM_SPRITES - 6 {
            pool.allocate(desc()).unwrap();
        }
        assert_eq!(pool.allocated(), NUM_SPRITES - 2);
        assert!(pool.allocate_row::<3>(desc(), 8).is_err());
        assert_eq!(pool.allocated(), NUM_SPRITES - 2);
    }

    #[test]
    fn hide_parks_without_touching_tile() {
        let mut pool = SpritePool::new();
        let handle = pool.allocate(desc()).unwrap();
        pool.hide(handle);
        assert_eq!(pool.attr(handle).x(), SCREEN_WIDTH);
        assert_eq!(pool.attr(handle).y(), SCREEN_HEIGHT);
        assert_eq!(pool.attr(handle).tile(), 6);
    }

    #[test]
    fn table_is_four_halfwords_per_sprite() {
        let pool = SpritePool::new();
        assert_eq!(pool.as_halfwords().len(), NUM_SPRITES * 4);
    }

    #[test]
    fn set_flip_keeps_position_and_size() {
        let mut pool = SpritePool::new();
        let handle = pool.allocate(desc()).unwrap();
        let before = *pool.attr(handle);

        pool.set_flip(handle, false, true);

        let after = pool.attr(handle);
        assert_eq!(after.attr1 & (1 << 12), 0);
        assert_ne!(after.attr1 & (1 << 13), 0);
        assert_eq!(after.attr1 & !(3 << 12), before.attr1 & !(3 << 12));
        assert_eq!((after.attr0, after.attr2), (before.attr0, before.attr2));
    }

    #[test]
    fn load_graphics_checks_declared_size() {
        let data = [0x0101u16; 64];
        let mut hw = FakeHardware::new();

        // 8x16 at 8bpp is 64 half-words
        let sheet = TileAsset { width: 8, height: 16, data: &data };
        assert_eq!(load_graphics(&mut hw, &sheet, &[0, 0x7FFF]), Ok(()));
        assert_eq!(&hw.obj_palette[..2], &[0, 0x7FFF]);
        let base = Region::ObjTiles.vram_offset();
        assert_eq!(&hw.vram[base..base + 64], &data[..]);

        hw.clear_events();
        let short = TileAsset { width: 8, height: 24, data: &data };
        assert_eq!(
            load_graphics(&mut hw, &short, &[0]),
            Err(UploadError::TilesTooLarge {
                halfwords: 96,
                available: Region::ObjTiles.halfwords(),
            })
        );
        assert!(hw.events.is_empty());
    }
}
