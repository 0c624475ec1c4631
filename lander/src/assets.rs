//! # Graphics
//!
//! The sprite sheet is an 8×376 strip of 256-color 8×8 tiles produced by
//! the offline converter. With 1D sprite mapping each 8bpp tile takes two
//! 4bpp tile slots, so sheet tile `k` is drawn with tile offset `2k`.
//!
//! | Sheet tiles | Contents |
//! |-------------|----------|
//! | 0..3   | lander: flying, landed, wrecked |
//! | 3, 4   | box, blank |
//! | 5, 6   | side flame |
//! | 7, 8   | vertical flame |
//! | 9..19  | digits `0`-`9` |
//! | 19..44 | letters `A`-`V`, `X`-`Z` (no `W`) |
//! | 44..47 | `.` `!` `:` |

use gba_hal::{
    background::{MapAsset, TileAsset},
    display::rgb15,
};

use crate::terrain;

pub const SHEET_WIDTH: usize = 8;
pub const SHEET_HEIGHT: usize = 376;
const SHEET_BYTES: usize = SHEET_WIDTH * SHEET_HEIGHT;

const SHEET_RAW: &[u8; SHEET_BYTES] = include_bytes!("../assets/sprites.bin");

/// Two 8bpp pixels per half-word, first pixel in the low byte.
const fn pack<const N: usize, const H: usize>(bytes: &[u8; N]) -> [u16; H] {
    let mut out = [0u16; H];
    let mut i = 0;
    while i < H {
        out[i] = bytes[2 * i] as u16 | (bytes[2 * i + 1] as u16) << 8;
        i += 1;
    }
    out
}

pub static SPRITE_TILES: [u16; SHEET_BYTES / 2] = pack(SHEET_RAW);

pub const LANDER_FLYING: u16 = 0;
pub const LANDER_LANDED: u16 = 1;
pub const LANDER_CRASHED: u16 = 2;
pub const BLANK: u16 = 4;
pub const FLAME_SIDE: [u16; 2] = [5, 6];
pub const FLAME_VERTICAL: [u16; 2] = [7, 8];
pub const DIGIT_0: u16 = 9;
const LETTER_A: u16 = 19;
const LETTER_X: u16 = 41;
const PERIOD: u16 = 44;
const BANG: u16 = 45;
const COLON: u16 = 46;

/// Sprite tile offset of a sheet tile in 256-color 1D mapping.
pub const fn tile_offset(sheet_tile: u16) -> u16 {
    sheet_tile * 2
}

/// Sheet tile for a character. Anything without a glyph is blank.
pub const fn glyph(c: u8) -> u16 {
    match c {
        b'0'..=b'9' => DIGIT_0 + (c - b'0') as u16,
        b'A'..=b'V' => LETTER_A + (c - b'A') as u16,
        b'X'..=b'Z' => LETTER_X + (c - b'X') as u16,
        b'a'..=b'z' => glyph(c.to_ascii_uppercase()),
        b'.' => PERIOD,
        b'!' => BANG,
        b':' => COLON,
        _ => BLANK,
    }
}

pub static SPRITE_PALETTE: [u16; 3] = [
    0, // transparent
    rgb15(18, 18, 20),
    rgb15(31, 31, 24),
];

pub static BG_PALETTE: [u16; 5] = [
    rgb15(1, 1, 5), // backdrop
    rgb15(16, 10, 4),
    rgb15(20, 20, 22),
    rgb15(6, 20, 6),
    rgb15(11, 6, 2),
];

const GROUND_DARK: u8 = 4;
const BG_TILE_COUNT: usize = 4;

/// Sky, ground, pad and surface tiles, in terrain tile id order.
const fn bg_tiles() -> [u8; BG_TILE_COUNT * 64] {
    let mut px = [0u8; BG_TILE_COUNT * 64];
    let mut tile = 1;
    while tile < BG_TILE_COUNT {
        let mut i = 0;
        while i < 64 {
            let (row, col) = (i / 8, i % 8);
            let mut color = if (row * 3 + col) % 5 == 0 { GROUND_DARK } else { 1 };
            if row < 2 {
                if tile == terrain::PAD as usize {
                    color = 2;
                } else if tile == terrain::SURFACE as usize {
                    color = 3;
                }
            }
            px[tile * 64 + i] = color;
            i += 1;
        }
        tile += 1;
    }
    px
}

const BG_BYTES: [u8; BG_TILE_COUNT * 64] = bg_tiles();
pub static BG_TILES: [u16; BG_TILE_COUNT * 32] = pack(&BG_BYTES);

pub fn sprite_sheet() -> TileAsset<'static> {
    TileAsset { width: SHEET_WIDTH, height: SHEET_HEIGHT, data: &SPRITE_TILES }
}

pub fn bg_tile_asset() -> TileAsset<'static> {
    TileAsset { width: 8, height: 8 * BG_TILE_COUNT, data: &BG_TILES }
}

pub fn terrain_map() -> MapAsset<'static> {
    MapAsset { width: terrain::WIDTH, height: terrain::HEIGHT, entries: &terrain::MAP }
}
