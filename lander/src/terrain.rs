//! # Terrain
//!
//! A 32×32 tilemap (256×256 pixels) built at compile time from a column
//! height profile. The same map is uploaded to background layer 0 and
//! sampled for collisions, so what the player sees is what they hit.
//!
//! ```text
//! row < h   sky
//! row == h  surface (pad tile where the column is part of a landing pad)
//! row > h   ground
//! ```
//!
//! Like the hardware layer, the map wraps in both directions.

pub const WIDTH: usize = 32;
pub const HEIGHT: usize = 32;
pub const TILE_SIZE: i32 = 8;
pub const PIXEL_WIDTH: i32 = WIDTH as i32 * TILE_SIZE;
pub const PIXEL_HEIGHT: i32 = HEIGHT as i32 * TILE_SIZE;

pub const SKY: u16 = 0;
pub const GROUND: u16 = 1;
pub const PAD: u16 = 2;
pub const SURFACE: u16 = 3;

/// Surface row per column.
const HEIGHTS: [u8; WIDTH] = [
    26, 26, 25, 24, 24, 25, 27, 27, 27, 27, 26, 24, 23, 22, 22, 23, //
    25, 26, 26, 26, 26, 24, 23, 21, 21, 22, 24, 25, 27, 27, 27, 26,
];

/// Flat runs of equal height that count as landing pads, `start..end` columns.
const PADS: [(usize, usize); 3] = [(6, 10), (17, 21), (28, 31)];

const fn is_pad_column(col: usize) -> bool {
    let mut i = 0;
    while i < PADS.len() {
        if col >= PADS[i].0 && col < PADS[i].1 {
            return true;
        }
        i += 1;
    }
    false
}

const fn build() -> [u16; WIDTH * HEIGHT] {
    let mut map = [SKY; WIDTH * HEIGHT];
    let mut row = 0;
    while row < HEIGHT {
        let mut col = 0;
        while col < WIDTH {
            let h = HEIGHTS[col] as usize;
            map[row * WIDTH + col] = if row < h {
                SKY
            } else if row > h {
                GROUND
            } else if is_pad_column(col) {
                PAD
            } else {
                SURFACE
            };
            col += 1;
        }
        row += 1;
    }
    map
}

/// Row-major tile ids, one per 8×8 cell.
pub static MAP: [u16; WIDTH * HEIGHT] = build();

/// Tile id under world pixel `(px, py)`. Coordinates wrap.
pub fn tile_at(px: i32, py: i32) -> u16 {
    let col = (px.rem_euclid(PIXEL_WIDTH) / TILE_SIZE) as usize;
    let row = (py.rem_euclid(PIXEL_HEIGHT) / TILE_SIZE) as usize;
    MAP[row * WIDTH + col]
}

pub const fn is_solid(tile: u16) -> bool {
    tile != SKY
}

/// Number of solid tiles under the two bottom corners of a hitbox
/// whose top-left is at world `(x, y)`.
pub fn contacts(x: i32, y: i32, hitbox: i32) -> u8 {
    let bottom = y + hitbox;
    is_solid(tile_at(x, bottom)) as u8 + is_solid(tile_at(x + hitbox, bottom)) as u8
}
