//! # Heads-Up Display
//!
//! Text is one 8×8 sprite per character, allocated once as a row of
//! consecutive descriptors. Every frame the fuel and score rows are
//! rewritten from the current values, changed or not.
//!
//! ```text
//! FUEL 1500             SCORE 0250
//!
//!              LANDED!
//! ```

use gba_hal::oam::{PoolError, SpriteDesc, SpriteHandle, SpritePool, SpriteSize};

use crate::assets::{BLANK, DIGIT_0, glyph, tile_offset};

/// Thousands, hundreds, tens and units of `value`.
///
/// Negative values show as `0000`; values past 9999 keep their last four digits.
pub fn digits(value: i32) -> [u8; 4] {
    let value = value.max(0);
    [
        (value / 1000 % 10) as u8,
        (value / 100 % 10) as u8,
        (value / 10 % 10) as u8,
        (value % 10) as u8,
    ]
}

/// `N` sprites side by side, 8 pixels apart.
#[derive(Debug, Clone)]
pub struct TextRow<const N: usize> {
    pub sprites: [SpriteHandle; N],
    pub x: i32,
    pub y: i32,
}

impl<const N: usize> TextRow<N> {
    /// Allocate the row showing blanks.
    pub fn new(pool: &mut SpritePool, x: i32, y: i32) -> Result<Self, PoolError> {
        let first = SpriteDesc::new(x, y, SpriteSize::S8x8, tile_offset(BLANK));
        let sprites = pool.allocate_row::<N>(first, 8)?;
        Ok(Self { sprites, x, y })
    }

    /// Write `text` left-aligned; the rest of the row is blanked.
    pub fn set_text(&self, pool: &mut SpritePool, text: &[u8]) {
        for (i, &sprite) in self.sprites.iter().enumerate() {
            let tile = text.get(i).map_or(BLANK, |&c| glyph(c));
            pool.set_tile_offset(sprite, tile_offset(tile));
        }
    }

    /// Draw `digits`, one per sprite.
    pub fn set_digits(&self, pool: &mut SpritePool, digits: &[u8; N]) {
        for (&sprite, &d) in self.sprites.iter().zip(digits) {
            pool.set_tile_offset(sprite, tile_offset(DIGIT_0 + d as u16));
        }
    }

    pub fn show(&self, pool: &mut SpritePool) {
        for (i, &sprite) in self.sprites.iter().enumerate() {
            pool.set_position(sprite, self.x + 8 * i as i32, self.y);
        }
    }

    pub fn hide(&self, pool: &mut SpritePool) {
        for &sprite in &self.sprites {
            pool.hide(sprite);
        }
    }
}

/// What the banner in the middle of the screen says.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Banner {
    None,
    Landed,
    Crashed,
}

impl Banner {
    fn text(self) -> &'static [u8] {
        match self {
            Banner::None => b"",
            Banner::Landed => b"LANDED!",
            Banner::Crashed => b"CRASH!",
        }
    }
}

pub const HUD_Y: i32 = 4;
pub const FUEL_X: i32 = 4;
pub const SCORE_X: i32 = 140;
pub const BANNER_X: i32 = 92;
pub const BANNER_Y: i32 = 72;

pub struct Hud {
    pub fuel: TextRow<4>,
    pub score: TextRow<4>,
    pub banner: TextRow<7>,
    shown: Banner,
}

impl Hud {
    /// Labels, eight digits and the banner: 24 descriptors.
    pub fn new(pool: &mut SpritePool) -> Result<Hud, PoolError> {
        let fuel_label = TextRow::<4>::new(pool, FUEL_X, HUD_Y)?;
        fuel_label.set_text(pool, b"FUEL");
        let fuel = TextRow::new(pool, FUEL_X + 36, HUD_Y)?;

        let score_label = TextRow::<5>::new(pool, SCORE_X, HUD_Y)?;
        score_label.set_text(pool, b"SCORE");
        let score = TextRow::new(pool, SCORE_X + 44, HUD_Y)?;

        let banner = TextRow::new(pool, BANNER_X, BANNER_Y)?;
        banner.hide(pool);

        Ok(Hud { fuel, score, banner, shown: Banner::None })
    }

    /// Refresh all digits and the banner.
    pub fn update(&mut self, pool: &mut SpritePool, fuel: i32, score: i32, banner: Banner) {
        self.fuel.set_digits(pool, &digits(fuel));
        self.score.set_digits(pool, &digits(score));

        if banner != self.shown {
            self.shown = banner;
            if banner == Banner::None {
                self.banner.hide(pool);
            } else {
                self.banner.set_text(pool, banner.text());
                self.banner.show(pool);
            }
        }
    }

    pub fn banner(&self) -> Banner {
        self.shown
    }
}
