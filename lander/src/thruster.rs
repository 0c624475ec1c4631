use gba_hal::oam::{PoolError, SpriteDesc, SpriteHandle, SpritePool, SpriteSize};

use crate::assets::{FLAME_SIDE, FLAME_VERTICAL, tile_offset};

/// Which nozzle a flame belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Nozzle {
    /// Below the hull, fired by the main engine.
    Vertical,
    /// Left of the hull; pushes the lander right.
    Left,
    /// Right of the hull; pushes the lander left.
    Right,
}

impl Nozzle {
    pub const ALL: [Nozzle; 3] = [Nozzle::Vertical, Nozzle::Left, Nozzle::Right];

    /// Position relative to the lander sprite.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Nozzle::Vertical => (0, 8),
            Nozzle::Left => (-8, 0),
            Nozzle::Right => (8, 0),
        }
    }

    /// The two animation frames, as sprite sheet tiles.
    pub const fn frames(self) -> [u16; 2] {
        match self {
            Nozzle::Vertical => FLAME_VERTICAL,
            Nozzle::Left | Nozzle::Right => FLAME_SIDE,
        }
    }

    /// The side flame is drawn pointing right; the left nozzle mirrors it.
    const fn h_flip(self) -> bool {
        matches!(self, Nozzle::Left)
    }
}

/// A two-frame flame that flickers while its nozzle fires.
#[derive(Debug, Clone)]
pub struct Thruster {
    pub nozzle: Nozzle,
    pub sprite: SpriteHandle,
    /// Index into `nozzle.frames()`.
    pub frame: usize,
    pub delay: u8,
    pub counter: u8,
    pub active: bool,
}

impl Thruster {
    /// Allocated hidden; the first `sync` places it.
    pub fn new(pool: &mut SpritePool, nozzle: Nozzle, delay: u8) -> Result<Thruster, PoolError> {
        let desc = SpriteDesc::new(0, 0, SpriteSize::S8x8, tile_offset(nozzle.frames()[0]))
            .flipped(nozzle.h_flip(), false);
        let sprite = pool.allocate(desc)?;
        pool.hide(sprite);
        Ok(Thruster { nozzle, sprite, frame: 0, delay, counter: 0, active: false })
    }

    /// Advance one frame. Flips the flame every `delay` frames while active;
    /// an idle thruster keeps its frame and counter.
    pub fn tick(&mut self, active: bool, pool: &mut SpritePool) {
        self.active = active;
        if !active {
            return;
        }
        self.counter += 1;
        if self.counter >= self.delay {
            self.counter = 0;
            self.frame ^= 1;
            pool.set_tile_offset(self.sprite, tile_offset(self.nozzle.frames()[self.frame]));
        }
    }

    /// Follow the lander at `(x, y)`, or park off-screen while idle.
    pub fn sync(&self, x: i32, y: i32, pool: &mut SpritePool) {
        if self.active {
            let (dx, dy) = self.nozzle.offset();
            pool.set_position(self.sprite, x + dx, y + dy);
        } else {
            pool.hide(self.sprite);
        }
    }
}
