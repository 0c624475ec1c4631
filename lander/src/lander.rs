//! # Lander Physics
//!
//! The lander's screen position is split from its world position by a
//! [`Camera`]. While the camera has vertical travel left the lander is held
//! at its nominal screen row and the world scrolls past it; once the camera
//! hits a scroll bound the sprite itself moves. Horizontally the lander
//! never moves on screen, only the camera does.
//!
//! ```text
//!            ┌────────────────── settle_frames elapsed ─────────────┐
//!            v                                                      │
//!        Flying ── 2 contacts, slow ──> Landed { 1..=settle } ──────┤
//!            │                                                      │
//!            └──── any other contact ─> Crashed { 1..=settle } ─────┘
//! ```

use gba_hal::oam::{PoolError, SpriteDesc, SpriteHandle, SpritePool, SpriteSize};

use crate::{
    assets::{LANDER_CRASHED, LANDER_FLYING, LANDER_LANDED, tile_offset},
    config::GameConfig,
    fixed::Fixed,
    terrain,
};

/// Background scroll offset, in world pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Flying,
    /// Touched down; `frames` counts up from 1.
    Landed { frames: u8 },
    Crashed { frames: u8 },
}

/// What a frame of physics ended with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Landed,
    Crashed,
    Respawned,
}

#[derive(Debug, Clone)]
pub struct Lander {
    pub sprite: SpriteHandle,
    /// Screen position of the sprite's top-left corner.
    pub x: i32,
    pub y: i32,
    pub vx: Fixed,
    pub vy: Fixed,
    pub gravity: Fixed,
    pub fuel: i32,
    pub score: i32,
    pub phase: Phase,
}

impl Lander {
    pub fn new(pool: &mut SpritePool, config: &GameConfig) -> Result<Lander, PoolError> {
        let desc = SpriteDesc::new(
            config.spawn_x,
            config.nominal_y,
            SpriteSize::S8x8,
            tile_offset(LANDER_FLYING),
        );
        let sprite = pool.allocate(desc)?;
        Ok(Lander {
            sprite,
            x: config.spawn_x,
            y: config.nominal_y,
            vx: Fixed::ZERO,
            vy: Fixed::ZERO,
            gravity: config.gravity,
            fuel: config.starting_fuel,
            score: 0,
            phase: Phase::Flying,
        })
    }

    pub fn is_flying(&self) -> bool {
        self.phase == Phase::Flying
    }

    /// 0 while flying, otherwise frames since touchdown.
    pub fn settle_counter(&self) -> u8 {
        match self.phase {
            Phase::Flying => 0,
            Phase::Landed { frames } | Phase::Crashed { frames } => frames,
        }
    }

    /// Top-left corner in world pixels.
    pub fn world_position(&self, camera: &Camera) -> (i32, i32) {
        (self.x + camera.x, self.y + camera.y)
    }

    fn burn(&mut self) -> bool {
        if !self.is_flying() || self.fuel <= 0 {
            return false;
        }
        self.fuel -= 1;
        true
    }

    /// Fire the main engine for one frame. Returns whether it fired.
    pub fn ascend(&mut self, config: &GameConfig) -> bool {
        if !self.burn() {
            return false;
        }
        self.vy -= config.ascend_impulse;
        true
    }

    /// Fire a side thruster for one frame, pushing right when `right` is set.
    pub fn side(&mut self, right: bool, config: &GameConfig) -> bool {
        if !self.burn() {
            return false;
        }
        if right {
            self.vx += config.side_impulse;
        } else {
            self.vx -= config.side_impulse;
        }
        true
    }

    /// Put the lander at world row `world_y`, scrolling the camera while it
    /// has travel left and moving the sprite once it doesn't.
    fn place(&mut self, world_y: i32, camera: &mut Camera, config: &GameConfig) {
        let world_y = world_y.max(0);
        camera.y = (world_y - config.nominal_y).clamp(config.scroll_min, config.scroll_max);
        self.y = world_y - camera.y;
    }

    /// Advance one frame.
    pub fn step(&mut self, camera: &mut Camera, config: &GameConfig) -> Option<Outcome> {
        match self.phase {
            Phase::Flying => self.fly(camera, config),
            Phase::Landed { frames } | Phase::Crashed { frames } => {
                if frames > config.settle_frames {
                    self.respawn(camera, config);
                    return Some(Outcome::Respawned);
                }
                let frames = frames.saturating_add(1);
                self.phase = match self.phase {
                    Phase::Landed { .. } => Phase::Landed { frames },
                    _ => Phase::Crashed { frames },
                };
                None
            }
        }
    }

    fn fly(&mut self, camera: &mut Camera, config: &GameConfig) -> Option<Outcome> {
        let (_, world_y) = self.world_position(camera);
        let next_y = world_y + self.vy.int_part();
        if next_y < 0 && self.vy < Fixed::ZERO {
            // the top of the map is a ceiling
            self.vy = Fixed::ZERO;
        }
        self.place(next_y, camera, config);

        self.vy += self.gravity;
        camera.x += self.vx.int_part();

        let (wx, wy) = self.world_position(camera);
        match terrain::contacts(wx, wy, config.hitbox) {
            0 => None,
            2 if self.is_safe_speed(config) => {
                self.place(wy - 1, camera, config);
                self.score += config.landing_reward;
                self.phase = Phase::Landed { frames: 1 };
                log::info!("landed at ({wx}, {wy}), score {}", self.score);
                Some(Outcome::Landed)
            }
            contacts => {
                self.phase = Phase::Crashed { frames: 1 };
                log::warn!(
                    "crashed at ({wx}, {wy}): {contacts} contacts, velocity ({}, {})",
                    self.vx.raw(),
                    self.vy.raw()
                );
                Some(Outcome::Crashed)
            }
        }
    }

    /// Less than a whole pixel per frame sideways, and falling no faster
    /// than `safe_vy`.
    fn is_safe_speed(&self, config: &GameConfig) -> bool {
        self.vx.trunc().abs() <= config.safe_vx && (0..=config.safe_vy).contains(&self.vy.int_part())
    }

    /// Back to the spawn point. Fuel and score carry over.
    pub fn respawn(&mut self, camera: &mut Camera, config: &GameConfig) {
        self.x = config.spawn_x;
        self.y = config.nominal_y;
        self.vx = Fixed::ZERO;
        self.vy = Fixed::ZERO;
        self.gravity = config.gravity;
        self.phase = Phase::Flying;
        camera.y = config.scroll_min;
        log::debug!("respawned, fuel {} score {}", self.fuel, self.score);
    }

    /// Push position and hull frame to the sprite.
    pub fn sync(&self, pool: &mut SpritePool) {
        let frame = match self.phase {
            Phase::Flying => LANDER_FLYING,
            Phase::Landed { .. } => LANDER_LANDED,
            Phase::Crashed { .. } => LANDER_CRASHED,
        };
        pool.set_position(self.sprite, self.x, self.y);
        pool.set_tile_offset(self.sprite, tile_offset(frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (SpritePool, Lander, Camera, GameConfig) {
        let config = GameConfig::DEFAULT;
        let mut pool = SpritePool::new();
        let lander = Lander::new(&mut pool, &config).unwrap();
        (pool, lander, Camera::default(), config)
    }

    /// Place the lander so its feet are one pixel above the first pad
    /// (world rows 216.., columns 48..80).
    fn hover_over_pad(lander: &mut Lander, camera: &mut Camera, config: &GameConfig) {
        camera.x = 56 - lander.x;
        lander.place(216 - config.hitbox - 1, camera, config);
    }

    #[test]
    fn gravity_accumulates_exactly() {
        let (_, mut lander, mut camera, config) = setup();
        for _ in 0..40 {
            assert_eq!(lander.step(&mut camera, &config), None);
        }
        assert_eq!(lander.vy, Fixed::from_raw(40 * 8));
    }

    #[test]
    fn camera_scrolls_before_sprite_moves() {
        let (_, mut lander, mut camera, config) = setup();
        lander.vy = Fixed::from_int(4);
        lander.gravity = Fixed::ZERO;

        lander.step(&mut camera, &config);
        assert_eq!((lander.y, camera.y), (20, 4));

        lander.place(20 + 94, &mut camera, &config);
        lander.step(&mut camera, &config);
        // 2 px of scroll left, the other 2 px move the sprite
        assert_eq!((lander.y, camera.y), (22, 96));
    }

    #[test]
    fn ceiling_stops_ascent() {
        let (_, mut lander, mut camera, config) = setup();
        lander.vy = Fixed::from_int(-30);
        lander.step(&mut camera, &config);
        assert_eq!(lander.y, 0);
        assert_eq!(camera.y, 0);
        assert_eq!(lander.vy, config.gravity);
    }

    #[test]
    fn horizontal_motion_scrolls() {
        let (_, mut lander, mut camera, config) = setup();
        lander.vx = Fixed::from_raw(-300);
        lander.step(&mut camera, &config);
        assert_eq!(camera.x, -2);
        assert_eq!(lander.x, config.spawn_x);
    }

    #[test]
    fn soft_touchdown_lands() {
        let (_, mut lander, mut camera, config) = setup();
        hover_over_pad(&mut lander, &mut camera, &config);
        lander.vy = Fixed::from_raw(300);

        assert_eq!(lander.step(&mut camera, &config), Some(Outcome::Landed));
        assert_eq!(lander.score, 250);
        assert_eq!(lander.phase, Phase::Landed { frames: 1 });
        // settled one pixel up from the contact row
        assert_eq!(lander.world_position(&camera).1, 216 - config.hitbox - 1);
    }

    #[test]
    fn fast_touchdown_crashes() {
        let (_, mut lander, mut camera, config) = setup();
        hover_over_pad(&mut lander, &mut camera, &config);
        lander.vy = Fixed::from_int(2);

        assert_eq!(lander.step(&mut camera, &config), Some(Outcome::Crashed));
        assert_eq!(lander.score, 0);
        assert_eq!(lander.settle_counter(), 1);
    }

    #[test]
    fn sideways_touchdown_crashes() {
        let (_, mut lander, mut camera, config) = setup();
        hover_over_pad(&mut lander, &mut camera, &config);
        lander.vy = Fixed::from_raw(256);
        lander.vx = Fixed::from_raw(-256);
        // drifts one pixel left, still over the pad
        assert_eq!(lander.step(&mut camera, &config), Some(Outcome::Crashed));
    }

    #[test]
    fn one_corner_contact_crashes() {
        let (_, mut lander, mut camera, config) = setup();
        // left corner over column 2 (surface row 25), right corner over
        // column 3 (surface row 24)
        camera.x = 20 - lander.x;
        lander.place(184, &mut camera, &config);
        lander.vy = Fixed::from_raw(256);

        assert_eq!(lander.step(&mut camera, &config), Some(Outcome::Crashed));
        let (wx, wy) = lander.world_position(&camera);
        assert_eq!(terrain::contacts(wx, wy, config.hitbox), 1);
        assert_eq!(lander.score, 0);
        assert_eq!(lander.phase, Phase::Crashed { frames: 1 });
    }

    #[test]
    fn settles_then_respawns() {
        let touchdowns = [Phase::Landed { frames: 1 }, Phase::Crashed { frames: 1 }];
        for touchdown in touchdowns {
            let (_, mut lander, mut camera, config) = setup();
            lander.phase = touchdown;
            lander.score = 250;
            lander.fuel = 10;
            camera.y = 96;

            for n in 2..=61 {
                assert_eq!(lander.step(&mut camera, &config), None);
                assert_eq!(lander.settle_counter(), n);
                assert_eq!(
                    core::mem::discriminant(&lander.phase),
                    core::mem::discriminant(&touchdown)
                );
            }
            assert_eq!(lander.step(&mut camera, &config), Some(Outcome::Respawned));
            assert!(lander.is_flying());
            assert_eq!((lander.x, lander.y), (config.spawn_x, config.nominal_y));
            assert_eq!((lander.vx, lander.vy), (Fixed::ZERO, Fixed::ZERO));
            assert_eq!((lander.fuel, lander.score), (10, 250));
            assert_eq!(camera.y, config.scroll_min);
        }
    }

    #[test]
    fn thrust_needs_fuel() {
        let (_, mut lander, _, config) = setup();
        lander.fuel = 1;
        assert!(lander.ascend(&config));
        assert_eq!(lander.vy, -config.ascend_impulse);
        assert!(!lander.side(true, &config));
        assert_eq!(lander.fuel, 0);
        assert_eq!(lander.vx, Fixed::ZERO);
    }

    #[test]
    fn no_thrust_while_settling() {
        let (_, mut lander, _, config) = setup();
        lander.phase = Phase::Crashed { frames: 3 };
        assert!(!lander.ascend(&config));
        assert_eq!(lander.fuel, config.starting_fuel);
    }

    #[test]
    fn sprite_frame_follows_phase() {
        let (mut pool, mut lander, _, _) = setup();
        lander.phase = Phase::Crashed { frames: 1 };
        lander.y = 50;
        lander.sync(&mut pool);
        assert_eq!(pool.attr(lander.sprite).tile(), tile_offset(LANDER_CRASHED));
        assert_eq!(pool.attr(lander.sprite).y(), 50);
    }
}
