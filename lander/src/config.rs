use crate::fixed::Fixed;

/// Tunable game rules.
///
/// Speeds and impulses are per frame, in [`Fixed`] pixels; positions are
/// whole pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Added to the vertical velocity every flying frame.
    pub gravity: Fixed,
    /// Subtracted from the vertical velocity per frame of main thrust.
    pub ascend_impulse: Fixed,
    /// Added to (or subtracted from) the horizontal velocity per frame of side thrust.
    pub side_impulse: Fixed,
    pub starting_fuel: i32,
    pub landing_reward: i32,
    /// Frames spent landed or crashed before the lander respawns.
    pub settle_frames: u8,
    /// Vertical background scroll range, in pixels.
    pub scroll_min: i32,
    pub scroll_max: i32,
    /// On-screen y the lander is held at while the background scrolls.
    pub nominal_y: i32,
    pub spawn_x: i32,
    /// Offset from the sprite's top-left to the bottom-right hitbox corner.
    pub hitbox: i32,
    /// Frames between thruster flame animation flips.
    pub thruster_delay: u8,
    /// Largest whole-pixel horizontal speed (either direction) that still lands.
    pub safe_vx: i32,
    /// Largest whole-pixel downward speed that still lands.
    pub safe_vy: i32,
}

impl GameConfig {
    pub const DEFAULT: GameConfig = GameConfig {
        gravity: Fixed::from_raw(8),
        ascend_impulse: Fixed::from_raw(24),
        side_impulse: Fixed::from_raw(6),
        starting_fuel: 1500,
        landing_reward: 250,
        settle_frames: 60,
        scroll_min: 0,
        scroll_max: 96,
        nominal_y: 20,
        spawn_x: 116,
        hitbox: 7,
        thruster_delay: 8,
        safe_vx: 0,
        safe_vy: 1,
    };
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
