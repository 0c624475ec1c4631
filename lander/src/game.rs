//! # Frame Driver
//!
//! ```text
//! ┌─────────┐   ┌──────────────────────┐   ┌─────────────┐   ┌──────────────────┐
//! │ sample  │──>│ update (RAM only)    │──>│ wait_vblank │──>│ commit OAM+scroll│
//! └─────────┘   └──────────────────────┘   └─────────────┘   └──────────────────┘
//! ```
//!
//! Nothing reaches video memory or the scroll registers before the wait.

use gba_hal::{
    Hardware, Port,
    background::{BgLayer, ScrollState},
    display::{BgControl, BgSize, DisplayControl, Layer},
    input::{Button, Keypad},
    oam::{self, SpritePool},
};

use crate::{
    InitError,
    assets::{BG_PALETTE, SPRITE_PALETTE, bg_tile_asset, sprite_sheet, terrain_map},
    config::GameConfig,
    lander::{Camera, Lander, Outcome, Phase},
    terrain,
    thruster::{Nozzle, Thruster},
    ui::{Banner, Hud},
};

/// Terrain lives on BG0: tiles in char block 0, map in the last screen block.
pub const TERRAIN_LAYER: BgLayer = BgLayer::new(
    Layer::Bg0,
    BgControl {
        priority: 1,
        char_block: 0,
        screen_block: 31,
        size: BgSize::S32x32,
        color_256: true,
    },
);

pub const DISPLAY_MODE: DisplayControl = DisplayControl::MODE_0
    .union(DisplayControl::BG0)
    .union(DisplayControl::OBJ)
    .union(DisplayControl::OBJ_1D);

pub struct Game {
    pub config: GameConfig,
    pub pool: SpritePool,
    pub keypad: Keypad,
    pub camera: Camera,
    pub scroll: ScrollState,
    pub lander: Lander,
    /// Indexed like [`Nozzle::ALL`].
    pub thrusters: [Thruster; 3],
    pub hud: Hud,
}

impl Game {
    /// Allocate every sprite the game uses. Touches no hardware.
    pub fn new(config: GameConfig) -> Result<Game, InitError> {
        let mut pool = SpritePool::new();
        let lander = Lander::new(&mut pool, &config)?;
        let thrusters = [
            Thruster::new(&mut pool, Nozzle::Vertical, config.thruster_delay)?,
            Thruster::new(&mut pool, Nozzle::Left, config.thruster_delay)?,
            Thruster::new(&mut pool, Nozzle::Right, config.thruster_delay)?,
        ];
        let hud = Hud::new(&mut pool)?;

        let mut scroll = ScrollState::new();
        scroll.enable(TERRAIN_LAYER.layer);

        let mut game = Game {
            config,
            pool,
            keypad: Keypad::new(),
            camera: Camera::default(),
            scroll,
            lander,
            thrusters,
            hud,
        };
        game.sync_sprites();
        log::info!("game ready, {} sprites allocated", game.pool.allocated());
        Ok(game)
    }

    /// Upload palettes, tiles and the terrain map, then turn the display on.
    pub fn load_assets<H: Hardware + ?Sized>(&mut self, hw: &mut H) -> Result<(), InitError> {
        hw.write(Port::DisplayControl, DisplayControl::FORCED_BLANK.bits());
        TERRAIN_LAYER.upload(hw, &bg_tile_asset(), &terrain_map(), &BG_PALETTE)?;
        oam::load_graphics(hw, &sprite_sheet(), &SPRITE_PALETTE)?;
        self.pool.commit(hw);
        self.scroll.commit(hw);
        hw.write(Port::DisplayControl, DISPLAY_MODE.bits());
        Ok(())
    }

    /// One frame of game logic against an already sampled keypad.
    /// Mutates descriptors and scroll offsets in RAM only.
    pub fn update(&mut self, keypad: &Keypad) -> Option<Outcome> {
        let config = self.config;
        let lander = &mut self.lander;

        let ascend = keypad.is_pressed(Button::A) && lander.ascend(&config);
        let push_right = keypad.is_pressed(Button::Right) && lander.side(true, &config);
        let push_left = keypad.is_pressed(Button::Left) && lander.side(false, &config);

        #[cfg(feature = "debug-scroll")]
        {
            if keypad.is_pressed(Button::L) {
                self.camera.x -= 1;
            }
            if keypad.is_pressed(Button::R) {
                self.camera.x += 1;
            }
        }

        let outcome = lander.step(&mut self.camera, &config);
        self.camera.x = self.camera.x.rem_euclid(terrain::PIXEL_WIDTH);

        // the nozzle on the far side fires to push the hull
        let firing = [ascend, push_right, push_left];
        for (thruster, active) in self.thrusters.iter_mut().zip(firing) {
            thruster.tick(active, &mut self.pool);
        }
        self.sync_sprites();
        outcome
    }

    /// Copy lander, thruster, HUD and scroll state into the shadow tables.
    fn sync_sprites(&mut self) {
        let lander = &self.lander;
        lander.sync(&mut self.pool);
        for thruster in &self.thrusters {
            thruster.sync(lander.x, lander.y, &mut self.pool);
        }

        let banner = match lander.phase {
            Phase::Flying => Banner::None,
            Phase::Landed { .. } => Banner::Landed,
            Phase::Crashed { .. } => Banner::Crashed,
        };
        self.hud.update(&mut self.pool, lander.fuel, lander.score, banner);

        self.scroll.set(
            TERRAIN_LAYER.layer,
            self.camera.x as i16,
            self.camera.y as i16,
        );
    }

    /// Sample, update, wait for vblank, commit.
    pub fn frame<H: Hardware + ?Sized>(&mut self, hw: &mut H) -> Option<Outcome> {
        self.keypad.sample(hw);
        let keypad = self.keypad;
        let outcome = self.update(&keypad);

        hw.wait_vblank();
        self.pool.commit(hw);
        self.scroll.commit(hw);
        outcome
    }

    pub fn run<H: Hardware + ?Sized>(&mut self, hw: &mut H) -> ! {
        loop {
            self.frame(hw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gba_hal::{
        Region, SCREEN_WIDTH,
        fake::{Event, FakeHardware},
        input::KEY_MASK,
    };

    fn held(buttons: &[Button]) -> Keypad {
        let mut keypad = Keypad::new();
        let raw = buttons.iter().fold(KEY_MASK, |raw, b| raw & !b.mask());
        keypad.latch(raw);
        keypad
    }

    #[test]
    fn sprite_budget() {
        let game = Game::new(GameConfig::DEFAULT).unwrap();
        // lander, three flames, 24 HUD sprites
        assert_eq!(game.pool.allocated(), 28);
    }

    #[test]
    fn load_assets_enables_display_last() {
        let mut game = Game::new(GameConfig::DEFAULT).unwrap();
        let mut hw = FakeHardware::new();
        game.load_assets(&mut hw).unwrap();

        assert_eq!(hw.display_control, DISPLAY_MODE.bits());
        assert_eq!(hw.bg_control[0], TERRAIN_LAYER.control.bits());
        assert_eq!(
            hw.events.last(),
            Some(&Event::Write(Port::DisplayControl, DISPLAY_MODE.bits()))
        );
        assert_eq!(&hw.obj_palette[..3], &SPRITE_PALETTE);
        let sprites = Region::ObjTiles.vram_offset();
        assert_eq!(hw.vram[sprites..sprites + 1504], crate::assets::SPRITE_TILES);
        let screen = Region::ScreenBlock(31).vram_offset();
        assert_eq!(hw.vram[screen..screen + 1024], terrain::MAP);
    }

    #[test]
    fn flames_follow_input() {
        let mut game = Game::new(GameConfig::DEFAULT).unwrap();
        game.update(&held(&[Button::A, Button::Right]));

        let [vertical, left, right] = &game.thrusters;
        assert!(vertical.active && left.active && !right.active);
        assert_eq!(game.pool.attr(left.sprite).x(), game.lander.x - 8);
        assert_eq!(game.pool.attr(right.sprite).x(), SCREEN_WIDTH);
        assert_eq!(game.lander.fuel, GameConfig::DEFAULT.starting_fuel - 2);
    }

    #[test]
    fn no_flame_without_fuel() {
        let mut game = Game::new(GameConfig::DEFAULT).unwrap();
        game.lander.fuel = 0;
        game.update(&held(&[Button::A]));
        assert!(!game.thrusters[0].active);
        assert_eq!(game.lander.fuel, 0);
    }

    #[test]
    fn camera_x_wraps_with_the_map() {
        let mut game = Game::new(GameConfig::DEFAULT).unwrap();
        game.lander.vx = crate::fixed::Fixed::from_int(-3);
        game.update(&Keypad::new());
        assert_eq!(game.camera.x, terrain::PIXEL_WIDTH - 3);
        assert_eq!(game.scroll.get(Layer::Bg0).x, (terrain::PIXEL_WIDTH - 3) as i16);
    }

    #[cfg(feature = "debug-scroll")]
    #[test]
    fn shoulder_buttons_pan() {
        let mut game = Game::new(GameConfig::DEFAULT).unwrap();
        game.update(&held(&[Button::R]));
        game.update(&held(&[Button::R]));
        assert_eq!(game.camera.x, 2);
    }
}
