use gba_hal::{
    Hardware, Port, Region,
    display::Layer,
    fake::{Event, FakeHardware},
    input::Button,
    oam::SpriteHandle,
};
use lander::{
    Game, GameConfig,
    fixed::Fixed,
    lander::{Outcome, Phase},
    ui::Banner,
};

fn boot() -> (Game, FakeHardware) {
    let mut hw = FakeHardware::new();
    let mut game = Game::new(GameConfig::DEFAULT).unwrap();
    game.load_assets(&mut hw).unwrap();
    hw.clear_events();
    (game, hw)
}

/// Tile index as committed to OAM.
fn oam_tile(hw: &FakeHardware, sprite: SpriteHandle) -> u16 {
    hw.oam[sprite.index() * 4 + 2] & 0x3FF
}

/// Feet one pixel above the first landing pad (world x 48..80, surface row 216).
fn hover_over_pad(game: &mut Game, vy: Fixed) {
    game.camera.x = 56 - game.lander.x;
    game.camera.y = 96;
    game.lander.y = 216 - 8 - 96;
    game.lander.vy = vy;
}

#[test]
fn commit_happens_after_vblank() {
    let (mut game, mut hw) = boot();
    game.frame(&mut hw);

    assert_eq!(
        hw.events.as_slice(),
        &[
            Event::VBlank,
            Event::BulkCopy { region: Region::Oam, offset: 0, len: 512 },
            Event::Write(Port::BgHScroll(Layer::Bg0), 0),
            Event::Write(Port::BgVScroll(Layer::Bg0), 0),
        ]
    );
}

#[test]
fn one_commit_per_frame() {
    let (mut game, mut hw) = boot();
    for _ in 0..10 {
        game.frame(&mut hw);
    }
    let commits = hw
        .events
        .iter()
        .filter(|e| matches!(e, Event::BulkCopy { region: Region::Oam, .. }))
        .count();
    assert_eq!(commits, 10);
    assert_eq!(hw.frames, 10);
}

#[test]
fn gravity_is_exact_over_many_frames() {
    let (mut game, mut hw) = boot();
    for _ in 0..50 {
        assert_eq!(game.frame(&mut hw), None);
    }
    assert_eq!(game.lander.vy, Fixed::from_raw(50 * 8));
}

#[test]
fn soft_landing_scores() {
    let (mut game, mut hw) = boot();
    hover_over_pad(&mut game, Fixed::from_raw(256));

    assert_eq!(game.frame(&mut hw), Some(Outcome::Landed));
    assert_eq!(game.lander.score, 250);
    assert_eq!(game.lander.phase, Phase::Landed { frames: 1 });
    assert_eq!(game.hud.banner(), Banner::Landed);

    // score row reads 0250 on screen
    let tiles: Vec<u16> = game.hud.score.sprites.iter().map(|&s| oam_tile(&hw, s)).collect();
    assert_eq!(tiles, [18, 22, 28, 18]);
    // landed hull frame
    assert_eq!(oam_tile(&hw, game.lander.sprite), 2);
}

#[test]
fn hard_landing_crashes() {
    let (mut game, mut hw) = boot();
    hover_over_pad(&mut game, Fixed::from_int(3));

    assert_eq!(game.frame(&mut hw), Some(Outcome::Crashed));
    assert_eq!(game.lander.score, 0);
    assert_eq!(game.lander.settle_counter(), 1);
    assert_eq!(game.hud.banner(), Banner::Crashed);
    assert_eq!(oam_tile(&hw, game.lander.sprite), 4);
}

#[test]
fn settles_for_sixty_frames_then_respawns() {
    let (mut game, mut hw) = boot();
    hover_over_pad(&mut game, Fixed::from_raw(256));
    game.lander.fuel = 700;
    assert_eq!(game.frame(&mut hw), Some(Outcome::Landed));

    for _ in 0..60 {
        assert_eq!(game.frame(&mut hw), None);
        assert!(!game.lander.is_flying());
    }
    assert_eq!(game.frame(&mut hw), Some(Outcome::Respawned));

    let config = GameConfig::DEFAULT;
    assert!(game.lander.is_flying());
    assert_eq!((game.lander.x, game.lander.y), (config.spawn_x, config.nominal_y));
    assert_eq!(game.lander.vx, Fixed::ZERO);
    assert_eq!(game.lander.vy, Fixed::ZERO);
    assert_eq!(game.lander.fuel, 700);
    assert_eq!(game.lander.score, 250);
    assert_eq!(hw.read(Port::BgVScroll(Layer::Bg0)), 0);
    assert_eq!(game.hud.banner(), Banner::None);
}

#[test]
fn crash_settles_then_respawns() {
    let (mut game, mut hw) = boot();
    hover_over_pad(&mut game, Fixed::from_int(3));
    game.lander.fuel = 700;
    game.lander.score = 500;
    assert_eq!(game.frame(&mut hw), Some(Outcome::Crashed));

    for _ in 0..60 {
        assert_eq!(game.frame(&mut hw), None);
        assert_eq!(game.hud.banner(), Banner::Crashed);
    }
    assert_eq!(game.frame(&mut hw), Some(Outcome::Respawned));

    assert!(game.lander.is_flying());
    assert_eq!(game.lander.fuel, 700);
    assert_eq!(game.lander.score, 500);
    assert_eq!(game.hud.banner(), Banner::None);
    assert_eq!(oam_tile(&hw, game.lander.sprite), 0);
    // horizontal scroll is kept, vertical goes back to the top
    assert_eq!(hw.scroll_of(Layer::Bg0), (game.camera.x as u16, 0));
}

#[test]
fn input_is_ignored_while_settling() {
    let (mut game, mut hw) = boot();
    hover_over_pad(&mut game, Fixed::from_raw(256));
    game.frame(&mut hw);
    let fuel = game.lander.fuel;

    hw.press(Button::A);
    game.frame(&mut hw);
    assert_eq!(game.lander.fuel, fuel);
    assert!(!game.thrusters[0].active);
}

#[test]
fn fuel_never_goes_negative() {
    let (mut game, mut hw) = boot();
    game.lander.fuel = 2;
    hw.press(Button::A);
    for _ in 0..5 {
        game.frame(&mut hw);
    }
    let config = GameConfig::DEFAULT;
    assert_eq!(game.lander.fuel, 0);
    assert_eq!(
        game.lander.vy.raw(),
        5 * config.gravity.raw() - 2 * config.ascend_impulse.raw()
    );
}

#[test]
fn fuel_digits_on_screen() {
    let (mut game, mut hw) = boot();
    game.lander.fuel = 1234;
    game.frame(&mut hw);

    let tiles: Vec<u16> = game.hud.fuel.sprites.iter().map(|&s| oam_tile(&hw, s)).collect();
    // sheet tiles 10, 11, 12, 13 are the glyphs 1, 2, 3, 4
    assert_eq!(tiles, [20, 22, 24, 26]);
}

#[test]
fn keypad_is_sampled_each_frame() {
    let (mut game, mut hw) = boot();
    let start = game.lander.fuel;

    hw.press(Button::Left);
    game.frame(&mut hw);
    assert_eq!(game.lander.fuel, start - 1);
    assert!(game.lander.vx < Fixed::ZERO);

    hw.release(Button::Left);
    game.frame(&mut hw);
    assert_eq!(game.lander.fuel, start - 1);
    assert!(!game.thrusters[2].active);
}
