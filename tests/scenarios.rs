//! End-to-end frame scenarios: player update followed by manager update,
//! exactly as the runner drives them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use kong_climb::LevelSet;
use kong_climb::consts::*;
use kong_climb::sim::{Barrel, DemoPilot, GameManager, Player, PlayerInput, PowerUp, PowerUpKind};

fn manager() -> GameManager {
    GameManager::new(LevelSet::builtin().unwrap(), 2024).unwrap()
}

/// A player hovering in an empty top corner, clear of every level entity
fn corner_player() -> Player {
    Player::new(Vec2::new(820.0, 10.0), SCREEN_WIDTH, SCREEN_HEIGHT)
}

fn barrel_on(player: &Player) -> Barrel {
    let mut rng = Pcg32::seed_from_u64(5);
    Barrel::new(player.pos, 1.0, &mut rng)
}

fn frame(player: &mut Player, manager: &mut GameManager, input: PlayerInput) -> bool {
    player.update(
        &input,
        manager.static_platforms(),
        manager.ladders(),
        FRAME_DT,
        manager.moving_platforms(),
    );
    manager.update(player)
}

#[test]
fn two_barrel_hits_cost_two_lives() {
    let mut gm = manager();
    let mut player = corner_player();
    assert_eq!(player.lives, 3);

    gm.barrels.push(barrel_on(&player));
    gm.update(&mut player);
    assert_eq!(player.lives, 2);
    assert!(gm.barrels.is_empty());

    gm.barrels.push(barrel_on(&player));
    gm.update(&mut player);
    assert_eq!(player.lives, 1);
    assert_eq!(gm.barrels_dodged, 0);

    // Not game over until the last life goes
    assert!(player.lose_life());
    assert_eq!(player.lives, 0);
}

#[test]
fn life_pickup_at_cap_pays_score_instead() {
    let mut gm = manager();
    let mut player = corner_player();
    gm.powerups.push(PowerUp::new(player.pos, PowerUpKind::Life));

    gm.update(&mut player);
    assert_eq!(player.lives, MAX_LIVES);
    assert_eq!(player.score, SCORE_LIFE_AT_CAP);
}

#[test]
fn life_pickup_below_cap_restores_life() {
    let mut gm = manager();
    let mut player = corner_player();
    player.lose_life();
    assert_eq!(player.lives, 2);
    gm.powerups.push(PowerUp::new(player.pos, PowerUpKind::Life));

    gm.update(&mut player);
    assert_eq!(player.lives, 3);
    assert_eq!(player.score, 0);

    // Standing on the spent pickup does nothing more
    gm.update(&mut player);
    assert_eq!(player.lives, 3);
    assert_eq!(player.score, 0);
    assert_eq!(gm.powerups_collected, 1);
}

#[test]
fn spawn_at_powerup_cap_adds_nothing() {
    let mut gm = manager();
    let mut player = corner_player();
    for _ in 0..gm.max_random_powerups {
        assert!(gm.spawn_powerup(PowerUpKind::Bonus));
    }
    let count = gm.powerups.len();

    assert!(!gm.spawn_powerup(PowerUpKind::Hammer));
    assert_eq!(gm.powerups.len(), count);

    // Timer expiry at the cap is silent too
    gm.hammer_timer.elapsed = gm.hammer_timer.rate - 1;
    gm.bonus_timer.elapsed = gm.bonus_timer.rate - 1;
    gm.update(&mut player);
    assert_eq!(gm.powerups.len(), count);
    assert_eq!(gm.hammer_timer.elapsed, 0);
}

#[test]
fn barrel_past_right_margin_is_dodged() {
    let mut gm = manager();
    let mut player = corner_player();
    let mut rng = Pcg32::seed_from_u64(11);
    gm.barrels
        .push(Barrel::new(Vec2::new(SCREEN_WIDTH + 60.0, 300.0), 1.0, &mut rng));

    gm.update(&mut player);
    assert!(gm.barrels.is_empty());
    assert_eq!(gm.barrels_dodged, 1);
    assert_eq!(player.lives, STARTING_LIVES);
}

#[test]
fn reset_then_one_airborne_frame() {
    let mut player = corner_player();
    player.vel = Vec2::new(4.0, -3.0);
    player.reset_position(300.0, 100.0);
    player.update(&PlayerInput::default(), &[], &[], FRAME_DT, &[]);
    assert_eq!(player.pos.x, 300.0);
    assert_eq!(player.vel.x, 0.0);
    assert_eq!(player.vel.y, PLAYER_GRAVITY);
}

#[test]
fn crown_completes_level_exactly_once() {
    let mut gm = manager();
    let crown = gm.crown.as_ref().unwrap().pos;
    let mut player = Player::new(crown, SCREEN_WIDTH, SCREEN_HEIGHT);

    assert!(gm.update(&mut player));
    assert_eq!(gm.score(), SCORE_CROWN);
    for _ in 0..5 {
        assert!(!gm.update(&mut player));
    }
    assert_eq!(gm.score(), SCORE_CROWN);

    // Caller-driven transition
    gm.next_level().unwrap();
    player.reset_position(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
    assert_eq!(gm.level(), 2);
    assert!(!gm.crown.as_ref().unwrap().collected);
    assert_eq!(gm.score(), SCORE_CROWN);
}

#[test]
fn spawned_player_settles_on_floor() {
    let mut gm = manager();
    let mut player = Player::new(
        Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
    );
    for _ in 0..10 {
        frame(&mut player, &mut gm, PlayerInput::default());
    }
    assert!(player.on_ground);
    assert_eq!(player.rect().bottom(), SCREEN_HEIGHT - 50.0);
}

#[test]
fn grounded_player_never_has_vertical_speed() {
    for level in 1..=3 {
        let mut gm = manager();
        gm.level = level;
        gm.initialize_level().unwrap();
        let spawn = Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
        let mut player = Player::new(spawn, SCREEN_WIDTH, SCREEN_HEIGHT);
        let mut pilot = DemoPilot::new(level as u64);

        for _ in 0..3000 {
            let input = pilot.next_input(&player, &gm.barrels);
            let lives = player.lives;
            frame(&mut player, &mut gm, input);
            if player.lives < lives {
                if player.lives == 0 {
                    break;
                }
                player.reset_position(spawn.x, spawn.y);
                continue;
            }
            assert!(!(player.on_ground && player.vel.y != 0.0));
            assert!(player.pos.y >= 0.0);
            assert!(player.rect().bottom() <= SCREEN_HEIGHT);
        }
    }
}
