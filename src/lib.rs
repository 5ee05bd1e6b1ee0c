//! Kong Climb - a Donkey Kong tribute platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, barrels, platforms, pickups)
//! - `level`: Data-driven level layouts
//! - `highscores`: Top 10 leaderboard
//! - `settings`: Runner configuration
//! - `persistence`: JSON file load/save

pub mod highscores;
pub mod level;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use level::{LevelConfig, LevelError, LevelSet};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 896.0;
    pub const SCREEN_HEIGHT: f32 = 640.0;
    /// Target frame rate; all physics constants are per-frame deltas at this rate
    pub const FPS: u32 = 60;
    pub const FRAME_DT: f32 = 1.0 / FPS as f32;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 24.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    /// Horizontal walk and ladder climb speed (px/frame)
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const PLAYER_JUMP_SPEED: f32 = 9.0;
    pub const PLAYER_GRAVITY: f32 = 0.8;
    pub const PLAYER_MAX_FALL_SPEED: f32 = 10.0;
    pub const STARTING_LIVES: u32 = 3;
    /// Life cap: a life pickup at this count pays out score instead
    pub const MAX_LIVES: u32 = 3;
    /// Where the player (re)spawns at the start of each level
    pub const PLAYER_SPAWN_X: f32 = 50.0;
    pub const PLAYER_SPAWN_Y: f32 = SCREEN_HEIGHT - 50.0 - PLAYER_HEIGHT;

    /// Moving platform landing tolerances
    pub const RIDE_EDGE_INSET: f32 = 2.0;
    pub const RIDE_BAND_ABOVE: f32 = 5.0;
    pub const RIDE_BAND_BELOW: f32 = 15.0;

    /// Barrels
    pub const BARREL_SIZE: f32 = 20.0;
    pub const BARREL_GRAVITY: f32 = 0.5;
    pub const BARREL_MAX_FALL_SPEED: f32 = 8.0;
    pub const BARREL_ROLL_SPEED: f32 = 2.0;
    /// Minimum drop before a landing re-rolls the barrel's direction
    pub const BARREL_FALL_THRESHOLD: f32 = 50.0;
    /// Horizontal slack past either screen edge before a barrel counts as dodged
    pub const BARREL_OFFSCREEN_MARGIN: f32 = 50.0;
    pub const BARREL_SPAWN_MIN_X: i32 = 200;
    pub const BARREL_SPAWN_MAX_X: i32 = 600;
    /// Barrels drop in this far above the bottom of the screen
    pub const BARREL_SPAWN_HEIGHT: f32 = 480.0;
    pub const BARREL_SPAWN_RATE_BASE: u32 = 180;
    pub const BARREL_SPAWN_RATE_PER_LEVEL: u32 = 20;
    pub const BARREL_SPAWN_RATE_MIN: u32 = 60;

    /// Collectibles
    pub const POWERUP_SIZE: f32 = 16.0;
    pub const CROWN_SIZE: f32 = 24.0;
    /// Gap left between a spawned power-up and the platform it hovers over
    pub const POWERUP_HOVER_GAP: f32 = 4.0;
    pub const HAMMER_SPAWN_RATE_BASE: u32 = 600;
    pub const HAMMER_SPAWN_RATE_PER_LEVEL: u32 = 60;
    pub const HAMMER_SPAWN_RATE_MIN: u32 = 300;
    pub const BONUS_SPAWN_RATE_BASE: u32 = 480;
    pub const BONUS_SPAWN_RATE_PER_LEVEL: u32 = 40;
    pub const BONUS_SPAWN_RATE_MIN: u32 = 240;
    pub const MAX_RANDOM_POWERUPS: usize = 3;

    /// Score rewards
    pub const SCORE_HAMMER: u64 = 500;
    pub const SCORE_BONUS: u64 = 1000;
    pub const SCORE_LIFE_AT_CAP: u64 = 2000;
    pub const SCORE_CROWN: u64 = 5000;
}

/// Spawn interval for a timer that tightens by `per_level` frames each level,
/// bounded below by `min`
#[inline]
pub fn scaled_spawn_rate(base: u32, per_level: u32, min: u32, level: u32) -> u32 {
    base.saturating_sub(per_level.saturating_mul(level)).max(min)
}
