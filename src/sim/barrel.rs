//! Rolling barrel enemies

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrel {
    /// Top-left of the hitbox
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    /// Level-scaled factor applied to the roll speed
    pub speed_multiplier: f32,
    pub on_platform: bool,
    /// Height of the last surface the barrel left; falls are measured from here
    pub last_platform_y: f32,
    pub fall_threshold: f32,
}

impl Barrel {
    /// Spawn a barrel rolling in a random direction
    pub fn new<R: Rng>(pos: Vec2, speed_multiplier: f32, rng: &mut R) -> Self {
        let mut barrel = Self {
            pos,
            vel: Vec2::ZERO,
            gravity: BARREL_GRAVITY,
            speed_multiplier,
            on_platform: false,
            last_platform_y: pos.y,
            fall_threshold: BARREL_FALL_THRESHOLD,
        };
        barrel.roll_random_direction(rng);
        barrel
    }

    /// Roll speed magnitude for this barrel
    #[inline]
    pub fn roll_speed(&self) -> f32 {
        BARREL_ROLL_SPEED * self.speed_multiplier
    }

    fn roll_random_direction<R: Rng>(&mut self, rng: &mut R) {
        let speed = self.roll_speed();
        self.vel.x = if rng.random_bool(0.5) { speed } else { -speed };
    }

    /// Advance one frame against the given surfaces.
    ///
    /// Surfaces are scanned in order and the first one hit while falling wins.
    pub fn update<R: Rng>(&mut self, platforms: &[Rect], rng: &mut R) {
        self.vel.y = (self.vel.y + self.gravity).min(BARREL_MAX_FALL_SPEED);
        self.pos += self.vel;

        let was_on_platform = self.on_platform;
        self.on_platform = false;

        let hitbox = self.rect();
        let landing = platforms
            .iter()
            .find(|platform| hitbox.intersects(platform) && self.vel.y > 0.0);

        if let Some(platform) = landing {
            self.pos.y = platform.top() - BARREL_SIZE;
            self.vel.y = 0.0;
            self.on_platform = true;

            let fall_distance = self.pos.y - self.last_platform_y;
            if fall_distance >= self.fall_threshold {
                self.roll_random_direction(rng);
                self.last_platform_y = self.pos.y;
            }
        }

        if was_on_platform && !self.on_platform {
            self.last_platform_y = self.pos.y;
        }
    }

    /// Whether the barrel has left the playfield
    pub fn is_out_of_bounds(&self, screen_width: f32, screen_height: f32) -> bool {
        self.pos.y > screen_height
            || self.pos.x < -BARREL_OFFSCREEN_MARGIN
            || self.pos.x > screen_width + BARREL_OFFSCREEN_MARGIN
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(BARREL_SIZE))
    }
}
