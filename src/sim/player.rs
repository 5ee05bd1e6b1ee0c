//! The player character
//!
//! Velocity is input-driven (no acceleration model). Each frame runs, in order:
//! input, gravity and integration, horizontal wrap, ladder/platform collision,
//! animation, and the vertical screen clamp.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platform::{MoveAxis, MovingPlatform};
use super::rect::Rect;
use crate::consts::*;

/// Logical key state for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
}

/// Snapshot handed to HUD / high-score code
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub position: Vec2,
}

/// Seconds per walk-cycle frame
const ANIMATION_FRAME_SECS: f32 = 8.0 / FPS as f32;
const WALK_FRAMES: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the hitbox
    pub pos: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    pub on_ladder: bool,
    pub is_jumping: bool,
    pub is_climbing: bool,
    pub is_moving: bool,
    pub facing_right: bool,
    pub lives: u32,
    pub score: u64,
    pub level: u32,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Walk-cycle frame (cosmetic)
    pub animation_frame: u32,
    animation_time: f32,
}

impl Player {
    pub fn new(pos: Vec2, screen_width: f32, screen_height: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            on_ground: false,
            on_ladder: false,
            is_jumping: false,
            is_climbing: false,
            is_moving: false,
            facing_right: true,
            lives: STARTING_LIVES,
            score: 0,
            level: 1,
            screen_width,
            screen_height,
            animation_frame: 0,
            animation_time: 0.0,
        }
    }

    /// Advance one frame.
    ///
    /// Physics constants are per-frame deltas; `dt` only drives the walk cycle.
    pub fn update(
        &mut self,
        input: &PlayerInput,
        platforms: &[Rect],
        ladders: &[Rect],
        dt: f32,
        moving_platforms: &[MovingPlatform],
    ) {
        self.is_moving = false;
        self.is_climbing = false;

        self.handle_input(input);
        self.apply_physics();
        self.wrap_horizontal();
        self.resolve_collisions(platforms, ladders, moving_platforms);
        self.animate(dt);
        self.clamp_vertical();
    }

    fn handle_input(&mut self, input: &PlayerInput) {
        if input.left {
            self.vel.x = -PLAYER_SPEED;
            self.facing_right = false;
            self.is_moving = true;
        } else if input.right {
            self.vel.x = PLAYER_SPEED;
            self.facing_right = true;
            self.is_moving = true;
        } else {
            self.vel.x = 0.0;
        }

        if input.jump {
            self.jump();
        }

        if self.on_ladder {
            if input.up {
                self.vel.y = -PLAYER_SPEED;
                self.is_climbing = true;
            } else if input.down {
                self.vel.y = PLAYER_SPEED;
                self.is_climbing = true;
            }
        }
    }

    fn apply_physics(&mut self) {
        if !self.on_ladder {
            self.vel.y = (self.vel.y + PLAYER_GRAVITY).min(PLAYER_MAX_FALL_SPEED);
        }
        self.pos += self.vel;
    }

    /// Leaving one side of the screen re-enters on the other
    fn wrap_horizontal(&mut self) {
        if self.pos.x < -PLAYER_WIDTH {
            self.pos.x = self.screen_width;
        } else if self.pos.x > self.screen_width {
            self.pos.x = -PLAYER_WIDTH;
        }
    }

    fn resolve_collisions(
        &mut self,
        platforms: &[Rect],
        ladders: &[Rect],
        moving_platforms: &[MovingPlatform],
    ) {
        let hitbox = self.rect();

        self.on_ladder = ladders.iter().any(|ladder| hitbox.intersects(ladder));
        self.on_ground = false;

        // Moving platforms take priority over static ones
        for platform in moving_platforms {
            let rect = platform.rect();
            let over = self.pos.x + PLAYER_WIDTH > rect.left() + RIDE_EDGE_INSET
                && self.pos.x < rect.right() - RIDE_EDGE_INSET;
            if !over {
                continue;
            }

            let bottom = self.pos.y + PLAYER_HEIGHT;
            let in_band =
                bottom >= rect.top() - RIDE_BAND_ABOVE && bottom <= rect.top() + RIDE_BAND_BELOW;
            if self.vel.y >= 0.0 && in_band {
                self.land_on(rect.top());
                if platform.axis == MoveAxis::Horizontal {
                    self.pos.x += platform.step();
                }
                break;
            }
        }

        if self.on_ground {
            return;
        }

        for platform in platforms {
            if hitbox.intersects(platform) && self.vel.y > 0.0 && self.pos.y < platform.top() {
                self.land_on(platform.top());
                break;
            }
        }
    }

    fn land_on(&mut self, top: f32) {
        self.pos.y = top - PLAYER_HEIGHT;
        self.vel.y = 0.0;
        self.on_ground = true;
        self.is_jumping = false;
    }

    fn animate(&mut self, dt: f32) {
        self.animation_time += dt;
        if self.animation_time >= ANIMATION_FRAME_SECS {
            self.animation_time = 0.0;
            self.animation_frame = if self.is_moving {
                (self.animation_frame + 1) % WALK_FRAMES
            } else {
                0
            };
        }
    }

    fn clamp_vertical(&mut self) {
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
        } else if self.pos.y + PLAYER_HEIGHT > self.screen_height {
            self.pos.y = self.screen_height - PLAYER_HEIGHT;
            self.on_ground = true;
            self.vel.y = 0.0;
        }
    }

    /// Jump if standing on something
    pub fn jump(&mut self) {
        if self.on_ground {
            self.vel.y = -PLAYER_JUMP_SPEED;
            self.is_jumping = true;
            self.on_ground = false;
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    /// Lose a life. Returns true when no lives remain (game over).
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    /// Grant a life if below the cap. Returns false when already at the cap.
    pub fn gain_life(&mut self) -> bool {
        if self.lives < MAX_LIVES {
            self.lives += 1;
            true
        } else {
            false
        }
    }

    /// Respawn at a position with zero velocity and cleared jump/ground flags
    pub fn reset_position(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::ZERO;
        self.on_ground = false;
        self.is_jumping = false;
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            score: self.score,
            lives: self.lives,
            level: self.level,
            position: self.pos,
        }
    }
}
