//! Power-ups and the level crown
//!
//! Collectibles have no physics. `collected` is a one-way latch: once set the
//! item is skipped by collision checks and drawing, but stays in its container.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Animation ticks per frame advance
const ANIMATION_TICKS: u32 = 8;
const POWERUP_FRAMES: u32 = 6;
const CROWN_FRAMES: u32 = 8;
/// Vertical bob amplitude (pixels)
const FLOAT_AMPLITUDE: f32 = 3.0;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Hammer,
    Bonus,
    Life,
}

impl PowerUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Hammer => "hammer",
            PowerUpKind::Bonus => "bonus",
            PowerUpKind::Life => "life",
        }
    }
}

/// Cosmetic bobbing phase shared by all collectibles
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FloatPhase {
    pub frame: u32,
    pub timer: u32,
    /// Draw offset from the resting position
    pub offset: f32,
}

impl FloatPhase {
    fn advance(&mut self, frames: u32) {
        self.timer += 1;
        if self.timer >= ANIMATION_TICKS {
            self.timer = 0;
            self.frame = (self.frame + 1) % frames;
        }
        self.offset = (FLOAT_AMPLITUDE * (self.frame as f32 * 0.5).sin()).trunc();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub collected: bool,
    /// Spawned by a timer rather than placed by the level layout
    pub spawned: bool,
    pub phase: FloatPhase,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            kind,
            collected: false,
            spawned: false,
            phase: FloatPhase::default(),
        }
    }

    /// A power-up created by a spawn timer
    pub fn spawned(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            spawned: true,
            ..Self::new(pos, kind)
        }
    }

    pub fn update(&mut self) {
        self.phase.advance(POWERUP_FRAMES);
    }

    /// Latch as collected. Returns true only the first time.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(POWERUP_SIZE))
    }
}

/// The level goal; collecting it completes the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crown {
    pub pos: Vec2,
    pub collected: bool,
    pub phase: FloatPhase,
}

impl Crown {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            collected: false,
            phase: FloatPhase::default(),
        }
    }

    pub fn update(&mut self) {
        self.phase.advance(CROWN_FRAMES);
    }

    /// Latch as collected. Returns true only the first time.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(CROWN_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_latches_once() {
        let mut p = PowerUp::new(Vec2::new(10.0, 10.0), PowerUpKind::Bonus);
        assert!(p.collect());
        assert!(p.collected);
        assert!(!p.collect());
        assert!(p.collected);
    }

    #[test]
    fn test_crown_collect_latches_once() {
        let mut c = Crown::new(Vec2::ZERO);
        assert!(c.collect());
        assert!(!c.collect());
    }

    #[test]
    fn test_update_does_not_move_hitbox() {
        let mut p = PowerUp::spawned(Vec2::new(100.0, 200.0), PowerUpKind::Hammer);
        assert!(p.spawned);
        let before = p.rect();
        for _ in 0..100 {
            p.update();
        }
        assert_eq!(p.rect(), before);
        assert!(p.phase.offset.abs() <= FLOAT_AMPLITUDE);
    }

    #[test]
    fn test_kind_names_match_level_data() {
        let kind: PowerUpKind = serde_json::from_str("\"life\"").unwrap();
        assert_eq!(kind, PowerUpKind::Life);
        assert_eq!(PowerUpKind::Hammer.as_str(), "hammer");
    }
}
