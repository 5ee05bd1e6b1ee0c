//! Oscillating platforms
//!
//! A moving platform swings back and forth around its anchor along one axis.
//! Its direction flips whenever the offset reaches `±move_range`.

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Axis a moving platform travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveAxis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingPlatform {
    /// Anchor position
    pub start_x: f32,
    pub start_y: f32,
    /// Live position (top-left)
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub axis: MoveAxis,
    /// Maximum distance from the anchor in either direction
    pub move_range: f32,
    /// Distance travelled per frame
    pub move_speed: f32,
    /// +1.0 or -1.0
    pub direction: f32,
    /// Signed distance from the anchor, always within `±move_range`
    pub offset: f32,
}

impl MovingPlatform {
    pub fn new(rect: Rect, axis: MoveAxis, move_range: f32, move_speed: f32) -> Self {
        Self {
            start_x: rect.x,
            start_y: rect.y,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            axis,
            move_range: move_range.abs(),
            move_speed,
            direction: 1.0,
            offset: 0.0,
        }
    }

    /// Advance one frame
    pub fn update(&mut self) {
        let candidate = self.offset + self.move_speed * self.direction;
        if candidate >= self.move_range {
            self.offset = self.move_range;
            self.direction = -1.0;
        } else if candidate <= -self.move_range {
            self.offset = -self.move_range;
            self.direction = 1.0;
        } else {
            self.offset = candidate;
        }

        match self.axis {
            MoveAxis::Horizontal => {
                self.x = self.start_x + self.offset;
                self.y = self.start_y;
            }
            MoveAxis::Vertical => {
                self.x = self.start_x;
                self.y = self.start_y + self.offset;
            }
        }
    }

    /// Signed per-frame displacement in the current direction of travel
    #[inline]
    pub fn step(&self) -> f32 {
        self.move_speed * self.direction
    }

    /// Live hitbox
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
