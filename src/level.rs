//! Data-driven level layouts
//!
//! Levels are a JSON object keyed `"level_N"`. Every `y` in a level file is a
//! (negative) offset from the bottom of the screen, so layouts stay anchored to
//! the floor whatever the screen height.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CROWN_SIZE;
use crate::sim::{Crown, MoveAxis, MovingPlatform, PowerUp, PowerUpKind, Rect};

/// Levels shipped with the game
const BUILTIN_LEVELS: &str = include_str!("../assets/levels.json");

/// Errors raised while loading or resolving a level
#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// No `level_N` entry for the requested level
    MissingLevel(u32),
    /// A platform, ladder or pickup with a non-positive size
    InvalidRect {
        level: u32,
        what: &'static str,
        index: usize,
    },
    /// A moving platform without `move_range`/`move_speed`
    MissingMotion { level: u32, index: usize },
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "Failed to read level file: {e}"),
            LevelError::Parse(e) => write!(f, "Invalid level data: {e}"),
            LevelError::MissingLevel(level) => write!(f, "No configuration for level_{level}"),
            LevelError::InvalidRect { level, what, index } => {
                write!(f, "level_{level}: {what} #{index} has a non-positive size")
            }
            LevelError::MissingMotion { level, index } => write!(
                f,
                "level_{level}: moving platform #{index} needs move_range and move_speed"
            ),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io(e) => Some(e),
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

/// Platform behaviour in level data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    #[default]
    Static,
    MovingHorizontal,
    MovingVertical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type", default)]
    pub kind: PlatformKind,
    #[serde(default)]
    pub move_range: Option<f32>,
    #[serde(default)]
    pub move_speed: Option<f32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RectSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUpSpec {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "type")]
    pub kind: PowerUpKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointSpec {
    pub x: f32,
    pub y: f32,
}

/// One level's configuration as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Frames between barrel spawns at level start
    pub barrel_spawn_rate: u32,
    pub barrel_speed_multiplier: f32,
    /// Scan order matters: the first surface hit wins
    pub platforms: Vec<PlatformSpec>,
    pub ladders: Vec<RectSpec>,
    /// Pickups placed by the layout (not counted against the random spawn cap)
    #[serde(default)]
    pub powerups: Vec<PowerUpSpec>,
    /// Defaults to the middle of the topmost static platform
    #[serde(default)]
    pub crown: Option<PointSpec>,
}

/// A level resolved to screen coordinates, ready to play
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub barrel_spawn_rate: u32,
    pub barrel_speed_multiplier: f32,
    pub platforms: Vec<Rect>,
    pub moving_platforms: Vec<MovingPlatform>,
    pub ladders: Vec<Rect>,
    pub powerups: Vec<PowerUp>,
    pub crown: Option<Crown>,
}

impl LevelConfig {
    /// Resolve floor offsets against the screen height and validate geometry
    pub fn build(&self, level: u32, screen_height: f32) -> Result<LevelLayout, LevelError> {
        let mut platforms = Vec::new();
        let mut moving_platforms = Vec::new();

        for (index, spec) in self.platforms.iter().enumerate() {
            let rect = Rect::new(spec.x, screen_height + spec.y, spec.width, spec.height);
            if !rect.is_valid() {
                return Err(LevelError::InvalidRect {
                    level,
                    what: "platform",
                    index,
                });
            }

            let axis = match spec.kind {
                PlatformKind::Static => {
                    platforms.push(rect);
                    continue;
                }
                PlatformKind::MovingHorizontal => MoveAxis::Horizontal,
                PlatformKind::MovingVertical => MoveAxis::Vertical,
            };
            let (Some(range), Some(speed)) = (spec.move_range, spec.move_speed) else {
                return Err(LevelError::MissingMotion { level, index });
            };
            moving_platforms.push(MovingPlatform::new(rect, axis, range, speed));
        }

        let mut ladders = Vec::with_capacity(self.ladders.len());
        for (index, spec) in self.ladders.iter().enumerate() {
            let rect = Rect::new(spec.x, screen_height + spec.y, spec.width, spec.height);
            if !rect.is_valid() {
                return Err(LevelError::InvalidRect {
                    level,
                    what: "ladder",
                    index,
                });
            }
            ladders.push(rect);
        }

        let powerups = self
            .powerups
            .iter()
            .map(|spec| PowerUp::new(Vec2::new(spec.x, screen_height + spec.y), spec.kind))
            .collect();

        let crown = match self.crown {
            Some(point) => Some(Crown::new(Vec2::new(point.x, screen_height + point.y))),
            None => platforms
                .iter()
                .min_by(|a, b| a.top().total_cmp(&b.top()))
                .map(|top| {
                    let x = top.center().x - CROWN_SIZE / 2.0;
                    Crown::new(Vec2::new(x, top.top() - CROWN_SIZE))
                }),
        };

        Ok(LevelLayout {
            barrel_spawn_rate: self.barrel_spawn_rate,
            barrel_speed_multiplier: self.barrel_speed_multiplier,
            platforms,
            moving_platforms,
            ladders,
            powerups,
            crown,
        })
    }
}

/// All levels of a game, keyed `level_N`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelSet {
    pub levels: BTreeMap<String, LevelConfig>,
}

impl LevelSet {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Levels shipped with the game
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        let set = Self::from_json(&json)?;
        log::info!("Loaded {} levels from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn key(level: u32) -> String {
        format!("level_{level}")
    }

    pub fn contains(&self, level: u32) -> bool {
        self.levels.contains_key(&Self::key(level))
    }

    pub fn get(&self, level: u32) -> Result<&LevelConfig, LevelError> {
        self.levels
            .get(&Self::key(level))
            .ok_or(LevelError::MissingLevel(level))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SCREEN_HEIGHT;

    #[test]
    fn test_builtin_levels_resolve() {
        let set = LevelSet::builtin().unwrap();
        assert!(set.len() >= 3);
        for level in 1..=set.len() as u32 {
            let layout = set.get(level).unwrap().build(level, SCREEN_HEIGHT).unwrap();
            assert!(!layout.platforms.is_empty());
            assert!(!layout.ladders.is_empty());
            assert!(layout.crown.is_some());
        }
    }

    #[test]
    fn test_floor_offsets_and_order_preserved() {
        let layout = LevelSet::builtin()
            .unwrap()
            .get(1)
            .unwrap()
            .build(1, SCREEN_HEIGHT)
            .unwrap();
        // Floor first, exactly as listed
        assert_eq!(layout.platforms[0], Rect::new(0.0, SCREEN_HEIGHT - 50.0, 896.0, 50.0));
        assert_eq!(layout.ladders[0].y, SCREEN_HEIGHT - 170.0);
    }

    #[test]
    fn test_missing_level_is_an_error() {
        let set = LevelSet::builtin().unwrap();
        assert!(matches!(set.get(999), Err(LevelError::MissingLevel(999))));
        assert!(!set.contains(999));
    }

    #[test]
    fn test_moving_platform_parsed() {
        let json = r#"{
            "level_1": {
                "barrel_spawn_rate": 120,
                "barrel_speed_multiplier": 1.5,
                "platforms": [
                    {"x": 0, "y": -50, "width": 896, "height": 50},
                    {"x": 300, "y": -200, "width": 100, "height": 20,
                     "type": "moving_vertical", "move_range": 40, "move_speed": 1}
                ],
                "ladders": [{"x": 10, "y": -150, "width": 20, "height": 100}]
            }
        }"#;
        let layout = LevelSet::from_json(json)
            .unwrap()
            .get(1)
            .unwrap()
            .build(1, SCREEN_HEIGHT)
            .unwrap();
        assert_eq!(layout.platforms.len(), 1);
        assert_eq!(layout.moving_platforms.len(), 1);
        assert_eq!(layout.moving_platforms[0].axis, MoveAxis::Vertical);
        assert_eq!(layout.moving_platforms[0].start_y, SCREEN_HEIGHT - 200.0);
        assert_eq!(layout.barrel_spawn_rate, 120);
        // Crown defaults onto the only static platform
        let crown = layout.crown.unwrap();
        assert_eq!(crown.rect().bottom(), SCREEN_HEIGHT - 50.0);
    }

    #[test]
    fn test_moving_platform_without_motion_rejected() {
        let json = r#"{
            "level_1": {
                "barrel_spawn_rate": 120,
                "barrel_speed_multiplier": 1.0,
                "platforms": [
                    {"x": 300, "y": -200, "width": 100, "height": 20, "type": "moving_horizontal"}
                ],
                "ladders": []
            }
        }"#;
        let set = LevelSet::from_json(json).unwrap();
        let err = set.get(1).unwrap().build(1, SCREEN_HEIGHT).unwrap_err();
        assert!(matches!(err, LevelError::MissingMotion { level: 1, index: 0 }));
    }

    #[test]
    fn test_zero_size_rect_rejected() {
        let json = r#"{
            "level_2": {
                "barrel_spawn_rate": 120,
                "barrel_speed_multiplier": 1.0,
                "platforms": [],
                "ladders": [{"x": 10, "y": -150, "width": 0, "height": 100}]
            }
        }"#;
        let set = LevelSet::from_json(json).unwrap();
        let err = set.get(2).unwrap().build(2, SCREEN_HEIGHT).unwrap_err();
        assert!(matches!(err, LevelError::InvalidRect { what: "ladder", .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(LevelSet::from_json("{ nope"), Err(LevelError::Parse(_))));
    }
}
