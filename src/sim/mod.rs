//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame physics deltas
//! - Seeded RNG only
//! - Stable iteration order (first match in list order wins)
//! - No rendering or I/O

pub mod barrel;
pub mod collectible;
pub mod demo;
pub mod manager;
pub mod platform;
pub mod player;
pub mod rect;

pub use barrel::Barrel;
pub use collectible::{Crown, FloatPhase, PowerUp, PowerUpKind};
pub use demo::{DemoAction, DemoPilot};
pub use manager::{GameManager, ManagerStats, SpawnTimer};
pub use platform::{MoveAxis, MovingPlatform};
pub use player::{Player, PlayerInput, PlayerStats};
pub use rect::{Rect, intersects};
