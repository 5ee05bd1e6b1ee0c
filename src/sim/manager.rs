//! Level state and per-frame world update
//!
//! The manager owns every entity of the current level. It never touches the
//! player's physics: it only reads the player's hitbox and calls the life and
//! score mutators.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::barrel::Barrel;
use super::collectible::{Crown, PowerUp, PowerUpKind};
use super::platform::MovingPlatform;
use super::player::Player;
use super::rect::Rect;
use crate::consts::*;
use crate::level::{LevelError, LevelSet};
use crate::scaled_spawn_rate;

/// Frame counter that fires once every `rate` frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub elapsed: u32,
    pub rate: u32,
}

impl SpawnTimer {
    pub fn new(rate: u32) -> Self {
        Self { elapsed: 0, rate }
    }

    /// Count one frame. Returns true (and restarts) when the timer expires.
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.rate {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}

/// Run statistics shown on the game-over screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerStats {
    pub barrels_dodged: u32,
    pub powerups_collected: u32,
}

#[derive(Debug, Clone)]
pub struct GameManager {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Current level (1-based)
    pub level: u32,
    /// Crown bonuses; pickup rewards go to the player's own score
    pub score: u64,
    /// Static platforms in level-file order
    pub platforms: Vec<Rect>,
    pub ladders: Vec<Rect>,
    pub moving_platforms: Vec<MovingPlatform>,
    pub barrels: Vec<Barrel>,
    pub powerups: Vec<PowerUp>,
    pub crown: Option<Crown>,
    pub barrel_timer: SpawnTimer,
    pub hammer_timer: SpawnTimer,
    pub bonus_timer: SpawnTimer,
    pub barrel_speed_multiplier: f32,
    /// Cap on uncollected timer-spawned power-ups
    pub max_random_powerups: usize,
    pub barrels_dodged: u32,
    pub powerups_collected: u32,
    levels: LevelSet,
    rng: Pcg32,
}

impl GameManager {
    /// Create a manager at level 1 on the default screen
    pub fn new(levels: LevelSet, seed: u64) -> Result<Self, LevelError> {
        Self::with_screen_size(levels, seed, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn with_screen_size(
        levels: LevelSet,
        seed: u64,
        screen_width: f32,
        screen_height: f32,
    ) -> Result<Self, LevelError> {
        let mut manager = Self {
            screen_width,
            screen_height,
            level: 1,
            score: 0,
            platforms: Vec::new(),
            ladders: Vec::new(),
            moving_platforms: Vec::new(),
            barrels: Vec::new(),
            powerups: Vec::new(),
            crown: None,
            barrel_timer: SpawnTimer::new(BARREL_SPAWN_RATE_BASE),
            hammer_timer: SpawnTimer::new(HAMMER_SPAWN_RATE_BASE),
            bonus_timer: SpawnTimer::new(BONUS_SPAWN_RATE_BASE),
            barrel_speed_multiplier: 1.0,
            max_random_powerups: MAX_RANDOM_POWERUPS,
            barrels_dodged: 0,
            powerups_collected: 0,
            levels,
            rng: Pcg32::seed_from_u64(seed),
        };
        manager.initialize_level()?;
        Ok(manager)
    }

    /// Rebuild every entity collection from the current level's configuration.
    ///
    /// On error the previous level's entities are left untouched.
    pub fn initialize_level(&mut self) -> Result<(), LevelError> {
        let layout = self
            .levels
            .get(self.level)?
            .build(self.level, self.screen_height)?;

        self.platforms = layout.platforms;
        self.ladders = layout.ladders;
        self.moving_platforms = layout.moving_platforms;
        self.powerups = layout.powerups;
        self.crown = layout.crown;
        self.barrels.clear();

        self.barrel_speed_multiplier = layout.barrel_speed_multiplier;
        self.barrel_timer = SpawnTimer::new(layout.barrel_spawn_rate);
        self.hammer_timer = SpawnTimer::new(scaled_spawn_rate(
            HAMMER_SPAWN_RATE_BASE,
            HAMMER_SPAWN_RATE_PER_LEVEL,
            HAMMER_SPAWN_RATE_MIN,
            self.level,
        ));
        self.bonus_timer = SpawnTimer::new(scaled_spawn_rate(
            BONUS_SPAWN_RATE_BASE,
            BONUS_SPAWN_RATE_PER_LEVEL,
            BONUS_SPAWN_RATE_MIN,
            self.level,
        ));

        log::info!(
            "Level {} loaded: {} platforms, {} moving, {} ladders, {} pickups",
            self.level,
            self.platforms.len(),
            self.moving_platforms.len(),
            self.ladders.len(),
            self.powerups.len()
        );
        Ok(())
    }

    /// Advance to the next level
    pub fn next_level(&mut self) -> Result<(), LevelError> {
        self.level += 1;
        self.initialize_level()
    }

    /// Start a fresh run from level 1
    pub fn reset_game(&mut self) -> Result<(), LevelError> {
        self.level = 1;
        self.score = 0;
        self.barrels_dodged = 0;
        self.powerups_collected = 0;
        self.initialize_level()
    }

    /// Advance the world one frame. Returns true when the crown was collected this frame.
    pub fn update(&mut self, player: &mut Player) -> bool {
        if self.barrel_timer.tick() {
            self.spawn_barrel();
            self.barrel_timer.rate = scaled_spawn_rate(
                BARREL_SPAWN_RATE_BASE,
                BARREL_SPAWN_RATE_PER_LEVEL,
                BARREL_SPAWN_RATE_MIN,
                self.level,
            );
        }
        if self.hammer_timer.tick() {
            self.spawn_powerup(PowerUpKind::Hammer);
        }
        if self.bonus_timer.tick() {
            self.spawn_powerup(PowerUpKind::Bonus);
        }

        let surfaces = self.platforms();
        for barrel in &mut self.barrels {
            barrel.update(&surfaces, &mut self.rng);
        }
        let (width, height) = (self.screen_width, self.screen_height);
        let before = self.barrels.len();
        self.barrels.retain(|b| !b.is_out_of_bounds(width, height));
        let dodged = (before - self.barrels.len()) as u32;
        if dodged > 0 {
            self.barrels_dodged += dodged;
            log::debug!("{} barrel(s) dodged (total {})", dodged, self.barrels_dodged);
        }

        for platform in &mut self.moving_platforms {
            platform.update();
        }

        for powerup in self.powerups.iter_mut().filter(|p| !p.collected) {
            powerup.update();
        }
        if let Some(crown) = self.crown.as_mut().filter(|c| !c.collected) {
            crown.update();
        }

        self.check_collisions(player)
    }

    /// Resolve player contacts: barrels, then pickups, then the crown.
    ///
    /// Returns true when the crown was collected.
    pub fn check_collisions(&mut self, player: &mut Player) -> bool {
        let hitbox = player.rect();

        // Only one barrel can hurt the player per frame
        if let Some(index) = self.barrels.iter().position(|b| b.rect().intersects(&hitbox)) {
            self.barrels.remove(index);
            let game_over = player.lose_life();
            log::debug!("Barrel hit player, {} lives left", player.lives);
            if game_over {
                log::info!("Player out of lives on level {}", self.level);
            }
        }

        for powerup in self.powerups.iter_mut() {
            if powerup.collected || !powerup.rect().intersects(&hitbox) {
                continue;
            }
            powerup.collect();
            self.powerups_collected += 1;
            match powerup.kind {
                PowerUpKind::Hammer => player.add_score(SCORE_HAMMER),
                PowerUpKind::Bonus => player.add_score(SCORE_BONUS),
                PowerUpKind::Life => {
                    if !player.gain_life() {
                        player.add_score(SCORE_LIFE_AT_CAP);
                    }
                }
            }
            log::debug!("Collected {} power-up", powerup.kind.as_str());
        }

        match self.crown.as_mut() {
            Some(crown) if !crown.collected && crown.rect().intersects(&hitbox) => {
                crown.collect();
                self.score += SCORE_CROWN;
                log::info!("Crown collected, level {} complete", self.level);
                true
            }
            _ => false,
        }
    }

    /// Drop a barrel at a random x along the top of the level
    pub fn spawn_barrel(&mut self) {
        let x = self.rng.random_range(BARREL_SPAWN_MIN_X..=BARREL_SPAWN_MAX_X) as f32;
        let y = self.screen_height - BARREL_SPAWN_HEIGHT;
        let barrel = Barrel::new(Vec2::new(x, y), self.barrel_speed_multiplier, &mut self.rng);
        log::debug!("Spawned barrel at ({}, {})", x, y);
        self.barrels.push(barrel);
    }

    /// Place a power-up above a random interior platform.
    ///
    /// Returns false without spawning when the random power-up cap is reached
    /// or the level has no interior platforms.
    pub fn spawn_powerup(&mut self, kind: PowerUpKind) -> bool {
        if self.random_powerup_count() >= self.max_random_powerups {
            return false;
        }
        let interior = self.interior_platforms();
        if interior.is_empty() {
            return false;
        }

        let platform = interior[self.rng.random_range(0..interior.len())];
        let max_x = platform.right() - POWERUP_SIZE;
        let x = if max_x > platform.left() {
            self.rng.random_range(platform.left()..max_x)
        } else {
            platform.left()
        };
        let y = platform.top() - POWERUP_SIZE - POWERUP_HOVER_GAP;

        log::debug!("Spawned {} power-up at ({}, {})", kind.as_str(), x, y);
        self.powerups.push(PowerUp::spawned(Vec2::new(x, y), kind));
        true
    }

    /// Uncollected power-ups that came from a spawn timer
    pub fn random_powerup_count(&self) -> usize {
        self.powerups
            .iter()
            .filter(|p| p.spawned && !p.collected)
            .count()
    }

    /// Static platforms strictly between the floor and the topmost level
    pub fn interior_platforms(&self) -> Vec<Rect> {
        let tops = self.platforms.iter().map(Rect::top);
        let (Some(highest), Some(lowest)) = (
            tops.clone().min_by(f32::total_cmp),
            tops.max_by(f32::total_cmp),
        ) else {
            return Vec::new();
        };
        self.platforms
            .iter()
            .filter(|p| p.top() > highest && p.top() < lowest)
            .copied()
            .collect()
    }

    /// Every standable surface: static platforms first, then moving ones
    pub fn platforms(&self) -> Vec<Rect> {
        self.platforms
            .iter()
            .copied()
            .chain(self.moving_platforms.iter().map(MovingPlatform::rect))
            .collect()
    }

    pub fn static_platforms(&self) -> &[Rect] {
        &self.platforms
    }

    pub fn ladders(&self) -> &[Rect] {
        &self.ladders
    }

    pub fn moving_platforms(&self) -> &[MovingPlatform] {
        &self.moving_platforms
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            barrels_dodged: self.barrels_dodged,
            powerups_collected: self.powerups_collected,
        }
    }
}
