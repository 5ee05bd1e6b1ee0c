//! Attract-mode autopilot
//!
//! Drives the player with simple random intents and a crude barrel dodge.
//! Uses its own seeded RNG so demo runs are reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::barrel::Barrel;
use super::player::{Player, PlayerInput};

/// Frames between intent changes (2 seconds)
const ACTION_FRAMES: u32 = 120;
/// A barrel closer than this (centre to centre) triggers a dodge
const DODGE_RANGE_X: f32 = 100.0;
const DODGE_RANGE_Y: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoAction {
    MoveLeft,
    MoveRight,
    Jump,
    Wait,
    Climb,
}

const ACTIONS: [DemoAction; 5] = [
    DemoAction::MoveLeft,
    DemoAction::MoveRight,
    DemoAction::Jump,
    DemoAction::Wait,
    DemoAction::Climb,
];

#[derive(Debug, Clone)]
pub struct DemoPilot {
    pub action: DemoAction,
    action_timer: u32,
    rng: Pcg32,
}

impl DemoPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            action: DemoAction::Wait,
            action_timer: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Decide this frame's input
    pub fn next_input(&mut self, player: &Player, barrels: &[Barrel]) -> PlayerInput {
        self.action_timer += 1;
        if self.action_timer > ACTION_FRAMES {
            self.action_timer = 0;
            self.action = ACTIONS[self.rng.random_range(0..ACTIONS.len())];
        }

        let mut input = PlayerInput::default();
        match self.action {
            DemoAction::MoveLeft => input.left = true,
            DemoAction::MoveRight => input.right = true,
            DemoAction::Jump if player.on_ground => input.jump = true,
            DemoAction::Climb if player.on_ladder => {
                if self.rng.random_bool(0.5) {
                    input.up = true;
                } else {
                    input.down = true;
                }
            }
            _ => {}
        }

        // Run away from the first barrel that gets close
        let me = player.rect().center();
        let threat = barrels.iter().map(|b| b.rect().center()).find(|c| {
            (c.x - me.x).abs() < DODGE_RANGE_X && (c.y - me.y).abs() < DODGE_RANGE_Y
        });
        if let Some(barrel) = threat {
            if barrel.x > me.x {
                input.left = true;
                input.right = false;
            } else {
                input.right = true;
                input.left = false;
            }
        }

        input
    }
}
