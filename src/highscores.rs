//! High score leaderboard system
//!
//! Persisted as a JSON array, tracks top 10 scores.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;
/// Names are stored upper-cased and cut to this many characters
pub const MAX_NAME_LEN: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's initials
    pub name: String,
    /// Combined player + level score
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// `YYYY-MM-DD`
    pub date: String,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The table a fresh install starts with
    pub fn classic() -> Self {
        let seed = [
            ("MARIO", 50000, 5),
            ("LUIGI", 45000, 5),
            ("PEACH", 40000, 4),
            ("TOAD", 35000, 4),
            ("YOSHI", 30000, 3),
            ("BOWSR", 25000, 3),
            ("WARIO", 20000, 2),
            ("WALIG", 15000, 2),
            ("DAISY", 10000, 1),
            ("DK", 5000, 1),
        ];
        Self {
            entries: seed
                .into_iter()
                .map(|(name, score, level)| HighScoreEntry {
                    name: name.to_string(),
                    score,
                    level,
                    date: "2025-01-01".to_string(),
                })
                .collect(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, name: &str, score: u64, level: u32, date: &str) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_uppercase().chars().take(MAX_NAME_LEN).collect(),
            score,
            level,
            date: date.to_string(),
        };

        // Ties keep the older entry ahead
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from disk. A missing file yields the classic table, which is
    /// written out straight away; an unreadable one is logged and replaced by
    /// an empty table (the file is left as is).
    pub fn load_or_default(path: &Path) -> Self {
        match persistence::load_json::<HighScores>(path) {
            Ok(Some(mut scores)) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Ok(None) => {
                log::info!("No high scores found, starting from the classic table");
                let scores = Self::classic();
                if let Err(e) = scores.save(path) {
                    log::warn!("Could not write high scores to {}: {e}", path.display());
                }
                scores
            }
            Err(e) => {
                log::warn!("Could not read high scores from {}: {e}", path.display());
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_json_atomic(path, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
