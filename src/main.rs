//! Kong Climb entry point
//!
//! Headless runner: loads settings and levels, then plays the game with the
//! demo autopilot at the fixed frame rate until the run ends.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use glam::Vec2;

use kong_climb::consts::*;
use kong_climb::persistence;
use kong_climb::sim::{DemoPilot, GameManager, Player};
use kong_climb::{HighScores, LevelSet, Settings};

/// Settings file used when none is given on the command line
const DEFAULT_SETTINGS: &str = "settings.json";

#[derive(Parser, Debug)]
#[command(name = "kong-climb")]
#[command(about = "Headless Kong Climb runner driven by the demo autopilot")]
struct Cli {
    /// Settings file (JSON). Must exist when given; defaults to ./settings.json if present
    settings: Option<PathBuf>,
    /// Override the run seed
    #[arg(long)]
    seed: Option<u64>,
    /// Override the starting level
    #[arg(long)]
    level: Option<u32>,
    /// Override the frame limit (0 = no limit)
    #[arg(long)]
    max_frames: Option<u64>,
    /// Override the level file
    #[arg(long)]
    levels: Option<PathBuf>,
}

impl Cli {
    /// Fold command-line overrides into loaded settings
    fn apply(&self, settings: &mut Settings) {
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(level) = self.level {
            settings.start_level = level;
        }
        if let Some(max_frames) = self.max_frames {
            settings.max_frames = max_frames;
        }
        if let Some(levels) = &self.levels {
            settings.levels_path = Some(levels.clone());
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunOutcome {
    GameOver,
    /// Crown collected on the last configured level
    Victory,
    /// Frame limit reached
    TimeUp,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings(&cli)?;
    let levels = load_levels(&settings)?;
    let manager = build_manager(levels, &settings)?;
    run(manager, &settings)
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => persistence::load_json::<Settings>(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?
            .ok_or_else(|| anyhow!("settings file {} not found", path.display()))?,
        None => Settings::load_or_default(Path::new(DEFAULT_SETTINGS)),
    };
    cli.apply(&mut settings);
    Ok(settings)
}

fn load_levels(settings: &Settings) -> Result<LevelSet> {
    match &settings.levels_path {
        Some(path) => LevelSet::load(path)
            .with_context(|| format!("failed to load levels from {}", path.display())),
        None => LevelSet::builtin().context("built-in levels are invalid"),
    }
}

fn build_manager(levels: LevelSet, settings: &Settings) -> Result<GameManager> {
    let mut manager =
        GameManager::new(levels, settings.seed).context("failed to initialise level 1")?;
    manager.max_random_powerups = settings.max_random_powerups;
    if settings.start_level != manager.level() {
        manager.level = settings.start_level;
        manager
            .initialize_level()
            .with_context(|| format!("failed to start at level {}", settings.start_level))?;
    }
    Ok(manager)
}

fn run(mut manager: GameManager, settings: &Settings) -> Result<()> {
    let spawn = Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
    let mut player = Player::new(spawn, SCREEN_WIDTH, SCREEN_HEIGHT);
    player.level = manager.level();
    let mut pilot = DemoPilot::new(settings.seed.wrapping_add(1));

    log::info!("Starting run at level {} (seed {})", manager.level(), settings.seed);

    let mut frame: u64 = 0;
    let outcome = loop {
        if settings.frame_limit().is_some_and(|limit| frame >= limit) {
            break RunOutcome::TimeUp;
        }
        frame += 1;

        let input = pilot.next_input(&player, &manager.barrels);
        player.update(
            &input,
            manager.static_platforms(),
            manager.ladders(),
            FRAME_DT,
            manager.moving_platforms(),
        );

        let lives_before = player.lives;
        let level_completed = manager.update(&mut player);

        if player.lives == 0 {
            break RunOutcome::GameOver;
        }
        if player.lives < lives_before {
            player.reset_position(spawn.x, spawn.y);
        }

        if level_completed {
            if !manager.levels().contains(manager.level() + 1) {
                break RunOutcome::Victory;
            }
            manager
                .next_level()
                .with_context(|| format!("failed to advance past level {}", manager.level()))?;
            player.level = manager.level();
            player.reset_position(spawn.x, spawn.y);
        }
    };

    let stats = manager.stats();
    let total = player.score + manager.score();
    log::info!(
        "Run over ({:?}) after {} frames: score {}, level {}, {} barrels dodged, {} power-ups",
        outcome,
        frame,
        total,
        manager.level(),
        stats.barrels_dodged,
        stats.powerups_collected
    );

    let mut scores = HighScores::load_or_default(&settings.highscores_path);
    if scores.qualifies(total) {
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        if let Some(rank) = scores.add(&settings.player_name, total, manager.level(), &date) {
            log::info!("New high score! Rank #{rank}");
        }
        if let Err(e) = scores.save(&settings.highscores_path) {
            log::warn!("Could not save high scores: {e}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kong-climb").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_help_is_not_a_settings_path() {
        let err = Cli::try_parse_from(["kong-climb", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["kong-climb", "--bogus"]).is_err());
    }

    #[test]
    fn test_overrides_apply_to_settings() {
        let cli = parse(&["--seed", "7", "--level", "2", "--max-frames", "0"]);
        let mut settings = Settings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.start_level, 2);
        assert_eq!(settings.frame_limit(), None);
        assert!(settings.levels_path.is_none());
    }

    #[test]
    fn test_explicit_settings_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let cli = parse(&[path.to_str().unwrap()]);
        let err = load_settings(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }

    #[test]
    fn test_explicit_settings_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"seed": 11, "start_level": 3}"#).unwrap();
        let cli = parse(&[path.to_str().unwrap(), "--seed", "12"]);
        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.seed, 12);
        assert_eq!(settings.start_level, 3);
    }

    #[test]
    fn test_missing_level_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            levels_path: Some(dir.path().join("levels-missing.json")),
            ..Default::default()
        };
        let err = load_levels(&settings).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("levels-missing.json"));
        assert!(err.downcast_ref::<kong_climb::LevelError>().is_some());
    }

    #[test]
    fn test_unknown_start_level_has_context() {
        let settings = Settings {
            start_level: 9,
            ..Default::default()
        };
        let levels = load_levels(&settings).unwrap();
        let err = build_manager(levels, &settings).unwrap_err();
        assert!(format!("{err:#}").contains("level 9"));
    }

    #[test]
    fn test_short_run_completes() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            max_frames: 300,
            highscores_path: dir.path().join("highscores.json"),
            ..Default::default()
        };
        let manager = build_manager(LevelSet::builtin().unwrap(), &settings).unwrap();
        run(manager, &settings).unwrap();
        assert!(settings.highscores_path.exists());
    }
}
