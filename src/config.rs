//! Runtime configuration, loaded from an optional JSON file.
//!
//! Every field has a default, so a partial file (or no file) works.
//! Difficulty pacing is deliberately not in here.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::entities::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::error::{GameError, Result};

/// Env var consulted when no config path is given on the command line.
pub const CONFIG_ENV: &str = "DODGE_SHOOTER_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tick_hz: u32,
    pub field_width: f32,
    pub field_height: f32,
    /// Ship speed in px/s, both control modes.
    pub player_speed: f32,
    pub shoot_cooldown_ticks: u32,
    pub tap_max_ms: u64,
    pub tap_max_distance: f32,
    pub drag_deadzone: f32,
    pub audio: bool,
    /// Directory holding `player.txt`, `enemy.txt`, `stars.txt`.
    pub sprite_dir: Option<PathBuf>,
    pub log_file: PathBuf,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            player_speed: 300.0,
            shoot_cooldown_ticks: 10,
            tap_max_ms: 200,
            tap_max_distance: 10.0,
            drag_deadzone: 5.0,
            audio: true,
            sprite_dir: None,
            log_file: PathBuf::from("dodge_shooter.log"),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str, path: &Path) -> Result<Self> {
        let cfg: GameConfig =
            serde_json::from_str(text).map_err(|source| GameError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `path`; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text, path),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(GameError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Resolve the config path from the first CLI argument, then the env var.
    pub fn from_args_or_env(args: &[String]) -> Result<Self> {
        let path = args
            .get(1)
            .cloned()
            .or_else(|| std::env::var(CONFIG_ENV).ok());
        match path {
            Some(p) => Self::load(Path::new(&p)),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.tick_hz == 0 {
            return Err(GameError::ConfigValue("tick_hz must be positive".into()));
        }
        // Spawn margins are 50 px on each side.
        if self.field_width <= 100.0 || self.field_height <= 0.0 {
            return Err(GameError::ConfigValue(format!(
                "field {}x{} is too small",
                self.field_width, self.field_height
            )));
        }
        if self.player_speed < 0.0 {
            return Err(GameError::ConfigValue("player_speed must not be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "seed": 42, "audio": false }"#, Path::new("t.json"))
            .expect("valid config");
        assert_eq!(cfg.seed, Some(42));
        assert!(!cfg.audio);
        assert_eq!(cfg.tick_hz, 60);
        assert_eq!(cfg.shoot_cooldown_ticks, 10);
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let err = GameConfig::from_json(r#"{ "tick_hz": 0 }"#, Path::new("t.json")).unwrap_err();
        assert!(matches!(err, GameError::ConfigValue(_)));
    }

    #[test]
    fn bad_json_reports_path() {
        let err = GameConfig::from_json("{ nope", Path::new("cfg/game.json")).unwrap_err();
        assert!(err.to_string().contains("cfg/game.json"));
    }

    #[test]
    fn missing_file_means_defaults() {
        let cfg = GameConfig::load(Path::new("/definitely/not/here.json")).expect("defaults");
        assert_eq!(cfg, GameConfig::default());
    }
}
