//! Error types.
//!
//! Only host setup can surface an error to the user.  Collaborator failures
//! (sprites, audio, effects) are built as `GameError`s so they can be logged
//! uniformly, then dropped.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    /// Config file exists but could not be read
    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `GameConfig`
    #[error("Invalid config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Config parsed but holds values the game cannot run with
    #[error("Invalid config value: {0}")]
    ConfigValue(String),

    /// Sprite art missing or unusable
    #[error("Sprite '{name}' unavailable: {reason}")]
    SpriteUnavailable { name: String, reason: String },

    /// Audio output refused or failed
    #[error("Audio unavailable: {0}")]
    AudioUnavailable(String),

    /// Visual effect could not be created
    #[error("Effect unavailable: {0}")]
    EffectUnavailable(String),

    /// Terminal or log file I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
