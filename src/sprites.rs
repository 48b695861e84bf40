//! Text-art sprites, loaded once before the loop starts.
//!
//! Each role reads `<sprite_dir>/<role>.txt`.  A missing, unreadable or blank
//! file falls back to a placeholder of the same role; the fallback is logged
//! and otherwise invisible to the player.

use std::fs;
use std::path::Path;

use rand::Rng;

use crate::error::{GameError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub rows: Vec<String>,
}

impl Sprite {
    pub fn from_text(text: &str) -> Option<Self> {
        let rows: Vec<String> = text
            .lines()
            .map(|l| l.trim_end().to_string())
            .skip_while(|l| l.is_empty())
            .collect();
        let last = rows.iter().rposition(|l| !l.is_empty())?;
        Some(Self {
            rows: rows[..=last].to_vec(),
        })
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteRole {
    Player,
    Enemy,
    Stars,
}

impl SpriteRole {
    pub fn file_name(self) -> &'static str {
        match self {
            SpriteRole::Player => "player.txt",
            SpriteRole::Enemy => "enemy.txt",
            SpriteRole::Stars => "stars.txt",
        }
    }
}

// ── Placeholders ──────────────────────────────────────────────────────────────

pub fn placeholder_player() -> Sprite {
    // Sprite (2 rows, 3 cols):
    //   ▲       ← tip
    //  /|\      ← wings + fuselage
    Sprite {
        rows: vec![" ▲ ".to_string(), "/|\\".to_string()],
    }
}

pub fn placeholder_enemy() -> Sprite {
    Sprite {
        rows: vec!["<▼>".to_string(), "[_]".to_string()],
    }
}

/// A random dot field, `width` × `height` characters, roughly 4% lit.
pub fn placeholder_stars(rng: &mut impl Rng, width: usize, height: usize) -> Sprite {
    let rows = (0..height)
        .map(|_| {
            (0..width)
                .map(|_| match rng.gen_range(0..100) {
                    0..=2 => '.',
                    3 => '*',
                    _ => ' ',
                })
                .collect::<String>()
        })
        .collect();
    Sprite { rows }
}

// ── Loading ───────────────────────────────────────────────────────────────────

pub fn load_sprite(dir: &Path, role: SpriteRole) -> Result<Sprite> {
    let path = dir.join(role.file_name());
    let text = fs::read_to_string(&path).map_err(|e| GameError::SpriteUnavailable {
        name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Sprite::from_text(&text).ok_or_else(|| GameError::SpriteUnavailable {
        name: path.display().to_string(),
        reason: "file is blank".into(),
    })
}

#[derive(Clone, Debug)]
pub struct SpriteSet {
    pub player: Sprite,
    pub enemy: Sprite,
    pub stars: Sprite,
}

impl SpriteSet {
    pub fn placeholders(rng: &mut impl Rng) -> Self {
        Self {
            player: placeholder_player(),
            enemy: placeholder_enemy(),
            stars: placeholder_stars(rng, 64, 32),
        }
    }

    /// Load every role from `dir`, substituting placeholders where needed.
    pub fn load(dir: Option<&Path>, rng: &mut impl Rng) -> Self {
        let mut set = Self::placeholders(rng);
        let Some(dir) = dir else {
            log::info!("no sprite directory configured, using placeholder art");
            return set;
        };
        for role in [SpriteRole::Player, SpriteRole::Enemy, SpriteRole::Stars] {
            match load_sprite(dir, role) {
                Ok(sprite) => {
                    log::info!(
                        "loaded {} ({}x{})",
                        role.file_name(),
                        sprite.width(),
                        sprite.height()
                    );
                    match role {
                        SpriteRole::Player => set.player = sprite,
                        SpriteRole::Enemy => set.enemy = sprite,
                        SpriteRole::Stars => set.stars = sprite,
                    }
                }
                Err(e) => log::warn!("{}; using placeholder", e),
            }
        }
        set
    }
}
