//! Spawn director: wave pacing, wave size and enemy speed.
//!
//! Every number here is a pure function of the current score and the seconds
//! elapsed in the session.  The only state is the tick counter between waves.

use std::time::Duration;

use rand::Rng;

use crate::entities::{Vec2, ENEMY_SPAWN_Y};

// ── Difficulty tables ────────────────────────────────────────────────────────

pub const BASE_SPAWN_INTERVAL: u32 = 120;
pub const MIN_SPAWN_INTERVAL: u32 = 40;

/// Score at which score-driven difficulty saturates.
const SCORE_FOR_MAX_DIFFICULTY: f64 = 300.0;
/// Seconds after which time-driven difficulty saturates.
const SECONDS_FOR_MAX_DIFFICULTY: f64 = 120.0;
const SCORE_WEIGHT: f64 = 0.4;
const TIME_WEIGHT: f64 = 0.6;

const SCORE_PER_EXTRA_ENEMY: u32 = 200;
const SECONDS_PER_EXTRA_ENEMY: f64 = 30.0;
pub const MAX_ENEMIES_PER_WAVE: u32 = 6;

const BASE_MIN_SPEED: f64 = 100.0;
const BASE_MAX_SPEED: f64 = 200.0;
const SPEED_CAP: f64 = 400.0;
const SPEED_MULT_CAP: f64 = 1.3;
const SCORE_FOR_SPEEDUP: f64 = 500.0;
const SECONDS_FOR_SPEEDUP: f64 = 120.0;

/// Horizontal keep-out at both field edges for new enemies.
const SPAWN_MARGIN: i32 = 50;
/// Per-index delay between enemies of one wave.
const WAVE_STAGGER: Duration = Duration::from_millis(10);

pub fn score_difficulty(score: u32) -> f64 {
    (score as f64 / SCORE_FOR_MAX_DIFFICULTY).min(1.0)
}

pub fn time_difficulty(elapsed_secs: f64) -> f64 {
    (elapsed_secs / SECONDS_FOR_MAX_DIFFICULTY).min(1.0)
}

/// Weighted blend of score and time progression, in [0, 1].
pub fn combined_difficulty(score: u32, elapsed_secs: f64) -> f64 {
    SCORE_WEIGHT * score_difficulty(score) + TIME_WEIGHT * time_difficulty(elapsed_secs)
}

/// Ticks between waves for a given combined difficulty.
pub fn interval_for(difficulty: f64) -> u32 {
    let span = (BASE_SPAWN_INTERVAL - MIN_SPAWN_INTERVAL) as f64;
    let reduction = (difficulty * span).floor() as u32;
    BASE_SPAWN_INTERVAL
        .saturating_sub(reduction)
        .max(MIN_SPAWN_INTERVAL)
}

pub fn spawn_interval(score: u32, elapsed_secs: f64) -> u32 {
    interval_for(combined_difficulty(score, elapsed_secs))
}

pub fn enemies_per_wave(score: u32, elapsed_secs: f64) -> u32 {
    let from_score = score / SCORE_PER_EXTRA_ENEMY;
    let from_time = (elapsed_secs.max(0.0) / SECONDS_PER_EXTRA_ENEMY).floor() as u32;
    1u32.saturating_add(from_score)
        .saturating_add(from_time)
        .clamp(1, MAX_ENEMIES_PER_WAVE)
}

pub fn speed_multiplier(score: u32, elapsed_secs: f64) -> f64 {
    let by_score = (1.0 + score as f64 / SCORE_FOR_SPEEDUP).min(SPEED_MULT_CAP);
    let by_time = (1.0 + elapsed_secs / SECONDS_FOR_SPEEDUP).min(SPEED_MULT_CAP);
    0.5 * by_score + 0.5 * by_time
}

/// Inclusive (min, max) enemy speed in px/s.
pub fn speed_range(score: u32, elapsed_secs: f64) -> (u32, u32) {
    let mult = speed_multiplier(score, elapsed_secs);
    let min = (BASE_MIN_SPEED * mult).floor() as u32;
    let max = (BASE_MAX_SPEED * mult).min(SPEED_CAP).floor() as u32;
    (min, max)
}

// ── Waves ────────────────────────────────────────────────────────────────────

/// A batch of enemies to spawn, with the progression captured at fire time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
    pub count: u32,
    pub score: u32,
    pub elapsed_secs: f64,
}

impl Wave {
    /// Delay before enemy `index` of this wave appears.  Never zero.
    pub fn stagger(index: u32) -> Duration {
        WAVE_STAGGER * (index + 1)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SpawnDirector {
    frame_counter: u32,
}

impl SpawnDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn reset(&mut self) {
        self.frame_counter = 0;
    }

    /// Count one Playing tick; returns a wave once the counter passes the
    /// current interval, and starts counting again from zero.
    pub fn tick(&mut self, score: u32, elapsed_secs: f64) -> Option<Wave> {
        self.frame_counter += 1;
        if self.frame_counter <= spawn_interval(score, elapsed_secs) {
            return None;
        }
        self.frame_counter = 0;
        Some(Wave {
            count: enemies_per_wave(score, elapsed_secs),
            score,
            elapsed_secs,
        })
    }
}

/// Pick a spawn position and downward speed for one enemy.
pub fn roll_enemy(
    rng: &mut impl Rng,
    score: u32,
    elapsed_secs: f64,
    field_width: f32,
) -> (Vec2, f32) {
    let hi = (field_width as i32 - SPAWN_MARGIN).max(SPAWN_MARGIN);
    let x = rng.gen_range(SPAWN_MARGIN..=hi);
    let (min, max) = speed_range(score, elapsed_secs);
    let speed = rng.gen_range(min..=max);
    (Vec2::new(x as f32, ENEMY_SPAWN_Y), speed as f32)
}
