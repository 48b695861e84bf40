//! Game state machine and the per-tick update.
//!
//! [`GameState`] owns one session: the player, the entity registry, score,
//! health and timers, plus the spawn director, input translator and the
//! deferred-action scheduler.  The host feeds raw input with
//! [`GameState::feed`], calls [`tick`] once per fixed step, and drains
//! [`GameState::events`] for presentation.  All randomness comes through the
//! injected RNG.

use std::time::Duration;

use rand::Rng;

use crate::collision::{cleanup_off_field, resolve_bullet_hits, resolve_player_hits};
use crate::config::GameConfig;
use crate::entities::{
    GameOverSummary, GameStatus, Player, Vec2, BULLET_MUZZLE_OFFSET, PLAYER_SIZE,
};
use crate::events::{EventQueue, GameEvent};
use crate::input::{InputEvent, InputSettings, InputTranslator};
use crate::registry::Registry;
use crate::schedule::Scheduler;
use crate::spawn::{roll_enemy, SpawnDirector, Wave};

/// How long the ship flashes after a hit.
pub const HIT_FLASH: Duration = Duration::from_millis(200);

/// Deferred work owned by the simulation.  Both variants carry the session
/// they were scheduled in and are dropped if that session has ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoreAction {
    SpawnEnemy {
        session: u64,
        score: u32,
        elapsed_secs: f64,
    },
    EndFlash {
        session: u64,
    },
}

#[derive(Debug)]
pub struct GameState {
    pub player: Player,
    pub registry: Registry,
    pub score: u32,
    pub status: GameStatus,
    /// Present only while GameOver.
    pub summary: Option<GameOverSummary>,
    pub field_width: f32,
    pub field_height: f32,
    tick_hz: u32,
    /// Playing ticks since the session started.
    elapsed_ticks: u64,
    /// Simulation time since start-up; never reset.
    clock: Duration,
    session: u64,
    director: SpawnDirector,
    input: InputTranslator,
    scheduler: Scheduler<CoreAction>,
    events: EventQueue,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh Playing session from the config.
pub fn init_state(cfg: &GameConfig) -> GameState {
    GameState {
        player: Player::spawn(cfg.field_width, cfg.field_height),
        registry: Registry::new(),
        score: 0,
        status: GameStatus::Playing,
        summary: None,
        field_width: cfg.field_width,
        field_height: cfg.field_height,
        tick_hz: cfg.tick_hz.max(1),
        elapsed_ticks: 0,
        clock: Duration::ZERO,
        session: 0,
        director: SpawnDirector::new(),
        input: InputTranslator::new(InputSettings::from(cfg)),
        scheduler: Scheduler::new(),
        events: EventQueue::new(),
    }
}

impl GameState {
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz as f32
    }

    fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz
    }

    /// Seconds of Playing time in this session.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ticks as f64 / self.tick_hz as f64
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn director(&self) -> &SpawnDirector {
        &self.director
    }

    pub fn pending_actions(&self) -> usize {
        self.scheduler.len()
    }

    pub fn events(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Queue a raw input event for the next tick.
    pub fn feed(&mut self, event: &InputEvent) {
        self.input.feed(event, self.status);
    }

    /// Start a new session.  Stale deferred actions die on the session bump.
    pub fn restart(&mut self) {
        self.score = 0;
        self.elapsed_ticks = 0;
        self.director.reset();
        self.input.reset();
        self.registry.clear();
        self.player = Player::spawn(self.field_width, self.field_height);
        self.status = GameStatus::Playing;
        self.summary = None;
        self.session += 1;
        self.events.push(GameEvent::Restarted);
    }

    fn game_over(&mut self) {
        self.status = GameStatus::GameOver;
        self.player.vel = Vec2::ZERO;
        // The death tint stays until restart.
        self.player.flashing = true;
        self.player.flash_until = None;
        self.registry.freeze();
        self.summary = Some(GameOverSummary {
            final_score: self.score,
        });
        self.events.push(GameEvent::PlayerDied {
            final_score: self.score,
        });
    }

    fn fire(&mut self) {
        let muzzle = Vec2::new(self.player.pos.x, self.player.pos.y - BULLET_MUZZLE_OFFSET);
        self.registry.spawn_bullet(muzzle);
    }

    fn start_flash(&mut self) {
        let until = self.clock + HIT_FLASH;
        self.player.flashing = true;
        self.player.flash_until = Some(until);
        self.scheduler.schedule(
            until,
            CoreAction::EndFlash {
                session: self.session,
            },
        );
    }

    fn schedule_wave(&mut self, wave: Wave) {
        for i in 0..wave.count {
            self.scheduler.schedule(
                self.clock + Wave::stagger(i),
                CoreAction::SpawnEnemy {
                    session: self.session,
                    score: wave.score,
                    elapsed_secs: wave.elapsed_secs,
                },
            );
        }
        self.events.push(GameEvent::WaveStarted { count: wave.count });
    }

    fn run_due_actions(&mut self, rng: &mut impl Rng) {
        for action in self.scheduler.drain_due(self.clock) {
            match action {
                CoreAction::SpawnEnemy {
                    session,
                    score,
                    elapsed_secs,
                } => {
                    if session != self.session || self.status != GameStatus::Playing {
                        continue;
                    }
                    let (pos, speed) = roll_enemy(rng, score, elapsed_secs, self.field_width);
                    self.registry.spawn_enemy(pos, speed);
                }
                CoreAction::EndFlash { session } => {
                    // A later hit may have pushed the expiry out.
                    let expired = self.player.flash_until.map_or(false, |t| t <= self.clock);
                    if session == self.session && expired {
                        self.player.flashing = false;
                        self.player.flash_until = None;
                    }
                }
            }
        }
    }

    fn move_player(&mut self, dt: f32) {
        let (hw, hh) = (PLAYER_SIZE.0 / 2.0, PLAYER_SIZE.1 / 2.0);
        let p = &mut self.player;
        p.pos.x = (p.pos.x + p.vel.x * dt).clamp(hw, self.field_width - hw);
        p.pos.y = (p.pos.y + p.vel.y * dt).clamp(hh, self.field_height - hh);
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the session by one fixed step.
///
/// While GameOver only input is looked at, and only for a restart request.
pub fn tick(state: &mut GameState, rng: &mut impl Rng) {
    let dt = state.dt();
    state.clock += state.tick_duration();

    let intent = state.input.intent(state.player.pos, state.status, dt);
    if state.status == GameStatus::GameOver {
        if intent.restart {
            state.restart();
        }
        return;
    }

    // ── 1. Intents ───────────────────────────────────────────────────────────
    state.player.vel = intent.velocity;
    if intent.shoot {
        state.fire();
    }

    // ── 2. Spawning ──────────────────────────────────────────────────────────
    let elapsed = state.elapsed_secs();
    if let Some(wave) = state.director.tick(state.score, elapsed) {
        state.schedule_wave(wave);
    }
    state.run_due_actions(rng);

    // ── 3. Motion ────────────────────────────────────────────────────────────
    state.move_player(dt);
    state.registry.integrate(dt);

    // ── 4. Collisions ────────────────────────────────────────────────────────
    state.score += resolve_bullet_hits(&mut state.registry, &mut state.events);

    let damage = resolve_player_hits(&mut state.registry, &mut state.player, &mut state.events);
    if damage.died {
        state.game_over();
        return;
    }
    if damage.hits > 0 {
        state.start_flash();
    }

    // ── 5. Off-field cleanup ─────────────────────────────────────────────────
    state.score += cleanup_off_field(&mut state.registry, state.field_height, &mut state.events);

    state.elapsed_ticks += 1;
}
