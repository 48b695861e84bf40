//! Explosion effects.
//!
//! Observes [`GameEvent::EnemyDestroyed`] and builds a four-stage burst at the
//! kill site: a single white flash, red/orange fire, yellow sparks and grey
//! debris.  Each particle fades on its own lifespan; the whole burst is
//! removed by one deferred cleanup once the longest stage is over.
//!
//! The number of live bursts is capped.  When the cap is hit the new burst is
//! dropped and logged; gameplay never sees it.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::Vec2;
use crate::error::GameError;
use crate::events::{EventSink, GameEvent};
use crate::schedule::{Scheduler, TaskHandle};

pub const MAX_LIVE_EXPLOSIONS: usize = 32;
/// Longest stage lifespan; cleanup fires at this age.
pub const EXPLOSION_LIFETIME: Duration = Duration::from_millis(700);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Flash,
    Fire,
    Sparks,
    Debris,
}

struct StageSpec {
    stage: Stage,
    quantity: u32,
    speed: (f32, f32),
    lifespan_ms: (u64, u64),
    gravity: f32,
}

const STAGES: [StageSpec; 4] = [
    StageSpec {
        stage: Stage::Flash,
        quantity: 1,
        speed: (0.0, 0.0),
        lifespan_ms: (100, 100),
        gravity: 0.0,
    },
    StageSpec {
        stage: Stage::Fire,
        quantity: 15,
        speed: (100.0, 250.0),
        lifespan_ms: (400, 600),
        gravity: 50.0,
    },
    StageSpec {
        stage: Stage::Sparks,
        quantity: 10,
        speed: (150.0, 300.0),
        lifespan_ms: (300, 500),
        gravity: 0.0,
    },
    StageSpec {
        stage: Stage::Debris,
        quantity: 8,
        speed: (80.0, 200.0),
        lifespan_ms: (500, 700),
        gravity: 100.0,
    },
];

#[derive(Clone, Debug)]
pub struct Particle {
    pub stage: Stage,
    vel: Vec2,
    gravity: f32,
    lifespan: Duration,
}

#[derive(Clone, Debug)]
pub struct Explosion {
    pub id: u64,
    pub origin: Vec2,
    pub born: Duration,
    particles: Vec<Particle>,
    cleanup: TaskHandle,
}

impl Explosion {
    /// Particles still alive at `now`, with their current position and the
    /// fraction of life remaining.
    pub fn visible(&self, now: Duration) -> impl Iterator<Item = (Stage, Vec2, f32)> + '_ {
        let age = now.saturating_sub(self.born);
        self.particles.iter().filter_map(move |p| {
            if age >= p.lifespan {
                return None;
            }
            let t = age.as_secs_f32();
            let pos = Vec2::new(
                self.origin.x + p.vel.x * t,
                self.origin.y + p.vel.y * t + 0.5 * p.gravity * t * t,
            );
            let life_left = 1.0 - age.as_secs_f32() / p.lifespan.as_secs_f32();
            Some((p.stage, pos, life_left))
        })
    }
}

#[derive(Clone, Copy, Debug)]
enum EffectAction {
    Despawn { id: u64 },
}

pub struct Effects {
    live: Vec<Explosion>,
    scheduler: Scheduler<EffectAction>,
    now: Duration,
    next_id: u64,
    rng: StdRng,
    dropped: u32,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            live: Vec::new(),
            scheduler: Scheduler::new(),
            now: Duration::ZERO,
            next_id: 0,
            rng: StdRng::seed_from_u64(seed),
            dropped: 0,
        }
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.live
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Bursts that could not be created.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Move the effect clock forward and run due cleanups.
    pub fn advance(&mut self, now: Duration) {
        self.now = now;
        for action in self.scheduler.drain_due(now) {
            match action {
                EffectAction::Despawn { id } => {
                    // Already gone if a restart cleared it.
                    self.live.retain(|e| e.id != id);
                }
            }
        }
    }

    pub fn spawn_explosion(&mut self, origin: Vec2) -> Result<u64, GameError> {
        if self.live.len() >= MAX_LIVE_EXPLOSIONS {
            return Err(GameError::EffectUnavailable(format!(
                "{} explosions already live",
                self.live.len()
            )));
        }
        self.next_id += 1;
        let id = self.next_id;

        let mut particles = Vec::new();
        for spec in &STAGES {
            for _ in 0..spec.quantity {
                let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                let speed = if spec.speed.1 > spec.speed.0 {
                    self.rng.gen_range(spec.speed.0..=spec.speed.1)
                } else {
                    spec.speed.0
                };
                let lifespan = self.rng.gen_range(spec.lifespan_ms.0..=spec.lifespan_ms.1);
                particles.push(Particle {
                    stage: spec.stage,
                    vel: Vec2::new(angle.cos() * speed, angle.sin() * speed),
                    gravity: spec.gravity,
                    lifespan: Duration::from_millis(lifespan),
                });
            }
        }

        let cleanup = self
            .scheduler
            .schedule(self.now + EXPLOSION_LIFETIME, EffectAction::Despawn { id });
        self.live.push(Explosion {
            id,
            origin,
            born: self.now,
            particles,
            cleanup,
        });
        Ok(id)
    }

    pub fn clear(&mut self) {
        for e in self.live.drain(..) {
            self.scheduler.cancel(e.cleanup);
        }
    }
}

impl EventSink for Effects {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EnemyDestroyed { x, y } => {
                if let Err(e) = self.spawn_explosion(Vec2::new(*x, *y)) {
                    self.dropped += 1;
                    log::warn!("explosion skipped: {}", e);
                }
            }
            GameEvent::Restarted => self.clear(),
            _ => {}
        }
    }
}
