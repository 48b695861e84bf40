//! Gameplay events and the observer seam presentation hangs off.
//!
//! The simulation only ever pushes [`GameEvent`]s into a queue.  Once per
//! tick the host drains that queue and hands each event to every registered
//! [`EventSink`] (audio, visual effects, logging).  Nothing in the simulation
//! depends on what a sink does with an event.

use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// A bullet destroyed an enemy at (x, y).
    EnemyDestroyed { x: f32, y: f32 },
    /// An enemy left the bottom of the field untouched.
    EnemyDodged,
    /// An enemy rammed the player; `health` is what is left.
    PlayerHit { health: u8 },
    /// Health reached zero; the session is over.
    PlayerDied { final_score: u32 },
    /// A wave of `count` enemies was scheduled.
    WaveStarted { count: u32 },
    /// A new session began after a game over.
    Restarted,
}

pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}

/// Hand every queued event, in order, to each sink.
pub fn dispatch(queue: &mut EventQueue, sinks: &mut [&mut dyn EventSink]) {
    for event in queue.drain() {
        for sink in sinks.iter_mut() {
            sink.on_event(&event);
        }
    }
}

/// Writes lifecycle events to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerDied { final_score } => {
                log::info!("game over, final score {}", final_score)
            }
            GameEvent::Restarted => log::info!("session restarted"),
            GameEvent::WaveStarted { count } => log::debug!("wave of {} enemies", count),
            GameEvent::PlayerHit { health } => log::debug!("player hit, {} health left", health),
            GameEvent::EnemyDestroyed { .. } | GameEvent::EnemyDodged => {}
        }
    }
}
