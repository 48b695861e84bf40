//! Sound triggers.
//!
//! Three fire-and-forget cues.  Any of them may fail; [`AudioCues`] logs the
//! failure at debug level and carries on.

use std::io::{IsTerminal, Write};

use crate::error::{GameError, Result};
use crate::events::{EventSink, GameEvent};

pub trait AudioSink {
    fn enemy_destroyed(&mut self) -> Result<()>;
    fn player_hit(&mut self) -> Result<()>;
    fn player_death(&mut self) -> Result<()>;
}

/// Plays nothing.  Used when audio is disabled or unavailable.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn enemy_destroyed(&mut self) -> Result<()> {
        Ok(())
    }

    fn player_hit(&mut self) -> Result<()> {
        Ok(())
    }

    fn player_death(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell: once for a kill, twice for a hit, three times
/// for death.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<std::io::Stderr> {
    /// Bell on stderr, if stderr is a terminal at all.
    pub fn stderr() -> Result<Self> {
        let err = std::io::stderr();
        if !err.is_terminal() {
            return Err(GameError::AudioUnavailable("stderr is not a terminal".into()));
        }
        Ok(Self { out: err })
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self, times: usize) -> Result<()> {
        self.out
            .write_all("\x07".repeat(times).as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| GameError::AudioUnavailable(e.to_string()))
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn enemy_destroyed(&mut self) -> Result<()> {
        self.ring(1)
    }

    fn player_hit(&mut self) -> Result<()> {
        self.ring(2)
    }

    fn player_death(&mut self) -> Result<()> {
        self.ring(3)
    }
}

/// Maps gameplay events onto an [`AudioSink`].
pub struct AudioCues {
    sink: Box<dyn AudioSink>,
    failures: u32,
}

impl AudioCues {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self { sink, failures: 0 }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(Silent))
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl EventSink for AudioCues {
    fn on_event(&mut self, event: &GameEvent) {
        let played = match event {
            GameEvent::EnemyDestroyed { .. } => self.sink.enemy_destroyed(),
            GameEvent::PlayerHit { .. } => self.sink.player_hit(),
            GameEvent::PlayerDied { .. } => self.sink.player_death(),
            _ => Ok(()),
        };
        if let Err(e) = played {
            self.failures += 1;
            log::debug!("audio cue dropped: {}", e);
        }
    }
}
