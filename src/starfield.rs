//! Parallax starfield: three copies of the star tile scrolling at different
//! speeds to suggest forward motion.

use crate::events::{EventSink, GameEvent};

/// Pixels per tick for each layer, back to front.
pub const LAYER_SPEEDS: [f32; 3] = [0.3, 0.6, 0.9];

#[derive(Clone, Debug)]
pub struct Starfield {
    offsets: [f32; 3],
    wrap: f32,
}

impl Starfield {
    pub fn new(field_height: f32) -> Self {
        Self {
            offsets: [0.0; 3],
            wrap: field_height,
        }
    }

    /// Scroll one tick.  Each layer wraps once it has moved a full field.
    pub fn advance(&mut self) {
        for (offset, speed) in self.offsets.iter_mut().zip(LAYER_SPEEDS) {
            *offset += speed;
            if *offset >= self.wrap {
                *offset -= self.wrap;
            }
        }
    }

    /// Vertical scroll of each layer in logical pixels.
    pub fn offsets(&self) -> [f32; 3] {
        self.offsets
    }

    pub fn reset(&mut self) {
        self.offsets = [0.0; 3];
    }
}

impl EventSink for Starfield {
    fn on_event(&mut self, event: &GameEvent) {
        if *event == GameEvent::Restarted {
            self.reset();
        }
    }
}
