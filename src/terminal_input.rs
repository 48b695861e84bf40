//! Terminal input adapter: crossterm events → [`InputEvent`]s.
//!
//! Keyboard model: we remember the frame of the last press/repeat for every
//! mapped key.  Works on two classes of terminal:
//!
//! * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
//!   `Press` / `Repeat` / `Release` events → keys are released on release.
//! * **Classic terminals**: only `Press` events (OS key-repeat shows up as
//!   repeated `Press`).  A key that has been silent for `HOLD_WINDOW` frames
//!   is treated as released, so [`TerminalInput::expire`] synthesizes the
//!   missing `KeyUp`.
//!
//! Mouse: left-button down / drag / up become pointer events in logical
//! field coordinates via the [`Viewport`].

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::input::{InputEvent, Key};
use crate::viewport::Viewport;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  At 60 Hz that is ~133 ms, shorter than any OS repeat
/// interval once repeating has started.
pub const HOLD_WINDOW: u64 = 8;

/// What one terminal event turned into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Translated {
    pub events: Vec<InputEvent>,
    pub quit: bool,
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::Down),
        KeyCode::Char(' ') => Some(Key::Shoot),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Key::Restart),
        _ => None,
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[derive(Debug)]
pub struct TerminalInput {
    /// Maps each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<Key, u64>,
    /// Terminal reports releases; no hold-window expiry needed.
    enhanced: bool,
}

impl TerminalInput {
    pub fn new(enhanced: bool) -> Self {
        Self {
            key_frame: HashMap::new(),
            enhanced,
        }
    }

    pub fn translate(
        &mut self,
        event: &Event,
        frame: u64,
        at_ms: u64,
        vp: &Viewport,
    ) -> Translated {
        let mut out = Translated::default();
        match event {
            Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) => {
                if *kind == KeyEventKind::Press && is_quit(*code, *modifiers) {
                    out.quit = true;
                    return out;
                }
                let Some(key) = map_key(*code) else {
                    return out;
                };
                match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if self.key_frame.insert(key, frame).is_none() {
                            out.events.push(InputEvent::KeyDown(key));
                        }
                    }
                    KeyEventKind::Release => {
                        if self.key_frame.remove(&key).is_some() {
                            out.events.push(InputEvent::KeyUp(key));
                        }
                    }
                }
            }
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => {
                let pos = vp.to_logical(*column, *row);
                match kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        out.events.push(InputEvent::PointerDown { pos, at_ms })
                    }
                    MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                        out.events.push(InputEvent::PointerMove { pos, at_ms })
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        out.events.push(InputEvent::PointerUp { pos, at_ms })
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        out
    }

    /// Release keys that have gone quiet (classic terminals only).
    pub fn expire(&mut self, frame: u64) -> Vec<InputEvent> {
        if self.enhanced {
            return Vec::new();
        }
        let stale: Vec<Key> = self
            .key_frame
            .iter()
            .filter(|&(_, &last)| frame.saturating_sub(last) > HOLD_WINDOW)
            .map(|(&k, _)| k)
            .collect();
        stale
            .into_iter()
            .map(|k| {
                self.key_frame.remove(&k);
                InputEvent::KeyUp(k)
            })
            .collect()
    }
}
