//! Input translator: raw key / pointer events → per-tick intents.
//!
//! Two control modes are mutually exclusive.  While a pointer is held the
//! direction keys are ignored; once it is released, they take over again.
//! The ship only chases the pointer after it has moved, so a short, still
//! press-and-release is a tap: it fires and leaves the ship where it was.
//!
//! Events are fed in as they arrive ([`InputTranslator::feed`]) and folded
//! into one [`Intent`] per tick ([`InputTranslator::intent`]).  Edge state
//! (just-pressed keys, taps, restart requests) lives until that fold.

use std::collections::HashSet;

use crate::config::GameConfig;
use crate::entities::{GameStatus, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Shoot,
    Restart,
}

/// Engine-neutral input event in logical field coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { pos: Vec2, at_ms: u64 },
    PointerMove { pos: Vec2, at_ms: u64 },
    PointerUp { pos: Vec2, at_ms: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMode {
    Directional,
    Pointer,
}

/// What the player wants this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    pub velocity: Vec2,
    /// Already gated by the cooldown.
    pub shoot: bool,
    pub restart: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSettings {
    pub speed: f32,
    pub tap_max_ms: u64,
    pub tap_max_distance: f32,
    pub drag_deadzone: f32,
    pub shoot_cooldown_ticks: u32,
}

impl From<&GameConfig> for InputSettings {
    fn from(cfg: &GameConfig) -> Self {
        Self {
            speed: cfg.player_speed,
            tap_max_ms: cfg.tap_max_ms,
            tap_max_distance: cfg.tap_max_distance,
            drag_deadzone: cfg.drag_deadzone,
            shoot_cooldown_ticks: cfg.shoot_cooldown_ticks,
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    start: Vec2,
    start_ms: u64,
    current: Vec2,
    /// Set by the first move; a press alone never steers.
    dragging: bool,
}

#[derive(Debug)]
pub struct InputTranslator {
    settings: InputSettings,
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    pointer: Option<Gesture>,
    tapped: bool,
    restart_requested: bool,
    shoot_cooldown: u32,
}

impl InputTranslator {
    pub fn new(settings: InputSettings) -> Self {
        Self {
            settings,
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            pointer: None,
            tapped: false,
            restart_requested: false,
            shoot_cooldown: 0,
        }
    }

    pub fn mode(&self) -> ControlMode {
        if self.pointer.is_some() {
            ControlMode::Pointer
        } else {
            ControlMode::Directional
        }
    }

    pub fn shoot_cooldown(&self) -> u32 {
        self.shoot_cooldown
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Record one raw event.  `status` is the session state when it arrived.
    pub fn feed(&mut self, event: &InputEvent, status: GameStatus) {
        match *event {
            InputEvent::KeyDown(key) => {
                if self.held.insert(key) {
                    self.just_pressed.insert(key);
                    if status == GameStatus::GameOver && matches!(key, Key::Shoot | Key::Restart) {
                        self.restart_requested = true;
                    }
                }
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
            InputEvent::PointerDown { pos, at_ms } => {
                if status == GameStatus::GameOver {
                    // The restart press is spent; its release must not fire.
                    self.restart_requested = true;
                    return;
                }
                self.pointer = Some(Gesture {
                    start: pos,
                    start_ms: at_ms,
                    current: pos,
                    dragging: false,
                });
            }
            InputEvent::PointerMove { pos, .. } => {
                if let Some(g) = self.pointer.as_mut() {
                    g.current = pos;
                    g.dragging = true;
                }
            }
            InputEvent::PointerUp { pos, at_ms } => {
                if let Some(g) = self.pointer.take() {
                    let held_ms = at_ms.saturating_sub(g.start_ms);
                    let moved = g.start.distance(pos);
                    if status == GameStatus::Playing
                        && held_ms < self.settings.tap_max_ms
                        && moved < self.settings.tap_max_distance
                    {
                        self.tapped = true;
                    }
                }
            }
        }
    }

    /// Fold everything fed since the last call into this tick's intent.
    ///
    /// While Playing the shoot cooldown ticks down first, then gates the shot.
    pub fn intent(&mut self, player_pos: Vec2, status: GameStatus, dt: f32) -> Intent {
        let restart = std::mem::take(&mut self.restart_requested);
        let wants_shot =
            std::mem::take(&mut self.tapped) || self.just_pressed.contains(&Key::Shoot);
        self.just_pressed.clear();

        if status == GameStatus::GameOver {
            return Intent {
                velocity: Vec2::ZERO,
                shoot: false,
                restart,
            };
        }

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        let shoot = wants_shot && self.shoot_cooldown == 0;
        if shoot {
            self.shoot_cooldown = self.settings.shoot_cooldown_ticks;
        }

        let velocity = match self.pointer {
            Some(g) if g.dragging => self.chase(player_pos, g.current, dt),
            Some(_) => Vec2::ZERO,
            None => self.directional(),
        };

        Intent {
            velocity,
            shoot,
            restart: false,
        }
    }

    /// Back to a fresh-session state.  Physically held keys stay held.
    pub fn reset(&mut self) {
        self.just_pressed.clear();
        self.pointer = None;
        self.tapped = false;
        self.restart_requested = false;
        self.shoot_cooldown = 0;
    }

    fn directional(&self) -> Vec2 {
        let speed = self.settings.speed;
        let x = if self.is_held(Key::Left) {
            -speed
        } else if self.is_held(Key::Right) {
            speed
        } else {
            0.0
        };
        let y = if self.is_held(Key::Up) {
            -speed
        } else if self.is_held(Key::Down) {
            speed
        } else {
            0.0
        };
        Vec2::new(x, y)
    }

    /// Head for `target` at up to full speed, never overshooting it in one tick.
    fn chase(&self, from: Vec2, target: Vec2, dt: f32) -> Vec2 {
        let dist = from.distance(target);
        if dist <= self.settings.drag_deadzone {
            return Vec2::ZERO;
        }
        let speed = if dt > 0.0 {
            self.settings.speed.min(dist / dt)
        } else {
            self.settings.speed
        };
        Vec2::new(
            (target.x - from.x) / dist * speed,
            (target.y - from.y) / dist * speed,
        )
    }
}

impl Default for InputTranslator {
    fn default() -> Self {
        Self::new(InputSettings::default())
    }
}
