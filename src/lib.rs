//! Dodge & shoot: a single-screen arcade shooter.
//!
//! The simulation (`compute`, `collision`, `spawn`, `registry`, `input`,
//! `schedule`) is engine-free and deterministic given an RNG.  Everything it
//! tells the outside world goes through `events`; `effects`, `audio`,
//! `sprites`, `starfield`, `viewport` and `terminal_input` are the pieces the
//! terminal host wires around it.

pub mod audio;
pub mod collision;
pub mod compute;
pub mod config;
pub mod effects;
pub mod entities;
pub mod error;
pub mod events;
pub mod input;
pub mod registry;
pub mod schedule;
pub mod spawn;
pub mod sprites;
pub mod starfield;
pub mod terminal_input;
pub mod viewport;
