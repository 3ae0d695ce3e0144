//! Spell Typer - a typing-driven arena game
//!
//! Core modules:
//! - `spell`: Spell registry, cast queue and the typed-text resolver
//! - `sim`: Deterministic world simulation (movement, enemies, collisions)
//! - `game`: Per-frame orchestration and the render query surface
//! - `config`: Data-driven game tuning

pub mod config;
pub mod error;
pub mod game;
pub mod sim;
pub mod spell;

pub use config::GameConfig;
pub use error::{ConfigError, GameError, ScriptError};
pub use game::{Game, GameOutcome, Snapshot, TickReport};

use glam::Vec2;

/// Unit heading for a rotation in radians.
///
/// Rotation 0 points along +y; the x component follows `sin`.
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    Vec2::new(rotation.sin(), rotation.cos())
}

/// Rotation that makes [`heading`] face along `offset`
#[inline]
pub fn bearing(offset: Vec2) -> f32 {
    offset.x.atan2(offset.y)
}

/// Move `from` toward `to` by exactly `speed`, or not at all.
///
/// Points closer than `speed` are left alone, so the result may lag the target
/// forever. A zero offset normalizes to zero instead of dividing by zero.
#[inline]
pub fn ease_toward(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let delta = to - from;
    if delta.length() > speed {
        from + delta.normalize_or_zero() * speed
    } else {
        from
    }
}
