//! Error types
//!
//! Mistyped or unmatched input is never an error; these cover configuration
//! problems found at construction and faults raised while a tick runs.

use thiserror::Error;

/// Invalid game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{what}: minimum {min} exceeds maximum {max}")]
    InvertedRange {
        what: &'static str,
        min: u32,
        max: u32,
    },

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f32 },

    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f32 },

    #[error("{what} must be at least {min}, got {value}")]
    BelowMinimum {
        what: &'static str,
        value: f32,
        min: f32,
    },

    #[error("spell name must contain only ASCII letters, got {0:?}")]
    InvalidSpellName(String),

    #[error("spell {0:?} is defined more than once")]
    DuplicateSpell(String),
}

/// Failure binding or running a host-provided spell script
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("no script evaluator could bind spell {spell:?}")]
    Unbound { spell: String },

    #[error("script for spell {spell:?} failed: {message}")]
    Fault { spell: String, message: String },
}

/// Top-level error surfaced to the host
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}
