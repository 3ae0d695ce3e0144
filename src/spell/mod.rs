//! Spells and the path from typed text to running casts
//!
//! - `kind`: what a spell is and what it does each frame
//! - `registry`: the spells the player can currently cast
//! - `queue`: casts in flight and their frame counters
//! - `input`: key buffering and name matching

pub mod input;
pub mod kind;
pub mod queue;
pub mod registry;

pub use input::{InputResolver, subsequence_match};
pub use kind::{
    BANISH_SPELL, Direction, Durability, NoScripts, SHIELD_SPELL, ScriptEvaluator, ScriptHandle,
    Spell, SpellKind,
};
pub use queue::{QueuedCast, SpellQueue};
pub use registry::SpellRegistry;
