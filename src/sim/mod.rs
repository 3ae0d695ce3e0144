//! Deterministic world simulation
//!
//! World-side gameplay logic lives here. This module must stay deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order of entity lists)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod state;
pub mod tick;

pub use collision::{overlapping, separated};
pub use enemy::SpawnTimer;
pub use state::{Collectible, Enemy, Player, World};
