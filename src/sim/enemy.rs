//! Enemy behavior: wandering, collectible attraction, border bounce, spawning

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Collectible, Enemy, random_point};
use crate::config::EnemyConfig;
use crate::{bearing, heading};

/// New enemy at a random position with a random heading
pub fn spawn(half_extents: Vec2, rng: &mut impl Rng) -> Enemy {
    let pos = random_point(half_extents, rng);
    let rotation = rng.random_range(0.0..=TAU);
    Enemy::new(pos, rotation)
}

/// Advance one enemy by a frame.
///
/// The heading is nudged randomly, then overridden to face any collectible
/// within the activation radius (the last one in list order wins), and the
/// enemy moves along it.
pub fn advance(
    enemy: &mut Enemy,
    collectibles: &[Collectible],
    config: &EnemyConfig,
    rng: &mut impl Rng,
) {
    enemy.pos += enemy.push;
    enemy.push = Vec2::ZERO;

    let spread = config.rotation_change.abs() / 2.0;
    enemy.rotation = (enemy.rotation + rng.random_range(-spread..=spread)).rem_euclid(TAU);

    for collectible in collectibles {
        let offset = collectible.pos - enemy.pos;
        if offset.length() < config.activation_radius {
            enemy.rotation = bearing(offset);
        }
    }

    enemy.pos += heading(enemy.rotation) * config.speed;
}

/// Clamp an enemy into the world and bounce it off the border it crossed.
///
/// The heading is mirrored to `TAU - rotation` and an inward push of
/// `evasion_speed` per crossed axis is applied on the next advance. Returns
/// whether a bounce happened.
pub fn bounce(enemy: &mut Enemy, half_extents: Vec2, evasion_speed: f32) -> bool {
    let clamped = enemy.pos.clamp(-half_extents, half_extents);
    if clamped == enemy.pos {
        return false;
    }

    let mut push = Vec2::ZERO;
    if enemy.pos.x > half_extents.x {
        push.x = -evasion_speed;
    } else if enemy.pos.x < -half_extents.x {
        push.x = evasion_speed;
    }
    if enemy.pos.y > half_extents.y {
        push.y = -evasion_speed;
    } else if enemy.pos.y < -half_extents.y {
        push.y = evasion_speed;
    }

    enemy.pos = clamped;
    enemy.rotation = TAU - enemy.rotation;
    enemy.push = push;
    true
}

/// Stream id for the spawner RNG, separate from the world stream
const SPAWN_STREAM: u64 = 0x5eed_0f_e4e3;

/// Most enemies a single clock advance may spawn
pub const MAX_SPAWNS_PER_ADVANCE: u32 = 64;

/// Periodic enemy spawner driven by wall-clock time.
///
/// Owned by the game session and cancelled when the session ends, so a stale
/// timer can never add enemies to a newer world. It only appends enemies and
/// reads no other world state.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    interval: f32,
    elapsed: f32,
    rng: Pcg32,
    cancelled: bool,
}

impl SpawnTimer {
    pub fn new(interval_secs: f32, seed: u64) -> Self {
        Self {
            interval: interval_secs,
            elapsed: 0.0,
            rng: Pcg32::new(seed, SPAWN_STREAM),
            cancelled: false,
        }
    }

    /// Accumulate `dt` seconds and return how many spawns came due.
    ///
    /// At most [`MAX_SPAWNS_PER_ADVANCE`] come due at once; the rest of a long
    /// backlog is dropped.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if self.cancelled || !usable(self.interval) || !usable(dt) {
            return 0;
        }
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return 0;
        }
        let due = (self.elapsed / self.interval).floor();
        self.elapsed = self.elapsed.rem_euclid(self.interval);
        due.min(MAX_SPAWNS_PER_ADVANCE as f32) as u32
    }

    /// Advance the clock and append any due enemies. Returns the spawn count.
    pub fn run(&mut self, dt: f32, half_extents: Vec2, enemies: &mut Vec<Enemy>) -> u32 {
        let due = self.advance(dt);
        for _ in 0..due {
            let enemy = spawn(half_extents, &mut self.rng);
            log::debug!("Spawned enemy at ({:.0}, {:.0})", enemy.pos.x, enemy.pos.y);
            enemies.push(enemy);
        }
        due
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
