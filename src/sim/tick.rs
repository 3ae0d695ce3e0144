//! World-side steps of a simulation frame
//!
//! The game orchestrator calls these in a fixed order once per frame; see
//! [`crate::Game::update`].

use rand::Rng;

use super::collision::overlapping;
use super::enemy;
use super::state::World;
use crate::config::GameConfig;
use crate::ease_toward;
use crate::spell::Spell;

/// Wander, steer and move every enemy
pub fn advance_enemies(world: &mut World, config: &GameConfig, rng: &mut impl Rng) {
    for e in &mut world.enemies {
        enemy::advance(e, &world.collectibles, &config.enemies, rng);
    }
}

pub fn clamp_player(world: &mut World) {
    world.player.pos = world.clamp(world.player.pos);
}

/// Clamp every enemy into the world, bouncing those that crossed a border
pub fn bounce_enemies(world: &mut World, config: &GameConfig) -> usize {
    let half = world.half_extents;
    let evasion = config.enemies.border_evasion_speed;
    let mut bounced = 0;
    for e in &mut world.enemies {
        if enemy::bounce(e, half, evasion) {
            bounced += 1;
        }
    }
    bounced
}

/// Remove every collectible the player touches and return their spells
pub fn collect_pickups(world: &mut World, config: &GameConfig) -> Vec<Spell> {
    let player = world.player.pos;
    let (player_size, size) = (config.player.size, config.collectibles.size);

    let mut granted = Vec::new();
    world.collectibles.retain(|c| {
        if overlapping(player, c.pos, player_size, size) {
            granted.push(c.spell.clone());
            false
        } else {
            true
        }
    });
    granted
}

/// Whether any enemy touches the player (protection is not considered)
pub fn touches_enemy(world: &World, config: &GameConfig) -> bool {
    let player = world.player.pos;
    world
        .enemies
        .iter()
        .any(|e| overlapping(player, e.pos, config.player.size, config.enemies.size))
}

pub fn ease_camera(world: &mut World, config: &GameConfig) {
    world.camera = ease_toward(world.camera, world.player.pos, config.camera.move_speed);
}
