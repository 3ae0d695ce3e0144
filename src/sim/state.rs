//! World state and entity types

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::enemy;
use crate::config::GameConfig;
use crate::spell::Spell;

/// The player avatar
#[derive(Debug, Clone, Default, Serialize)]
pub struct Player {
    pub pos: Vec2,
    /// Set while a shield is active; enemy contact is ignored
    pub protected: bool,
}

/// A wandering hazard
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub pos: Vec2,
    /// Heading in radians, see [`crate::heading`]
    pub rotation: f32,
    /// Inward push left over from the last border bounce
    #[serde(skip)]
    pub push: Vec2,
}

impl Enemy {
    pub fn new(pos: Vec2, rotation: f32) -> Self {
        Self {
            pos,
            rotation,
            push: Vec2::ZERO,
        }
    }
}

/// A pickup granting a spell
#[derive(Debug, Clone)]
pub struct Collectible {
    pub pos: Vec2,
    pub spell: Spell,
}

/// Everything that moves
#[derive(Debug, Clone)]
pub struct World {
    /// Half width and half height of the world rectangle
    pub half_extents: Vec2,
    pub player: Player,
    pub camera: Vec2,
    pub collectibles: Vec<Collectible>,
    pub enemies: Vec<Enemy>,
}

impl World {
    /// Empty world with the player and camera at the origin
    pub fn new(half_extents: Vec2) -> Self {
        Self {
            half_extents,
            player: Player::default(),
            camera: Vec2::ZERO,
            collectibles: Vec::new(),
            enemies: Vec::new(),
        }
    }

    /// Populate a world with random collectibles (drawn from `pool`) and enemies
    pub fn generate(config: &GameConfig, pool: &[Spell], rng: &mut impl Rng) -> Self {
        let mut world = Self::new(config.half_extents());

        let count = rng.random_range(config.collectibles.min_count..=config.collectibles.max_count);
        if !pool.is_empty() {
            for _ in 0..count {
                let pos = world.random_point(rng);
                let spell = pool[rng.random_range(0..pool.len())].clone();
                world.collectibles.push(Collectible { pos, spell });
            }
        }

        let count = rng.random_range(config.enemies.min_count..=config.enemies.max_count);
        for _ in 0..count {
            world.enemies.push(enemy::spawn(world.half_extents, rng));
        }

        log::info!(
            "Generated world with {} collectibles and {} enemies",
            world.collectibles.len(),
            world.enemies.len()
        );
        world
    }

    /// Uniform random point inside the world rectangle
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        random_point(self.half_extents, rng)
    }

    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        pos.clamp(-self.half_extents, self.half_extents)
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.abs().cmple(self.half_extents).all()
    }

    /// Remove and return the enemy closest to the player
    pub fn remove_nearest_enemy(&mut self) -> Option<Enemy> {
        let player = self.player.pos;
        let index = self
            .enemies
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.pos
                    .distance_squared(player)
                    .partial_cmp(&b.pos.distance_squared(player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)?;
        Some(self.enemies.remove(index))
    }
}

pub(crate) fn random_point(half_extents: Vec2, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.random_range(-half_extents.x..=half_extents.x),
        rng.random_range(-half_extents.y..=half_extents.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generate_respects_config() {
        let config = GameConfig::default();
        let pool = vec![Spell::shield(1, 10), Spell::banish(1)];
        let mut rng = Pcg32::seed_from_u64(42);
        let world = World::generate(&config, &pool, &mut rng);

        assert!((3..=5).contains(&world.collectibles.len()));
        assert!((1..=3).contains(&world.enemies.len()));
        assert!(world.collectibles.iter().all(|c| world.contains(c.pos)));
        assert!(world.enemies.iter().all(|e| world.contains(e.pos)));
        assert_eq!(world.player.pos, Vec2::ZERO);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = GameConfig::default();
        let pool = vec![Spell::shield(1, 10), Spell::banish(1)];
        let a = World::generate(&config, &pool, &mut Pcg32::seed_from_u64(7));
        let b = World::generate(&config, &pool, &mut Pcg32::seed_from_u64(7));
        assert_eq!(a.collectibles.len(), b.collectibles.len());
        for (x, y) in a.collectibles.iter().zip(&b.collectibles) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.spell.name, y.spell.name);
        }
    }

    #[test]
    fn test_remove_nearest_enemy() {
        let mut world = World::new(Vec2::new(450.0, 250.0));
        assert!(world.remove_nearest_enemy().is_none());

        world.player.pos = Vec2::new(100.0, 100.0);
        world.enemies.push(Enemy::new(Vec2::ZERO, 0.0));
        world.enemies.push(Enemy::new(Vec2::new(90.0, 120.0), 0.0));
        let removed = world.remove_nearest_enemy().unwrap();
        assert_eq!(removed.pos, Vec2::new(90.0, 120.0));
        assert_eq!(world.enemies.len(), 1);
    }

    #[test]
    fn test_clamp_and_contains() {
        let world = World::new(Vec2::new(450.0, 250.0));
        assert_eq!(world.clamp(Vec2::new(500.0, -300.0)), Vec2::new(450.0, -250.0));
        assert!(world.contains(Vec2::new(450.0, -250.0)));
        assert!(!world.contains(Vec2::new(450.1, 0.0)));
    }
}
