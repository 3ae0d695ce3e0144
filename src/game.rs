//! Game session orchestration
//!
//! `Game` owns a session: the world, the spell registry and queue, the typed
//! input, and the enemy spawn timer. The host calls [`Game::handle_key`] as
//! keys arrive, [`Game::elapse`] with wall-clock time, and [`Game::update`]
//! once per frame, then reads [`Game::snapshot`] to draw.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::sim::{Enemy, SpawnTimer, World, tick};
use crate::spell::{
    InputResolver, QueuedCast, ScriptEvaluator, Spell, SpellQueue, SpellRegistry,
};

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOutcome {
    /// Every collectible was picked up
    Won,
    /// An enemy touched an unprotected player
    Lost,
}

/// What happened during one `update`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Spells cast from typed input this frame
    pub casts: Vec<String>,
    /// Spells granted by collectibles this frame
    pub pickups: Vec<String>,
    pub lost: bool,
    pub won: bool,
}

/// Spell as shown in the HUD
#[derive(Debug, Clone, Serialize)]
pub struct SpellView {
    pub name: String,
    pub durability: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectibleView {
    pub pos: Vec2,
    pub spell: String,
}

/// Read-only view of a session for rendering
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub player: Vec2,
    pub protected: bool,
    pub camera: Vec2,
    pub world_size: Vec2,
    pub collectibles: Vec<CollectibleView>,
    pub enemies: Vec<Enemy>,
    pub spells: Vec<SpellView>,
    pub typed: String,
    pub suggestions: Vec<String>,
    pub active_casts: usize,
}

type Observer = Box<dyn FnMut(GameOutcome)>;

/// A running game session
pub struct Game {
    config: GameConfig,
    seed: u64,
    rng: Pcg32,
    world: World,
    registry: SpellRegistry,
    queue: SpellQueue,
    input: InputResolver,
    /// Spells a collectible can grant, scripted ones included
    pickup_pool: Vec<Spell>,
    spawner: SpawnTimer,
    observers: Vec<Observer>,
    frame: u64,
}

impl Game {
    /// Start a session. Scripted spells in the config are bound through
    /// `scripts` once and reused across restarts.
    pub fn new(
        config: GameConfig,
        seed: u64,
        scripts: &mut impl ScriptEvaluator,
    ) -> Result<Self, GameError> {
        config.validate()?;

        let spells = &config.spells;
        let mut pickup_pool = vec![
            Spell::shield(spells.shield_charges, spells.protection_frames),
            Spell::banish(spells.banish_charges),
        ];
        for scripted in &spells.scripted {
            let handle = scripts.bind(scripted)?;
            pickup_pool.push(Spell::scripted(scripted, handle));
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let world = World::generate(&config, &pickup_pool, &mut rng);

        log::info!("Session started with seed {seed}");
        Ok(Self {
            registry: SpellRegistry::with_movement(&spells.directions, &config.player),
            input: InputResolver::new(config.keys.clone()),
            spawner: SpawnTimer::new(config.enemies.spawn_interval_secs, seed),
            queue: SpellQueue::new(),
            observers: Vec::new(),
            frame: 0,
            config,
            seed,
            rng,
            world,
            pickup_pool,
        })
    }

    /// Tear down the current session and start a fresh one.
    ///
    /// The old spawn timer is cancelled before the new world exists. Game-over
    /// observers stay registered.
    pub fn restart(&mut self, seed: u64) {
        self.spawner.cancel();

        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.world = World::generate(&self.config, &self.pickup_pool, &mut self.rng);
        self.registry =
            SpellRegistry::with_movement(&self.config.spells.directions, &self.config.player);
        self.queue.clear();
        self.input.clear();
        self.spawner = SpawnTimer::new(self.config.enemies.spawn_interval_secs, seed);
        self.frame = 0;

        log::info!("Session restarted with seed {seed}");
    }

    /// Buffer a raw key identifier; interpreted on the next `update`
    pub fn handle_key(&mut self, key: impl Into<String>) {
        self.input.handle_key(key);
    }

    /// Register a game-over observer. Observers run in registration order.
    pub fn on_game_over(&mut self, observer: impl FnMut(GameOutcome) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Feed wall-clock time to the enemy spawner. Returns enemies spawned.
    pub fn elapse(&mut self, dt_secs: f32) -> u32 {
        self.spawner
            .run(dt_secs, self.world.half_extents, &mut self.world.enemies)
    }

    /// Advance the session by one frame.
    ///
    /// Steps run in a fixed order: resolve input, purge exhausted spells, run
    /// casts, move enemies, clamp the player, bounce enemies, collect pickups,
    /// check enemy contact, check for a win, ease the camera. A script fault
    /// stops the frame where it happened; earlier steps are not undone.
    pub fn update(&mut self) -> Result<TickReport, GameError> {
        self.frame += 1;
        let mut report = TickReport::default();
        let collectibles_before = self.world.collectibles.len();

        for cast in self.input.resolve(&mut self.registry) {
            report.casts.push(cast.name.clone());
            self.queue.push(cast);
        }

        self.registry.purge_exhausted();

        self.queue.tick(&mut self.world)?;

        tick::advance_enemies(&mut self.world, &self.config, &mut self.rng);
        tick::clamp_player(&mut self.world);
        tick::bounce_enemies(&mut self.world, &self.config);

        for spell in tick::collect_pickups(&mut self.world, &self.config) {
            log::info!("Picked up {} ({})", spell.name, spell.durability);
            report.pickups.push(spell.name.clone());
            self.registry.add(spell);
        }

        // Contact keeps firing every frame while it lasts; the enemy stays.
        if !self.world.player.protected && tick::touches_enemy(&self.world, &self.config) {
            report.lost = true;
            self.notify(GameOutcome::Lost);
        }

        if collectibles_before > 0 && self.world.collectibles.is_empty() {
            report.won = true;
            self.notify(GameOutcome::Won);
        }

        tick::ease_camera(&mut self.world, &self.config);

        Ok(report)
    }

    fn notify(&mut self, outcome: GameOutcome) {
        log::info!("Game over: {outcome:?} on frame {}", self.frame);
        for observer in &mut self.observers {
            observer(outcome);
        }
    }

    /// Text typed so far
    pub fn typed_text(&self) -> String {
        self.input.text()
    }

    /// Spell names the word being typed would match, best match first
    pub fn suggestions(&self) -> Vec<String> {
        let word = self.input.current_word();
        if word.is_empty() {
            return Vec::new();
        }
        self.registry.matches(&word).map(str::to_string).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            frame: self.frame,
            player: self.world.player.pos,
            protected: self.world.player.protected,
            camera: self.world.camera,
            world_size: self.world.half_extents * 2.0,
            collectibles: self
                .world
                .collectibles
                .iter()
                .map(|c| CollectibleView {
                    pos: c.pos,
                    spell: c.spell.name.clone(),
                })
                .collect(),
            enemies: self.world.enemies.clone(),
            spells: self
                .registry
                .iter()
                .map(|s| SpellView {
                    name: s.name.clone(),
                    durability: s.durability.to_string(),
                })
                .collect(),
            typed: self.typed_text(),
            suggestions: self.suggestions(),
            active_casts: self.queue.len(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for hosts and scripted spells
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn registry(&self) -> &SpellRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SpellRegistry {
        &mut self.registry
    }

    pub fn active_casts(&self) -> impl Iterator<Item = &QueuedCast> {
        self.queue.iter()
    }

    pub fn pickup_pool(&self) -> &[Spell] {
        &self.pickup_pool
    }

    pub fn spawner(&self) -> &SpawnTimer {
        &self.spawner
    }
}
