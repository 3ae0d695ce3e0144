//! Casts in flight
//!
//! Each cast carries its own copy of the spell behavior, so it keeps running
//! after its registry entry has been purged.

use super::kind::{Spell, SpellKind};
use crate::error::ScriptError;
use crate::sim::World;

/// An active spell execution
#[derive(Debug, Clone)]
pub struct QueuedCast {
    pub name: String,
    pub kind: SpellKind,
    /// Frames this cast has already run
    pub duration: u32,
}

impl QueuedCast {
    pub fn new(spell: &Spell) -> Self {
        Self {
            name: spell.name.clone(),
            kind: spell.kind.clone(),
            duration: 0,
        }
    }
}

/// FIFO of active casts
#[derive(Debug, Clone, Default)]
pub struct SpellQueue {
    casts: Vec<QueuedCast>,
}

impl SpellQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cast: QueuedCast) {
        log::info!("Casting {}", cast.name);
        self.casts.push(cast);
    }

    /// Run every active cast for one frame, in insertion order.
    ///
    /// Casts that report completion are dropped. A faulting cast is dropped
    /// too and the fault is returned; casts behind it do not run this frame.
    pub fn tick(&mut self, world: &mut World) -> Result<(), ScriptError> {
        let mut i = 0;
        while i < self.casts.len() {
            let cast = &mut self.casts[i];
            match cast.kind.execute(&cast.name, cast.duration, world) {
                Ok(true) => {
                    cast.duration = cast.duration.saturating_add(1);
                    i += 1;
                }
                Ok(false) => {
                    self.casts.remove(i);
                }
                Err(err) => {
                    log::warn!("Dropping faulted cast {}: {err}", cast.name);
                    self.casts.remove(i);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.casts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedCast> {
        self.casts.iter()
    }

    pub fn len(&self) -> usize {
        self.casts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.casts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::spell::{Direction, ScriptHandle, Spell};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn world() -> World {
        World::new(Vec2::new(450.0, 250.0))
    }

    #[test]
    fn test_cast_runs_until_done() {
        let player = PlayerConfig {
            move_speed: 20.0,
            move_duration: 3,
            ..Default::default()
        };
        let mut queue = SpellQueue::new();
        queue.push(QueuedCast::new(&Spell::movement(Direction::Right, &player)));
        let mut world = world();

        for expected in 1..=4 {
            queue.tick(&mut world).unwrap();
            assert_eq!(world.player.pos.x, 20.0 * expected as f32);
        }
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().unwrap().duration, 4);

        queue.tick(&mut world).unwrap();
        assert!(queue.is_empty());
        assert_eq!(world.player.pos.x, 80.0);
    }

    #[test]
    fn test_fifo_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = SpellQueue::new();
        for tag in ["first", "second", "third"] {
            let log = log.clone();
            let spell = Spell::new(
                tag,
                crate::spell::Durability::Charges(1),
                crate::spell::SpellKind::Scripted(ScriptHandle::new(move |frame, _| {
                    log.borrow_mut().push((tag, frame));
                    Ok(frame < 1)
                })),
            );
            queue.push(QueuedCast::new(&spell));
        }
        let mut world = world();
        queue.tick(&mut world).unwrap();
        queue.tick(&mut world).unwrap();
        queue.tick(&mut world).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", 0),
                ("second", 0),
                ("third", 0),
                ("first", 1),
                ("second", 1),
                ("third", 1),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_endless_cast_frame_count_saturates() {
        let endless = Spell::new(
            "endless",
            crate::spell::Durability::Unlimited,
            crate::spell::SpellKind::Scripted(ScriptHandle::new(|_, _| Ok(true))),
        );
        let mut cast = QueuedCast::new(&endless);
        cast.duration = u32::MAX - 1;
        let mut queue = SpellQueue::new();
        queue.push(cast);
        let mut world = world();

        queue.tick(&mut world).unwrap();
        queue.tick(&mut world).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().unwrap().duration, u32::MAX);
    }

    #[test]
    fn test_fault_drops_only_faulting_cast() {
        let mut queue = SpellQueue::new();
        let faulty = Spell::new(
            "faulty",
            crate::spell::Durability::Charges(1),
            crate::spell::SpellKind::Scripted(ScriptHandle::new(|_, _| Err("bad".into()))),
        );
        let player = PlayerConfig::default();
        queue.push(QueuedCast::new(&faulty));
        queue.push(QueuedCast::new(&Spell::movement(Direction::Down, &player)));
        let mut world = world();

        assert!(queue.tick(&mut world).is_err());
        assert_eq!(queue.len(), 1);
        assert_eq!(world.player.pos, Vec2::ZERO);

        queue.tick(&mut world).unwrap();
        assert_eq!(world.player.pos.y, player.move_speed);
    }
}
