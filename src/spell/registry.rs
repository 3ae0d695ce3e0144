//! The player's castable spells, in insertion order

use super::input::subsequence_match;
use super::kind::{Direction, Durability, Spell};
use super::queue::QueuedCast;
use crate::config::PlayerConfig;

/// Ordered set of spells keyed by name
#[derive(Debug, Clone, Default)]
pub struct SpellRegistry {
    spells: Vec<Spell>,
}

impl SpellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding one unlimited movement spell per direction
    pub fn with_movement(directions: &[Direction], player: &PlayerConfig) -> Self {
        let mut registry = Self::new();
        for direction in directions {
            registry.add(Spell::movement(*direction, player));
        }
        registry
    }

    /// Insert a spell, or stack its durability onto an existing one with the
    /// same name. Returns true if a new entry was inserted.
    pub fn add(&mut self, spell: Spell) -> bool {
        match self.spells.iter_mut().find(|s| s.name == spell.name) {
            Some(existing) => {
                existing.durability = existing.durability.stack(spell.durability);
                false
            }
            None => {
                self.spells.push(spell);
                true
            }
        }
    }

    /// Drop every spell with no charges left. Unlimited spells stay.
    pub fn purge_exhausted(&mut self) -> usize {
        let before = self.spells.len();
        self.spells.retain(|s| !s.durability.is_exhausted());
        before - self.spells.len()
    }

    /// Index of the first spell whose name contains `token` as a subsequence
    pub fn find_match(&self, token: &str) -> Option<usize> {
        self.spells
            .iter()
            .position(|s| subsequence_match(token, &s.name))
    }

    /// Cast the first spell matching `token`, spending one charge.
    ///
    /// Returns `None` when nothing matches or the matched spell is out of
    /// charges; a later match is never tried in that case.
    pub fn cast(&mut self, token: &str) -> Option<QueuedCast> {
        let Some(index) = self.find_match(token) else {
            log::debug!("No spell matches {token:?}");
            return None;
        };
        let spell = &mut self.spells[index];
        if !spell.durability.can_cast() {
            log::debug!("Spell {:?} is exhausted", spell.name);
            return None;
        }
        spell.durability.consume();
        Some(QueuedCast::new(spell))
    }

    /// Names of all spells matching `token`, in registry order
    pub fn matches<'a>(&'a self, token: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.spells
            .iter()
            .filter(move |s| subsequence_match(token, &s.name))
            .map(|s| s.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Spell> {
        self.spells.iter().find(|s| s.name == name)
    }

    pub fn durability(&self, name: &str) -> Option<Durability> {
        self.get(name).map(|s| s.durability)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spell> {
        self.spells.iter()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}
