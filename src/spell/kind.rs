//! Spell definitions
//!
//! A spell is a name, a durability and a per-frame behavior. The behavior set
//! is closed: built-in movement, shield and banish, plus scripted spells whose
//! body is provided by the host through a [`ScriptHandle`].

use std::cell::RefCell;
use std::f32::consts::FRAC_1_SQRT_2;
use std::fmt;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{PlayerConfig, ScriptedSpellConfig};
use crate::error::ScriptError;
use crate::sim::World;

/// Pickup spell that protects the player for a while
pub const SHIELD_SPELL: &str = "shield";
/// Pickup spell that removes the enemy nearest to the player
pub const BANISH_SPELL: &str = "banish";

/// Movement directions. "Up" is toward negative y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Cardinals first, so a short typed token prefers them
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::UpLeft => "upleft",
            Direction::UpRight => "upright",
            Direction::DownLeft => "downleft",
            Direction::DownRight => "downright",
        }
    }

    /// Unit vector for this direction
    pub fn unit(&self) -> Vec2 {
        const D: f32 = FRAC_1_SQRT_2;
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::UpLeft => Vec2::new(-D, -D),
            Direction::UpRight => Vec2::new(D, -D),
            Direction::DownLeft => Vec2::new(-D, D),
            Direction::DownRight => Vec2::new(D, D),
        }
    }
}

/// Remaining casts of a spell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Durability {
    Unlimited,
    Charges(u32),
}

impl Durability {
    pub fn can_cast(self) -> bool {
        match self {
            Durability::Unlimited => true,
            Durability::Charges(n) => n > 0,
        }
    }

    pub fn is_exhausted(self) -> bool {
        self == Durability::Charges(0)
    }

    /// Use up one charge (no-op when unlimited or already empty)
    pub fn consume(&mut self) {
        if let Durability::Charges(n) = self {
            *n = n.saturating_sub(1);
        }
    }

    /// Combine two durabilities of the same spell
    pub fn stack(self, other: Durability) -> Durability {
        match (self, other) {
            (Durability::Charges(a), Durability::Charges(b)) => Durability::Charges(a.saturating_add(b)),
            _ => Durability::Unlimited,
        }
    }
}

impl fmt::Display for Durability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Durability::Unlimited => f.write_str("∞"),
            Durability::Charges(n) => write!(f, "{n}"),
        }
    }
}

type ScriptFn = dyn FnMut(u32, &mut World) -> Result<bool, String>;

/// Host-provided spell body with the same per-frame contract as the built-ins
#[derive(Clone)]
pub struct ScriptHandle(Rc<RefCell<ScriptFn>>);

impl ScriptHandle {
    pub fn new(body: impl FnMut(u32, &mut World) -> Result<bool, String> + 'static) -> Self {
        Self(Rc::new(RefCell::new(body)))
    }

    fn call(&self, spell: &str, frame: u32, world: &mut World) -> Result<bool, ScriptError> {
        let mut body = self.0.borrow_mut();
        (&mut *body)(frame, world).map_err(|message| ScriptError::Fault {
            spell: spell.to_string(),
            message,
        })
    }
}

impl fmt::Debug for ScriptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScriptHandle(..)")
    }
}

/// Turns a configured script into a callable spell body.
///
/// The evaluator belongs to the host; the simulation never interprets script
/// text itself.
pub trait ScriptEvaluator {
    fn bind(&mut self, spell: &ScriptedSpellConfig) -> Result<ScriptHandle, ScriptError>;
}

impl<F> ScriptEvaluator for F
where
    F: FnMut(&ScriptedSpellConfig) -> Result<ScriptHandle, ScriptError>,
{
    fn bind(&mut self, spell: &ScriptedSpellConfig) -> Result<ScriptHandle, ScriptError> {
        self(spell)
    }
}

/// Evaluator for hosts without scripting; refuses every script
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScripts;

impl ScriptEvaluator for NoScripts {
    fn bind(&mut self, spell: &ScriptedSpellConfig) -> Result<ScriptHandle, ScriptError> {
        Err(ScriptError::Unbound {
            spell: spell.name.clone(),
        })
    }
}

/// Per-frame behavior of a spell
#[derive(Debug, Clone)]
pub enum SpellKind {
    /// Moves the player by `step` on frames `0..=duration`
    Movement { step: Vec2, duration: u32 },
    /// Keeps the player protected on frames `0..=frames`
    Shield { frames: u32 },
    /// Removes the enemy nearest to the player, once
    Banish,
    Scripted(ScriptHandle),
}

impl SpellKind {
    /// Run one frame. Returns whether the cast stays active.
    pub fn execute(&self, spell: &str, frame: u32, world: &mut World) -> Result<bool, ScriptError> {
        match self {
            SpellKind::Movement { step, duration } => {
                if frame > *duration {
                    return Ok(false);
                }
                world.player.pos += *step;
                Ok(true)
            }
            SpellKind::Shield { frames } => {
                let active = frame <= *frames;
                world.player.protected = active;
                Ok(active)
            }
            SpellKind::Banish => {
                if let Some(enemy) = world.remove_nearest_enemy() {
                    log::info!("Banished enemy at ({:.0}, {:.0})", enemy.pos.x, enemy.pos.y);
                }
                Ok(false)
            }
            SpellKind::Scripted(handle) => handle.call(spell, frame, world),
        }
    }
}

/// A castable named ability
#[derive(Debug, Clone)]
pub struct Spell {
    /// Always lowercase
    pub name: String,
    pub durability: Durability,
    pub kind: SpellKind,
}

impl Spell {
    pub fn new(name: &str, durability: Durability, kind: SpellKind) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            durability,
            kind,
        }
    }

    pub fn movement(direction: Direction, player: &PlayerConfig) -> Self {
        Self::new(
            direction.name(),
            Durability::Unlimited,
            SpellKind::Movement {
                step: direction.unit() * player.move_speed,
                duration: player.move_duration,
            },
        )
    }

    pub fn shield(charges: u32, frames: u32) -> Self {
        Self::new(SHIELD_SPELL, Durability::Charges(charges), SpellKind::Shield { frames })
    }

    pub fn banish(charges: u32) -> Self {
        Self::new(BANISH_SPELL, Durability::Charges(charges), SpellKind::Banish)
    }

    pub fn scripted(config: &ScriptedSpellConfig, handle: ScriptHandle) -> Self {
        Self::new(
            &config.name,
            Durability::Charges(config.durability),
            SpellKind::Scripted(handle),
        )
    }
}
