//! Actor classes and their base stat templates.
//!
//! Every creature in the arena (the player included) is one of a closed set
//! of classes. The stat table is matched exhaustively so adding a class is a
//! compile error until every table covers it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::economy::Currencies;

/// Immutable tag selecting a base stat template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorClass {
    /// Lowest-tier spawn. Harmless; gets eaten, never fought.
    Critter,
    /// Starting form of the player.
    Larva,
    Drone,
    Raptor,
    Spitter,
    Behemoth,
}

impl ActorClass {
    pub const ALL: [ActorClass; 6] = [
        ActorClass::Critter,
        ActorClass::Larva,
        ActorClass::Drone,
        ActorClass::Raptor,
        ActorClass::Spitter,
        ActorClass::Behemoth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Critter => "critter",
            Self::Larva => "larva",
            Self::Drone => "drone",
            Self::Raptor => "raptor",
            Self::Spitter => "spitter",
            Self::Behemoth => "behemoth",
        }
    }

    pub fn is_lowest_tier(self) -> bool {
        matches!(self, Self::Critter)
    }

    /// Whether the player may morph into this class.
    pub fn is_morph_target(self) -> bool {
        !self.is_lowest_tier()
    }

    pub fn stats(self) -> ClassStats {
        match self {
            Self::Critter => ClassStats {
                max_hp: 10,
                armor: 0,
                damage: 0,
                attack_cooldown: 0.0,
                radius: 0.6,
                speed: 2.0,
                aggression_radius: 0.0,
                wander_interval: (2.0, 5.0),
                morph_cost: Currencies::ZERO,
                kill_reward: Currencies::new(5, 0, 0),
            },
            Self::Larva => ClassStats {
                max_hp: 40,
                armor: 0,
                damage: 4,
                attack_cooldown: 1.0,
                radius: 1.0,
                speed: 7.0,
                aggression_radius: 8.0,
                wander_interval: (2.0, 5.0),
                morph_cost: Currencies::new(25, 0, 0),
                kill_reward: Currencies::new(8, 0, 0),
            },
            Self::Drone => ClassStats {
                max_hp: 60,
                armor: 1,
                damage: 6,
                attack_cooldown: 1.0,
                radius: 1.2,
                speed: 7.5,
                aggression_radius: 10.0,
                wander_interval: (2.0, 4.0),
                morph_cost: Currencies::new(50, 0, 0),
                kill_reward: Currencies::new(15, 2, 0),
            },
            Self::Raptor => ClassStats {
                max_hp: 80,
                armor: 2,
                damage: 10,
                attack_cooldown: 0.8,
                radius: 1.3,
                speed: 9.0,
                aggression_radius: 12.0,
                wander_interval: (1.5, 3.5),
                morph_cost: Currencies::new(100, 25, 0),
                kill_reward: Currencies::new(20, 5, 0),
            },
            Self::Spitter => ClassStats {
                max_hp: 90,
                armor: 1,
                damage: 14,
                attack_cooldown: 1.4,
                radius: 1.4,
                speed: 6.5,
                aggression_radius: 14.0,
                wander_interval: (2.0, 5.0),
                morph_cost: Currencies::new(100, 50, 0),
                kill_reward: Currencies::new(20, 10, 1),
            },
            Self::Behemoth => ClassStats {
                max_hp: 300,
                armor: 5,
                damage: 25,
                attack_cooldown: 2.0,
                radius: 2.5,
                speed: 5.0,
                aggression_radius: 10.0,
                wander_interval: (3.0, 6.0),
                morph_cost: Currencies::new(300, 150, 2),
                kill_reward: Currencies::new(60, 30, 3),
            },
        }
    }

    /// Fastest base speed across all classes.
    pub fn max_speed() -> f32 {
        Self::ALL
            .iter()
            .map(|c| c.stats().speed)
            .fold(0.0, f32::max)
    }
}

impl fmt::Display for ActorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a class name does not match any known class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown actor class: {0:?}")]
pub struct UnknownClass(pub String);

impl FromStr for ActorClass {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownClass(s.to_string()))
    }
}

/// Base stats for one class at size multiplier 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassStats {
    pub max_hp: i32,
    pub armor: i32,
    pub damage: i32,
    /// Seconds between strikes while engaged.
    pub attack_cooldown: f32,
    /// Bounding circle radius.
    pub radius: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// AI only: seek the player when within this distance.
    pub aggression_radius: f32,
    /// AI only: seconds between wander heading re-rolls (min, max).
    pub wander_interval: (f32, f32),
    /// Paid by the player to morph into this class.
    pub morph_cost: Currencies,
    /// Paid to the player for killing or eating one of these.
    pub kill_reward: Currencies,
}

impl ClassStats {
    /// Stats scaled by a spawn's size multiplier. Cooldown, speed and the
    /// AI timings are left alone.
    pub fn scaled(&self, size_multiplier: f32) -> Self {
        let m = size_multiplier.max(0.1);
        Self {
            max_hp: ((self.max_hp as f32) * m).round().max(1.0) as i32,
            damage: ((self.damage as f32) * m).round() as i32,
            radius: self.radius * m,
            kill_reward: self.kill_reward.scaled(m),
            ..*self
        }
    }
}
