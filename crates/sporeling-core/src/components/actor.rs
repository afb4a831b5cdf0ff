//! Creature components: Actor stats, the Player marker, AI wander state,
//! and the morph cocoon placeholder.

use serde::{Deserialize, Serialize};
use sporeling_logic::class::ActorClass;
use sporeling_logic::damage::Vitals;
use sporeling_logic::geometry::Vec2;

/// Combat and movement stats for one creature (player or AI).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub class: ActorClass,
    pub vitals: Vitals,
    pub armor: i32,
    pub armor_bonus: i32,
    pub damage: i32,
    pub damage_bonus: i32,
    /// Seconds between strikes.
    pub attack_cooldown: f32,
    /// Seconds until the next strike while engaged. Never negative.
    pub attack_timer: f32,
    pub size_multiplier: f32,
    pub radius: f32,
    pub speed: f32,
    pub in_combat: bool,
}

impl Actor {
    /// Fresh actor of `class`, scaled by `size_multiplier`, at full HP.
    pub fn new(class: ActorClass, size_multiplier: f32) -> Self {
        let stats = class.stats().scaled(size_multiplier);
        Self {
            class,
            vitals: Vitals::full(stats.max_hp),
            armor: stats.armor,
            armor_bonus: 0,
            damage: stats.damage,
            damage_bonus: 0,
            attack_cooldown: stats.attack_cooldown,
            attack_timer: 0.0,
            size_multiplier,
            radius: stats.radius,
            speed: stats.speed,
            in_combat: false,
        }
    }

    pub fn with_bonuses(mut self, damage_bonus: i32, armor_bonus: i32) -> Self {
        self.damage_bonus = damage_bonus;
        self.armor_bonus = armor_bonus;
        self
    }

    pub fn total_damage(&self) -> i32 {
        self.damage + self.damage_bonus
    }

    pub fn total_armor(&self) -> i32 {
        self.armor + self.armor_bonus
    }

    pub fn is_alive(&self) -> bool {
        !self.vitals.is_dead()
    }
}

/// Marker for the player's active (non-cocoon) body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player;

/// AI steering state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wanderer {
    /// Unit heading the creature walks along.
    pub heading: Vec2,
    /// Seconds until the wander heading is re-rolled.
    pub retarget_in: f32,
    /// Heading currently points at the player.
    pub seeking: bool,
}

impl Wanderer {
    pub fn new(heading: Vec2, retarget_in: f32) -> Self {
        Self {
            heading,
            retarget_in,
            seeking: false,
        }
    }
}

/// Inert placeholder occupying the player's spot while morphing.
/// Has no `Actor`, so nothing can move, target or damage it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cocoon {
    pub target: ActorClass,
}

/// Seconds the player has spent inside hazard vents since the last drain tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DrainTimer(pub f32);
