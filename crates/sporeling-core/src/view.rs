//! Read-only snapshots handed to the HUD, minimap and renderer.

use hecs::Entity;
use serde::Serialize;
use sporeling_logic::class::ActorClass;
use sporeling_logic::economy::PlayerEconomy;
use sporeling_logic::geometry::Vec2;

/// One living actor as seen from outside the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActorView {
    /// Stable handle bits, unique while the actor lives.
    pub id: u64,
    #[serde(skip)]
    pub entity: Entity,
    pub class: ActorClass,
    pub position: Vec2,
    pub facing: f32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub shield: i32,
    pub size_multiplier: f32,
    pub is_player: bool,
    pub in_combat: bool,
}

/// HUD summary of the player session.
///
/// While morphing, the vitals describe the body that will hatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerStatus {
    pub class: ActorClass,
    pub morphing_into: Option<ActorClass>,
    pub morph_progress: Option<f32>,
    pub current_hp: i32,
    pub max_hp: i32,
    pub shield: i32,
    pub position: Vec2,
    pub in_combat: bool,
    pub economy: PlayerEconomy,
}
