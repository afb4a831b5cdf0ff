//! Static map features: obstacles, harvestable nodes and hazard vents.

use serde::{Deserialize, Serialize};
use sporeling_logic::economy::Currencies;

/// Impassable circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub radius: f32,
}

/// Depletable pickup, consumed by the player on first contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub radius: f32,
    pub reward: Currencies,
}

/// Vent that trades the player's HP for gas while occupied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardNode {
    pub radius: f32,
}
