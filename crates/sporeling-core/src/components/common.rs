//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};

pub use sporeling_logic::geometry::Vec2;

/// Where an entity is in the arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Heading angle in radians, measured from +x.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Facing(pub f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_new() {
        let p = Position::new(3.0, 4.0);
        assert_eq!(p.0.length(), 5.0);
    }
}
