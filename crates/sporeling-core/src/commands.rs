//! Input commands submitted by the UI. Queued between ticks and consumed
//! at the start of the next one.

use serde::{Deserialize, Serialize};
use sporeling_logic::class::ActorClass;
use sporeling_logic::economy::UpgradeKind;
use sporeling_logic::movement::MoveFlags;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraCommand {
    ZoomIn,
    ZoomOut,
    Pan { dx: f32, dy: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replace the held movement flags.
    SetMovement(MoveFlags),
    Morph(ActorClass),
    Upgrade(UpgradeKind),
    Heal,
    PurchaseShield,
    /// Camera control belongs to the renderer; the simulation ignores it.
    Camera(CameraCommand),
}

impl Command {
    /// Morph command from a class name. Unknown names yield `None`.
    pub fn morph_named(name: &str) -> Option<Self> {
        name.parse::<ActorClass>().ok().map(Self::Morph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morph_named() {
        assert_eq!(Command::morph_named("spitter"), Some(Command::Morph(ActorClass::Spitter)));
        assert_eq!(Command::morph_named("wyvern"), None);
    }
}
