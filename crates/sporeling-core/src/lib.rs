//! Sporeling Core - Arena Creature Simulation Engine
//!
//! An ECS-based simulation of a top-down arena where the player grows by
//! eating, fighting and morphing between creature classes while AI creatures
//! wander and hunt.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: The player, AI creatures, obstacles, resource and hazard nodes, cocoons
//! - **Components**: Pure data attached to entities (Position, Actor, Wanderer, etc.)
//! - **Systems**: Logic that queries and updates components, run in a fixed order each tick
//!
//! Rules that need no world (damage, economy, interaction, win counting) live
//! in `sporeling-logic`; the systems here call into it.
//!
//! # Example
//!
//! ```rust,no_run
//! use sporeling_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new(BalanceConfig::default());
//! engine.start_level(LevelLayout::default());
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//!     for event in engine.drain_events() {
//!         println!("{event:?}");
//!     }
//!     if engine.is_game_over() {
//!         break;
//!     }
//! }
//! ```

pub mod commands;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod generation;
pub mod rng;
pub mod systems;
pub mod view;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::commands::{CameraCommand, Command};
    pub use crate::components::*;
    pub use crate::config::BalanceConfig;
    pub use crate::engine::SimulationEngine;
    pub use crate::events::{GameEvent, GameEventListener};
    pub use crate::generation::LevelLayout;
    pub use sporeling_logic::class::ActorClass;
    pub use sporeling_logic::economy::{Currencies, UpgradeKind};
    pub use sporeling_logic::movement::MoveFlags;
}
