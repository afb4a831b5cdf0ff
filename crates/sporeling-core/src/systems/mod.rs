//! Systems - logic that operates on components

mod combat;
mod drain;
mod harvest;
mod morph;
mod movement;
mod wandering;

pub use combat::*;
pub use drain::*;
pub use harvest::*;
pub use morph::*;
pub use movement::*;
pub use wandering::*;
