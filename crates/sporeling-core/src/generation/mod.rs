//! Generation - populating a level from its layout

mod level;

pub use level::*;
