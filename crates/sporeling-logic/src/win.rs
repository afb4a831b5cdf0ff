//! Victory condition: defeat enough notable creatures.

use serde::{Deserialize, Serialize};

/// A kill counts toward victory when the target was oversized.
pub fn is_notable(size_multiplier: f32) -> bool {
    size_multiplier > 1.0
}

/// Counts notable kills and fires victory exactly once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTracker {
    pub counter: u32,
    pub target: u32,
    fired: bool,
}

impl WinTracker {
    pub fn new(target: u32) -> Self {
        Self {
            counter: 0,
            target,
            fired: false,
        }
    }

    /// Record a kill. Returns `true` only on the kill that first reaches
    /// the target.
    pub fn record_kill(&mut self, size_multiplier: f32) -> bool {
        if !is_notable(size_multiplier) {
            return false;
        }
        self.counter = self.counter.saturating_add(1);
        if !self.fired && self.counter >= self.target {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn has_won(&self) -> bool {
        self.fired
    }
}
