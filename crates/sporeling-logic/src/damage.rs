//! Shield- and armor-aware damage pipeline.
//!
//! Positive damage is soaked by the shield pool first, then the remainder is
//! reduced by armor with a floor of one point. Negative damage is healing: it
//! skips shield and armor and never raises HP above the maximum.

use serde::{Deserialize, Serialize};

/// Health and shield pools of one actor.
///
/// Invariant: `0 <= current_hp <= max_hp` and `shield >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub max_hp: i32,
    pub current_hp: i32,
    pub shield: i32,
}

/// What a single application of damage did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Points soaked by the shield.
    pub shield_absorbed: i32,
    /// HP removed (0 for healing).
    pub hp_lost: i32,
    /// HP restored (0 for damage).
    pub healed: i32,
    /// HP reached zero as a result of this hit.
    pub killed: bool,
}

impl Vitals {
    pub fn full(max_hp: i32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            max_hp,
            current_hp: max_hp,
            shield: 0,
        }
    }

    pub fn missing_hp(&self) -> i32 {
        self.max_hp - self.current_hp
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0
    }

    pub fn add_shield(&mut self, amount: i32) {
        self.shield = self.shield.saturating_add(amount.max(0));
    }

    /// Apply `raw` damage against `armor` (base plus bonus).
    pub fn apply_damage(&mut self, raw: i32, armor: i32) -> DamageOutcome {
        if raw < 0 {
            let healed = raw.saturating_neg().min(self.missing_hp()).max(0);
            self.current_hp += healed;
            return DamageOutcome {
                healed,
                ..DamageOutcome::default()
            };
        }
        if raw == 0 || self.is_dead() {
            return DamageOutcome::default();
        }

        let shield_absorbed = raw.min(self.shield);
        self.shield -= shield_absorbed;
        let remainder = raw - shield_absorbed;
        if remainder == 0 {
            return DamageOutcome {
                shield_absorbed,
                ..DamageOutcome::default()
            };
        }

        let reduced = (remainder - armor.max(0)).max(1);
        let hp_lost = reduced.min(self.current_hp);
        self.current_hp -= hp_lost;
        DamageOutcome {
            shield_absorbed,
            hp_lost,
            healed: 0,
            killed: self.current_hp == 0,
        }
    }

    /// Restore up to `amount` HP.
    pub fn heal(&mut self, amount: i32) -> i32 {
        self.apply_damage(-amount.max(0), 0).healed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals(max_hp: i32, current_hp: i32, shield: i32) -> Vitals {
        Vitals {
            max_hp,
            current_hp,
            shield,
        }
    }

    #[test]
    fn test_shield_then_armor() {
        let mut v = vitals(100, 100, 10);
        let out = v.apply_damage(30, 5);
        assert_eq!(out.shield_absorbed, 10);
        assert_eq!(out.hp_lost, 15);
        assert_eq!(v.shield, 0);
        assert_eq!(v.current_hp, 85);
    }

    #[test]
    fn test_armor_floor_of_one() {
        let mut v = vitals(50, 50, 0);
        let out = v.apply_damage(3, 10);
        assert_eq!(out.hp_lost, 1);
        assert_eq!(v.current_hp, 49);
    }

    #[test]
    fn test_fully_absorbed_hit_costs_no_hp() {
        let mut v = vitals(50, 50, 20);
        let out = v.apply_damage(12, 0);
        assert_eq!(out.hp_lost, 0);
        assert_eq!(v.shield, 8);
        assert_eq!(v.current_hp, 50);
    }

    #[test]
    fn test_healing_clamped_to_max() {
        let mut v = vitals(40, 10, 5);
        let out = v.apply_damage(-50, 3);
        assert_eq!(out.healed, 30);
        assert_eq!(v.current_hp, 40);
        assert_eq!(v.shield, 5);
    }

    #[test]
    fn test_lethal_hit_stops_at_zero() {
        let mut v = vitals(20, 4, 0);
        let out = v.apply_damage(50, 0);
        assert!(out.killed);
        assert_eq!(out.hp_lost, 4);
        assert_eq!(v.current_hp, 0);

        // Already dead: nothing further happens.
        assert_eq!(v.apply_damage(5, 0), DamageOutcome::default());
    }

    #[test]
    fn test_heal_helper() {
        let mut v = vitals(30, 25, 0);
        assert_eq!(v.heal(10), 5);
        assert_eq!(v.heal(-3), 0);
        assert_eq!(v.current_hp, 30);
    }
}
