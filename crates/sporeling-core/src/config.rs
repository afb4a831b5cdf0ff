//! Balance configuration for the simulation.
//!
//! Every field has a default, so a config file only needs to list the values
//! it overrides:
//!
//! ```json
//! {
//!   "morph_duration_seconds": 5.0,
//!   "drain": { "interval_seconds": 1.0, "damage": 3, "gas_per_tick": 4 },
//!   "seed": 42
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sporeling_logic::class::ActorClass;
use sporeling_logic::economy::{Currencies, UpgradeCost};

use crate::error::ConfigError;

/// Environmental drain tuning.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DrainConfig {
    pub interval_seconds: f32,
    /// Raw damage per interval, routed through shield and armor.
    pub damage: i32,
    pub gas_per_tick: u32,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 1.0,
            damage: 3,
            gas_per_tick: 4,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BalanceConfig {
    /// Scales the player's class speed.
    pub player_speed_multiplier: f32,
    /// Actors are kept this far inside the arena edges.
    pub boundary_inset: f32,
    /// Extra separation beyond touching before an engagement breaks.
    pub disengage_margin: f32,
    /// Upper bound on a single tick's delta.
    pub max_step_seconds: f32,
    pub max_engagements: usize,
    /// Size of the random nudge applied when an AI bounces off an obstacle.
    pub obstacle_perturbation: f32,
    pub starting_currencies: Currencies,
    pub attack_upgrade: UpgradeCost,
    pub armor_upgrade: UpgradeCost,
    /// Biomass per HP restored.
    pub heal_price_per_hp: u32,
    /// Essence per shield purchase.
    pub shield_cost: u32,
    pub shield_amount: i32,
    pub drain: DrainConfig,
    pub morph_duration_seconds: f32,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            player_speed_multiplier: 1.0,
            boundary_inset: 1.0,
            disengage_margin: 1.5,
            max_step_seconds: 0.1,
            max_engagements: 32,
            obstacle_perturbation: 0.5,
            starting_currencies: Currencies::new(50, 0, 0),
            attack_upgrade: UpgradeCost::default(),
            armor_upgrade: UpgradeCost::default(),
            heal_price_per_hp: 1,
            shield_cost: 1,
            shield_amount: 25,
            drain: DrainConfig::default(),
            morph_duration_seconds: 5.0,
            seed: None,
        }
    }
}

impl BalanceConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_step_seconds", self.max_step_seconds),
            ("drain.interval_seconds", self.drain.interval_seconds),
            ("morph_duration_seconds", self.morph_duration_seconds),
            ("player_speed_multiplier", self.player_speed_multiplier),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.boundary_inset < 0.0 || self.disengage_margin < 0.0 {
            return Err(ConfigError::Invalid(
                "boundary_inset and disengage_margin must not be negative".into(),
            ));
        }
        if self.max_engagements == 0 {
            return Err(ConfigError::Invalid("max_engagements must be at least 1".into()));
        }
        if self.shield_amount < 0 {
            return Err(ConfigError::Invalid("shield_amount must not be negative".into()));
        }
        Ok(())
    }

    /// Largest distance any actor can cover in one tick.
    pub fn max_step_distance(&self) -> f32 {
        let speed = ActorClass::max_speed() * self.player_speed_multiplier.max(1.0);
        speed * self.max_step_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BalanceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "seed": 9, "drain": { "damage": 7 } }"#;
        let config = BalanceConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.drain.damage, 7);
        assert_eq!(config.drain.interval_seconds, 1.0);
        assert_eq!(config.shield_amount, 25);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = BalanceConfig::from_json_str(r#"{ "drain": { "interval_seconds": 0.0 } }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            BalanceConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = BalanceConfig::load("/definitely/not/here.json");
        assert!(matches!(err, Err(ConfigError::Io { .. })));
    }
}
