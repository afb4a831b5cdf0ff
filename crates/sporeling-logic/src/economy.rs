//! Pure economy logic: currencies, upgrade cost curves and purchases.
//!
//! Every purchase is atomic. It either applies its full effect and debits
//! its full price, or returns an error and leaves the economy untouched.

use serde::{Deserialize, Serialize};

/// The three currencies held by the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currencies {
    /// Primary currency. Harvested from nodes and kills; buys health.
    pub biomass: u32,
    /// Secondary currency. Extracted from hazard vents.
    pub gas: u32,
    /// Tertiary currency. Rare; buys shields.
    pub essence: u32,
}

impl Currencies {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(biomass: u32, gas: u32, essence: u32) -> Self {
        Self {
            biomass,
            gas,
            essence,
        }
    }

    pub fn covers(&self, cost: &Currencies) -> bool {
        self.biomass >= cost.biomass && self.gas >= cost.gas && self.essence >= cost.essence
    }

    /// Debit `cost` in full, or fail without touching the balance.
    pub fn try_spend(&mut self, cost: &Currencies) -> Result<(), PurchaseError> {
        if !self.covers(cost) {
            return Err(PurchaseError::InsufficientFunds {
                needed: *cost,
                available: *self,
            });
        }
        self.biomass -= cost.biomass;
        self.gas -= cost.gas;
        self.essence -= cost.essence;
        Ok(())
    }

    pub fn credit(&mut self, amount: &Currencies) {
        self.biomass = self.biomass.saturating_add(amount.biomass);
        self.gas = self.gas.saturating_add(amount.gas);
        self.essence = self.essence.saturating_add(amount.essence);
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Each currency multiplied and rounded to the nearest unit.
    pub fn scaled(&self, factor: f32) -> Self {
        let scale = |v: u32| ((v as f32) * factor.max(0.0)).round() as u32;
        Self {
            biomass: scale(self.biomass),
            gas: scale(self.gas),
            essence: scale(self.essence),
        }
    }
}

impl std::ops::Add for Currencies {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let mut sum = self;
        sum.credit(&other);
        sum
    }
}

/// Reasons a purchase was refused. The engine treats all of them as no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    #[error("insufficient funds: need {needed:?}, have {available:?}")]
    InsufficientFunds {
        needed: Currencies,
        available: Currencies,
    },
    #[error("nothing to restore")]
    NothingToRestore,
}

/// Which stat an upgrade raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    Attack,
    Armor,
}

/// Linear cost curve paid in biomass and gas together:
/// `cost(level) = base + level * step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeCost {
    pub base_biomass: u32,
    pub base_gas: u32,
    pub step_biomass: u32,
    pub step_gas: u32,
}

impl UpgradeCost {
    pub fn at_level(&self, level: u32) -> Currencies {
        Currencies::new(
            self.base_biomass
                .saturating_add(level.saturating_mul(self.step_biomass)),
            self.base_gas.saturating_add(level.saturating_mul(self.step_gas)),
            0,
        )
    }
}

impl Default for UpgradeCost {
    fn default() -> Self {
        Self {
            base_biomass: 50,
            base_gas: 50,
            step_biomass: 25,
            step_gas: 25,
        }
    }
}

/// Currencies and upgrade levels owned by the player session.
/// Survives morphs unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEconomy {
    pub wallet: Currencies,
    pub attack_level: u32,
    pub armor_level: u32,
}

impl PlayerEconomy {
    pub fn new(wallet: Currencies) -> Self {
        Self {
            wallet,
            attack_level: 0,
            armor_level: 0,
        }
    }

    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Attack => self.attack_level,
            UpgradeKind::Armor => self.armor_level,
        }
    }

    /// Damage bonus granted by attack upgrades.
    pub fn damage_bonus(&self) -> i32 {
        self.attack_level as i32
    }

    /// Armor bonus granted by armor upgrades.
    pub fn armor_bonus(&self) -> i32 {
        self.armor_level as i32
    }

    /// Buy one level of `kind`. Returns the new level.
    pub fn purchase_upgrade(
        &mut self,
        kind: UpgradeKind,
        curve: &UpgradeCost,
    ) -> Result<u32, PurchaseError> {
        let cost = curve.at_level(self.level(kind));
        self.wallet.try_spend(&cost)?;
        let level = match kind {
            UpgradeKind::Attack => &mut self.attack_level,
            UpgradeKind::Armor => &mut self.armor_level,
        };
        *level += 1;
        Ok(*level)
    }

    /// Buy health at `price_per_hp` biomass each, up to `missing_hp`.
    /// Returns the number of HP paid for.
    pub fn purchase_heal(
        &mut self,
        missing_hp: i32,
        price_per_hp: u32,
    ) -> Result<i32, PurchaseError> {
        if missing_hp <= 0 {
            return Err(PurchaseError::NothingToRestore);
        }
        let price = price_per_hp.max(1);
        let affordable = self.wallet.biomass / price;
        let amount = (missing_hp as u32).min(affordable);
        if amount == 0 {
            return Err(PurchaseError::InsufficientFunds {
                needed: Currencies::new(price, 0, 0),
                available: self.wallet,
            });
        }
        self.wallet.try_spend(&Currencies::new(amount * price, 0, 0))?;
        Ok(amount as i32)
    }

    /// Buy a shield charge for `cost` essence. Returns the shield granted.
    pub fn purchase_shield(&mut self, cost: u32, amount: i32) -> Result<i32, PurchaseError> {
        self.wallet.try_spend(&Currencies::new(0, 0, cost))?;
        Ok(amount.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_curve() -> UpgradeCost {
        UpgradeCost {
            base_biomass: 50,
            base_gas: 50,
            step_biomass: 10,
            step_gas: 5,
        }
    }

    #[test]
    fn test_cost_curve() {
        let curve = flat_curve();
        assert_eq!(curve.at_level(0), Currencies::new(50, 50, 0));
        assert_eq!(curve.at_level(3), Currencies::new(80, 65, 0));
    }

    #[test]
    fn test_try_spend_is_all_or_nothing() {
        let mut wallet = Currencies::new(10, 5, 0);
        let err = wallet.try_spend(&Currencies::new(5, 6, 0));
        assert!(matches!(err, Err(PurchaseError::InsufficientFunds { .. })));
        assert_eq!(wallet, Currencies::new(10, 5, 0));
        wallet.try_spend(&Currencies::new(5, 5, 0)).unwrap();
        assert_eq!(wallet, Currencies::new(5, 0, 0));
    }

    #[test]
    fn test_upgrade_increments_level_once() {
        let mut econ = PlayerEconomy::new(Currencies::new(200, 200, 0));
        assert_eq!(econ.purchase_upgrade(UpgradeKind::Armor, &flat_curve()), Ok(1));
        assert_eq!(econ.purchase_upgrade(UpgradeKind::Armor, &flat_curve()), Ok(2));
        assert_eq!(econ.armor_level, 2);
        assert_eq!(econ.attack_level, 0);
        assert_eq!(econ.wallet, Currencies::new(200 - 50 - 60, 200 - 50 - 55, 0));
        assert_eq!(econ.armor_bonus(), 2);
    }

    #[test]
    fn test_heal_caps_at_missing_hp() {
        let mut econ = PlayerEconomy::new(Currencies::new(100, 0, 0));
        assert_eq!(econ.purchase_heal(30, 1), Ok(30));
        assert_eq!(econ.wallet.biomass, 70);
        assert_eq!(econ.purchase_heal(0, 1), Err(PurchaseError::NothingToRestore));
    }

    #[test]
    fn test_heal_limited_by_balance() {
        let mut econ = PlayerEconomy::new(Currencies::new(12, 0, 0));
        assert_eq!(econ.purchase_heal(30, 1), Ok(12));
        assert_eq!(econ.wallet.biomass, 0);
        assert!(econ.purchase_heal(18, 1).is_err());
    }

    #[test]
    fn test_shield_purchase() {
        let mut econ = PlayerEconomy::new(Currencies::new(0, 0, 1));
        assert_eq!(econ.purchase_shield(1, 25), Ok(25));
        assert!(econ.purchase_shield(1, 25).is_err());
        assert_eq!(econ.wallet.essence, 0);
    }

    #[test]
    fn test_scaled_rewards() {
        let reward = Currencies::new(10, 3, 1);
        assert_eq!(reward.scaled(1.5), Currencies::new(15, 5, 2));
        assert_eq!(reward + reward, Currencies::new(20, 6, 2));
    }
}
