//! Pairwise interaction table: what happens when one class touches another.

use crate::class::ActorClass;
use crate::economy::Currencies;

/// Outcome of `actor` making contact with `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    /// `actor` is able to destroy `target` at all.
    pub can_kill: bool,
    /// `target` is harmless and dies on contact with no fight.
    pub can_eat: bool,
    /// Paid to the player when `target` dies at `actor`'s hands.
    pub reward: Currencies,
}

/// What contact between two actors resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Nothing happens.
    Ignore,
    /// The first actor eats the second outright.
    Eat,
    /// Both enter a combat engagement.
    Fight,
}

pub fn interaction(actor: ActorClass, target: ActorClass) -> Interaction {
    if actor.is_lowest_tier() {
        return Interaction {
            can_kill: false,
            can_eat: false,
            reward: Currencies::ZERO,
        };
    }
    let reward = target.stats().kill_reward;
    if target.is_lowest_tier() {
        Interaction {
            can_kill: true,
            can_eat: true,
            reward,
        }
    } else {
        Interaction {
            can_kill: true,
            can_eat: false,
            reward,
        }
    }
}

/// Neither side is the lowest-tier spawn class.
pub fn should_fight(a: ActorClass, b: ActorClass) -> bool {
    !a.is_lowest_tier() && !b.is_lowest_tier()
}

/// Classify contact between `actor` and `target`.
pub fn classify_contact(actor: ActorClass, target: ActorClass) -> Contact {
    let rule = interaction(actor, target);
    if rule.can_eat && !should_fight(actor, target) {
        Contact::Eat
    } else if rule.can_kill && should_fight(actor, target) {
        Contact::Fight
    } else {
        Contact::Ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critters_are_eaten() {
        for class in ActorClass::ALL {
            let expected = if class.is_lowest_tier() {
                Contact::Ignore
            } else {
                Contact::Eat
            };
            assert_eq!(classify_contact(class, ActorClass::Critter), expected);
        }
    }

    #[test]
    fn test_critters_never_act() {
        for class in ActorClass::ALL {
            let rule = interaction(ActorClass::Critter, class);
            assert!(!rule.can_kill);
            assert!(!rule.can_eat);
            assert!(rule.reward.is_zero());
        }
    }

    #[test]
    fn test_fight_is_symmetric() {
        for a in ActorClass::ALL {
            for b in ActorClass::ALL {
                assert_eq!(should_fight(a, b), should_fight(b, a));
                if should_fight(a, b) {
                    assert_eq!(classify_contact(a, b), Contact::Fight);
                }
            }
        }
    }

    #[test]
    fn test_reward_matches_target_class() {
        let rule = interaction(ActorClass::Larva, ActorClass::Behemoth);
        assert_eq!(rule.reward, ActorClass::Behemoth.stats().kill_reward);
    }
}
