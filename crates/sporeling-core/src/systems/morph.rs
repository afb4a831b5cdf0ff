//! Morph controller - swaps the player's body for another class
//!
//! `begin` validates and pays for the morph, ends any engagement, and
//! replaces the player with an inert cocoon. `update` counts the cocoon down
//! and hatches a fresh body of the target class in its place. The economy is
//! never touched by the swap itself, so currencies and upgrade levels carry
//! across unchanged.

use hecs::{Entity, World};
use sporeling_logic::class::ActorClass;
use sporeling_logic::economy::PlayerEconomy;
use tracing::{debug, info};

use crate::components::{Actor, Cocoon, DrainTimer, Facing, Player, Position};
use crate::error::MorphError;
use crate::events::{EventQueue, GameEvent};
use crate::systems::combat::{end_engagement, EngagementTable};

/// An accepted morph awaiting completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphRequest {
    pub from: ActorClass,
    pub target: ActorClass,
    pub elapsed: f32,
    pub duration: f32,
    /// Shield points the old body had; the new body keeps them.
    pub carried_shield: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MorphState {
    #[default]
    Stable,
    Morphing { cocoon: Entity, request: MorphRequest },
}

#[derive(Debug, Clone)]
pub struct MorphController {
    state: MorphState,
    duration: f32,
}

impl MorphController {
    pub fn new(duration_seconds: f32) -> Self {
        Self {
            state: MorphState::Stable,
            duration: duration_seconds,
        }
    }

    pub fn state(&self) -> &MorphState {
        &self.state
    }

    pub fn is_morphing(&self) -> bool {
        matches!(self.state, MorphState::Morphing { .. })
    }

    pub fn cocoon(&self) -> Option<Entity> {
        match self.state {
            MorphState::Morphing { cocoon, .. } => Some(cocoon),
            MorphState::Stable => None,
        }
    }

    /// Fraction of the cocoon time elapsed, while morphing.
    pub fn progress(&self) -> Option<f32> {
        match self.state {
            MorphState::Morphing { request, .. } => {
                Some((request.elapsed / request.duration).clamp(0.0, 1.0))
            }
            MorphState::Stable => None,
        }
    }

    /// Drop any in-flight morph. Used by level teardown.
    pub fn reset(&mut self) {
        self.state = MorphState::Stable;
    }

    /// Start morphing the player into `target`. Returns the cocoon entity.
    ///
    /// Rejected requests change nothing: no currency is spent and the
    /// player keeps its body.
    pub fn begin(
        &mut self,
        world: &mut World,
        engagements: &mut EngagementTable,
        economy: &mut PlayerEconomy,
        events: &mut EventQueue,
        target: ActorClass,
    ) -> Result<Entity, MorphError> {
        if self.is_morphing() {
            return Err(MorphError::AlreadyMorphing);
        }
        if !target.is_morph_target() {
            return Err(MorphError::NotMorphable(target));
        }
        let (player, actor, position, facing) = world
            .query::<(&Actor, &Position, &Facing, &Player)>()
            .iter()
            .next()
            .map(|(entity, (actor, pos, facing, _))| (entity, *actor, *pos, *facing))
            .ok_or(MorphError::NoPlayer)?;
        if actor.class == target {
            return Err(MorphError::SameClass(target));
        }
        economy.wallet.try_spend(&target.stats().morph_cost)?;

        end_engagement(world, engagements, events, player);
        let _ = world.despawn(player);
        let cocoon = world.spawn((position, facing, Cocoon { target }));

        self.state = MorphState::Morphing {
            cocoon,
            request: MorphRequest {
                from: actor.class,
                target,
                elapsed: 0.0,
                duration: self.duration,
                carried_shield: actor.vitals.shield,
            },
        };
        info!(from = %actor.class, to = %target, "morph started");
        events.emit(GameEvent::MorphStarted {
            from: actor.class,
            to: target,
            cocoon,
        });
        Ok(cocoon)
    }

    /// Advance the cocoon. Returns the new player entity when it hatches.
    pub fn update(
        &mut self,
        world: &mut World,
        economy: &PlayerEconomy,
        events: &mut EventQueue,
        delta_seconds: f32,
    ) -> Option<Entity> {
        let MorphState::Morphing { cocoon, mut request } = self.state else {
            return None;
        };
        request.elapsed += delta_seconds;
        if request.elapsed < request.duration {
            self.state = MorphState::Morphing { cocoon, request };
            return None;
        }

        let position = world.get::<&Position>(cocoon).map(|p| *p).ok();
        let facing = world.get::<&Facing>(cocoon).map(|f| *f).unwrap_or_default();
        let _ = world.despawn(cocoon);
        self.state = MorphState::Stable;

        let Some(position) = position else {
            debug!("cocoon vanished before hatching");
            return None;
        };

        let mut actor = Actor::new(request.target, 1.0)
            .with_bonuses(economy.damage_bonus(), economy.armor_bonus());
        actor.vitals.add_shield(request.carried_shield);
        let entity = world.spawn((actor, position, facing, Player, DrainTimer::default()));

        info!(class = %request.target, "morph completed");
        events.emit(GameEvent::MorphCompleted {
            class: request.target,
            entity,
        });
        Some(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sporeling_logic::economy::Currencies;

    fn setup(wallet: Currencies) -> (World, Entity, PlayerEconomy) {
        let mut world = World::new();
        let player = world.spawn((
            Actor::new(ActorClass::Larva, 1.0),
            Position::new(10.0, 10.0),
            Facing(0.0),
            Player,
            DrainTimer::default(),
        ));
        (world, player, PlayerEconomy::new(wallet))
    }

    #[test]
    fn test_full_morph_cycle() {
        let (mut world, player, mut econ) = setup(Currencies::new(200, 50, 3));
        econ.attack_level = 2;
        econ.armor_level = 1;
        let mut table = EngagementTable::new(4);
        let mut events = EventQueue::new();
        let mut morph = MorphController::new(5.0);

        let cocoon = morph
            .begin(&mut world, &mut table, &mut econ, &mut events, ActorClass::Raptor)
            .unwrap();
        assert!(!world.contains(player));
        assert!(world.get::<&Actor>(cocoon).is_err());
        assert_eq!(econ.wallet, Currencies::new(100, 25, 3));

        assert!(morph.update(&mut world, &econ, &mut events, 4.9).is_none());
        let hatched = morph.update(&mut world, &econ, &mut events, 0.2).unwrap();

        assert!(!world.contains(cocoon));
        let actor = world.get::<&Actor>(hatched).unwrap();
        assert_eq!(actor.class, ActorClass::Raptor);
        assert_eq!(actor.damage_bonus, 2);
        assert_eq!(actor.armor_bonus, 1);
        assert_eq!(world.get::<&Position>(hatched).unwrap().0.x, 10.0);
        assert_eq!(econ.attack_level, 2);
        assert!(!morph.is_morphing());
    }

    #[test]
    fn test_insufficient_funds_rejected() {
        let (mut world, player, mut econ) = setup(Currencies::new(10, 0, 0));
        let mut table = EngagementTable::new(4);
        let mut events = EventQueue::new();
        let mut morph = MorphController::new(5.0);

        let err = morph.begin(&mut world, &mut table, &mut econ, &mut events, ActorClass::Behemoth);

        assert!(matches!(err, Err(MorphError::Purchase(_))));
        assert!(world.contains(player));
        assert_eq!(econ.wallet, Currencies::new(10, 0, 0));
        assert!(events.is_empty());
    }

    #[test]
    fn test_rejects_same_class_and_critter() {
        let (mut world, _, mut econ) = setup(Currencies::new(1000, 1000, 10));
        let mut table = EngagementTable::new(4);
        let mut events = EventQueue::new();
        let mut morph = MorphController::new(5.0);

        assert_eq!(
            morph.begin(&mut world, &mut table, &mut econ, &mut events, ActorClass::Larva),
            Err(MorphError::SameClass(ActorClass::Larva))
        );
        assert_eq!(
            morph.begin(&mut world, &mut table, &mut econ, &mut events, ActorClass::Critter),
            Err(MorphError::NotMorphable(ActorClass::Critter))
        );
        assert_eq!(econ.wallet, Currencies::new(1000, 1000, 10));
    }

    #[test]
    fn test_second_request_while_morphing() {
        let (mut world, _, mut econ) = setup(Currencies::new(1000, 1000, 10));
        let mut table = EngagementTable::new(4);
        let mut events = EventQueue::new();
        let mut morph = MorphController::new(5.0);

        morph
            .begin(&mut world, &mut table, &mut econ, &mut events, ActorClass::Drone)
            .unwrap();
        let wallet = econ.wallet;
        assert_eq!(
            morph.begin(&mut world, &mut table, &mut econ, &mut events, ActorClass::Raptor),
            Err(MorphError::AlreadyMorphing)
        );
        assert_eq!(econ.wallet, wallet);
    }

    #[test]
    fn test_shield_carries_over() {
        let (mut world, player, mut econ) = setup(Currencies::new(100, 0, 0));
        world.get::<&mut Actor>(player).unwrap().vitals.shield = 25;
        let mut table = EngagementTable::new(4);
        let mut events = EventQueue::new();
        let mut morph = MorphController::new(1.0);

        morph
            .begin(&mut world, &mut table, &mut econ, &mut events, ActorClass::Drone)
            .unwrap();
        let hatched = morph.update(&mut world, &econ, &mut events, 1.0).unwrap();

        assert_eq!(world.get::<&Actor>(hatched).unwrap().vitals.shield, 25);
    }
}
