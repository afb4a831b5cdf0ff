//! Environmental drain - hazard vents trade the player's HP for gas
//!
//! While the player overlaps a vent, its `DrainTimer` accumulates. Each full
//! interval deals the configured damage through the shield/armor pipeline and
//! credits gas. Stepping off every vent resets the timer to zero, so partial
//! intervals never carry over.

use hecs::{Entity, World};
use sporeling_logic::economy::{Currencies, PlayerEconomy};
use sporeling_logic::geometry::{circles_overlap, Vec2};
use tracing::{debug, info};

use crate::components::{Actor, DrainTimer, HazardNode, Player, Position};
use crate::config::DrainConfig;
use crate::events::{EventQueue, GameEvent};
use crate::systems::combat::{end_engagement, EngagementTable};

fn in_any_vent(world: &World, at: Vec2, radius: f32) -> bool {
    world
        .query::<(&HazardNode, &Position)>()
        .iter()
        .any(|(_, (vent, pos))| circles_overlap(at, radius, pos.0, vent.radius))
}

/// Advance the drain timer of the player. Returns true if the drain killed them.
pub fn drain_system(
    world: &mut World,
    engagements: &mut EngagementTable,
    economy: &mut PlayerEconomy,
    events: &mut EventQueue,
    config: &DrainConfig,
    delta_seconds: f32,
) -> bool {
    if !(config.interval_seconds > 0.0) {
        return false;
    }
    let Some((player, at, radius)) = world
        .query::<(&Actor, &Position, &Player)>()
        .iter()
        .next()
        .map(|(entity, (actor, pos, _))| (entity, pos.0, actor.radius))
    else {
        return false;
    };

    if !in_any_vent(world, at, radius) {
        if let Ok(mut timer) = world.get::<&mut DrainTimer>(player) {
            timer.0 = 0.0;
        }
        return false;
    }

    let ticks = {
        let Ok(mut timer) = world.get::<&mut DrainTimer>(player) else {
            return false;
        };
        timer.0 += delta_seconds;
        let mut ticks = 0;
        while timer.0 >= config.interval_seconds {
            timer.0 -= config.interval_seconds;
            ticks += 1;
        }
        ticks
    };

    for _ in 0..ticks {
        if apply_drain_tick(world, engagements, economy, events, config, player) {
            return true;
        }
    }
    false
}

fn apply_drain_tick(
    world: &mut World,
    engagements: &mut EngagementTable,
    economy: &mut PlayerEconomy,
    events: &mut EventQueue,
    config: &DrainConfig,
    player: Entity,
) -> bool {
    let outcome = {
        let Ok(mut actor) = world.get::<&mut Actor>(player) else {
            return false;
        };
        let armor = actor.total_armor();
        actor.vitals.apply_damage(config.damage, armor)
    };

    economy.wallet.credit(&Currencies::new(0, config.gas_per_tick, 0));
    debug!(damage = outcome.hp_lost, gas = config.gas_per_tick, "drain tick");
    events.emit(GameEvent::DrainTick {
        damage: outcome.hp_lost,
        gas: config.gas_per_tick,
    });

    if outcome.killed {
        info!("player drained to death");
        end_engagement(world, engagements, events, player);
        let _ = world.despawn(player);
        events.emit(GameEvent::PlayerDied);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use sporeling_logic::class::ActorClass;

    fn config() -> DrainConfig {
        DrainConfig {
            interval_seconds: 1.0,
            damage: 3,
            gas_per_tick: 4,
        }
    }

    fn setup(player_x: f32) -> (World, Entity) {
        let mut world = World::new();
        world.spawn((HazardNode { radius: 2.0 }, Position::new(0.0, 0.0)));
        let player = world.spawn((
            Actor::new(ActorClass::Larva, 1.0),
            Position::new(player_x, 0.0),
            Player,
            DrainTimer::default(),
        ));
        (world, player)
    }

    #[test]
    fn test_drain_ticks_once_per_interval() {
        let (mut world, player) = setup(0.5);
        let mut table = EngagementTable::new(4);
        let mut econ = PlayerEconomy::default();
        let mut events = EventQueue::new();
        let start_hp = world.get::<&Actor>(player).unwrap().vitals.current_hp;

        for _ in 0..9 {
            drain_system(&mut world, &mut table, &mut econ, &mut events, &config(), 0.1);
        }
        assert_eq!(econ.wallet.gas, 0);

        drain_system(&mut world, &mut table, &mut econ, &mut events, &config(), 0.15);
        assert_eq!(econ.wallet.gas, 4);
        let hp = world.get::<&Actor>(player).unwrap().vitals.current_hp;
        assert_eq!(hp, start_hp - 3);
    }

    #[test]
    fn test_leaving_resets_timer() {
        let (mut world, player) = setup(0.5);
        let mut table = EngagementTable::new(4);
        let mut econ = PlayerEconomy::default();
        let mut events = EventQueue::new();

        drain_system(&mut world, &mut table, &mut econ, &mut events, &config(), 0.9);
        world.get::<&mut Position>(player).unwrap().0 = Vec2::new(20.0, 0.0);
        drain_system(&mut world, &mut table, &mut econ, &mut events, &config(), 0.05);
        assert_eq!(world.get::<&DrainTimer>(player).unwrap().0, 0.0);

        world.get::<&mut Position>(player).unwrap().0 = Vec2::new(0.5, 0.0);
        drain_system(&mut world, &mut table, &mut econ, &mut events, &config(), 0.5);
        assert_eq!(econ.wallet.gas, 0);
    }

    #[test]
    fn test_shield_soaks_drain() {
        let (mut world, player) = setup(0.0);
        let mut table = EngagementTable::new(4);
        let mut econ = PlayerEconomy::default();
        let mut events = EventQueue::new();
        world.get::<&mut Actor>(player).unwrap().vitals.shield = 10;
        let start_hp = world.get::<&Actor>(player).unwrap().vitals.current_hp;

        drain_system(&mut world, &mut table, &mut econ, &mut events, &config(), 1.0);

        let actor = world.get::<&Actor>(player).unwrap();
        assert_eq!(actor.vitals.shield, 7);
        assert_eq!(actor.vitals.current_hp, start_hp);
        assert_eq!(econ.wallet.gas, 4);
    }

    #[test]
    fn test_lethal_drain() {
        let (mut world, player) = setup(0.0);
        let mut table = EngagementTable::new(4);
        let mut econ = PlayerEconomy::default();
        let mut events = EventQueue::new();
        world.get::<&mut Actor>(player).unwrap().vitals.current_hp = 2;

        let died = drain_system(&mut world, &mut table, &mut econ, &mut events, &config(), 1.0);

        assert!(died);
        assert!(!world.contains(player));
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerDied)));
    }

    #[test]
    fn test_non_positive_interval_never_drains() {
        let (mut world, player) = setup(0.0);
        let mut table = EngagementTable::new(4);
        let mut econ = PlayerEconomy::default();
        let mut events = EventQueue::new();
        let start_hp = world.get::<&Actor>(player).unwrap().vitals.current_hp;

        for interval in [0.0, -1.0, f32::NAN] {
            let config = DrainConfig {
                interval_seconds: interval,
                ..config()
            };
            let died = drain_system(&mut world, &mut table, &mut econ, &mut events, &config, 0.5);
            assert!(!died);
        }

        assert_eq!(econ.wallet.gas, 0);
        assert_eq!(world.get::<&Actor>(player).unwrap().vitals.current_hp, start_hp);
        assert!(events.is_empty());
    }
}
