//! Wandering system - picks headings for AI creatures
//!
//! A creature within its aggression radius of the player turns toward them
//! every tick. Otherwise it keeps its wander heading until a class-dependent
//! random timer runs out, then rolls a new one.

use hecs::World;
use sporeling_logic::geometry::Vec2;
use sporeling_logic::movement::steer_toward;

use crate::components::{Actor, Player, Position, Wanderer};
use crate::rng::GameRng;

/// Update headings of every AI creature that is free to move.
pub fn wandering_system(world: &mut World, rng: &mut GameRng, delta_seconds: f32) {
    let player_at: Option<Vec2> = world
        .query::<(&Actor, &Position, &Player)>()
        .iter()
        .next()
        .map(|(_, (_, pos, _))| pos.0);

    for (_, (actor, pos, wander)) in world.query_mut::<(&Actor, &Position, &mut Wanderer)>() {
        if actor.in_combat {
            continue;
        }
        let stats = actor.class.stats();

        let in_reach = player_at.filter(|target| {
            stats.aggression_radius > 0.0
                && pos.0.distance(target) <= stats.aggression_radius
        });
        if let Some(target) = in_reach {
            wander.heading = steer_toward(pos.0, target).unwrap_or_else(|| rng.heading());
            wander.seeking = true;
            continue;
        }

        wander.retarget_in -= delta_seconds;
        if wander.seeking || wander.retarget_in <= 0.0 {
            let (min, max) = stats.wander_interval;
            wander.heading = rng.heading();
            wander.retarget_in = rng.range(min, max);
            wander.seeking = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sporeling_logic::class::ActorClass;

    #[test]
    fn test_seeks_player_in_range() {
        let mut world = World::new();
        let mut rng = GameRng::from_seed(1);
        world.spawn((Actor::new(ActorClass::Larva, 1.0), Position::new(10.0, 10.0), Player));
        let raptor = world.spawn((
            Actor::new(ActorClass::Raptor, 1.0),
            Position::new(15.0, 10.0),
            Wanderer::new(Vec2::new(0.0, 1.0), 3.0),
        ));

        wandering_system(&mut world, &mut rng, 0.1);

        let wander = world.get::<&Wanderer>(raptor).unwrap();
        assert!(wander.seeking);
        assert!((wander.heading.x + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_rerolls_when_timer_expires() {
        let mut world = World::new();
        let mut rng = GameRng::from_seed(2);
        let critter = world.spawn((
            Actor::new(ActorClass::Critter, 1.0),
            Position::new(50.0, 50.0),
            Wanderer::new(Vec2::new(1.0, 0.0), 0.05),
        ));

        wandering_system(&mut world, &mut rng, 0.1);

        let wander = world.get::<&Wanderer>(critter).unwrap();
        let (min, max) = ActorClass::Critter.stats().wander_interval;
        assert!(wander.retarget_in >= min && wander.retarget_in <= max);
        assert!((wander.heading.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_critters_ignore_player() {
        let mut world = World::new();
        let mut rng = GameRng::from_seed(3);
        world.spawn((Actor::new(ActorClass::Larva, 1.0), Position::new(0.0, 0.0), Player));
        let critter = world.spawn((
            Actor::new(ActorClass::Critter, 1.0),
            Position::new(1.0, 0.0),
            Wanderer::new(Vec2::new(0.0, 1.0), 4.0),
        ));

        wandering_system(&mut world, &mut rng, 0.1);

        let wander = world.get::<&Wanderer>(critter).unwrap();
        assert!(!wander.seeking);
        assert_eq!(wander.heading, Vec2::new(0.0, 1.0));
    }
}
