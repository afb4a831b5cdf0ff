//! Movement system - commits one step of movement for every free actor

use hecs::World;
use sporeling_logic::geometry::{ArenaBounds, Vec2};
use sporeling_logic::movement::{step_player, step_wanderer, CircleObstacle, MoveFlags, Terrain};

use crate::components::{Actor, Facing, Obstacle, Player, Position, Wanderer};
use crate::rng::GameRng;

/// Per-tick movement inputs.
#[derive(Debug, Clone, Copy)]
pub struct MovementParams {
    pub input: MoveFlags,
    pub player_speed_multiplier: f32,
    pub boundary_inset: f32,
    pub obstacle_perturbation: f32,
}

/// Gather every obstacle in the world.
pub fn collect_obstacles(world: &World) -> Vec<CircleObstacle> {
    world
        .query::<(&Obstacle, &Position)>()
        .iter()
        .map(|(_, (obstacle, pos))| CircleObstacle {
            center: pos.0,
            radius: obstacle.radius,
        })
        .collect()
}

/// Move the player by input and every non-engaged AI along its heading.
/// Cocoons carry no `Actor` and so never move.
pub fn movement_system(
    world: &mut World,
    bounds: &ArenaBounds,
    rng: &mut GameRng,
    params: &MovementParams,
    delta_seconds: f32,
) {
    let obstacles = collect_obstacles(world);
    let terrain = Terrain {
        bounds,
        inset: params.boundary_inset,
        obstacles: &obstacles,
    };

    let direction = params.input.direction();
    for (_, (actor, pos, facing, _)) in
        world.query_mut::<(&Actor, &mut Position, &mut Facing, &Player)>()
    {
        let velocity = direction * (actor.speed * params.player_speed_multiplier);
        pos.0 = step_player(pos.0, velocity, delta_seconds, actor.radius, &terrain);
        if velocity != Vec2::ZERO {
            facing.0 = velocity.angle();
        }
    }

    for (_, (actor, pos, facing, wander)) in
        world.query_mut::<(&Actor, &mut Position, &mut Facing, &mut Wanderer)>()
    {
        if actor.in_combat {
            continue;
        }
        let mut jitter = || rng.jitter();
        let step = step_wanderer(
            pos.0,
            wander.heading,
            actor.speed,
            delta_seconds,
            actor.radius,
            &terrain,
            params.obstacle_perturbation,
            &mut jitter,
        );
        pos.0 = step.position;
        wander.heading = step.heading;
        facing.0 = step.heading.angle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sporeling_logic::class::ActorClass;

    fn params(input: MoveFlags) -> MovementParams {
        MovementParams {
            input,
            player_speed_multiplier: 1.0,
            boundary_inset: 1.0,
            obstacle_perturbation: 0.5,
        }
    }

    #[test]
    fn test_player_follows_input() {
        let mut world = World::new();
        let mut rng = GameRng::from_seed(1);
        let bounds = ArenaBounds::new(0.0, 0.0, 100.0, 100.0);
        let player = world.spawn((
            Actor::new(ActorClass::Larva, 1.0),
            Position::new(50.0, 50.0),
            Facing(0.0),
            Player,
        ));
        let input = MoveFlags {
            up: true,
            ..Default::default()
        };

        movement_system(&mut world, &bounds, &mut rng, &params(input), 0.1);

        let pos = world.get::<&Position>(player).unwrap();
        let speed = ActorClass::Larva.stats().speed;
        assert!((pos.0.y - (50.0 + speed * 0.1)).abs() < 1e-4);
        assert_eq!(pos.0.x, 50.0);
    }

    #[test]
    fn test_engaged_ai_holds_still() {
        let mut world = World::new();
        let mut rng = GameRng::from_seed(1);
        let bounds = ArenaBounds::new(0.0, 0.0, 100.0, 100.0);
        let mut actor = Actor::new(ActorClass::Raptor, 1.0);
        actor.in_combat = true;
        let raptor = world.spawn((
            actor,
            Position::new(20.0, 20.0),
            Facing(0.0),
            Wanderer::new(Vec2::new(1.0, 0.0), 2.0),
        ));

        movement_system(&mut world, &bounds, &mut rng, &params(MoveFlags::default()), 0.1);

        assert_eq!(world.get::<&Position>(raptor).unwrap().0, Vec2::new(20.0, 20.0));
    }

    #[test]
    fn test_ai_blocked_by_obstacle() {
        let mut world = World::new();
        let mut rng = GameRng::from_seed(4);
        let bounds = ArenaBounds::new(0.0, 0.0, 100.0, 100.0);
        world.spawn((Obstacle { radius: 3.0 }, Position::new(25.0, 20.0)));
        let raptor = world.spawn((
            Actor::new(ActorClass::Raptor, 1.0),
            Position::new(20.5, 20.0),
            Facing(0.0),
            Wanderer::new(Vec2::new(1.0, 0.0), 2.0),
        ));

        movement_system(&mut world, &bounds, &mut rng, &params(MoveFlags::default()), 0.1);

        assert_eq!(world.get::<&Position>(raptor).unwrap().0, Vec2::new(20.5, 20.0));
        assert!(world.get::<&Wanderer>(raptor).unwrap().heading.x < 0.0);
    }
}
