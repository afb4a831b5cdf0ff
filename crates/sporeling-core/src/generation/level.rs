//! Level layout - arena bounds, terrain and starting population

use std::path::Path;

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use sporeling_logic::class::ActorClass;
use sporeling_logic::economy::{Currencies, PlayerEconomy};
use sporeling_logic::geometry::{circles_overlap, ArenaBounds, Vec2};

use crate::components::*;
use crate::error::ConfigError;
use crate::rng::GameRng;

/// A creature placed at level start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub class: ActorClass,
    pub position: Vec2,
    #[serde(default = "default_size")]
    pub size_multiplier: f32,
}

fn default_size() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceNodeSpec {
    pub position: Vec2,
    pub radius: f32,
    pub reward: Currencies,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardNodeSpec {
    pub position: Vec2,
    pub radius: f32,
}

/// Everything needed to populate one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub name: String,
    pub bounds: ArenaBounds,
    pub obstacles: Vec<ObstacleSpec>,
    pub resource_nodes: Vec<ResourceNodeSpec>,
    pub hazard_nodes: Vec<HazardNodeSpec>,
    pub spawns: Vec<SpawnSpec>,
    pub player_start: Vec2,
    pub player_class: ActorClass,
    /// Notable kills needed to win.
    pub win_target: u32,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            name: "Hatchery".to_string(),
            bounds: ArenaBounds::default(),
            obstacles: vec![
                ObstacleSpec {
                    position: Vec2::new(40.0, 40.0),
                    radius: 4.0,
                },
                ObstacleSpec {
                    position: Vec2::new(80.0, 75.0),
                    radius: 5.0,
                },
            ],
            resource_nodes: vec![
                ResourceNodeSpec {
                    position: Vec2::new(30.0, 70.0),
                    radius: 1.5,
                    reward: Currencies::new(40, 0, 0),
                },
                ResourceNodeSpec {
                    position: Vec2::new(95.0, 20.0),
                    radius: 1.5,
                    reward: Currencies::new(20, 0, 1),
                },
            ],
            hazard_nodes: vec![HazardNodeSpec {
                position: Vec2::new(60.0, 95.0),
                radius: 4.0,
            }],
            spawns: vec![
                SpawnSpec {
                    class: ActorClass::Critter,
                    position: Vec2::new(20.0, 30.0),
                    size_multiplier: 1.0,
                },
                SpawnSpec {
                    class: ActorClass::Critter,
                    position: Vec2::new(70.0, 50.0),
                    size_multiplier: 1.0,
                },
                SpawnSpec {
                    class: ActorClass::Drone,
                    position: Vec2::new(90.0, 90.0),
                    size_multiplier: 1.0,
                },
                SpawnSpec {
                    class: ActorClass::Raptor,
                    position: Vec2::new(100.0, 50.0),
                    size_multiplier: 1.5,
                },
            ],
            player_start: Vec2::new(60.0, 60.0),
            player_class: ActorClass::Larva,
            win_target: 1,
        }
    }
}

impl LevelLayout {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
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
        if !(self.bounds.width() > 0.0 && self.bounds.height() > 0.0) {
            return Err(ConfigError::Invalid(format!("level '{}' has an empty arena", self.name)));
        }
        if self.spawns.iter().any(|s| !(s.size_multiplier > 0.0)) {
            return Err(ConfigError::Invalid("spawn size_multiplier must be positive".into()));
        }
        if self.win_target == 0 {
            return Err(ConfigError::Invalid("win_target must be at least 1".into()));
        }
        let player_radius = self.player_class.stats().radius;
        if self.blocked(self.player_start, player_radius) {
            return Err(ConfigError::Invalid(format!(
                "player start {:?} overlaps an obstacle",
                self.player_start
            )));
        }
        for spec in &self.spawns {
            let radius = spec.class.stats().scaled(spec.size_multiplier).radius;
            if self.blocked(spec.position, radius) {
                return Err(ConfigError::Invalid(format!(
                    "{:?} spawn at {:?} overlaps an obstacle",
                    spec.class, spec.position
                )));
            }
        }
        Ok(())
    }

    /// A body at `at` would start inside an obstacle and never move.
    fn blocked(&self, at: Vec2, radius: f32) -> bool {
        self.obstacles
            .iter()
            .any(|o| circles_overlap(at, radius, o.position, o.radius))
    }

    /// Radius of the smallest obstacle, if any.
    pub fn smallest_obstacle_radius(&self) -> Option<f32> {
        self.obstacles.iter().map(|o| o.radius).reduce(f32::min)
    }
}

/// Spawn the player's body at `position`, with upgrade bonuses from `economy`.
pub fn spawn_player(
    world: &mut World,
    class: ActorClass,
    position: Vec2,
    economy: &PlayerEconomy,
) -> Entity {
    let actor = Actor::new(class, 1.0).with_bonuses(economy.damage_bonus(), economy.armor_bonus());
    world.spawn((actor, Position(position), Facing(0.0), Player, DrainTimer::default()))
}

/// Spawn an AI creature with a random initial heading.
pub fn spawn_creature(
    world: &mut World,
    spec: &SpawnSpec,
    position: Vec2,
    rng: &mut GameRng,
) -> Entity {
    let (min, max) = spec.class.stats().wander_interval;
    let heading = rng.heading();
    let wander = Wanderer::new(heading, rng.range(min, max));
    world.spawn((
        Actor::new(spec.class, spec.size_multiplier),
        Position(position),
        Facing(heading.angle()),
        wander,
    ))
}

/// Populate `world` from `layout`. Returns the player entity.
///
/// Creature and player positions are clamped so their bodies start inside
/// the inset arena.
pub fn populate_level(
    world: &mut World,
    layout: &LevelLayout,
    inset: f32,
    economy: &PlayerEconomy,
    rng: &mut GameRng,
) -> Entity {
    let bounds = &layout.bounds;

    for obstacle in &layout.obstacles {
        world.spawn((
            Obstacle {
                radius: obstacle.radius,
            },
            Position(obstacle.position),
        ));
    }
    for node in &layout.resource_nodes {
        world.spawn((
            ResourceNode {
                radius: node.radius,
                reward: node.reward,
            },
            Position(node.position),
        ));
    }
    for vent in &layout.hazard_nodes {
        world.spawn((HazardNode { radius: vent.radius }, Position(vent.position)));
    }

    for spec in &layout.spawns {
        let radius = spec.class.stats().scaled(spec.size_multiplier).radius;
        let at = bounds.clamp_inset(spec.position, inset + radius);
        spawn_creature(world, spec, at, rng);
    }

    let radius = layout.player_class.stats().radius;
    let at = bounds.clamp_inset(layout.player_start, inset + radius);
    spawn_player(world, layout.player_class, at, economy)
}
