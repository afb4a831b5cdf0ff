//! Pure steering and collision logic.
//!
//! Algorithm per actor per tick:
//! 1. Candidate = position + heading * speed * dt
//! 2. Candidate inside an obstacle: AI bounces (reverse + jitter), player
//!    stays put. Either way the move is skipped this tick.
//! 3. Otherwise clamp each axis into the inset arena. AI headings reflect off
//!    the wall that was hit; the player just slides along it.
//!
//! Max per-tick displacement must stay below the smallest obstacle radius or
//! fast actors can tunnel through. The engine enforces this by clamping the
//! frame delta.

use serde::{Deserialize, Serialize};

use crate::geometry::{circles_overlap, ArenaBounds, Vec2};

/// Directional input held by the player. `up` is +y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveFlags {
    /// Normalized sum of the held directions (zero when idle or cancelled).
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.down, self.up)).normalize()
    }
}

/// Static circular obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleObstacle {
    pub center: Vec2,
    pub radius: f32,
}

pub fn blocked_by_obstacle(candidate: Vec2, radius: f32, obstacles: &[CircleObstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| circles_overlap(candidate, radius, o.center, o.radius))
}

/// Which side of an axis was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Min,
    Max,
}

/// Result of clamping a candidate into the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryStep {
    pub position: Vec2,
    pub hit_x: Option<Edge>,
    pub hit_y: Option<Edge>,
}

pub fn clamp_to_arena(candidate: Vec2, bounds: &ArenaBounds, inset: f32) -> BoundaryStep {
    let edge = |v: f32, lo: f32, hi: f32| {
        if v < lo {
            Some(Edge::Min)
        } else if v > hi {
            Some(Edge::Max)
        } else {
            None
        }
    };
    BoundaryStep {
        position: bounds.clamp_inset(candidate, inset),
        hit_x: edge(candidate.x, bounds.min_x + inset, bounds.max_x - inset),
        hit_y: edge(candidate.y, bounds.min_y + inset, bounds.max_y - inset),
    }
}

/// Reflect the heading component of each axis that hit a wall so it points
/// back into the arena.
pub fn reflect_heading(heading: Vec2, step: &BoundaryStep) -> Vec2 {
    let reflect = |h: f32, hit: Option<Edge>| match hit {
        Some(Edge::Min) => h.abs(),
        Some(Edge::Max) => -h.abs(),
        None => h,
    };
    Vec2::new(reflect(heading.x, step.hit_x), reflect(heading.y, step.hit_y))
}

/// Unit heading from `from` toward `to`, if they are not coincident.
pub fn steer_toward(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Draw from `jitter` until it yields a usable direction.
pub fn random_heading(jitter: &mut dyn FnMut() -> Vec2) -> Vec2 {
    for _ in 0..8 {
        if let Some(h) = jitter().try_normalize() {
            return h;
        }
    }
    Vec2::new(1.0, 0.0)
}

/// Shared collision context for one tick.
#[derive(Debug, Clone, Copy)]
pub struct Terrain<'a> {
    pub bounds: &'a ArenaBounds,
    pub inset: f32,
    pub obstacles: &'a [CircleObstacle],
}

/// Player step: input-driven, slides along walls, stops at obstacles.
pub fn step_player(
    position: Vec2,
    velocity: Vec2,
    dt: f32,
    radius: f32,
    terrain: &Terrain<'_>,
) -> Vec2 {
    if velocity == Vec2::ZERO {
        return terrain.bounds.clamp_inset(position, terrain.inset);
    }
    let candidate = position + velocity * dt;
    if blocked_by_obstacle(candidate, radius, terrain.obstacles) {
        return position;
    }
    clamp_to_arena(candidate, terrain.bounds, terrain.inset).position
}

/// Result of one AI step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderStep {
    pub position: Vec2,
    pub heading: Vec2,
    /// Move was skipped because of an obstacle.
    pub bounced: bool,
}

/// AI step along `heading`. `jitter` returns a random vector in [-1, 1]²,
/// scaled by `perturbation` when bouncing off obstacles.
pub fn step_wanderer(
    position: Vec2,
    heading: Vec2,
    speed: f32,
    dt: f32,
    radius: f32,
    terrain: &Terrain<'_>,
    perturbation: f32,
    jitter: &mut dyn FnMut() -> Vec2,
) -> WanderStep {
    let heading = match heading.try_normalize() {
        Some(h) => h,
        None => random_heading(jitter),
    };
    let candidate = position + heading * (speed * dt);

    if blocked_by_obstacle(candidate, radius, terrain.obstacles) {
        let bounced = (-heading + jitter() * perturbation)
            .try_normalize()
            .unwrap_or_else(|| random_heading(jitter));
        return WanderStep {
            position,
            heading: bounced,
            bounced: true,
        };
    }

    let step = clamp_to_arena(candidate, terrain.bounds, terrain.inset);
    let heading = reflect_heading(heading, &step)
        .try_normalize()
        .unwrap_or_else(|| random_heading(jitter));
    WanderStep {
        position: step.position,
        heading,
        bounced: false,
    }
}
