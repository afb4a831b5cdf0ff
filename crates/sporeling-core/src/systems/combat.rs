//! Combat system - contact detection, engagements and strike resolution
//!
//! Per tick, after movement:
//! 1. Contact: the player touching a harmless creature eats it outright;
//!    touching a fighter opens an engagement if both sides are free.
//! 2. Separation: engagements whose pair drifted past touching plus the
//!    disengage margin end without further resolution.
//! 3. Strikes: each engaged side counts its timer down and strikes at zero.
//!    Deaths remove the corpse and every table row before events are queued.
//!
//! Engaging only on overlap and breaking only past the margin gives the pair
//! a dead band, so an engagement cannot flicker on and off at one distance.

use hecs::{Entity, World};
use sporeling_logic::class::ActorClass;
use sporeling_logic::economy::{Currencies, PlayerEconomy};
use sporeling_logic::geometry::{circles_overlap, Vec2};
use sporeling_logic::interaction::{classify_contact, interaction, Contact};
use tracing::debug;

use crate::components::{Actor, Player, Position};
use crate::error::EngagementError;
use crate::events::{EventQueue, GameEvent};

/// Two actors locked in combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engagement {
    pub a: Entity,
    pub b: Entity,
}

impl Engagement {
    pub fn involves(&self, entity: Entity) -> bool {
        self.a == entity || self.b == entity
    }

    pub fn partner_of(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Fixed-capacity table of live engagements. An entity appears in at most
/// one row.
#[derive(Debug, Clone)]
pub struct EngagementTable {
    rows: Vec<Engagement>,
    capacity: usize,
}

impl EngagementTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Engagement> {
        self.rows.iter()
    }

    pub fn is_engaged(&self, entity: Entity) -> bool {
        self.rows.iter().any(|row| row.involves(entity))
    }

    pub fn partner_of(&self, entity: Entity) -> Option<Entity> {
        self.rows.iter().find_map(|row| row.partner_of(entity))
    }

    pub fn insert(&mut self, a: Entity, b: Entity) -> Result<(), EngagementError> {
        for entity in [a, b] {
            if self.is_engaged(entity) {
                return Err(EngagementError::AlreadyEngaged(entity));
            }
        }
        if self.rows.len() >= self.capacity {
            return Err(EngagementError::TableFull {
                capacity: self.capacity,
            });
        }
        self.rows.push(Engagement { a, b });
        Ok(())
    }

    /// Remove the row involving `entity`, if any.
    pub fn remove_involving(&mut self, entity: Entity) -> Option<Engagement> {
        let idx = self.rows.iter().position(|row| row.involves(entity))?;
        Some(self.rows.swap_remove(idx))
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

/// A non-player actor killed this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillRecord {
    pub entity: Entity,
    pub class: ActorClass,
    pub size_multiplier: f32,
}

/// What the combat pass produced.
#[derive(Debug, Default)]
pub struct CombatReport {
    pub kills: Vec<KillRecord>,
    pub player_died: bool,
}

/// Tunables the combat pass needs from the balance config.
#[derive(Debug, Clone, Copy)]
pub struct CombatParams {
    pub disengage_margin: f32,
}

#[derive(Debug, Clone, Copy)]
struct Body {
    entity: Entity,
    class: ActorClass,
    at: Vec2,
    radius: f32,
    is_player: bool,
}

fn collect_bodies(world: &World) -> Vec<Body> {
    world
        .query::<(&Actor, &Position, Option<&Player>)>()
        .iter()
        .filter(|(_, (actor, _, _))| actor.is_alive())
        .map(|(entity, (actor, pos, player))| Body {
            entity,
            class: actor.class,
            at: pos.0,
            radius: actor.radius,
            is_player: player.is_some(),
        })
        .collect()
}

fn set_in_combat(world: &mut World, entity: Entity, value: bool) {
    if let Ok(mut actor) = world.get::<&mut Actor>(entity) {
        actor.in_combat = value;
    }
}

/// End the engagement involving `entity` and free its partner.
pub fn end_engagement(
    world: &mut World,
    engagements: &mut EngagementTable,
    events: &mut EventQueue,
    entity: Entity,
) -> Option<Engagement> {
    let row = engagements.remove_involving(entity)?;
    set_in_combat(world, row.a, false);
    set_in_combat(world, row.b, false);
    events.emit(GameEvent::EngagementEnded { a: row.a, b: row.b });
    Some(row)
}

/// Run one tick of contact, separation and strike resolution.
pub fn combat_system(
    world: &mut World,
    engagements: &mut EngagementTable,
    economy: &mut PlayerEconomy,
    events: &mut EventQueue,
    params: &CombatParams,
    delta_seconds: f32,
) -> CombatReport {
    let mut report = CombatReport::default();

    resolve_contacts(world, engagements, economy, events, &mut report);
    resolve_separation(world, engagements, events, params);
    resolve_strikes(world, engagements, economy, events, &mut report, delta_seconds);

    report
}

fn resolve_contacts(
    world: &mut World,
    engagements: &mut EngagementTable,
    economy: &mut PlayerEconomy,
    events: &mut EventQueue,
    report: &mut CombatReport,
) {
    let bodies = collect_bodies(world);
    let players: Vec<Body> = bodies.iter().copied().filter(|b| b.is_player).collect();

    for player in players {
        for other in bodies.iter().filter(|b| !b.is_player) {
            if !world.contains(other.entity) || !world.contains(player.entity) {
                continue;
            }
            if !circles_overlap(player.at, player.radius, other.at, other.radius) {
                continue;
            }
            match classify_contact(player.class, other.class) {
                Contact::Eat => {
                    let size = world
                        .get::<&Actor>(other.entity)
                        .map(|a| a.size_multiplier)
                        .unwrap_or(1.0);
                    let reward = interaction(player.class, other.class).reward.scaled(size);
                    engagements.remove_involving(other.entity);
                    let _ = world.despawn(other.entity);
                    economy.wallet.credit(&reward);
                    debug!(class = %other.class, ?reward, "player ate creature");
                    report.kills.push(KillRecord {
                        entity: other.entity,
                        class: other.class,
                        size_multiplier: size,
                    });
                    events.emit(GameEvent::EnemyDied {
                        entity: other.entity,
                        class: other.class,
                        size_multiplier: size,
                        reward,
                        eaten: true,
                    });
                }
                Contact::Fight => {
                    if engagements.is_engaged(player.entity)
                        || engagements.is_engaged(other.entity)
                    {
                        continue;
                    }
                    match engagements.insert(player.entity, other.entity) {
                        Ok(()) => {
                            set_in_combat(world, player.entity, true);
                            set_in_combat(world, other.entity, true);
                            debug!(opponent = %other.class, "engagement started");
                            events.emit(GameEvent::EngagementStarted {
                                a: player.entity,
                                b: other.entity,
                            });
                        }
                        Err(err) => debug!(%err, "engagement not formed"),
                    }
                }
                Contact::Ignore => {}
            }
        }
    }
}

fn resolve_separation(
    world: &mut World,
    engagements: &mut EngagementTable,
    events: &mut EventQueue,
    params: &CombatParams,
) {
    let rows: Vec<Engagement> = engagements.iter().copied().collect();
    for row in rows {
        let span = |e: Entity| {
            let pos = world.get::<&Position>(e).ok()?.0;
            let radius = world.get::<&Actor>(e).ok()?.radius;
            Some((pos, radius))
        };
        let separated = match (span(row.a), span(row.b)) {
            (Some((pa, ra)), Some((pb, rb))) => {
                pa.distance(&pb) > ra + rb + params.disengage_margin
            }
            // A participant vanished without going through the death path.
            _ => true,
        };
        if separated {
            debug!("engagement broken by separation");
            end_engagement(world, engagements, events, row.a);
        }
    }
}

fn resolve_strikes(
    world: &mut World,
    engagements: &mut EngagementTable,
    economy: &mut PlayerEconomy,
    events: &mut EventQueue,
    report: &mut CombatReport,
    delta_seconds: f32,
) {
    let rows: Vec<Engagement> = engagements.iter().copied().collect();
    for row in rows {
        for (attacker, defender) in [(row.a, row.b), (row.b, row.a)] {
            if !world.contains(attacker) || !world.contains(defender) {
                break;
            }
            let Some(raw) = tick_attack_timer(world, attacker, delta_seconds) else {
                continue;
            };
            let outcome = {
                let Ok(mut target) = world.get::<&mut Actor>(defender) else {
                    break;
                };
                let armor = target.total_armor();
                target.vitals.apply_damage(raw, armor)
            };
            events.emit(GameEvent::DamageDealt {
                attacker,
                defender,
                amount: outcome.hp_lost,
                absorbed: outcome.shield_absorbed,
            });
            if outcome.killed {
                resolve_death(world, engagements, economy, events, report, attacker, defender);
                break;
            }
        }
    }
}

/// Count down the attacker's timer. Returns its raw damage when it strikes.
fn tick_attack_timer(world: &mut World, attacker: Entity, delta_seconds: f32) -> Option<i32> {
    let mut actor = world.get::<&mut Actor>(attacker).ok()?;
    if !actor.is_alive() {
        return None;
    }
    actor.attack_timer = (actor.attack_timer - delta_seconds).max(0.0);
    if actor.attack_timer > 0.0 {
        return None;
    }
    actor.attack_timer = actor.attack_cooldown;
    Some(actor.total_damage())
}

fn resolve_death(
    world: &mut World,
    engagements: &mut EngagementTable,
    economy: &mut PlayerEconomy,
    events: &mut EventQueue,
    report: &mut CombatReport,
    killer: Entity,
    victim: Entity,
) {
    let killer_class = world.get::<&Actor>(killer).map(|a| a.class).ok();
    let victim_is_player = world.get::<&Player>(victim).is_ok();
    let Ok(victim_actor) = world.get::<&Actor>(victim).map(|a| *a) else {
        return;
    };

    end_engagement(world, engagements, events, victim);
    let _ = world.despawn(victim);

    if victim_is_player {
        report.player_died = true;
        events.emit(GameEvent::PlayerDied);
        return;
    }

    let killed_by_player = world.get::<&Player>(killer).is_ok();
    let reward = match (killed_by_player, killer_class) {
        (true, Some(class)) => interaction(class, victim_actor.class)
            .reward
            .scaled(victim_actor.size_multiplier),
        _ => Currencies::ZERO,
    };
    economy.wallet.credit(&reward);
    report.kills.push(KillRecord {
        entity: victim,
        class: victim_actor.class,
        size_multiplier: victim_actor.size_multiplier,
    });
    events.emit(GameEvent::EnemyDied {
        entity: victim,
        class: victim_actor.class,
        size_multiplier: victim_actor.size_multiplier,
        reward,
        eaten: false,
    });
}
