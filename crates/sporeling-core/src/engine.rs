//! Simulation engine - main entry point for running a level

use std::collections::VecDeque;

use hecs::{Entity, World};
use sporeling_logic::damage::Vitals;
use sporeling_logic::economy::{PlayerEconomy, UpgradeKind};
use sporeling_logic::geometry::ArenaBounds;
use sporeling_logic::movement::MoveFlags;
use sporeling_logic::win::WinTracker;
use tracing::{debug, info, warn};

use crate::commands::Command;
use crate::components::*;
use crate::config::BalanceConfig;
use crate::error::CommandError;
use crate::events::{EventQueue, GameEvent, GameEventListener};
use crate::generation::{populate_level, LevelLayout};
use crate::rng::GameRng;
use crate::systems::*;
use crate::view::{ActorView, PlayerStatus};

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all entities
    pub world: World,
    config: BalanceConfig,
    layout: LevelLayout,
    rng: GameRng,
    economy: PlayerEconomy,
    engagements: EngagementTable,
    morph: MorphController,
    win: WinTracker,
    /// Movement flags held since the last `SetMovement`.
    input: MoveFlags,
    commands: VecDeque<Command>,
    events: EventQueue,
    /// Simulated seconds since level start
    sim_time: f64,
    tick: u64,
    game_over: bool,
    time_scale: f32,
}

impl SimulationEngine {
    /// Create an engine with an empty world. Call `start_level` to populate it.
    pub fn new(config: BalanceConfig) -> Self {
        if let Err(err) = config.validate() {
            warn!(%err, "balance config failed validation; affected systems stay idle");
        }
        Self {
            world: World::new(),
            rng: GameRng::from_optional_seed(config.seed),
            economy: PlayerEconomy::new(config.starting_currencies),
            engagements: EngagementTable::new(config.max_engagements),
            morph: MorphController::new(config.morph_duration_seconds),
            win: WinTracker::new(1),
            layout: LevelLayout::default(),
            input: MoveFlags::default(),
            commands: VecDeque::new(),
            events: EventQueue::new(),
            sim_time: 0.0,
            tick: 0,
            game_over: false,
            time_scale: 1.0,
            config,
        }
    }

    /// Tear down the current level and populate `layout`.
    pub fn start_level(&mut self, layout: LevelLayout) {
        self.world.clear();
        self.engagements.clear();
        self.morph.reset();
        self.events.clear();
        self.commands.clear();
        self.input = MoveFlags::default();
        self.economy = PlayerEconomy::new(self.config.starting_currencies);
        self.win = WinTracker::new(layout.win_target);
        self.sim_time = 0.0;
        self.tick = 0;
        self.game_over = false;

        if let Err(err) = layout.validate() {
            warn!(level = %layout.name, %err, "level layout failed validation");
        }
        if let Some(smallest) = layout.smallest_obstacle_radius() {
            let reach = self.config.max_step_distance();
            if reach >= smallest {
                warn!(
                    reach,
                    smallest,
                    "max step distance reaches the smallest obstacle; fast movers may tunnel"
                );
            }
        }

        let player = populate_level(
            &mut self.world,
            &layout,
            self.config.boundary_inset,
            &self.economy,
            &mut self.rng,
        );
        info!(
            level = %layout.name,
            entities = self.world.len(),
            ?player,
            target = layout.win_target,
            "level started"
        );
        self.layout = layout;
    }

    /// Queue a command for the next tick. Dropped after game over.
    pub fn enqueue(&mut self, command: Command) {
        if self.game_over {
            debug!(?command, "game over; command discarded");
            return;
        }
        self.commands.push_back(command);
    }

    pub fn set_movement(&mut self, flags: MoveFlags) {
        self.enqueue(Command::SetMovement(flags));
    }

    /// Queue a morph by class name. Returns false for unknown names.
    pub fn request_morph_named(&mut self, name: &str) -> bool {
        match Command::morph_named(name) {
            Some(command) => {
                self.enqueue(command);
                true
            }
            None => {
                debug!(name, "unknown morph target ignored");
                false
            }
        }
    }

    /// Update the simulation by delta_seconds
    pub fn update(&mut self, delta_seconds: f32) {
        if self.game_over {
            return;
        }
        let scaled = delta_seconds * self.time_scale;
        if !(scaled > 0.0) {
            return;
        }
        let dt = scaled.min(self.config.max_step_seconds);
        self.sim_time += dt as f64;
        self.tick += 1;

        // T0: Commands queued since last tick
        self.apply_commands();

        // T1: Steering and movement
        wandering_system(&mut self.world, &mut self.rng, dt);
        let movement = MovementParams {
            input: self.input,
            player_speed_multiplier: self.config.player_speed_multiplier,
            boundary_inset: self.config.boundary_inset,
            obstacle_perturbation: self.config.obstacle_perturbation,
        };
        movement_system(&mut self.world, &self.layout.bounds, &mut self.rng, &movement, dt);

        // T2: Contacts and strikes, against this tick's positions
        let combat = combat_system(
            &mut self.world,
            &mut self.engagements,
            &mut self.economy,
            &mut self.events,
            &CombatParams {
                disengage_margin: self.config.disengage_margin,
            },
            dt,
        );

        // T3: Economy and environment
        harvest_system(&mut self.world, &mut self.economy, &mut self.events);
        let drained = drain_system(
            &mut self.world,
            &mut self.engagements,
            &mut self.economy,
            &mut self.events,
            &self.config.drain,
            dt,
        );

        // T4: Cocoon
        self.morph.update(&mut self.world, &self.economy, &mut self.events, dt);

        // T5: Win / lose
        for kill in &combat.kills {
            if self.win.record_kill(kill.size_multiplier) {
                info!(kills = self.win.counter, "victory");
                self.events.emit(GameEvent::Won {
                    notable_kills: self.win.counter,
                });
            }
        }
        if combat.player_died || drained {
            info!(tick = self.tick, "player died; game over");
            self.game_over = true;
            self.commands.clear();
        }
    }

    fn apply_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            if let Err(err) = self.execute(command) {
                debug!(?command, %err, "command rejected");
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::SetMovement(flags) => self.input = flags,
            Command::Morph(target) => {
                self.morph.begin(
                    &mut self.world,
                    &mut self.engagements,
                    &mut self.economy,
                    &mut self.events,
                    target,
                )?;
            }
            Command::Upgrade(kind) => {
                let curve = match kind {
                    UpgradeKind::Attack => self.config.attack_upgrade,
                    UpgradeKind::Armor => self.config.armor_upgrade,
                };
                let level = self.economy.purchase_upgrade(kind, &curve)?;
                self.refresh_player_bonuses();
                debug!(?kind, level, "upgrade purchased");
            }
            Command::Heal => {
                let player = self.player_entity().ok_or(CommandError::NoPlayer)?;
                let mut actor = self
                    .world
                    .get::<&mut Actor>(player)
                    .map_err(|_| CommandError::NoPlayer)?;
                let paid = self
                    .economy
                    .purchase_heal(actor.vitals.missing_hp(), self.config.heal_price_per_hp)?;
                actor.vitals.heal(paid);
            }
            Command::PurchaseShield => {
                let player = self.player_entity().ok_or(CommandError::NoPlayer)?;
                let mut actor = self
                    .world
                    .get::<&mut Actor>(player)
                    .map_err(|_| CommandError::NoPlayer)?;
                let amount = self
                    .economy
                    .purchase_shield(self.config.shield_cost, self.config.shield_amount)?;
                actor.vitals.add_shield(amount);
            }
            Command::Camera(_) => {}
        }
        Ok(())
    }

    /// Push the economy's upgrade bonuses onto the live player body.
    fn refresh_player_bonuses(&mut self) {
        let damage_bonus = self.economy.damage_bonus();
        let armor_bonus = self.economy.armor_bonus();
        for (_, (actor, _)) in self.world.query_mut::<(&mut Actor, &Player)>() {
            actor.damage_bonus = damage_bonus;
            actor.armor_bonus = armor_bonus;
        }
    }

    /// The player's active body. `None` while cocooned or dead.
    pub fn player_entity(&self) -> Option<Entity> {
        self.world
            .query::<(&Actor, &Player)>()
            .iter()
            .next()
            .map(|(entity, _)| entity)
    }

    /// Snapshot of every living actor.
    pub fn actors(&self) -> Vec<ActorView> {
        self.world
            .query::<(&Actor, &Position, Option<&Facing>, Option<&Player>)>()
            .iter()
            .map(|(entity, (actor, pos, facing, player))| ActorView {
                id: entity.to_bits().get(),
                entity,
                class: actor.class,
                position: pos.0,
                facing: facing.map_or(0.0, |f| f.0),
                current_hp: actor.vitals.current_hp,
                max_hp: actor.vitals.max_hp,
                shield: actor.vitals.shield,
                size_multiplier: actor.size_multiplier,
                is_player: player.is_some(),
                in_combat: actor.in_combat,
            })
            .collect()
    }

    /// HUD view of the player, whether in a body or a cocoon.
    pub fn player_status(&self) -> Option<PlayerStatus> {
        if let Some(player) = self.player_entity() {
            let actor = self.world.get::<&Actor>(player).ok()?;
            let position = self.world.get::<&Position>(player).ok()?.0;
            return Some(PlayerStatus {
                class: actor.class,
                morphing_into: None,
                morph_progress: None,
                current_hp: actor.vitals.current_hp,
                max_hp: actor.vitals.max_hp,
                shield: actor.vitals.shield,
                position,
                in_combat: actor.in_combat,
                economy: self.economy,
            });
        }

        let MorphState::Morphing { cocoon, request } = *self.morph.state() else {
            return None;
        };
        let position = self.world.get::<&Position>(cocoon).ok()?.0;
        let hatchling = Vitals::full(request.target.stats().max_hp);
        Some(PlayerStatus {
            class: request.from,
            morphing_into: Some(request.target),
            morph_progress: self.morph.progress(),
            current_hp: hatchling.current_hp,
            max_hp: hatchling.max_hp,
            shield: request.carried_shield,
            position,
            in_combat: false,
            economy: self.economy,
        })
    }

    pub fn economy(&self) -> &PlayerEconomy {
        &self.economy
    }

    /// Direct access for tools and scripted scenarios. Bonuses reach the
    /// live body on the next upgrade or morph.
    pub fn economy_mut(&mut self) -> &mut PlayerEconomy {
        &mut self.economy
    }

    pub fn win_progress(&self) -> &WinTracker {
        &self.win
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_victory(&self) -> bool {
        self.win.has_won()
    }

    pub fn is_morphing(&self) -> bool {
        self.morph.is_morphing()
    }

    pub fn engagements(&self) -> &EngagementTable {
        &self.engagements
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    pub fn bounds(&self) -> &ArenaBounds {
        &self.layout.bounds
    }

    /// Events queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn dispatch_events(&mut self, listener: &mut dyn GameEventListener) {
        self.events.dispatch(listener);
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Get current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Simulated seconds since level start
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(BalanceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sporeling_logic::class::ActorClass;
    use sporeling_logic::economy::Currencies;
    use sporeling_logic::geometry::Vec2;

    fn empty_layout() -> LevelLayout {
        LevelLayout {
            obstacles: Vec::new(),
            resource_nodes: Vec::new(),
            hazard_nodes: Vec::new(),
            spawns: Vec::new(),
            ..LevelLayout::default()
        }
    }

    fn seeded_engine(wallet: Currencies) -> SimulationEngine {
        let config = BalanceConfig {
            seed: Some(7),
            starting_currencies: wallet,
            ..BalanceConfig::default()
        };
        let mut engine = SimulationEngine::new(config);
        engine.start_level(empty_layout());
        engine
    }

    #[test]
    fn test_start_level_spawns_player() {
        let engine = seeded_engine(Currencies::ZERO);
        let status = engine.player_status().unwrap();
        assert_eq!(status.class, ActorClass::Larva);
        assert_eq!(engine.actors().len(), 1);
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut engine = seeded_engine(Currencies::ZERO);
        engine.update(5.0);
        assert!((engine.sim_time() - 0.1).abs() < 1e-6);
        engine.update(-1.0);
        assert_eq!(engine.tick(), 1);
    }

    #[test]
    fn test_commands_apply_next_tick() {
        let mut engine = seeded_engine(Currencies::ZERO);
        let start = engine.player_status().unwrap().position;
        engine.set_movement(MoveFlags {
            right: true,
            ..Default::default()
        });
        assert_eq!(engine.player_status().unwrap().position, start);
        engine.update(0.1);
        assert!(engine.player_status().unwrap().position.x > start.x);
    }

    #[test]
    fn test_upgrade_refreshes_live_body() {
        let mut engine = seeded_engine(Currencies::new(100, 100, 0));
        engine.enqueue(Command::Upgrade(UpgradeKind::Attack));
        engine.update(0.016);
        let player = engine.player_entity().unwrap();
        assert_eq!(engine.world.get::<&Actor>(player).unwrap().damage_bonus, 1);
        assert_eq!(engine.economy().wallet, Currencies::new(50, 50, 0));
    }

    #[test]
    fn test_heal_and_shield_purchases() {
        let mut engine = seeded_engine(Currencies::new(10, 0, 1));
        let player = engine.player_entity().unwrap();
        engine.world.get::<&mut Actor>(player).unwrap().vitals.current_hp -= 20;

        engine.enqueue(Command::Heal);
        engine.enqueue(Command::PurchaseShield);
        engine.update(0.016);

        let status = engine.player_status().unwrap();
        assert_eq!(status.current_hp, status.max_hp - 10);
        assert_eq!(status.shield, 25);
        assert_eq!(engine.economy().wallet, Currencies::ZERO);
    }

    #[test]
    fn test_unknown_morph_name_is_noop() {
        let mut engine = seeded_engine(Currencies::new(1000, 1000, 10));
        assert!(!engine.request_morph_named("wyvern"));
        engine.update(0.1);
        assert!(!engine.is_morphing());
        assert_eq!(engine.economy().wallet, Currencies::new(1000, 1000, 10));
    }

    #[test]
    fn test_status_during_morph() {
        let mut engine = seeded_engine(Currencies::new(1000, 1000, 10));
        assert!(engine.request_morph_named("Drone"));
        engine.update(0.1);
        let status = engine.player_status().unwrap();
        assert_eq!(status.morphing_into, Some(ActorClass::Drone));
        assert!(engine.player_entity().is_none());
        assert!(engine.actors().is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut engine = seeded_engine(Currencies::new(500, 500, 5));
        engine.enqueue(Command::Upgrade(UpgradeKind::Armor));
        engine.request_morph_named("raptor");
        engine.update(0.1);
        assert!(engine.is_morphing());

        engine.start_level(empty_layout());

        assert!(!engine.is_morphing());
        assert_eq!(engine.economy().armor_level, 0);
        assert_eq!(engine.economy().wallet, Currencies::new(500, 500, 5));
        assert_eq!(engine.sim_time(), 0.0);
        assert!(engine.drain_events().is_empty());
        assert_eq!(engine.player_status().unwrap().position, Vec2::new(60.0, 60.0));
    }

    #[test]
    fn test_zero_drain_interval_does_not_stall() {
        let mut config = BalanceConfig {
            seed: Some(7),
            ..BalanceConfig::default()
        };
        config.drain.interval_seconds = 0.0;
        let mut engine = SimulationEngine::new(config);
        engine.start_level(LevelLayout {
            hazard_nodes: vec![crate::generation::HazardNodeSpec {
                position: Vec2::new(60.0, 60.0),
                radius: 5.0,
            }],
            ..empty_layout()
        });

        for _ in 0..10 {
            engine.update(0.1);
        }

        assert_eq!(engine.tick(), 10);
        assert!(!engine.is_game_over());
        assert_eq!(engine.economy().wallet.gas, 0);
    }
}
