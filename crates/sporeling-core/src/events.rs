//! Outgoing notifications from the simulation to its collaborators
//! (HUD, audio, minimap).
//!
//! Events are queued in order of occurrence during a tick. Collaborators
//! either drain the queue or hand a `GameEventListener` to `dispatch`.
//! Entities named in an event have already been removed from every
//! tracking table by the time the event is queued.

use hecs::Entity;
use sporeling_logic::class::ActorClass;
use sporeling_logic::economy::Currencies;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A strike landed. `amount` is HP removed, `absorbed` what the shield took.
    DamageDealt {
        attacker: Entity,
        defender: Entity,
        amount: i32,
        absorbed: i32,
    },
    /// A non-player actor died, either in combat or by being eaten.
    EnemyDied {
        entity: Entity,
        class: ActorClass,
        size_multiplier: f32,
        reward: Currencies,
        eaten: bool,
    },
    PlayerDied,
    /// Victory threshold reached. Fired at most once per level.
    Won { notable_kills: u32 },
    EngagementStarted { a: Entity, b: Entity },
    EngagementEnded { a: Entity, b: Entity },
    NodeHarvested { node: Entity, reward: Currencies },
    DrainTick { damage: i32, gas: u32 },
    MorphStarted {
        from: ActorClass,
        to: ActorClass,
        cocoon: Entity,
    },
    MorphCompleted { class: ActorClass, entity: Entity },
}

/// Callback-style consumer. Every method defaults to a no-op.
pub trait GameEventListener {
    fn on_damage_dealt(&mut self, _attacker: Entity, _defender: Entity, _amount: i32) {}
    fn on_enemy_death(&mut self, _entity: Entity, _reward: Currencies) {}
    fn on_player_death(&mut self) {}
    fn on_win(&mut self) {}
    /// Sees every event, including the ones routed above.
    fn on_event(&mut self, _event: &GameEvent) {}
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain the queue into `listener`, in order.
    pub fn dispatch(&mut self, listener: &mut dyn GameEventListener) {
        for event in self.drain() {
            match &event {
                GameEvent::DamageDealt {
                    attacker,
                    defender,
                    amount,
                    ..
                } => listener.on_damage_dealt(*attacker, *defender, *amount),
                GameEvent::EnemyDied { entity, reward, .. } => {
                    listener.on_enemy_death(*entity, *reward)
                }
                GameEvent::PlayerDied => listener.on_player_death(),
                GameEvent::Won { .. } => listener.on_win(),
                _ => {}
            }
            listener.on_event(&event);
        }
    }
}
