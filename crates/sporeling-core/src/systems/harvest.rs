//! Harvest system - the player collects resource nodes by touching them

use hecs::{Entity, World};
use sporeling_logic::economy::{Currencies, PlayerEconomy};
use sporeling_logic::geometry::circles_overlap;
use tracing::debug;

use crate::components::{Actor, Player, Position, ResourceNode};
use crate::events::{EventQueue, GameEvent};

/// Consume every resource node the player overlaps and credit its reward.
pub fn harvest_system(world: &mut World, economy: &mut PlayerEconomy, events: &mut EventQueue) {
    let Some((player_at, player_radius)) = world
        .query::<(&Actor, &Position, &Player)>()
        .iter()
        .next()
        .map(|(_, (actor, pos, _))| (pos.0, actor.radius))
    else {
        return;
    };

    let touched: Vec<(Entity, Currencies)> = world
        .query::<(&ResourceNode, &Position)>()
        .iter()
        .filter(|(_, (node, pos))| circles_overlap(player_at, player_radius, pos.0, node.radius))
        .map(|(entity, (node, _))| (entity, node.reward))
        .collect();

    for (node, reward) in touched {
        if world.despawn(node).is_err() {
            continue;
        }
        economy.wallet.credit(&reward);
        debug!(?reward, "resource node harvested");
        events.emit(GameEvent::NodeHarvested { node, reward });
    }
}
