use std::sync::Arc;

use models::v1::{CardDefinition, Intention};
use simulator::{
    CardId, Combat, CombatSettings, Deck, DungeonRng, EnemyId, EnemyInstance, Health,
    PlayerState, Vitals,
};

use super::enemy_template;

#[allow(unused)]
pub static SEED: u64 = 0x3a3f7af8085da7a2;

#[allow(unused)]
pub fn rng() -> DungeonRng {
    DungeonRng::for_room(SEED, 0)
}

#[allow(unused)]
pub fn player(health: u32, base_mana: u32) -> PlayerState {
    PlayerState {
        vitals: Vitals::new(Health(health, 100)),
        base_mana,
    }
}

#[allow(unused)]
pub fn enemy(slot: usize, health: u32, pattern: Vec<Intention>) -> EnemyInstance {
    let template = Arc::new(enemy_template(&format!("Enemy {slot}"), health, pattern));
    EnemyInstance::new(EnemyId(slot), template, health)
}

/// Unshuffled deck: the last card of `draw` is drawn first.
#[allow(unused)]
pub fn deck(draw: Vec<CardDefinition>) -> Deck {
    Deck {
        draw: draw.into_iter().map(Arc::new).collect(),
        ..Default::default()
    }
}

#[allow(unused)]
pub fn start_combat(
    player: PlayerState,
    enemies: Vec<EnemyInstance>,
    draw: Vec<CardDefinition>,
    rng: &mut DungeonRng,
) -> Combat {
    Combat::start(player, enemies, deck(draw), CombatSettings::default(), rng)
}

#[allow(unused)]
pub fn hand_id(combat: &Combat, name: &str) -> CardId {
    combat
        .deck
        .hand
        .iter()
        .find(|c| c.definition.name == name)
        .map(|c| c.id)
        .unwrap_or_else(|| panic!("{name} is not in hand"))
}
