use gamedata::{Catalog, CatalogBuilder};
use models::v1::{
    CardDefinition, CardEffects, CombatRoomRecord, EnemyTemplate, Intention, LevelRange, Rarity,
    SpecialRoom, SpecialRoomAction,
};

#[allow(unused)]
pub fn strike() -> CardDefinition {
    CardDefinition::new(
        "Strike",
        1,
        CardEffects {
            target_damage: 6,
            ..Default::default()
        },
    )
}

#[allow(unused)]
pub fn defend() -> CardDefinition {
    CardDefinition::new(
        "Defend",
        1,
        CardEffects {
            self_block: 5,
            ..Default::default()
        },
    )
}

#[allow(unused)]
pub fn card(name: &str, cost: u32, effects: CardEffects) -> CardDefinition {
    CardDefinition::new(name, cost, effects)
}

#[allow(unused)]
pub fn attack(damage: u32) -> Intention {
    Intention {
        damage,
        ..Default::default()
    }
}

#[allow(unused)]
pub fn enemy_template(name: &str, health: u32, pattern: Vec<Intention>) -> EnemyTemplate {
    EnemyTemplate {
        name: name.to_string(),
        max_health_min: health,
        max_health_max: health,
        sprite: format!("{name}.png"),
        damaged_sprite: None,
        intention_pattern: pattern,
    }
}

#[allow(unused)]
pub fn room(name: &str, levels: &str, enemies: &[&str]) -> CombatRoomRecord {
    CombatRoomRecord {
        name: name.to_string(),
        background: format!("{name}.png"),
        encountered_at_levels: Some(LevelRange::try_from(levels).expect("valid level range")),
        enemies: enemies.iter().map(|e| e.to_string()).collect(),
    }
}

#[allow(unused)]
pub fn special_room(name: &str, rarity: Rarity, actions: Vec<SpecialRoomAction>) -> SpecialRoom {
    SpecialRoom {
        rarity,
        name: name.to_string(),
        description: String::new(),
        background: format!("{name}.png"),
        actions,
    }
}

/// Five bands with one distinct room each, a boss, and the given reward cards.
#[allow(unused)]
pub fn catalog_builder(cards: Vec<CardDefinition>) -> CatalogBuilder {
    let mut builder = Catalog::builder()
        .cards(cards)
        .starting_cards(vec![strike(), strike(), strike(), defend(), defend()])
        .enemy(enemy_template("Rat", 8, vec![attack(2)]))
        .enemy(enemy_template("Ogre", 40, vec![attack(6)]))
        .boss_room(room("Throne", "1", &["Ogre"]));
    for level in 1..=5 {
        builder = builder.combat_room(room(&format!("Room {level}"), &level.to_string(), &["Rat"]));
    }
    builder
}

#[allow(unused)]
pub fn catalog_with_cards(cards: Vec<CardDefinition>) -> Catalog {
    catalog_builder(cards).build().expect("valid test catalog")
}

#[allow(unused)]
pub fn small_catalog() -> Catalog {
    catalog_with_cards(vec![
        strike(),
        defend(),
        card(
            "Cleave",
            1,
            CardEffects {
                damage_all: 4,
                ..Default::default()
            },
        )
        .with_rarity(Rarity::Uncommon),
        card(
            "Execute",
            3,
            CardEffects {
                target_damage: 25,
                ..Default::default()
            },
        )
        .with_rarity(Rarity::Rare),
    ])
}
