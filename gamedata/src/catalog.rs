use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use models::v1::{
    CardDefinition, CombatRoom, CombatRoomRecord, EnemyTemplate, Rarity, SpecialRoom,
};

/// Immutable reference data, built once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub cards: Vec<Arc<CardDefinition>>,
    pub starting_cards: Vec<Arc<CardDefinition>>,
    pub enemies: Vec<Arc<EnemyTemplate>>,
    pub bands: Vec<Vec<Arc<CombatRoom>>>,
    pub boss_rooms: Vec<Arc<CombatRoom>>,
    pub special_rooms: Vec<Arc<SpecialRoom>>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The room after the deepest difficulty band holds the boss.
    pub fn boss_room_index(&self) -> u32 {
        self.bands.len() as u32
    }

    pub fn band(&self, index: usize) -> &[Arc<CombatRoom>] {
        self.bands.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cards_of_rarity(&self, rarity: Rarity) -> Vec<&Arc<CardDefinition>> {
        self.cards.iter().filter(|c| c.rarity == rarity).collect()
    }

    pub fn special_rooms_of_rarity(&self, rarity: Rarity) -> Vec<&Arc<SpecialRoom>> {
        self.special_rooms
            .iter()
            .filter(|r| r.rarity == rarity)
            .collect()
    }

    pub fn enemy(&self, name: &str) -> Option<&Arc<EnemyTemplate>> {
        self.enemies.iter().find(|e| e.name == name)
    }

    pub fn card(&self, name: &str) -> Option<&Arc<CardDefinition>> {
        self.cards
            .iter()
            .chain(self.starting_cards.iter())
            .find(|c| c.name == name)
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Catalog({} cards, {} starting, {} enemies, {} bands, {} boss rooms, {} special rooms)",
            self.cards.len(),
            self.starting_cards.len(),
            self.enemies.len(),
            self.bands.len(),
            self.boss_rooms.len(),
            self.special_rooms.len(),
        )
    }
}

/// Collects raw records and validates them into a [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    cards: Vec<CardDefinition>,
    starting_cards: Vec<CardDefinition>,
    enemies: Vec<EnemyTemplate>,
    combat_rooms: Vec<CombatRoomRecord>,
    boss_rooms: Vec<CombatRoomRecord>,
    special_rooms: Vec<SpecialRoom>,
}

impl CatalogBuilder {
    pub fn card(mut self, card: CardDefinition) -> Self {
        self.cards.push(card);
        self
    }

    pub fn cards(mut self, cards: impl IntoIterator<Item = CardDefinition>) -> Self {
        self.cards.extend(cards);
        self
    }

    pub fn starting_cards(mut self, cards: impl IntoIterator<Item = CardDefinition>) -> Self {
        self.starting_cards.extend(cards);
        self
    }

    pub fn enemy(mut self, enemy: EnemyTemplate) -> Self {
        self.enemies.push(enemy);
        self
    }

    pub fn combat_room(mut self, room: CombatRoomRecord) -> Self {
        self.combat_rooms.push(room);
        self
    }

    pub fn boss_room(mut self, room: CombatRoomRecord) -> Self {
        self.boss_rooms.push(room);
        self
    }

    pub fn special_room(mut self, room: SpecialRoom) -> Self {
        self.special_rooms.push(room);
        self
    }

    pub fn build(self) -> anyhow::Result<Catalog> {
        if self.cards.is_empty() {
            anyhow::bail!("no reward cards defined");
        }
        if self.starting_cards.is_empty() {
            anyhow::bail!("no starting cards defined");
        }

        let mut seen_cards: HashSet<&str> = HashSet::new();
        for card in &self.cards {
            if !seen_cards.insert(card.name.as_str()) {
                anyhow::bail!("card {:?} is defined twice", card.name);
            }
        }

        let mut enemies: HashMap<String, Arc<EnemyTemplate>> = HashMap::new();
        let mut enemy_order: Vec<Arc<EnemyTemplate>> = Vec::with_capacity(self.enemies.len());
        for enemy in self.enemies {
            enemy.validate()?;
            let enemy = Arc::new(enemy);
            if enemies
                .insert(enemy.name.clone(), Arc::clone(&enemy))
                .is_some()
            {
                anyhow::bail!("enemy {:?} is defined twice", enemy.name);
            }
            enemy_order.push(enemy);
        }

        let resolve = |record: &CombatRoomRecord| -> anyhow::Result<Arc<CombatRoom>> {
            if record.enemies.is_empty() {
                anyhow::bail!("combat room {:?} spawns no enemies", record.name);
            }
            let spawns = record
                .enemies
                .iter()
                .map(|name| {
                    enemies.get(name).cloned().ok_or(anyhow::anyhow!(
                        "combat room {:?} references unknown enemy {name:?}",
                        record.name
                    ))
                })
                .collect::<anyhow::Result<Vec<Arc<EnemyTemplate>>>>()?;
            Ok(Arc::new(CombatRoom {
                name: record.name.clone(),
                background: record.background.clone(),
                enemies: spawns,
            }))
        };

        if self.combat_rooms.is_empty() {
            anyhow::bail!("no combat rooms defined");
        }
        let mut bands: Vec<Vec<Arc<CombatRoom>>> = Vec::new();
        for record in &self.combat_rooms {
            let levels = record.encountered_at_levels.as_ref().ok_or(anyhow::anyhow!(
                "combat room {:?} has no encountered_at_levels",
                record.name
            ))?;
            let room = resolve(record)?;
            for band in levels.bands() {
                while band >= bands.len() {
                    bands.push(Vec::new());
                }
                bands[band].push(Arc::clone(&room));
            }
        }
        if let Some(empty) = bands.iter().position(Vec::is_empty) {
            anyhow::bail!(
                "no combat rooms found for level {} (band {empty})",
                empty + 1
            );
        }

        if self.boss_rooms.is_empty() {
            anyhow::bail!("no boss rooms defined");
        }
        let boss_rooms = self
            .boss_rooms
            .iter()
            .map(resolve)
            .collect::<anyhow::Result<Vec<_>>>()?;

        for room in &self.special_rooms {
            if room.actions.is_empty() {
                anyhow::bail!("special room {:?} offers no actions", room.name);
            }
        }

        let finish = |mut card: CardDefinition| {
            card.ensure_description();
            Arc::new(card)
        };

        Ok(Catalog {
            cards: self.cards.into_iter().map(finish).collect(),
            starting_cards: self.starting_cards.into_iter().map(finish).collect(),
            enemies: enemy_order,
            bands,
            boss_rooms,
            special_rooms: self.special_rooms.into_iter().map(Arc::new).collect(),
        })
    }
}
