use std::{collections::HashSet, sync::Arc};

use gamedata::Catalog;
use models::v1::{CardDefinition, CombatRoom, RoomDefinition};

use crate::{DungeonRng, EnemyId, EnemyInstance, RunConfig};

/// Room, enemy and reward selection. Every draw comes from the room's
/// [`DungeonRng`], so a seed replays the same dungeon.
#[derive(Clone, Copy, Debug)]
pub struct DungeonGenerator<'a> {
    catalog: &'a Catalog,
    config: &'a RunConfig,
}

impl<'a> DungeonGenerator<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a RunConfig) -> Self {
        Self { catalog, config }
    }

    pub fn is_boss_room(&self, room_index: u32) -> bool {
        room_index == self.catalog.boss_room_index()
    }

    pub fn select_room(
        &self,
        room_index: u32,
        rng: &mut DungeonRng,
    ) -> anyhow::Result<RoomDefinition> {
        let boss_index = self.catalog.boss_room_index();
        if room_index > boss_index {
            anyhow::bail!("room {room_index} lies past the boss room {boss_index}");
        }
        if room_index == boss_index {
            let room = rng
                .pick(&self.catalog.boss_rooms)
                .ok_or(anyhow::anyhow!("no boss rooms to pick from"))?;
            return Ok(RoomDefinition::Combat(Arc::clone(room)));
        }
        if room_index == 0 {
            return self.band_room(0, rng);
        }

        if room_index > 1
            && !self.catalog.special_rooms.is_empty()
            && rng.chance(self.config.special_room_chance)
        {
            let rarity = rng.rarity(&self.config.rarity_weights);
            let candidates = self.catalog.special_rooms_of_rarity(rarity);
            match rng.pick(&candidates) {
                Some(room) => return Ok(RoomDefinition::Special(Arc::clone(room))),
                None => tracing::warn!(
                    %rarity,
                    room_index,
                    "no special rooms of this rarity, falling back to a combat room"
                ),
            }
        }

        let last_band = self.catalog.bands.len().saturating_sub(1) as u32;
        let low = room_index.min(last_band);
        let high = (room_index + 2).min(last_band);
        let band = rng.range_inclusive(low, high);
        self.band_room(band as usize, rng)
    }

    fn band_room(&self, band: usize, rng: &mut DungeonRng) -> anyhow::Result<RoomDefinition> {
        let room = rng
            .pick(self.catalog.band(band))
            .ok_or(anyhow::anyhow!("difficulty band {band} has no rooms"))?;
        Ok(RoomDefinition::Combat(Arc::clone(room)))
    }

    /// Rolls each enemy's max health once, inclusive of both ends.
    pub fn spawn_enemies(&self, room: &CombatRoom, rng: &mut DungeonRng) -> Vec<EnemyInstance> {
        room.enemies
            .iter()
            .enumerate()
            .map(|(slot, template)| {
                let health = rng.range_inclusive(template.max_health_min, template.max_health_max);
                EnemyInstance::new(EnemyId(slot), Arc::clone(template), health)
            })
            .collect()
    }

    /// Draws `count` distinct reward cards, rarity first, then uniformly within
    /// the tier. Asking for more distinct cards than exist, or blowing the retry
    /// ceiling, is a content error.
    pub fn generate_reward_cards(
        &self,
        count: usize,
        rng: &mut DungeonRng,
    ) -> anyhow::Result<Vec<Arc<CardDefinition>>> {
        let distinct: HashSet<&str> = self.catalog.cards.iter().map(|c| c.name.as_str()).collect();
        if distinct.len() < count {
            anyhow::bail!(
                "cannot offer {count} distinct reward cards, only {} exist",
                distinct.len()
            );
        }

        let mut chosen: Vec<Arc<CardDefinition>> = Vec::with_capacity(count);
        let mut attempts = 0;
        while chosen.len() < count {
            attempts += 1;
            if attempts > self.config.reward_retry_limit {
                anyhow::bail!(
                    "gave up drawing {count} distinct reward cards after {} attempts",
                    self.config.reward_retry_limit
                );
            }
            let rarity = rng.rarity(&self.config.rarity_weights);
            let pool = self.catalog.cards_of_rarity(rarity);
            let Some(card) = rng.pick(&pool) else {
                continue;
            };
            if chosen.iter().any(|c| c.name == card.name) {
                continue;
            }
            chosen.push(Arc::clone(card));
        }
        Ok(chosen)
    }
}
