use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{EnemyTemplate, LevelRange, Rarity};

/// Combat room as written in content files; enemies are referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatRoomRecord {
    #[serde(default)]
    pub name: String,
    pub background: String,
    /// Ignored for boss rooms.
    #[serde(default)]
    pub encountered_at_levels: Option<LevelRange>,
    pub enemies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatRoom {
    pub name: String,
    pub background: String,
    pub enemies: Vec<Arc<EnemyTemplate>>,
}

/// One-shot choice offered by a special room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialRoomAction {
    pub name: String,
    pub description: String,
    pub change_health: i32,
    pub reward_card_count: u32,
    pub remove_card_count: u32,
    pub change_mana_permanent: i32,
}

impl SpecialRoomAction {
    /// Health change actually applied; a loss never takes the player below 1.
    pub fn effective_health_change(&self, current_health: u32) -> i32 {
        if self.change_health >= 0 {
            return self.change_health;
        }
        let max_loss = current_health.saturating_sub(1) as i32;
        -self.change_health.abs().min(max_loss)
    }

    pub fn effects_text(&self, current_health: u32) -> Vec<String> {
        let mut lines = Vec::new();
        let health = self.effective_health_change(current_health);
        if health > 0 {
            lines.push(format!("Gain {health} health."));
        } else if health < 0 {
            lines.push(format!("Lose {} health.", health.unsigned_abs()));
        }
        if self.reward_card_count > 0 {
            lines.push(format!(
                "Choose a card from {} random cards to add to your deck.",
                self.reward_card_count
            ));
        }
        if self.remove_card_count > 0 {
            lines.push(format!(
                "Remove {} cards from your deck.",
                self.remove_card_count
            ));
        }
        if self.change_mana_permanent > 0 {
            lines.push(format!(
                "Gain {} additional mana at the start of every turn.",
                self.change_mana_permanent
            ));
        } else if self.change_mana_permanent < 0 {
            lines.push(format!(
                "Lose {} mana at the start of every turn.",
                self.change_mana_permanent.unsigned_abs()
            ));
        }
        if lines.is_empty() {
            lines.push("No effects.".to_string());
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialRoom {
    #[serde(default)]
    pub rarity: Rarity,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub background: String,
    pub actions: Vec<SpecialRoomAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomDefinition {
    Combat(Arc<CombatRoom>),
    Special(Arc<SpecialRoom>),
}

impl RoomDefinition {
    pub fn background(&self) -> &str {
        match self {
            RoomDefinition::Combat(room) => &room.background,
            RoomDefinition::Special(room) => &room.background,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RoomDefinition::Combat(room) => &room.name,
            RoomDefinition::Special(room) => &room.name,
        }
    }
}
