use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::CardDefinition;

/// Persistent progression of one named run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    pub name: String,
    pub seed: u64,
    pub room_index: u32,
    pub player_health: u32,
    pub player_base_mana: u32,
    pub cards: Vec<Arc<CardDefinition>>,
}

impl std::fmt::Display for SaveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Save<{}, room {}, {} health, {} mana, {} cards>",
            self.name,
            self.room_index + 1,
            self.player_health,
            self.player_base_mana,
            self.cards.len()
        )
    }
}
