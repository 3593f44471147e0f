use std::sync::Arc;

use models::v1::CardDefinition;

use crate::Deck;

/// Card removal offered by a special room. Every owned card is a candidate;
/// each pick removes one copy until the budget runs out or the player skips.
#[derive(Clone, Debug)]
pub struct CardRemoval {
    pub remaining: u32,
    pub choices: Vec<Arc<CardDefinition>>,
    pub removed: Vec<Arc<CardDefinition>>,
    skipped: bool,
}

impl CardRemoval {
    pub fn new(deck: &Deck, count: u32) -> Self {
        Self {
            remaining: count,
            choices: deck.removal_choices(),
            removed: Vec::new(),
            skipped: false,
        }
    }

    pub fn select(&mut self, deck: &mut Deck, index: usize) -> bool {
        if self.is_done() {
            return false;
        }
        let Some(card) = self.choices.get(index).cloned() else {
            return false;
        };
        if !deck.remove_card(&card) {
            return false;
        }
        tracing::debug!(card = %card, remaining = self.remaining - 1, "card removed");
        self.choices.remove(index);
        self.removed.push(card);
        self.remaining -= 1;
        true
    }

    pub fn skip(&mut self) {
        self.skipped = true;
    }

    pub fn is_done(&self) -> bool {
        self.skipped || self.remaining == 0 || self.choices.is_empty()
    }
}
