use std::sync::Arc;

use models::v1::CardDefinition;

use crate::{CardId, DungeonRng};

/// A card in hand. Piles hold bare definitions; a copy only gets an identity
/// once it is drawn.
#[derive(Clone, Debug)]
pub struct CardInstance {
    pub id: CardId,
    pub definition: Arc<CardDefinition>,
}

impl CardInstance {
    pub fn new(definition: Arc<CardDefinition>) -> Self {
        Self {
            id: CardId::new(),
            definition,
        }
    }
}

impl std::fmt::Display for CardInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.definition.name, self.id)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DrawResult {
    pub drawn: Vec<CardInstance>,
    pub reshuffled: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Deck {
    pub draw: Vec<Arc<CardDefinition>>,
    pub discard: Vec<Arc<CardDefinition>>,
    pub exhaust: Vec<Arc<CardDefinition>>,
    pub hand: Vec<CardInstance>,
}

impl Deck {
    /// Every card of the collection starts in a shuffled draw pile.
    pub fn from_collection(cards: &[Arc<CardDefinition>], rng: &mut DungeonRng) -> Self {
        let mut draw = cards.to_vec();
        rng.shuffle(&mut draw);
        Self {
            draw,
            ..Default::default()
        }
    }

    /// Draws up to `count` cards into the hand. A short draw pile first takes the
    /// whole discard pile back; running out after that just draws fewer.
    pub fn draw(&mut self, count: usize, rng: &mut DungeonRng) -> DrawResult {
        let mut result = DrawResult::default();
        if self.draw.len() < count && !self.discard.is_empty() {
            result.reshuffled = self.discard.len();
            self.draw.append(&mut self.discard);
            rng.shuffle(&mut self.draw);
        }
        for _ in 0..count {
            let Some(definition) = self.draw.pop() else {
                break;
            };
            let card = CardInstance::new(definition);
            self.hand.push(card.clone());
            result.drawn.push(card);
        }
        result
    }

    pub fn discard_hand(&mut self) -> Vec<CardInstance> {
        let hand = std::mem::take(&mut self.hand);
        self.discard
            .extend(hand.iter().map(|c| Arc::clone(&c.definition)));
        hand
    }

    pub fn hand_card(&self, id: CardId) -> Option<&CardInstance> {
        self.hand.iter().find(|c| c.id == id)
    }

    pub fn take_from_hand(&mut self, id: CardId) -> Option<CardInstance> {
        let position = self.hand.iter().position(|c| c.id == id)?;
        Some(self.hand.remove(position))
    }

    /// Everything the player still owns: the multiset written back to the save.
    pub fn collection(&self) -> Vec<Arc<CardDefinition>> {
        self.draw
            .iter()
            .chain(self.discard.iter())
            .chain(self.exhaust.iter())
            .cloned()
            .chain(self.hand.iter().map(|c| Arc::clone(&c.definition)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.draw.len() + self.discard.len() + self.exhaust.len() + self.hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removal candidates in pile order: draw, discard, exhaust.
    pub fn removal_choices(&self) -> Vec<Arc<CardDefinition>> {
        self.draw
            .iter()
            .chain(self.discard.iter())
            .chain(self.exhaust.iter())
            .cloned()
            .collect()
    }

    /// Permanently drops one copy of `card`, taking from the draw pile first.
    pub fn remove_card(&mut self, card: &CardDefinition) -> bool {
        for pile in [&mut self.draw, &mut self.discard, &mut self.exhaust] {
            if let Some(position) = pile.iter().position(|c| c.as_ref() == card) {
                pile.remove(position);
                return true;
            }
        }
        false
    }
}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Deck(draw={}, discard={}, exhaust={}, hand={})",
            self.draw.len(),
            self.discard.len(),
            self.exhaust.len(),
            self.hand.len()
        )
    }
}
