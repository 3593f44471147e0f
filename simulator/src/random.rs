use models::v1::{Rarity, RarityWeights};
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

use crate::ROOM_SEED_OFFSET;

/// The random stream for one dungeon room. It is passed explicitly to every
/// generation and combat call and reseeded whenever a room is entered.
#[derive(Clone, Debug)]
pub struct DungeonRng {
    inner: ChaCha8Rng,
}

impl DungeonRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn for_room(save_seed: u64, room_index: u32) -> Self {
        Self::from_seed(room_seed(save_seed, room_index))
    }

    pub fn reseed(&mut self, save_seed: u64, room_index: u32) {
        self.inner = ChaCha8Rng::seed_from_u64(room_seed(save_seed, room_index));
    }

    /// Inclusive on both ends.
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.inner.random_range(min..=max)
    }

    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.random::<f64>() < probability
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    pub fn rarity(&mut self, weights: &RarityWeights<u32>) -> Rarity {
        let total = weights.total();
        if total == 0 {
            return Rarity::Common;
        }
        let roll = self.inner.random_range(0..total);
        weights.tier_for_roll(roll)
    }
}

pub fn room_seed(save_seed: u64, room_index: u32) -> u64 {
    save_seed ^ (room_index as u64 + *ROOM_SEED_OFFSET)
}
