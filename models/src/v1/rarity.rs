use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityWeights<T> {
    pub common: T,
    pub uncommon: T,
    pub rare: T,
}

impl Default for RarityWeights<u32> {
    fn default() -> Self {
        Self {
            common: 60,
            uncommon: 30,
            rare: 10,
        }
    }
}

impl<T: Copy + Into<u64>> RarityWeights<T> {
    pub fn total(&self) -> u64 {
        self.common.into() + self.uncommon.into() + self.rare.into()
    }

    /// Maps a roll in `0..total()` onto a tier, walking the table in
    /// `Rarity::ALL` order.
    pub fn tier_for_roll(&self, roll: u64) -> Rarity {
        let mut remaining = roll;
        for rarity in Rarity::ALL {
            let weight: u64 = rarity.select(self).into();
            if remaining < weight {
                return rarity;
            }
            remaining -= weight;
        }
        Rarity::Rare
    }
}

#[derive(
    Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
}

impl Rarity {
    pub const ALL: [Rarity; 3] = [Rarity::Common, Rarity::Uncommon, Rarity::Rare];

    pub fn select<T: Copy>(&self, t: &RarityWeights<T>) -> T {
        match self {
            Rarity::Common => t.common,
            Rarity::Uncommon => t.uncommon,
            Rarity::Rare => t.rare,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rarity::Common => write!(f, "common"),
            Rarity::Uncommon => write!(f, "uncommon"),
            Rarity::Rare => write!(f, "rare"),
        }
    }
}

impl TryFrom<&str> for Rarity {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            rarity => anyhow::bail!("invalid rarity {rarity}"),
        }
    }
}
