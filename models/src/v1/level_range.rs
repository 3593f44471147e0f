use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Dungeon depths a combat room can appear at, written as `"1-3,5"`.
/// Levels are 1-based; level `n` is difficulty band `n - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LevelRange(Vec<RangeInclusive<usize>>);

impl LevelRange {
    pub fn levels(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().flat_map(|r| r.clone())
    }

    pub fn bands(&self) -> impl Iterator<Item = usize> + '_ {
        self.levels().map(|level| level - 1)
    }

    pub fn max_level(&self) -> usize {
        self.0.iter().map(|r| *r.end()).max().unwrap_or(0)
    }
}

impl TryFrom<&str> for LevelRange {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut ranges = Vec::new();
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let range = match part.split_once('-') {
                Some((start, end)) => {
                    let start: usize = start.trim().parse()?;
                    let end: usize = end.trim().parse()?;
                    if start > end {
                        anyhow::bail!("inverted level range {part:?}");
                    }
                    start..=end
                }
                None => {
                    let level: usize = part.parse()?;
                    level..=level
                }
            };
            if *range.start() == 0 {
                anyhow::bail!("levels start at 1, got {part:?}");
            }
            ranges.push(range);
        }
        if ranges.is_empty() {
            anyhow::bail!("empty level range {value:?}");
        }
        Ok(Self(ranges))
    }
}

impl TryFrom<String> for LevelRange {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LevelRange::try_from(value.as_str())
    }
}

impl From<LevelRange> for String {
    fn from(value: LevelRange) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for LevelRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|r| match r.start() == r.end() {
                true => format!("{}", r.start()),
                false => format!("{}-{}", r.start(), r.end()),
            })
            .collect::<Vec<String>>()
            .join(",");
        write!(f, "{parts}")
    }
}
