use std::path::{Path, PathBuf};

use anyhow::Context;
use models::v1::RarityWeights;
use serde::{Deserialize, Serialize};

/// Per-run tunables. Every field has a default so a config file only needs to
/// name what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub content_dir: Option<PathBuf>,
    pub save_dir: PathBuf,
    pub frame_delta: f64,
    pub pause_seconds: f64,
    pub leak_grace_seconds: f64,
    pub player_max_health: u32,
    pub starting_base_mana: u32,
    pub draw_limit: i32,
    pub reward_card_count: usize,
    pub special_room_chance: f64,
    pub rarity_weights: RarityWeights<u32>,
    pub reward_retry_limit: usize,
    pub screen: ScreenLayout,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            save_dir: PathBuf::from("saves"),
            frame_delta: 1.0 / 60.0,
            pause_seconds: 2.0,
            leak_grace_seconds: 3.0,
            player_max_health: 100,
            starting_base_mana: 3,
            draw_limit: 5,
            reward_card_count: 3,
            special_room_chance: 0.2,
            rarity_weights: RarityWeights::default(),
            reward_retry_limit: 1000,
            screen: ScreenLayout::default(),
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let config: RunConfig = toml::from_str(source).context("malformed run config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read run config {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.frame_delta <= 0.0 {
            anyhow::bail!("frame_delta must be positive, got {}", self.frame_delta);
        }
        if self.pause_seconds < 0.0 {
            anyhow::bail!("pause_seconds must not be negative");
        }
        if self.player_max_health == 0 {
            anyhow::bail!("player_max_health must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.special_room_chance) {
            anyhow::bail!(
                "special_room_chance must be within [0, 1], got {}",
                self.special_room_chance
            );
        }
        if self.rarity_weights.total() == 0 {
            anyhow::bail!("rarity_weights must not all be zero");
        }
        if self.reward_retry_limit == 0 {
            anyhow::bail!("reward_retry_limit must be at least 1");
        }
        Ok(())
    }
}

/// Virtual screen the hand and enemy row are laid out on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenLayout {
    pub width: f32,
    pub height: f32,
    pub card_width: f32,
    pub card_spacing: f32,
    pub hand_y: f32,
    pub enemy_y: f32,
    pub draw_pile: (f32, f32),
    pub discard_pile: (f32, f32),
    pub exhaust_pile: (f32, f32),
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            card_width: 120.0,
            card_spacing: 12.0,
            hand_y: 600.0,
            enemy_y: 260.0,
            draw_pile: (60.0, 640.0),
            discard_pile: (1220.0, 640.0),
            exhaust_pile: (1220.0, 520.0),
        }
    }
}
