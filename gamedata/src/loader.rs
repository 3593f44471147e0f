use std::path::{Path, PathBuf};

use anyhow::Context;
use models::v1::{CardDefinition, CombatRoomRecord, EnemyTemplate, SpecialRoom};
use serde::de::DeserializeOwned;

use crate::{Catalog, CatalogBuilder};

pub const CARDS_FILE: &str = "cards.json";
pub const STARTING_CARDS_FILE: &str = "cards_start.json";
pub const ENEMIES_FILE: &str = "enemies.json";
pub const COMBAT_ROOMS_DIR: &str = "rooms/combat";
pub const BOSS_ROOMS_DIR: &str = "rooms/boss";
pub const SPECIAL_ROOMS_DIR: &str = "rooms/special";

impl Catalog {
    /// Loads and validates every record set below `root`. Any missing or malformed
    /// record aborts the load.
    pub fn load(root: impl AsRef<Path>) -> anyhow::Result<Catalog> {
        let root = root.as_ref();
        let cards: Vec<CardDefinition> = read_json(&root.join(CARDS_FILE))?;
        let starting_cards: Vec<CardDefinition> = read_json(&root.join(STARTING_CARDS_FILE))?;
        let enemies: Vec<EnemyTemplate> = read_json(&root.join(ENEMIES_FILE))?;

        let mut builder = CatalogBuilder::default()
            .cards(cards)
            .starting_cards(starting_cards);
        for enemy in enemies {
            builder = builder.enemy(enemy);
        }
        for path in json_files(&root.join(COMBAT_ROOMS_DIR), true)? {
            builder = builder.combat_room(read_json::<CombatRoomRecord>(&path)?);
        }
        for path in json_files(&root.join(BOSS_ROOMS_DIR), false)? {
            builder = builder.boss_room(read_json::<CombatRoomRecord>(&path)?);
        }
        let special_dir = root.join(SPECIAL_ROOMS_DIR);
        if special_dir.is_dir() {
            for path in json_files(&special_dir, false)? {
                builder = builder.special_room(read_json::<SpecialRoom>(&path)?);
            }
        }

        let catalog = builder
            .build()
            .with_context(|| format!("invalid content in {}", root.display()))?;
        tracing::info!(root = %root.display(), %catalog, "loaded content catalog");
        Ok(catalog)
    }

    pub fn load_bundled() -> anyhow::Result<Catalog> {
        Catalog::load(&*crate::BUNDLED_CONTENT_DIR)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read content file {}", path.display()))?;
    serde_json::from_str(&source)
        .with_context(|| format!("malformed content file {}", path.display()))
}

/// Every `.json` file in `dir`, sorted by path so load order never depends on the
/// file system.
fn json_files(dir: &Path, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("unable to read content directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                files.extend(json_files(&path, true)?);
            }
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
