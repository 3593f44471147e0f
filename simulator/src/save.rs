use std::path::{Path, PathBuf};

use anyhow::Context;
use gamedata::Catalog;
use models::v1::SaveState;
use sha2::{Digest, Sha256};

use crate::RunConfig;

const SAVE_EXTENSION: &str = "json";

/// Dungeon seed of a save: the first eight bytes of the SHA-256 of its name.
pub fn seed_from_name(name: &str) -> u64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

pub fn new_save(name: &str, catalog: &Catalog, config: &RunConfig) -> SaveState {
    SaveState {
        name: name.to_string(),
        seed: seed_from_name(name),
        room_index: 0,
        player_health: config.player_max_health,
        player_base_mana: config.starting_base_mana,
        cards: catalog.starting_cards.clone(),
    }
}

/// One JSON file per named save.
#[derive(Clone, Debug)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> anyhow::Result<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.{SAVE_EXTENSION}")))
    }

    pub fn exists(&self, name: &str) -> anyhow::Result<bool> {
        Ok(self.path_for(name)?.is_file())
    }

    /// Names of every save on disk, sorted.
    pub fn list(&self) -> anyhow::Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("unable to read save directory {}", self.dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == SAVE_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> anyhow::Result<SaveState> {
        let path = self.path_for(name)?;
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("unable to read save {}", path.display()))?;
        let save: SaveState = serde_json::from_str(&source)
            .with_context(|| format!("malformed save {}", path.display()))?;
        if save.name != name {
            anyhow::bail!(
                "save file {} belongs to {:?}, not {name:?}",
                path.display(),
                save.name
            );
        }
        Ok(save)
    }

    pub fn load_or_create(
        &self,
        name: &str,
        catalog: &Catalog,
        config: &RunConfig,
    ) -> anyhow::Result<SaveState> {
        if self.exists(name)? {
            let save = self.load(name)?;
            tracing::info!(%save, "resuming save");
            return Ok(save);
        }
        let save = new_save(name, catalog, config);
        tracing::info!(%save, seed = save.seed, "starting new save");
        Ok(save)
    }

    pub fn save(&self, save: &SaveState) -> anyhow::Result<()> {
        let path = self.path_for(&save.name)?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("unable to create save directory {}", self.dir.display()))?;
        let json = serde_json::to_string_pretty(save)?;
        std::fs::write(&path, json)
            .with_context(|| format!("unable to write save {}", path.display()))?;
        tracing::debug!(%save, path = %path.display(), "save written");
        Ok(())
    }

    /// Returns whether a file was actually removed.
    pub fn delete(&self, name: &str) -> anyhow::Result<bool> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("unable to delete save {}", path.display()))?;
        tracing::info!(name, "save deleted");
        Ok(true)
    }
}

fn validate_name(name: &str) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("save name must not be empty");
    }
    if name.contains(['/', '\\']) || name.starts_with('.') {
        anyhow::bail!("invalid save name {name:?}");
    }
    Ok(())
}
