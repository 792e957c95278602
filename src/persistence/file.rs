//! JSON save file on native platforms

use std::fs;
use std::path::{Path, PathBuf};

use super::{SaveData, ScoreStore};
use crate::settings::Settings;

/// Single JSON file holding `SaveData`. Writes go through a temp file so a
/// crash mid-save never leaves a truncated save behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    data: SaveData,
}

impl JsonFileStore {
    /// Open (or lazily create) the save at `path`. Unreadable or corrupt
    /// files are treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = Self::read(&path).unwrap_or_default();
        Self { path, data }
    }

    fn read(path: &Path) -> Option<SaveData> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No save found at {}, starting fresh", path.display());
                return None;
            }
            Err(e) => {
                log::warn!("Failed to read save {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("Corrupt save {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write(&self) {
        if let Err(e) = self.try_write() {
            log::warn!("Failed to write save {}: {}", self.path.display(), e);
        }
    }

    fn try_write(&self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn load_high_score(&mut self) -> u32 {
        self.data.high_score
    }

    fn save_high_score(&mut self, score: u32) {
        self.data.high_score = score;
        self.write();
        log::info!("High score saved ({})", score);
    }

    fn load_settings(&mut self) -> Settings {
        self.data.settings.clone()
    }

    fn save_settings(&mut self, settings: &Settings) {
        self.data.settings = settings.clone();
        self.write();
        log::info!("Settings saved");
    }
}
