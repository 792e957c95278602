//! Browser LocalStorage backend

use super::{SaveData, ScoreStore};
use crate::settings::Settings;

/// Save data kept as JSON under one LocalStorage key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    data: SaveData,
}

impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "find_pugie_save";

    /// Load from LocalStorage, falling back to defaults
    pub fn open() -> Self {
        let data = Self::storage()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|json| serde_json::from_str::<SaveData>(&json).ok());

        match data {
            Some(data) => {
                log::info!("Loaded save (high score {})", data.high_score);
                Self { data }
            }
            None => {
                log::info!("No save found, starting fresh");
                Self {
                    data: SaveData::default(),
                }
            }
        }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    fn write(&self) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, save skipped");
            return;
        };
        match serde_json::to_string(&self.data) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage write failed");
                }
            }
            Err(e) => log::warn!("Failed to encode save: {}", e),
        }
    }
}

impl ScoreStore for LocalStorageStore {
    fn load_high_score(&mut self) -> u32 {
        self.data.high_score
    }

    fn save_high_score(&mut self, score: u32) {
        self.data.high_score = score;
        self.write();
    }

    fn load_settings(&mut self) -> Settings {
        self.data.settings.clone()
    }

    fn save_settings(&mut self, settings: &Settings) {
        self.data.settings = settings.clone();
        self.write();
    }
}
