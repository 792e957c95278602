//! High score and settings storage
//!
//! The round engine treats storage as best effort: loads fall back to
//! defaults and failed saves are logged, never propagated.

mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Everything that survives between sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub high_score: u32,
    pub settings: Settings,
}

/// Persistence collaborator used by the round engine
pub trait ScoreStore {
    fn load_high_score(&mut self) -> u32;
    fn save_high_score(&mut self, score: u32);
    fn load_settings(&mut self) -> Settings;
    fn save_settings(&mut self, settings: &Settings);
}

/// In-memory store (tests, embedding, no-storage platforms)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub data: SaveData,
    /// Number of `save_high_score` calls
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_high_score(high_score: u32) -> Self {
        Self {
            data: SaveData {
                high_score,
                ..SaveData::default()
            },
            saves: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load_high_score(&mut self) -> u32 {
        self.data.high_score
    }

    fn save_high_score(&mut self, score: u32) {
        self.data.high_score = score;
        self.saves += 1;
    }

    fn load_settings(&mut self) -> Settings {
        self.data.settings.clone()
    }

    fn save_settings(&mut self, settings: &Settings) {
        self.data.settings = settings.clone();
    }
}
