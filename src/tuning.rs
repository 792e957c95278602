//! Data-driven game balance
//!
//! Every knob the round engine reads lives here so it can be loaded from JSON
//! instead of being baked into the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{BackgroundColor, DecoyKind, Difficulty, StoneColor};

/// Population and speed for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyLevel {
    pub difficulty: Difficulty,
    /// Total icons including the target and clouds
    pub icon_count: usize,
    pub speed_multiplier: f32,
    pub cloud_count: usize,
}

impl DifficultyLevel {
    pub fn new(difficulty: Difficulty, icon_count: usize, speed_multiplier: f32, cloud_count: usize) -> Self {
        Self {
            difficulty,
            icon_count,
            speed_multiplier,
            cloud_count,
        }
    }

    /// Icons that are neither the target nor clouds
    pub fn decoy_count(&self) -> usize {
        self.icon_count.saturating_sub(1 + self.cloud_count)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidDifficulty {
            difficulty: self.difficulty,
            reason,
        };
        if self.icon_count < 1 + self.cloud_count {
            return Err(invalid(format!(
                "{} icons cannot hold a target and {} clouds",
                self.icon_count, self.cloud_count
            )));
        }
        if !self.speed_multiplier.is_finite() || self.speed_multiplier < 0.0 {
            return Err(invalid(format!(
                "speed multiplier {} must be finite and non-negative",
                self.speed_multiplier
            )));
        }
        Ok(())
    }
}

/// Game balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub icon_radius: f32,
    pub base_speed: f32,
    pub cloud_scale_min: f32,
    pub cloud_scale_max: f32,
    pub cloud_fade_secs: f32,
    pub cloud_frame_count: usize,
    /// Decoys are drawn uniformly from this set
    pub decoy_kinds: Vec<DecoyKind>,
    pub palette: Vec<BackgroundColor>,
    pub medium_streak: u32,
    pub hard_streak: u32,
    pub difficulties: Vec<DifficultyLevel>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            icon_radius: ICON_RADIUS,
            base_speed: BASE_SPEED,
            cloud_scale_min: CLOUD_SCALE_MIN,
            cloud_scale_max: CLOUD_SCALE_MAX,
            cloud_fade_secs: CLOUD_FADE_SECS,
            cloud_frame_count: CLOUD_FRAME_COUNT,
            decoy_kinds: vec![
                DecoyKind::Plain,
                DecoyKind::Stone(StoneColor::Green),
                DecoyKind::Stone(StoneColor::Blue),
                DecoyKind::Stone(StoneColor::Red),
            ],
            palette: vec![BackgroundColor::Red, BackgroundColor::Blue, BackgroundColor::Green],
            medium_streak: MEDIUM_STREAK,
            hard_streak: HARD_STREAK,
            difficulties: vec![
                DifficultyLevel::new(Difficulty::Easy, 20, 1.0, 5),
                DifficultyLevel::new(Difficulty::Medium, 45, 1.5, 10),
                DifficultyLevel::new(Difficulty::Hard, 75, 2.5, 15),
            ],
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Table entry for a difficulty
    pub fn level(&self, difficulty: Difficulty) -> Result<&DifficultyLevel, ConfigError> {
        if self.difficulties.is_empty() {
            return Err(ConfigError::EmptyDifficultyTable);
        }
        self.difficulties
            .iter()
            .find(|l| l.difficulty == difficulty)
            .ok_or(ConfigError::MissingDifficulty(difficulty))
    }

    /// Check everything round setup relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.icon_radius.is_finite() || self.icon_radius <= 0.0 {
            return Err(ConfigError::InvalidIconRadius(self.icon_radius));
        }
        if !self.base_speed.is_finite() || self.base_speed < 0.0 {
            return Err(ConfigError::InvalidDifficulty {
                difficulty: Difficulty::Easy,
                reason: format!("base speed {} must be finite and non-negative", self.base_speed),
            });
        }
        let scale_ok = self.cloud_scale_min.is_finite()
            && self.cloud_scale_max.is_finite()
            && self.cloud_scale_min > 0.0
            && self.cloud_scale_min <= self.cloud_scale_max;
        if !scale_ok {
            return Err(ConfigError::InvalidCloudScale {
                min: self.cloud_scale_min,
                max: self.cloud_scale_max,
            });
        }
        if self.cloud_frame_count == 0 {
            return Err(ConfigError::NoCloudFrames);
        }
        if self.palette.len() < 2 {
            return Err(ConfigError::PaletteTooSmall(self.palette.len()));
        }
        if self.difficulties.is_empty() {
            return Err(ConfigError::EmptyDifficultyTable);
        }
        // Escalation can reach every tier, so each needs an entry up front
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            if !self.difficulties.iter().any(|l| l.difficulty == difficulty) {
                return Err(ConfigError::MissingDifficulty(difficulty));
            }
        }
        for level in &self.difficulties {
            level.validate()?;
            if level.decoy_count() > 0 && self.decoy_kinds.is_empty() {
                return Err(ConfigError::EmptyDecoyKinds(level.difficulty));
            }
        }
        Ok(())
    }
}
