//! Error types

use crate::sim::{Difficulty, RoundPhase};

/// Malformed configuration. Always fatal at round setup.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Screen too small (or non-finite) to hold an icon inside the margins
    #[error("invalid screen bounds {width}x{height} for icon radius {icon_radius}")]
    InvalidBounds {
        width: f32,
        height: f32,
        icon_radius: f32,
    },

    #[error("icon radius must be positive and finite, got {0}")]
    InvalidIconRadius(f32),

    #[error("difficulty table is empty")]
    EmptyDifficultyTable,

    #[error("no difficulty table entry for {0:?}")]
    MissingDifficulty(Difficulty),

    /// Table entry that cannot be realised (too few icons, bad speed)
    #[error("invalid {difficulty:?} entry: {reason}")]
    InvalidDifficulty {
        difficulty: Difficulty,
        reason: String,
    },

    #[error("invalid cloud scale range [{min}, {max}]")]
    InvalidCloudScale { min: f32, max: f32 },

    #[error("decoy kind set is empty but {0:?} needs decoys")]
    EmptyDecoyKinds(Difficulty),

    #[error("palette needs at least two colours, got {0}")]
    PaletteTooSmall(usize),

    #[error("cloud animation needs at least one frame")]
    NoCloudFrames,

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the round engine
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Action not reachable from the current phase (e.g. continue after a loss)
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: RoundPhase,
    },
}
