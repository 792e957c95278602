//! Find Pugie - a spot-the-icon tap game
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (entities, motion, hit testing, progression)
//! - `game`: Round engine driving the simulation from taps and frame time
//! - `persistence`: High score and settings storage
//! - `audio`: Sound cue sink and background music state
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod autoplay;
pub mod error;
pub mod game;
pub mod observe;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioManager, AudioSink, SoundEffect};
pub use error::{ConfigError, GameError};
pub use game::{Game, RoundHandle};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed motion timestep (one simulation tick)
    pub const SIM_DT: f32 = 0.02;
    /// Cloud animation frame period
    pub const CLOUD_FRAME_DT: f32 = 0.5;
    /// Maximum motion ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the clocks (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Icon half-size, also the margin kept from every screen edge
    pub const ICON_RADIUS: f32 = 50.0;
    /// Velocity component range before the difficulty multiplier (pixels/tick)
    pub const BASE_SPEED: f32 = 2.0;

    /// Cloud scale range
    pub const CLOUD_SCALE_MIN: f32 = 0.7;
    pub const CLOUD_SCALE_MAX: f32 = 1.5;
    /// Time a tapped cloud takes to fade out before removal
    pub const CLOUD_FADE_SECS: f32 = 0.4;
    /// Frames in the cloud ping-pong animation
    pub const CLOUD_FRAME_COUNT: usize = 4;

    /// Streak needed to escalate Easy -> Medium
    pub const MEDIUM_STREAK: u32 = 5;
    /// Streak needed to escalate Medium -> Hard
    pub const HARD_STREAK: u32 = 10;
}
