//! Entity and session types shared by the simulation

use std::str::FromStr;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Opaque entity identifier, stable for the entity's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out entity ids. Lives for the whole session so ids never repeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Stone decoy colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoneColor {
    Green,
    Blue,
    Red,
}

/// Decoy variants. Only affects rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecoyKind {
    Plain,
    Stone(StoneColor),
}

/// What an entity is. Determines rendering and hit priority, never physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconKind {
    Target,
    Decoy(DecoyKind),
    Cloud,
}

impl IconKind {
    pub fn is_cloud(&self) -> bool {
        matches!(self, IconKind::Cloud)
    }

    pub fn is_decoy(&self) -> bool {
        matches!(self, IconKind::Decoy(_))
    }
}

/// One on-screen icon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconEntity {
    pub id: EntityId,
    pub kind: IconKind,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Size multiplier (clouds only)
    pub scale: f32,
    /// Degrees (clouds only)
    pub rotation: f32,
    /// 0-1, animated during cloud removal
    pub opacity: f32,
    /// Mid-removal; never hit-tested again
    pub fading: bool,
}

impl IconEntity {
    pub fn new(id: EntityId, kind: IconKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            fading: false,
        }
    }
}

/// A tapped cloud on its way out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FadingIcon {
    pub entity: IconEntity,
    /// Seconds since the tap
    pub elapsed: f32,
}

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Round background colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackgroundColor {
    Red,
    Blue,
    Green,
}

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl ScreenBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check that an icon of `icon_radius` fits between the margins on both axes
    pub fn validate(&self, icon_radius: f32) -> Result<(), ConfigError> {
        let fits = |dim: f32| dim.is_finite() && dim > 0.0 && dim >= 2.0 * icon_radius;
        if fits(self.width) && fits(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidBounds {
                width: self.width,
                height: self.height,
                icon_radius,
            })
        }
    }

    /// Largest allowed centre coordinate on each axis
    #[inline]
    pub fn max_center(&self, icon_radius: f32) -> Vec2 {
        Vec2::new(self.width - icon_radius, self.height - icon_radius)
    }
}

/// Session seed wrapper for the deterministic RNG
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
