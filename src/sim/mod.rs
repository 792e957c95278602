//! Deterministic round simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (draw order)
//! - No rendering, audio or storage dependencies

pub mod fade;
pub mod hit;
pub mod progression;
pub mod round;
pub mod setup;
pub mod state;
pub mod tick;

pub use fade::RemovalSchedule;
pub use hit::{HitBox, TapOutcome, entity_contains, resolve_tap};
pub use progression::{EscalationRule, Progression, RoundPhase, next_background};
pub use round::Round;
pub use setup::{RoundSetup, setup_round, setup_round_seeded};
pub use state::{
    BackgroundColor, DecoyKind, Difficulty, EntityId, FadingIcon, IconEntity, IconKind,
    IdAllocator, RngState, ScreenBounds, StoneColor,
};
pub use tick::{CloudAnimator, step_entity, tick};
