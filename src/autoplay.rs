//! Idle/demo player
//!
//! Picks where to tap next from what is on screen, the way a player would:
//! aim at the target, and since a cloud on top swallows the tap, each tap at
//! a covered target clears one cloud first.

use glam::Vec2;
use rand::Rng;

use crate::sim::{IconEntity, entity_contains};

/// Where the demo player taps next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Tap the target (clears a covering cloud if there is one)
    Target(Vec2),
    /// Deliberately tap a decoy
    Blunder(Vec2),
}

impl Intent {
    pub fn point(&self) -> Vec2 {
        match self {
            Intent::Target(p) | Intent::Blunder(p) => *p,
        }
    }
}

/// Choose the next tap. With probability `miss_rate` the player goes for a
/// decoy that does not overlap the target instead.
pub fn choose_tap<R: Rng + ?Sized>(
    entities: &[IconEntity],
    target: &IconEntity,
    icon_radius: f32,
    miss_rate: f64,
    rng: &mut R,
) -> Intent {
    if miss_rate > 0.0 && rng.random_bool(miss_rate.min(1.0)) {
        let decoy = entities
            .iter()
            .filter(|e| e.kind.is_decoy())
            .find(|e| !entity_contains(target, e.pos, icon_radius));
        if let Some(decoy) = decoy {
            return Intent::Blunder(decoy.pos);
        }
    }
    Intent::Target(target.pos)
}
