//! Tap hit testing
//!
//! Each icon is an axis-aligned box centred on its position with half extent
//! `icon_radius * scale`. A tap is resolved in strict priority order: clouds
//! shield everything beneath them, then the target, then decoys.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EntityId, IconEntity, IconKind};

/// Axis-aligned hit box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub center: Vec2,
    pub half_extent: Vec2,
}

impl HitBox {
    pub fn for_entity(entity: &IconEntity, icon_radius: f32) -> Self {
        let half = icon_radius * entity.scale;
        Self {
            center: entity.pos,
            half_extent: Vec2::splat(half),
        }
    }

    /// Inclusive containment
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extent.x && d.y <= self.half_extent.y
    }
}

/// Whether `point` lands on `entity`
#[inline]
pub fn entity_contains(entity: &IconEntity, point: Vec2, icon_radius: f32) -> bool {
    HitBox::for_entity(entity, icon_radius).contains(point)
}

/// What a tap landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapOutcome {
    /// A cloud was cleared; the round goes on
    CloudRemoved(EntityId),
    TargetHit,
    DecoyHit(EntityId),
    /// Empty space
    Miss,
}

/// Resolve a tap against the current entity set. Pure: the caller applies
/// any cloud removal.
///
/// Overlapping clouds or decoys resolve to the topmost one (last in draw order).
pub fn resolve_tap(entities: &[IconEntity], target_id: EntityId, point: Vec2, icon_radius: f32) -> TapOutcome {
    let hit = |e: &&IconEntity| entity_contains(e, point, icon_radius);

    if let Some(cloud) = entities
        .iter()
        .rev()
        .filter(|e| e.kind == IconKind::Cloud && !e.fading)
        .find(hit)
    {
        return TapOutcome::CloudRemoved(cloud.id);
    }

    if entities
        .iter()
        .find(|e| e.id == target_id)
        .is_some_and(|target| entity_contains(target, point, icon_radius))
    {
        return TapOutcome::TargetHit;
    }

    if let Some(decoy) = entities
        .iter()
        .rev()
        .filter(|e| e.kind.is_decoy())
        .find(hit)
    {
        return TapOutcome::DecoyHit(decoy.id);
    }

    TapOutcome::Miss
}
