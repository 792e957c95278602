//! One round's live entity set
//!
//! A round owns its icons, the clouds currently fading out, the shared cloud
//! animation frame and the pending removals. Nothing here outlives the round.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::fade::RemovalSchedule;
use super::hit::{TapOutcome, resolve_tap};
use super::setup::RoundSetup;
use super::state::{EntityId, FadingIcon, IconEntity, ScreenBounds};
use super::tick::{CloudAnimator, tick};

/// Live state of a single round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// Hittable icons, in draw order
    pub entities: Vec<IconEntity>,
    /// Tapped clouds still fading out
    pub fading: Vec<FadingIcon>,
    pub target_id: EntityId,
    pub cloud_animator: CloudAnimator,
    /// Motion ticks run so far
    pub time_ticks: u64,
    removals: RemovalSchedule,
    fade_secs: f32,
}

impl Round {
    pub fn new(setup: RoundSetup, cloud_frame_count: usize, fade_secs: f32) -> Self {
        Self {
            entities: setup.entities,
            fading: Vec::new(),
            target_id: setup.target_id,
            cloud_animator: CloudAnimator::new(cloud_frame_count),
            time_ticks: 0,
            removals: RemovalSchedule::new(),
            fade_secs,
        }
    }

    /// The target icon
    pub fn target(&self) -> Option<&IconEntity> {
        self.entities.iter().find(|e| e.id == self.target_id)
    }

    /// Number of removals still waiting to fire
    pub fn pending_removals(&self) -> usize {
        self.removals.len()
    }

    /// One motion tick of `dt` seconds: move everything (fading clouds
    /// included), advance fades and drop finished ones.
    pub fn tick(&mut self, bounds: ScreenBounds, icon_radius: f32, dt: f32) {
        self.time_ticks += 1;
        tick(&mut self.entities, bounds, icon_radius);
        tick(self.fading.iter_mut().map(|f| &mut f.entity), bounds, icon_radius);

        for fading in &mut self.fading {
            fading.elapsed += dt;
            fading.entity.opacity = if self.fade_secs > 0.0 {
                (1.0 - fading.elapsed / self.fade_secs).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }

        for id in self.removals.advance(dt) {
            self.fading.retain(|f| f.entity.id != id);
            log::debug!("Cloud {:?} removed", id);
        }
    }

    /// One step of the slow cloud animation clock
    pub fn advance_cloud_frame(&mut self) {
        self.cloud_animator.advance();
    }

    /// Resolve a tap and apply cloud removal if a cloud was hit
    pub fn apply_tap(&mut self, point: Vec2, icon_radius: f32) -> TapOutcome {
        let outcome = resolve_tap(&self.entities, self.target_id, point, icon_radius);
        if let TapOutcome::CloudRemoved(id) = outcome {
            self.begin_cloud_removal(id);
        }
        outcome
    }

    fn begin_cloud_removal(&mut self, id: EntityId) {
        let Some(index) = self.entities.iter().position(|e| e.id == id) else {
            return;
        };
        let mut entity = self.entities.remove(index);
        entity.fading = true;
        self.fading.push(FadingIcon { entity, elapsed: 0.0 });
        self.removals.schedule(id, self.fade_secs);
        log::debug!("Cloud {:?} fading", id);
    }

    /// Drop pending removals; the round is being discarded
    pub fn cancel_pending(&mut self) {
        self.removals.cancel_all();
    }
}
