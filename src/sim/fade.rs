//! Deferred removals
//!
//! A tapped cloud stays on screen while it fades, then is deleted after a
//! fixed delay. Removals are keyed by entity id, fire at most once, and are
//! dropped wholesale when the owning round is discarded.

use serde::{Deserialize, Serialize};

use super::state::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PendingRemoval {
    id: EntityId,
    remaining: f32,
}

/// Removal tasks for one round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemovalSchedule {
    pending: Vec<PendingRemoval>,
}

impl RemovalSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `id` for removal after `delay` seconds. Rescheduling an id
    /// already pending is ignored.
    pub fn schedule(&mut self, id: EntityId, delay: f32) {
        if self.is_pending(id) {
            return;
        }
        self.pending.push(PendingRemoval {
            id,
            remaining: delay.max(0.0),
        });
    }

    pub fn is_pending(&self, id: EntityId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending removal
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Advance time and return the ids whose delay has elapsed, in schedule order.
    /// Returned ids are no longer pending.
    pub fn advance(&mut self, dt: f32) -> Vec<EntityId> {
        let mut due = Vec::new();
        self.pending.retain_mut(|p| {
            p.remaining -= dt;
            if p.remaining <= 0.0 {
                due.push(p.id);
                false
            } else {
                true
            }
        });
        due
    }
}
