//! Fixed timestep motion
//!
//! Advances every icon by its velocity and reflects off the screen margins.
//! Reflection is checked after the move, so an icon can sit up to one tick's
//! displacement outside the margin before the flipped velocity brings it back.

use serde::{Deserialize, Serialize};

use super::state::{IconEntity, ScreenBounds};

/// Advance one entity by one tick
#[inline]
pub fn step_entity(entity: &mut IconEntity, bounds: ScreenBounds, icon_radius: f32) {
    entity.pos += entity.vel;

    let max = bounds.max_center(icon_radius);
    if entity.pos.x < icon_radius || entity.pos.x > max.x {
        entity.vel.x = -entity.vel.x;
    }
    if entity.pos.y < icon_radius || entity.pos.y > max.y {
        entity.vel.y = -entity.vel.y;
    }
}

/// Advance all entities by one tick, in place
pub fn tick<'a>(entities: impl IntoIterator<Item = &'a mut IconEntity>, bounds: ScreenBounds, icon_radius: f32) {
    for entity in entities {
        step_entity(entity, bounds, icon_radius);
    }
}

/// Shared cloud animation frame. All clouds animate in lockstep off this one
/// counter, bouncing 0, 1, .., last, .., 1, 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudAnimator {
    frame: usize,
    forward: bool,
    frame_count: usize,
}

impl CloudAnimator {
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame: 0,
            forward: true,
            frame_count,
        }
    }

    /// Current frame index
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Step to the next frame of the ping-pong cycle
    pub fn advance(&mut self) {
        if self.frame_count <= 1 {
            return;
        }
        let last = self.frame_count - 1;
        if self.forward {
            self.frame += 1;
            if self.frame >= last {
                self.forward = false;
            }
        } else {
            self.frame = self.frame.saturating_sub(1);
            if self.frame == 0 {
                self.forward = true;
            }
        }
    }
}
