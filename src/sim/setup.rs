//! Round setup
//!
//! Builds a fresh entity population for one round: entity 0 is the target,
//! the next `cloud_count` are clouds, the rest are decoys. Placement is
//! uniform inside the icon margins with no overlap avoidance.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{EntityId, IconEntity, IconKind, IdAllocator, ScreenBounds};
use super::Difficulty;
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Output of round setup
#[derive(Debug, Clone)]
pub struct RoundSetup {
    pub entities: Vec<IconEntity>,
    /// Look the target up by this, never by index
    pub target_id: EntityId,
}

/// Generate the entity population for a round
pub fn setup_round(
    tuning: &Tuning,
    difficulty: Difficulty,
    bounds: ScreenBounds,
    rng: &mut Pcg32,
    ids: &mut IdAllocator,
) -> Result<RoundSetup, ConfigError> {
    tuning.validate()?;
    bounds.validate(tuning.icon_radius)?;
    let level = tuning.level(difficulty)?;

    let radius = tuning.icon_radius;
    let max = bounds.max_center(radius);
    let speed = tuning.base_speed * level.speed_multiplier;

    let mut entities = Vec::with_capacity(level.icon_count);
    for index in 0..level.icon_count {
        let kind = if index == 0 {
            IconKind::Target
        } else if index <= level.cloud_count {
            IconKind::Cloud
        } else {
            // Non-empty whenever decoys exist (checked by validate)
            let decoy = tuning
                .decoy_kinds
                .choose(rng)
                .copied()
                .ok_or(ConfigError::EmptyDecoyKinds(difficulty))?;
            IconKind::Decoy(decoy)
        };

        let pos = Vec2::new(
            rng.random_range(radius..=max.x),
            rng.random_range(radius..=max.y),
        );
        let vel = Vec2::new(
            rng.random_range(-speed..=speed),
            rng.random_range(-speed..=speed),
        );

        let mut entity = IconEntity::new(ids.next_id(), kind, pos, vel);
        if kind.is_cloud() {
            entity.scale = rng.random_range(tuning.cloud_scale_min..=tuning.cloud_scale_max);
            entity.rotation = rng.random_range(0.0..360.0);
        }
        entities.push(entity);
    }

    let target_id = entities[0].id;
    log::debug!(
        "Round setup: {:?}, {} icons ({} clouds), speed x{}",
        difficulty,
        entities.len(),
        level.cloud_count,
        level.speed_multiplier
    );

    Ok(RoundSetup { entities, target_id })
}

/// Round setup from a one-off seed
pub fn setup_round_seeded(
    tuning: &Tuning,
    difficulty: Difficulty,
    bounds: ScreenBounds,
    seed: u64,
) -> Result<RoundSetup, ConfigError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut ids = IdAllocator::new();
    setup_round(tuning, difficulty, bounds, &mut rng, &mut ids)
}
