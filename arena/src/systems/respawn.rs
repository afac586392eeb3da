// arena/src/systems/respawn.rs

use crate::core::constants::{SPAWN_CANDIDATE_SAMPLES, SPAWN_JITTER};
use crate::core::types::Vec2;
use crate::world::visibility::is_position_blocked;
use crate::world::wall_spatial_index::WallSpatialIndex;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;
use tracing::{trace, warn};

/// Chooses where agents (and the player) re-enter the arena.
///
/// A handful of distinct spawn points is sampled and the one farthest from every occupied
/// position wins, which keeps a fleet from piling onto a single point.
#[derive(Clone, Debug)]
pub struct RespawnManager {
    samples: usize,
    jitter: f32,
    half_extent: f32,
    body_radius: f32,
}

impl RespawnManager {
    pub fn new(half_extent: f32, body_radius: f32) -> Self {
        Self {
            samples: SPAWN_CANDIDATE_SAMPLES,
            jitter: SPAWN_JITTER,
            half_extent,
            body_radius,
        }
    }

    pub fn pick_spawn_position(
        &self,
        points: &[Vec2],
        occupied: &[Vec2],
        obstacles: &WallSpatialIndex,
        rng: &mut impl Rng,
    ) -> Vec2 {
        if points.is_empty() {
            warn!("No spawn points available, spawning at the origin");
            return Vec2::zero();
        }

        let candidates: SmallVec<[Vec2; SPAWN_CANDIDATE_SAMPLES]> =
            points.choose_multiple(rng, self.samples).copied().collect();

        let clearance = |p: Vec2| occupied.iter().map(|o| p.distance(*o)).fold(f32::INFINITY, f32::min);
        let mut base = candidates[0];
        let mut best = clearance(base);
        for &candidate in candidates.iter().skip(1) {
            let c = clearance(candidate);
            if c > best {
                base = candidate;
                best = c;
            }
        }

        let jittered = base
            + Vec2::new(
                rng.gen_range(-self.jitter..=self.jitter),
                rng.gen_range(-self.jitter..=self.jitter),
            );
        if is_position_blocked(jittered, self.body_radius, self.half_extent, obstacles) {
            trace!("Jittered spawn ({:.1}, {:.1}) blocked, using base point", jittered.x, jittered.y);
            return base;
        }
        jittered
    }
}
