// arena/src/systems/ai/targeting.rs
use crate::core::config::AiConfig;
use crate::core::constants::{
    AGENT_SCORE_BASE, AGENT_SCORE_DISTANCE_WEIGHT, AGENT_SCORE_HEALTH_WEIGHT, PLAYER_SCORE_BASE,
};
use crate::core::types::{Combatant, TargetRef, Vec2};
use crate::entities::agent::Agent;
use crate::entities::player::PlayerState;
use crate::world::visibility::has_line_of_sight;
use crate::world::wall_spatial_index::WallSpatialIndex;

/// The target picked for this tick, with the geometry the tactics engine needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetLock {
    pub target: TargetRef,
    pub position: Vec2,
    pub distance: f32,
    pub score: f32,
}

pub fn player_score(distance: f32) -> f32 {
    PLAYER_SCORE_BASE - distance
}

/// Closer and weaker agents score higher.
pub fn agent_score(distance: f32, health_fraction: f32) -> f32 {
    (AGENT_SCORE_BASE - distance * AGENT_SCORE_DISTANCE_WEIGHT) * (1.0 - AGENT_SCORE_HEALTH_WEIGHT * health_fraction)
}

/// Picks the best visible candidate for `me`, recomputed from scratch every tick.
///
/// The player is evaluated first, then `others` in roster order; on equal scores the
/// earlier candidate wins. Dead candidates, candidates beyond view range and candidates
/// without line of sight are never returned.
pub fn find_target<'a>(
    me: &Agent,
    player: Option<&PlayerState>,
    others: impl IntoIterator<Item = &'a Agent>,
    obstacles: &WallSpatialIndex,
    config: &AiConfig,
) -> Option<TargetLock> {
    let mut best: Option<TargetLock> = None;
    let mut consider = |candidate: TargetLock| {
        if best.map_or(true, |current| candidate.score > current.score) {
            best = Some(candidate);
        }
    };

    if let Some(player) = player.filter(|p| p.is_alive()) {
        let distance = me.position.distance(player.position);
        if distance < config.view_range && has_line_of_sight(me.position, player.position, obstacles) {
            consider(TargetLock {
                target: TargetRef::Player,
                position: player.position,
                distance,
                score: player_score(distance),
            });
        }
    }

    for other in others {
        if other.id == me.id || !other.is_alive() {
            continue;
        }
        let distance = me.position.distance(other.position);
        if distance >= config.view_range || !has_line_of_sight(me.position, other.position, obstacles) {
            continue;
        }
        consider(TargetLock {
            target: TargetRef::Agent(other.id),
            position: other.position,
            distance,
            score: agent_score(distance, other.health_fraction()),
        });
    }

    best
}
