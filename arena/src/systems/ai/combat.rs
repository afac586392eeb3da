// arena/src/systems/ai/combat.rs
//! Fire-rate gating, accuracy falloff and the hit/damage roll.
//!
//! Every number here comes from [`AiConfig`] and is a balance parameter, not a contract.

use crate::core::config::AiConfig;
use crate::core::types::ShotResult;
use crate::entities::agent::Agent;
use metrics::counter;
use rand::Rng;
use tracing::trace;

/// Per-agent trigger discipline. Each agent owns one; nothing is shared between shooters.
#[derive(Clone, Debug, PartialEq)]
pub struct FireControl {
    pub last_shot_ms: Option<f64>,
    pub cooldown_ms: f64,
}

/// Outcome of a shot that was actually fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotRoll {
    pub hit: bool,
    pub damage: f32,
}

impl FireControl {
    pub fn new(cooldown_ms: f64) -> Self {
        FireControl { last_shot_ms: None, cooldown_ms }
    }

    pub fn reset(&mut self) {
        self.last_shot_ms = None;
    }

    pub fn is_ready(&self, now_ms: f64) -> bool {
        match self.last_shot_ms {
            Some(last) => now_ms - last >= self.cooldown_ms,
            None => true,
        }
    }

    /// Fires if the cooldown allows it. `None` means the trigger was not pulled at all.
    pub fn try_fire(&mut self, distance: f32, now_ms: f64, config: &AiConfig, rng: &mut impl Rng) -> Option<ShotRoll> {
        if !self.is_ready(now_ms) {
            return None;
        }
        self.last_shot_ms = Some(now_ms);

        let sample: f32 = rng.gen();
        let hit = sample < accuracy_at(distance, config);
        let damage = if hit { roll_damage(distance, config, rng) } else { 0.0 };
        Some(ShotRoll { hit, damage })
    }
}

/// Hit probability at `distance`. Flat up to the penalty start, then decreasing linearly; never negative.
pub fn accuracy_at(distance: f32, config: &AiConfig) -> f32 {
    let penalty = ((distance - config.accuracy_penalty_start) * config.accuracy_penalty_rate).max(0.0);
    (config.base_accuracy - penalty).max(0.0)
}

/// Damage multiplier at `distance`, floored at `damage_falloff_floor`.
pub fn damage_falloff(distance: f32, config: &AiConfig) -> f32 {
    let over = (distance - config.damage_falloff_start).max(0.0);
    (1.0 - over * config.damage_falloff_rate).max(config.damage_falloff_floor)
}

pub fn roll_damage(distance: f32, config: &AiConfig, rng: &mut impl Rng) -> f32 {
    let base = rng.gen_range(config.damage_roll_min..=config.damage_roll_max) as f32;
    base * damage_falloff(distance, config)
}

/// Resolves one trigger pull for `agent` against its current target.
///
/// Returns `None` when the agent has no target or the cooldown blocks the shot.
/// A returned result is a shot event whether or not it hit; the host applies the damage.
pub fn try_shoot(
    agent: &mut Agent,
    distance: f32,
    now_ms: f64,
    config: &AiConfig,
    rng: &mut impl Rng,
) -> Option<ShotResult> {
    let target = agent.target?;
    let roll = agent.fire_control.try_fire(distance, now_ms, config, rng)?;

    counter!("arena_shots_total").increment(1);
    if roll.hit {
        counter!("arena_hits_total").increment(1);
    }
    trace!(
        "[{}] fired at {} from {:.1}: hit={} dmg={:.1}",
        agent.id, target, distance, roll.hit, roll.damage
    );

    Some(ShotResult {
        shooter: agent.id,
        target,
        hit: roll.hit,
        damage: roll.damage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn cooldown_blocks_second_shot_in_window() {
        let config = AiConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut fire = FireControl::new(config.fire_rate_ms);

        assert!(fire.try_fire(5.0, 0.0, &config, &mut rng).is_some());
        assert!(fire.try_fire(5.0, config.fire_rate_ms - 1.0, &config, &mut rng).is_none());
        assert!(fire.try_fire(5.0, config.fire_rate_ms, &config, &mut rng).is_some());
    }

    #[test]
    fn accuracy_is_flat_then_falls() {
        let config = AiConfig::default();
        assert_eq!(accuracy_at(0.0, &config), config.base_accuracy);
        assert_eq!(accuracy_at(config.accuracy_penalty_start, &config), config.base_accuracy);
        assert!(accuracy_at(20.0, &config) < config.base_accuracy);
        assert!((accuracy_at(20.0, &config) - 0.3).abs() < 1e-6);
        assert_eq!(accuracy_at(1000.0, &config), 0.0);
    }

    #[test]
    fn falloff_never_drops_below_floor() {
        let config = AiConfig::default();
        assert_eq!(damage_falloff(3.0, &config), 1.0);
        assert_eq!(damage_falloff(500.0, &config), config.damage_falloff_floor);
    }

    #[test]
    fn damage_stays_inside_roll_bounds() {
        let config = AiConfig::default();
        let mut rng = StdRng::seed_from_u64(77);
        for distance in [0.0_f32, 5.0, 12.0, 25.0, 60.0] {
            for _ in 0..200 {
                let dmg = roll_damage(distance, &config, &mut rng);
                assert!(dmg >= config.damage_roll_min as f32 * config.damage_falloff_floor);
                assert!(dmg <= config.damage_roll_max as f32);
            }
        }
    }

    #[test]
    fn misses_still_report_a_shot() {
        let config = AiConfig { base_accuracy: 0.0, ..AiConfig::default() };
        let mut rng = StdRng::seed_from_u64(5);
        let mut fire = FireControl::new(config.fire_rate_ms);
        let roll = fire.try_fire(5.0, 0.0, &config, &mut rng).unwrap();
        assert!(!roll.hit);
        assert_eq!(roll.damage, 0.0);
    }
}
