// arena/src/core/config.rs
use super::constants::*;
use super::error::{ArenaError, ArenaResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-bot balance and behaviour parameters. Every numeric here is tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub view_range: f32,
    pub attack_range: f32,
    pub agent_radius: f32,
    pub max_health: f32,

    pub base_accuracy: f32,
    pub accuracy_penalty_start: f32,
    pub accuracy_penalty_rate: f32,
    pub damage_roll_min: u32,
    pub damage_roll_max: u32,
    pub damage_falloff_start: f32,
    pub damage_falloff_rate: f32,
    pub damage_falloff_floor: f32,
    pub fire_rate_ms: f64,
    pub respawn_time_ms: f64,

    pub move_speed: f32,
    pub run_speed: f32,
    pub patrol_speed_factor: f32,
    pub alert_speed_factor: f32,
    pub waypoint_reached_distance: f32,

    pub idle_duration_secs: f32,
    pub alert_timeout_secs: f32,
    pub patrol_idle_chance_per_sec: f64,

    pub flee_health_fraction: f32,
    pub recover_health_fraction: f32,
    pub flee_timeout_secs: f32,
    pub flee_regen_per_sec: f32,

    pub tactic_reroll_min_secs: f32,
    pub tactic_reroll_max_secs: f32,
    pub aggressive_far_distance: f32,
    pub aggressive_near_distance: f32,
    pub strafe_min_distance: f32,
    pub strafe_max_distance: f32,
    pub cover_search_radius: f32,
    pub flank_distance: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            view_range: BOT_VIEW_RANGE,
            attack_range: BOT_ATTACK_RANGE,
            agent_radius: AGENT_RADIUS,
            max_health: AGENT_MAX_HEALTH,

            base_accuracy: BOT_BASE_ACCURACY,
            accuracy_penalty_start: ACCURACY_PENALTY_START,
            accuracy_penalty_rate: ACCURACY_PENALTY_RATE,
            damage_roll_min: DAMAGE_ROLL_MIN,
            damage_roll_max: DAMAGE_ROLL_MAX,
            damage_falloff_start: DAMAGE_FALLOFF_START,
            damage_falloff_rate: DAMAGE_FALLOFF_RATE,
            damage_falloff_floor: DAMAGE_FALLOFF_FLOOR,
            fire_rate_ms: BOT_FIRE_RATE_MS,
            respawn_time_ms: BOT_RESPAWN_TIME_MS,

            move_speed: BOT_SPEED,
            run_speed: BOT_RUN_SPEED,
            patrol_speed_factor: PATROL_SPEED_FACTOR,
            alert_speed_factor: ALERT_SPEED_FACTOR,
            waypoint_reached_distance: WAYPOINT_REACHED_DISTANCE,

            idle_duration_secs: IDLE_DURATION_SECS,
            alert_timeout_secs: ALERT_TIMEOUT_SECS,
            patrol_idle_chance_per_sec: PATROL_IDLE_CHANCE_PER_SEC,

            flee_health_fraction: FLEE_HEALTH_FRACTION,
            recover_health_fraction: RECOVER_HEALTH_FRACTION,
            flee_timeout_secs: FLEE_TIMEOUT_SECS,
            flee_regen_per_sec: FLEE_REGEN_PER_SEC,

            tactic_reroll_min_secs: TACTIC_REROLL_MIN_SECS,
            tactic_reroll_max_secs: TACTIC_REROLL_MAX_SECS,
            aggressive_far_distance: AGGRESSIVE_FAR_DISTANCE,
            aggressive_near_distance: AGGRESSIVE_NEAR_DISTANCE,
            strafe_min_distance: STRAFE_MIN_DISTANCE,
            strafe_max_distance: STRAFE_MAX_DISTANCE,
            cover_search_radius: COVER_SEARCH_RADIUS,
            flank_distance: FLANK_DISTANCE,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> ArenaResult<()> {
        if self.view_range <= 0.0 || self.attack_range <= 0.0 {
            return Err(ArenaError::ConfigError("view_range and attack_range must be positive".into()));
        }
        if self.max_health <= 0.0 {
            return Err(ArenaError::ConfigError("max_health must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.base_accuracy) {
            return Err(ArenaError::ConfigError(format!("base_accuracy {} outside [0, 1]", self.base_accuracy)));
        }
        if self.damage_roll_min > self.damage_roll_max {
            return Err(ArenaError::ConfigError("damage_roll_min exceeds damage_roll_max".into()));
        }
        if !(0.0..=1.0).contains(&self.damage_falloff_floor) {
            return Err(ArenaError::ConfigError("damage_falloff_floor must lie in [0, 1]".into()));
        }
        if self.fire_rate_ms < 0.0 || self.respawn_time_ms < 0.0 {
            return Err(ArenaError::ConfigError("timers must not be negative".into()));
        }
        if self.flee_health_fraction >= self.recover_health_fraction {
            return Err(ArenaError::ConfigError(
                "flee_health_fraction must be below recover_health_fraction".into(),
            ));
        }
        if self.tactic_reroll_min_secs <= 0.0 || self.tactic_reroll_min_secs > self.tactic_reroll_max_secs {
            return Err(ArenaError::ConfigError("tactic re-roll bounds are inverted or empty".into()));
        }
        if self.strafe_min_distance > self.strafe_max_distance
            || self.aggressive_near_distance > self.aggressive_far_distance
        {
            return Err(ArenaError::ConfigError("distance bands are inverted".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub tick_rate: u64,
    pub bot_count: usize,
    pub map_size: f32,
    pub match_duration_secs: f32,
    pub dark_mode_interval_secs: f32,
    pub flashlight_range: f32,
    pub player_respawn_secs: f32,
    pub metrics_port: Option<u16>,
    pub rng_seed: Option<u64>,
    pub ai: AiConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            tick_rate: ARENA_TICK_RATE,
            bot_count: DEFAULT_BOT_COUNT,
            map_size: MAP_SIZE,
            match_duration_secs: MATCH_DURATION_SECS,
            dark_mode_interval_secs: DARK_MODE_INTERVAL_SECS,
            flashlight_range: FLASHLIGHT_RANGE,
            player_respawn_secs: PLAYER_RESPAWN_SECS,
            metrics_port: None,
            rng_seed: None,
            ai: AiConfig::default(),
        }
    }
}

impl ArenaConfig {
    pub fn from_yaml_str(source: &str) -> ArenaResult<Self> {
        let config: ArenaConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ArenaResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&source)
    }

    pub fn validate(&self) -> ArenaResult<()> {
        if self.tick_rate == 0 {
            return Err(ArenaError::ConfigError("tick_rate must be at least 1".into()));
        }
        if self.map_size <= 2.0 * PATROL_MARGIN {
            return Err(ArenaError::ConfigError(format!("map_size {} is too small", self.map_size)));
        }
        if self.match_duration_secs <= 0.0 || self.dark_mode_interval_secs <= 0.0 {
            return Err(ArenaError::ConfigError("match timers must be positive".into()));
        }
        self.ai.validate()
    }

    /// Half extent of the walkable area, keeping agents off the outer wall.
    pub fn walkable_half_extent(&self) -> f32 {
        self.map_size / 2.0 - BOUNDARY_MARGIN
    }

    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ArenaConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ArenaConfig::from_yaml_str("bot_count: 4\nai:\n  fire_rate_ms: 250.0\n").unwrap();
        assert_eq!(config.bot_count, 4);
        assert_eq!(config.ai.fire_rate_ms, 250.0);
        assert_eq!(config.ai.view_range, BOT_VIEW_RANGE);
        assert_eq!(config.map_size, MAP_SIZE);
    }

    #[test]
    fn inverted_flee_thresholds_are_rejected() {
        let err = ArenaConfig::from_yaml_str("ai:\n  flee_health_fraction: 0.7\n").unwrap_err();
        assert!(matches!(err, ArenaError::ConfigError(_)));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = ArenaConfig::from_yaml_str("bot_count: [1, 2").unwrap_err();
        assert!(matches!(err, ArenaError::ConfigParse(_)));
    }
}
