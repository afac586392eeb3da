// arena/src/core/constants.rs

pub const ARENA_TICK_RATE: u64 = 60;

// World constants
pub const MAP_SIZE: f32 = 40.0;
pub const WALL_THICKNESS: f32 = 0.3;
pub const DOOR_WIDTH: f32 = 2.0;
pub const BOUNDARY_MARGIN: f32 = 1.0; // Agents stay this far inside the outer edge
pub const PATROL_MARGIN: f32 = 5.0;   // Patrol waypoints stay this far inside the outer edge

// Agent body
pub const AGENT_RADIUS: f32 = 0.4;
pub const AGENT_MAX_HEALTH: f32 = 100.0;
pub const DEFAULT_BOT_COUNT: usize = 8;

// Perception
pub const BOT_VIEW_RANGE: f32 = 35.0;
pub const BOT_ATTACK_RANGE: f32 = 25.0;

// Target scoring (tunable, player band intentionally higher)
pub const PLAYER_SCORE_BASE: f32 = 100.0;
pub const AGENT_SCORE_BASE: f32 = 50.0;
pub const AGENT_SCORE_DISTANCE_WEIGHT: f32 = 0.5;
pub const AGENT_SCORE_HEALTH_WEIGHT: f32 = 0.3;

// Combat balance parameters
pub const BOT_BASE_ACCURACY: f32 = 0.5;
pub const ACCURACY_PENALTY_START: f32 = 10.0;
pub const ACCURACY_PENALTY_RATE: f32 = 0.02;
pub const DAMAGE_ROLL_MIN: u32 = 15;
pub const DAMAGE_ROLL_MAX: u32 = 24; // inclusive
pub const DAMAGE_FALLOFF_START: f32 = 10.0;
pub const DAMAGE_FALLOFF_RATE: f32 = 0.015;
pub const DAMAGE_FALLOFF_FLOOR: f32 = 0.6;
pub const BOT_FIRE_RATE_MS: f64 = 1000.0;

// Lifecycle
pub const BOT_RESPAWN_TIME_MS: f64 = 3000.0;
pub const PLAYER_RESPAWN_SECS: f32 = 3.0;

// Locomotion (units per second)
pub const BOT_SPEED: f32 = 8.0;
pub const BOT_RUN_SPEED: f32 = 12.0;
pub const PATROL_SPEED_FACTOR: f32 = 0.5;
pub const ALERT_SPEED_FACTOR: f32 = 0.6;
pub const RETREAT_SPEED_FACTOR: f32 = 0.5;
pub const WAYPOINT_REACHED_DISTANCE: f32 = 1.0;
pub const ALERT_ARRIVAL_DISTANCE: f32 = 1.5;
pub const LOOK_AROUND_TURN_RATE: f32 = 1.2; // rad/s

// State timing (seconds)
pub const IDLE_DURATION_SECS: f32 = 2.0;
pub const ALERT_TIMEOUT_SECS: f32 = 5.0;
pub const FLEE_TIMEOUT_SECS: f32 = 10.0;
pub const PATROL_IDLE_CHANCE_PER_SEC: f64 = 0.3;

// Flee
pub const FLEE_HEALTH_FRACTION: f32 = 0.3;
pub const RECOVER_HEALTH_FRACTION: f32 = 0.6;
pub const FLEE_REGEN_PER_SEC: f32 = 5.0;
pub const FLEE_LATERAL_JITTER: f32 = 0.35;

// Combat tactics
pub const TACTIC_REROLL_MIN_SECS: f32 = 2.0;
pub const TACTIC_REROLL_MAX_SECS: f32 = 4.0;
pub const AGGRESSIVE_FAR_DISTANCE: f32 = 10.0;
pub const AGGRESSIVE_NEAR_DISTANCE: f32 = 5.0;
pub const STRAFE_MIN_DISTANCE: f32 = 8.0;
pub const STRAFE_MAX_DISTANCE: f32 = 15.0;
pub const STRAFE_FLIP_CHANCE_PER_SEC: f64 = 0.3;
pub const COVER_SEARCH_RADIUS: f32 = 15.0;
pub const COVER_STANDOFF: f32 = 0.8;
pub const COVER_ARRIVAL_DISTANCE: f32 = 0.6;
pub const COVER_PEEK_CHANCE_PER_SEC: f64 = 0.5;
pub const COVER_PEEK_SECS: f32 = 0.6;
pub const FLANK_DISTANCE: f32 = 10.0;

// Spawning
pub const SPAWN_CANDIDATE_SAMPLES: usize = 3;
pub const SPAWN_JITTER: f32 = 1.0;

// Match flow
pub const MATCH_DURATION_SECS: f32 = 300.0;
pub const DARK_MODE_INTERVAL_SECS: f32 = 30.0;
pub const FLASHLIGHT_RANGE: f32 = 15.0;
