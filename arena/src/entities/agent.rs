// arena/src/entities/agent.rs
use crate::core::config::AiConfig;
use crate::core::types::{AgentId, Combatant, DamageOutcome, TargetRef, Vec2};
use crate::systems::ai::combat::FireControl;
use crate::systems::ai::tactics::CombatPlan;
use rand::Rng;
use std::f32::consts::TAU;
use tracing::{debug, info, trace};

/// Top-level behaviour state. Per-state data lives inside the variant that owns it.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum BotState {
    #[default]
    Idle,
    Patrol { waypoint: Option<Vec2> },
    Alert,
    Combat(CombatPlan),
    /// `heading` is used when there is no threat position to run from.
    Flee { heading: Vec2 },
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BotStateKind {
    Idle,
    Patrol,
    Alert,
    Combat,
    Flee,
    Dead,
}

impl BotState {
    pub fn kind(&self) -> BotStateKind {
        match self {
            BotState::Idle => BotStateKind::Idle,
            BotState::Patrol { .. } => BotStateKind::Patrol,
            BotState::Alert => BotStateKind::Alert,
            BotState::Combat(_) => BotStateKind::Combat,
            BotState::Flee { .. } => BotStateKind::Flee,
            BotState::Dead => BotStateKind::Dead,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    pub position: Vec2,
    pub rotation: f32,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    pub state: BotState,
    /// Seconds since the current state was entered.
    pub state_timer: f32,
    pub target: Option<TargetRef>,
    pub last_known_target_pos: Option<Vec2>,
    pub kills: u32,
    pub deaths: u32,
    pub fire_control: FireControl,
    /// Milliseconds left before a respawn is requested; only meaningful while dead.
    pub respawn_timer_ms: f64,
    pub flashlight_on: bool,
    /// Direction the agent keeps sliding along a blocking wall until its direct step clears.
    pub wall_slide: Option<Vec2>,
    respawn_time_ms: f64,
    respawn_requested: bool,
}

impl Agent {
    /// A fresh agent is alive but unplaced; the fleet spawns it before the first tick.
    pub fn new(id: AgentId, config: &AiConfig) -> Self {
        Agent {
            id,
            position: Vec2::zero(),
            rotation: 0.0,
            health: config.max_health,
            max_health: config.max_health,
            alive: true,
            state: BotState::Idle,
            state_timer: 0.0,
            target: None,
            last_known_target_pos: None,
            kills: 0,
            deaths: 0,
            fire_control: FireControl::new(config.fire_rate_ms),
            respawn_timer_ms: 0.0,
            flashlight_on: false,
            wall_slide: None,
            respawn_time_ms: config.respawn_time_ms,
            respawn_requested: false,
        }
    }

    /// Places the agent at `position` with full health and a random facing, in Idle.
    pub fn spawn(&mut self, position: Vec2, rng: &mut impl Rng) {
        self.position = position;
        self.rotation = rng.gen_range(0.0..TAU);
        self.health = self.max_health;
        self.alive = true;
        self.state = BotState::Idle;
        self.state_timer = 0.0;
        self.target = None;
        self.last_known_target_pos = None;
        self.respawn_timer_ms = 0.0;
        self.respawn_requested = false;
        self.wall_slide = None;
        self.fire_control.reset();
        info!("[{}] spawned at ({:.1}, {:.1})", self.id, position.x, position.y);
    }

    pub fn transition(&mut self, next: BotState) {
        let from = self.state.kind();
        let to = next.kind();
        if from != to {
            debug!("[{}] {:?} -> {:?}", self.id, from, to);
        }
        self.state = next;
        self.state_timer = 0.0;
        self.wall_slide = None;
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome { died: false };
        }
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);

        if self.health <= 0.0 {
            self.die();
            return DamageOutcome { died: true };
        }

        // Getting shot while unaware puts the agent on alert.
        if matches!(self.state.kind(), BotStateKind::Idle | BotStateKind::Patrol) {
            self.transition(BotState::Alert);
        }
        DamageOutcome { died: false }
    }

    fn die(&mut self) {
        self.health = 0.0;
        self.alive = false;
        self.deaths += 1;
        self.flashlight_on = false;
        self.target = None;
        self.respawn_timer_ms = self.respawn_time_ms;
        self.respawn_requested = false;
        self.transition(BotState::Dead);
        info!("[{}] died at ({:.1}, {:.1}), deaths={}", self.id, self.position.x, self.position.y, self.deaths);
    }

    /// Counts the respawn timer down while dead. Returns true exactly once, on the tick it expires.
    pub fn tick_respawn(&mut self, delta_ms: f64) -> bool {
        if self.alive || self.respawn_requested {
            return false;
        }
        self.respawn_timer_ms = (self.respawn_timer_ms - delta_ms.max(0.0)).max(0.0);
        trace!("[{}] respawn in {:.0}ms", self.id, self.respawn_timer_ms);
        if self.respawn_timer_ms <= 0.0 {
            self.respawn_requested = true;
            return true;
        }
        false
    }

    /// Flashlights only burn on living agents.
    pub fn set_flashlight_enabled(&mut self, enabled: bool) {
        self.flashlight_on = enabled && self.alive;
    }

    pub fn health_is_below(&self, fraction: f32) -> bool {
        self.health < self.max_health * fraction
    }
}

impl Combatant for Agent {
    fn position(&self) -> Vec2 { self.position }
    fn health(&self) -> f32 { self.health }
    fn max_health(&self) -> f32 { self.max_health }
    fn is_alive(&self) -> bool { self.alive }
}
