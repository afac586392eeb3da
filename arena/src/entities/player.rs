// arena/src/entities/player.rs
use crate::core::constants::AGENT_MAX_HEALTH;
use crate::core::types::{Combatant, DamageOutcome, Vec2};
use tracing::debug;

/// The human player as the AI core sees it: a position to aim at and a damage sink.
///
/// Progression (money, weapons, shop) lives elsewhere.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub position: Vec2,
    pub rotation: f32,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    pub kills: u32,
    pub deaths: u32,
    /// Seconds until the host respawns the player; only meaningful while dead.
    pub respawn_timer: f32,
}

impl PlayerState {
    pub fn new(position: Vec2) -> Self {
        PlayerState {
            position,
            rotation: 0.0,
            health: AGENT_MAX_HEALTH,
            max_health: AGENT_MAX_HEALTH,
            alive: true,
            kills: 0,
            deaths: 0,
            respawn_timer: 0.0,
        }
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome { died: false };
        }
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
        if self.health <= 0.0 {
            self.alive = false;
            self.deaths += 1;
            debug!("Player died at ({:.1}, {:.1})", self.position.x, self.position.y);
            return DamageOutcome { died: true };
        }
        DamageOutcome { died: false }
    }

    pub fn respawn(&mut self, position: Vec2) {
        self.position = position;
        self.health = self.max_health;
        self.alive = true;
        self.respawn_timer = 0.0;
    }
}

impl Combatant for PlayerState {
    fn position(&self) -> Vec2 { self.position }
    fn health(&self) -> f32 { self.health }
    fn max_health(&self) -> f32 { self.max_health }
    fn is_alive(&self) -> bool { self.alive }
}
