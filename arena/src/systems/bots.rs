// arena/src/systems/bots.rs

use crate::concurrent::event_queue::{ArenaEvent, EffectsSink};
use crate::core::config::{AiConfig, ArenaConfig};
use crate::core::constants::PATROL_MARGIN;
use crate::core::types::{AgentId, DamageOutcome, ShotResult, Vec2};
use crate::entities::agent::Agent;
use crate::entities::player::PlayerState;
use crate::systems::ai::{BotAISystem, TickContext};
use crate::systems::respawn::RespawnManager;
use crate::world::wall_spatial_index::WallSpatialIndex;

use metrics::counter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Everything the fleet hands back to the host after one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FleetTick {
    pub respawn_requests: Vec<AgentId>,
    pub shots: Vec<ShotResult>,
}

/// Owns the roster and drives every agent once per tick.
pub struct BotManager {
    bots: Vec<Agent>,
    ai: AiConfig,
    half_extent: f32,
    patrol_extent: f32,
    respawn: RespawnManager,
    rng: StdRng,
    clock_ms: f64,
}

impl BotManager {
    /// Seeds from `config.rng_seed` when present, from OS entropy otherwise.
    pub fn new(config: &ArenaConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_seed(config: &ArenaConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &ArenaConfig, rng: StdRng) -> Self {
        let half_extent = config.walkable_half_extent();
        Self {
            bots: Vec::new(),
            ai: config.ai.clone(),
            half_extent,
            patrol_extent: (config.map_size / 2.0 - PATROL_MARGIN).max(0.0),
            respawn: RespawnManager::new(half_extent, config.ai.agent_radius),
            rng,
            clock_ms: 0.0,
        }
    }

    /// Replaces the roster with `count` fresh, unplaced agents.
    pub fn create_bots(&mut self, count: usize) -> &[Agent] {
        self.bots = (0..count).map(|i| Agent::new(AgentId(i), &self.ai)).collect();
        info!("Created {} bots", count);
        &self.bots
    }

    /// Places every agent, spreading them over `points` in roster order.
    pub fn spawn_all(&mut self, points: &[Vec2], obstacles: &WallSpatialIndex) {
        let mut occupied = Vec::with_capacity(self.bots.len());
        for bot in self.bots.iter_mut() {
            let position = self.respawn.pick_spawn_position(points, &occupied, obstacles, &mut self.rng);
            bot.spawn(position, &mut self.rng);
            occupied.push(position);
        }
    }

    /// Advances the fleet clock by `dt` seconds and updates every agent in roster order.
    pub fn update(
        &mut self,
        dt: f32,
        player: &PlayerState,
        obstacles: &WallSpatialIndex,
        mut sink: Option<&mut dyn EffectsSink>,
    ) -> FleetTick {
        self.clock_ms += dt as f64 * 1000.0;
        let ctx = TickContext {
            dt,
            now_ms: self.clock_ms,
            obstacles,
            config: &self.ai,
            half_extent: self.half_extent,
            patrol_extent: self.patrol_extent,
        };

        let mut tick = FleetTick::default();
        for i in 0..self.bots.len() {
            let (before, rest) = self.bots.split_at_mut(i);
            let Some((current, after)) = rest.split_first_mut() else {
                break;
            };
            let others = before.iter().chain(after.iter());
            let out = BotAISystem::update_agent(current, &ctx, Some(player), others, &mut self.rng);

            if out.needs_respawn {
                tick.respawn_requests.push(current.id);
            }
            if let Some(shot) = out.shot {
                if let Some(sink) = sink.as_deref_mut() {
                    sink.emit(ArenaEvent::ShotFired {
                        shooter: shot.shooter,
                        target: shot.target,
                        from: current.position,
                        hit: shot.hit,
                    });
                }
                tick.shots.push(shot);
            }
        }
        tick
    }

    /// Respawns the listed dead agents. Unknown ids and living agents are skipped.
    pub fn respawn_bots(&mut self, ids: &[AgentId], points: &[Vec2], obstacles: &WallSpatialIndex) -> Vec<(AgentId, Vec2)> {
        let mut respawned = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.bots.get(id.0) {
                None => {
                    warn!("Respawn requested for unknown agent {}", id);
                    continue;
                }
                Some(bot) if bot.alive => {
                    debug!("[{}] already alive, skipping respawn", id);
                    continue;
                }
                Some(_) => {}
            }

            let occupied: Vec<Vec2> = self.bots.iter().filter(|b| b.alive).map(|b| b.position).collect();
            let position = self.respawn.pick_spawn_position(points, &occupied, obstacles, &mut self.rng);
            if let Some(bot) = self.bots.get_mut(id.0) {
                bot.spawn(position, &mut self.rng);
                counter!("arena_respawns_total").increment(1);
                respawned.push((id, position));
            }
        }
        respawned
    }

    /// Routes damage to one agent. Unknown ids are logged and ignored.
    pub fn apply_damage(&mut self, id: AgentId, amount: f32) -> Option<DamageOutcome> {
        match self.bots.get_mut(id.0) {
            Some(bot) => Some(bot.take_damage(amount)),
            None => {
                warn!("Damage for unknown agent {}", id);
                None
            }
        }
    }

    pub fn credit_kill(&mut self, id: AgentId) {
        match self.bots.get_mut(id.0) {
            Some(bot) => bot.kills += 1,
            None => warn!("Kill credit for unknown agent {}", id),
        }
    }

    pub fn alive_count(&self) -> usize {
        self.bots.iter().filter(|b| b.alive).count()
    }

    pub fn set_flashlights(&mut self, enabled: bool) {
        for bot in self.bots.iter_mut() {
            bot.set_flashlight_enabled(enabled);
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.bots
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.bots.get(id.0)
    }

    /// Drops the roster. The manager can be reused with [`BotManager::create_bots`].
    pub fn dispose(&mut self) {
        info!("Disposing {} bots", self.bots.len());
        self.bots.clear();
    }
}
