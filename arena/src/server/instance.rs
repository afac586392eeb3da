// arena/src/server/instance.rs
use crate::concurrent::event_queue::{ArenaEvent, PriorityEventQueue};
use crate::core::config::ArenaConfig;
use crate::core::error::{ArenaError, ArenaResult};
use crate::core::types::{AgentId, TargetRef, Vec2, Wall};
use crate::entities::player::PlayerState;
use crate::systems::bots::BotManager;
use crate::systems::respawn::RespawnManager;
use crate::world::map_generator::MapGenerator;
use crate::world::wall_spatial_index::WallSpatialIndex;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

/// One line of the scoreboard. The player always comes first, then bots in roster order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub who: TargetRef,
    pub kills: u32,
    pub deaths: u32,
}

/// Final (or current) state of a match, as written by the headless host.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchSummary {
    pub elapsed_secs: f32,
    pub ticks: u64,
    pub winner: Option<TargetRef>,
    pub bots_alive: usize,
    pub scoreboard: Vec<ScoreEntry>,
}

/// A single-player match: the player stand-in, the bot fleet and the house they fight in.
pub struct ArenaMatch {
    pub(crate) config: ArenaConfig,
    pub(crate) player: PlayerState,
    pub(crate) player_waypoint: Option<Vec2>,
    pub(crate) bots: BotManager,
    pub(crate) obstacles: WallSpatialIndex,
    pub(crate) spawn_points: Vec<Vec2>,
    pub(crate) respawn: RespawnManager,
    pub(crate) events: PriorityEventQueue,
    pub(crate) rng: StdRng,
    pub(crate) elapsed_secs: f32,
    pub(crate) dark_mode: bool,
    pub(crate) dark_timer: f32,
    /// Per roster slot: can the player see this bot right now.
    pub(crate) visible_to_player: Vec<bool>,
    pub(crate) frame_counter: u64,
    pub(crate) finished_logged: bool,
}

impl ArenaMatch {
    /// The default house layout with its default spawn points.
    pub fn new(config: ArenaConfig) -> ArenaResult<Self> {
        Self::with_layout(config, &MapGenerator::generate_house_map(), MapGenerator::default_spawn_points())
    }

    pub fn with_layout(config: ArenaConfig, walls: &[Wall], spawn_points: Vec<Vec2>) -> ArenaResult<Self> {
        config.validate()?;
        if spawn_points.is_empty() {
            return Err(ArenaError::InvalidSpawnPoints("at least one spawn point is required".into()));
        }

        let obstacles = WallSpatialIndex::new(walls);
        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };

        let mut bots = BotManager::new(&config);
        bots.create_bots(config.bot_count);
        bots.spawn_all(&spawn_points, &obstacles);

        let respawn = RespawnManager::new(config.walkable_half_extent(), config.ai.agent_radius);
        let occupied: Vec<Vec2> = bots.agents().iter().map(|b| b.position).collect();
        let player = PlayerState::new(respawn.pick_spawn_position(&spawn_points, &occupied, &obstacles, &mut rng));

        info!(
            "Match ready: {} bots, {} walls, {} spawn points, {:.0}s",
            config.bot_count,
            obstacles.size(),
            spawn_points.len(),
            config.match_duration_secs
        );

        Ok(ArenaMatch {
            visible_to_player: vec![true; config.bot_count],
            config,
            player,
            player_waypoint: None,
            bots,
            obstacles,
            spawn_points,
            respawn,
            events: PriorityEventQueue::new(),
            rng,
            elapsed_secs: 0.0,
            dark_mode: false,
            dark_timer: 0.0,
            frame_counter: 0,
            finished_logged: false,
        })
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn bots(&self) -> &BotManager {
        &self.bots
    }

    pub fn bots_mut(&mut self) -> &mut BotManager {
        &mut self.bots
    }

    pub fn obstacles(&self) -> &WallSpatialIndex {
        &self.obstacles
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_counter
    }

    pub fn is_dark(&self) -> bool {
        self.dark_mode
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_secs >= self.config.match_duration_secs
    }

    pub fn is_bot_visible(&self, id: AgentId) -> bool {
        self.visible_to_player.get(id.0).copied().unwrap_or(false)
    }

    /// Takes up to `max` pending presentation events, highest priority first.
    pub fn drain_events(&self, max: usize) -> Vec<ArenaEvent> {
        self.events.pop_batch(max)
    }

    pub fn scoreboard(&self) -> Vec<ScoreEntry> {
        std::iter::once(ScoreEntry {
            who: TargetRef::Player,
            kills: self.player.kills,
            deaths: self.player.deaths,
        })
        .chain(self.bots.agents().iter().map(|b| ScoreEntry {
            who: TargetRef::Agent(b.id),
            kills: b.kills,
            deaths: b.deaths,
        }))
        .collect()
    }

    /// Kill leader: the player against the best bot. Ties go to the player, the earliest
    /// bot wins among bots, and nobody wins while no one has a kill.
    pub fn winner(&self) -> Option<TargetRef> {
        let best_bot = self
            .bots
            .agents()
            .iter()
            .fold(None::<(AgentId, u32)>, |best, b| match best {
                Some((_, kills)) if kills >= b.kills => best,
                _ => Some((b.id, b.kills)),
            });

        match best_bot {
            Some((id, kills)) if kills > self.player.kills => Some(TargetRef::Agent(id)),
            _ if self.player.kills > 0 => Some(TargetRef::Player),
            _ => None,
        }
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            elapsed_secs: self.elapsed_secs,
            ticks: self.frame_counter,
            winner: self.winner(),
            bots_alive: self.bots.alive_count(),
            scoreboard: self.scoreboard(),
        }
    }
}
