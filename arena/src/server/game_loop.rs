// arena/src/server/game_loop.rs
use super::instance::{ArenaMatch, MatchSummary};
use crate::concurrent::event_queue::{ArenaEvent, EffectsSink};
use crate::core::types::{ShotResult, TargetRef, Vec2};
use crate::operational::monitoring::metrics::{record_kill, record_tick};
use crate::world::visibility::{is_position_blocked, visible_in_darkness};

use rand::Rng;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info, trace, warn};

const EVENT_DRAIN_BATCH: usize = 256;

/// What happened during one host tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub shots: Vec<ShotResult>,
    pub deaths: Vec<TargetRef>,
}

impl ArenaMatch {
    /// Advances the whole match by `dt` seconds. A finished match ignores further ticks.
    ///
    /// Order: dark-mode cycle, player, fleet, bot respawns, shot resolution, darkness visibility.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        if self.is_finished() {
            return TickReport::default();
        }
        let tick_start = Instant::now();
        self.elapsed_secs += dt;

        self.update_dark_mode(dt);
        self.update_player(dt);

        let fleet = self.bots.update(
            dt,
            &self.player,
            &self.obstacles,
            Some(&mut self.events as &mut dyn EffectsSink),
        );

        for (id, position) in self.bots.respawn_bots(&fleet.respawn_requests, &self.spawn_points, &self.obstacles) {
            self.events.emit(ArenaEvent::Respawned { who: TargetRef::Agent(id), position });
        }
        if self.dark_mode {
            self.bots.set_flashlights(true);
        }

        let mut report = TickReport { shots: fleet.shots, deaths: Vec::new() };
        for shot in &report.shots {
            if let Some(victim) = self.resolve_shot(shot) {
                report.deaths.push(victim);
            }
        }

        self.update_visibility();

        self.frame_counter += 1;
        record_tick(tick_start.elapsed().as_secs_f64(), self.bots.alive_count());
        if self.frame_counter % (self.config.tick_rate * 10) == 0 {
            debug!(
                "Frame {}: {:.1}s elapsed, {} bots alive, player {:.0} hp",
                self.frame_counter,
                self.elapsed_secs,
                self.bots.alive_count(),
                self.player.health
            );
        }

        if self.is_finished() && !self.finished_logged {
            self.finished_logged = true;
            info!("Match over after {:.1}s, winner: {:?}", self.elapsed_secs, self.winner());
        }
        report
    }

    /// Paces ticks with a tokio interval until the match ends or `max_ticks` have run.
    pub async fn run(&mut self, max_ticks: Option<u64>) -> MatchSummary {
        let dt = self.config.tick_seconds();
        let mut tick_timer = interval(Duration::from_secs_f32(dt));
        let mut ticks = 0u64;

        info!("Match loop started. Tick rate: {}Hz", self.config.tick_rate);
        while !self.is_finished() && max_ticks.map_or(true, |max| ticks < max) {
            tick_timer.tick().await;
            let frame_start = Instant::now();
            self.tick(dt);
            ticks += 1;

            for event in self.drain_events(EVENT_DRAIN_BATCH) {
                trace!("event: {:?}", event);
            }

            let frame_time = frame_start.elapsed();
            if frame_time.as_secs_f32() > dt {
                warn!("Frame {} took too long: {:?}", self.frame_counter, frame_time);
            }
        }
        self.summary()
    }

    fn update_dark_mode(&mut self, dt: f32) {
        self.dark_timer += dt;
        if self.dark_timer < self.config.dark_mode_interval_secs {
            return;
        }
        self.dark_timer -= self.config.dark_mode_interval_secs;
        self.dark_mode = !self.dark_mode;
        self.bots.set_flashlights(self.dark_mode);
        self.events.emit(ArenaEvent::DarkMode { enabled: self.dark_mode });
        info!("Dark mode {}", if self.dark_mode { "on" } else { "off" });
    }

    /// Scripted stand-in for player input: wander between random points, respawn when dead.
    fn update_player(&mut self, dt: f32) {
        if !self.player.alive {
            self.player.respawn_timer -= dt;
            if self.player.respawn_timer <= 0.0 {
                let occupied: Vec<Vec2> = self.bots.agents().iter().filter(|b| b.alive).map(|b| b.position).collect();
                let position = self
                    .respawn
                    .pick_spawn_position(&self.spawn_points, &occupied, &self.obstacles, &mut self.rng);
                self.player.respawn(position);
                self.player_waypoint = None;
                self.events.emit(ArenaEvent::Respawned { who: TargetRef::Player, position });
                info!("Player respawned at ({:.1}, {:.1})", position.x, position.y);
            }
            return;
        }

        let ai = &self.config.ai;
        let half = self.config.walkable_half_extent();
        let goal = match self.player_waypoint {
            Some(goal) if self.player.position.distance(goal) >= ai.waypoint_reached_distance => goal,
            _ => {
                let extent = half - ai.agent_radius;
                let goal = Vec2::new(self.rng.gen_range(-extent..=extent), self.rng.gen_range(-extent..=extent));
                self.player_waypoint = Some(goal);
                goal
            }
        };

        let direction = goal - self.player.position;
        let next = self.player.position + direction.normalized() * (ai.move_speed * ai.patrol_speed_factor * dt);
        if is_position_blocked(next, ai.agent_radius, half, &self.obstacles) {
            self.player_waypoint = None;
        } else {
            self.player.position = next;
            self.player.rotation = direction.facing();
        }
    }

    /// Applies one fired shot. Returns the victim if the shot killed it.
    fn resolve_shot(&mut self, shot: &ShotResult) -> Option<TargetRef> {
        if !shot.hit {
            return None;
        }
        let (remaining, died, position) = match shot.target {
            TargetRef::Player => {
                let outcome = self.player.take_damage(shot.damage);
                if outcome.died {
                    self.player.respawn_timer = self.config.player_respawn_secs;
                }
                (self.player.health, outcome.died, self.player.position)
            }
            TargetRef::Agent(id) => {
                let outcome = self.bots.apply_damage(id, shot.damage)?;
                let bot = self.bots.agent(id)?;
                (bot.health, outcome.died, bot.position)
            }
        };

        self.events.emit(ArenaEvent::Hit { target: shot.target, damage: shot.damage, remaining_health: remaining });
        if !died {
            return None;
        }

        self.bots.credit_kill(shot.shooter);
        record_kill();
        self.events.emit(ArenaEvent::Death {
            victim: shot.target,
            killer: Some(TargetRef::Agent(shot.shooter)),
            position,
        });
        info!("{} killed {}", shot.shooter, shot.target);
        Some(shot.target)
    }

    fn update_visibility(&mut self) {
        let observer = self.player.position;
        let range = self.config.flashlight_range;
        let dark = self.dark_mode;
        let obstacles = &self.obstacles;
        self.visible_to_player.clear();
        self.visible_to_player.extend(
            self.bots
                .agents()
                .iter()
                .map(|b| b.alive && (!dark || visible_in_darkness(observer, b.position, range, obstacles))),
        );
    }
}
