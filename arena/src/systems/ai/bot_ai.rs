// arena/src/systems/ai/bot_ai.rs

use super::combat::try_shoot;
use super::tactics::{
    combat_step, flee_step, investigate, look_around, patrol_step, CombatPlan, TickContext,
};
use super::targeting::{find_target, TargetLock};
use crate::core::types::{Combatant, ShotResult, Vec2};
use crate::entities::agent::{Agent, BotState};
use crate::entities::player::PlayerState;

use rand::Rng;
use std::f32::consts::TAU;
use tracing::{debug, trace};

/// What one agent produced this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AgentTick {
    pub shot: Option<ShotResult>,
    pub needs_respawn: bool,
}

pub struct BotAISystem;

impl BotAISystem {
    /// Runs one agent's state machine for a tick.
    ///
    /// Order: flee override, target presence, then the active state's own exits and movement.
    /// A dead agent only counts its respawn timer down.
    pub fn update_agent<'a>(
        agent: &mut Agent,
        ctx: &TickContext<'_>,
        player: Option<&PlayerState>,
        others: impl IntoIterator<Item = &'a Agent>,
        rng: &mut impl Rng,
    ) -> AgentTick {
        if !agent.alive {
            return AgentTick {
                shot: None,
                needs_respawn: agent.tick_respawn(ctx.dt as f64 * 1000.0),
            };
        }

        agent.state_timer += ctx.dt;
        let config = ctx.config;

        let lock = find_target(agent, player, others, ctx.obstacles, config);
        agent.target = lock.map(|l| l.target);
        if let Some(l) = lock {
            agent.last_known_target_pos = Some(l.position);
        }

        if agent.health_is_below(config.flee_health_fraction) && !matches!(agent.state, BotState::Flee { .. }) {
            debug!("[{}] health {:.0} below flee threshold", agent.id, agent.health);
            let heading = Vec2::from_facing(rng.gen_range(0.0..TAU));
            agent.transition(BotState::Flee { heading });
        }

        let mut state = std::mem::take(&mut agent.state);
        let mut shot = None;
        let next = match &mut state {
            BotState::Idle => match lock {
                Some(l) => Some(Self::engage(agent, &l, ctx, rng)),
                None if agent.state_timer >= config.idle_duration_secs => Some(BotState::Patrol { waypoint: None }),
                None => {
                    look_around(agent, ctx.dt);
                    None
                }
            },
            BotState::Patrol { waypoint } => match lock {
                Some(l) => Some(Self::engage(agent, &l, ctx, rng)),
                None if rng.gen_bool((config.patrol_idle_chance_per_sec * ctx.dt as f64).clamp(0.0, 1.0)) => {
                    Some(BotState::Idle)
                }
                None => {
                    patrol_step(agent, waypoint, ctx, rng);
                    None
                }
            },
            BotState::Alert => match lock {
                Some(l) => Some(Self::engage(agent, &l, ctx, rng)),
                None if agent.state_timer >= config.alert_timeout_secs => Some(BotState::Patrol { waypoint: None }),
                None => {
                    match agent.last_known_target_pos {
                        Some(spot) => {
                            investigate(agent, spot, ctx);
                        }
                        None => look_around(agent, ctx.dt),
                    }
                    None
                }
            },
            BotState::Combat(plan) => match lock {
                None => Some(BotState::Alert),
                Some(l) => {
                    combat_step(agent, plan, &l, ctx, rng);
                    if l.distance <= config.attack_range {
                        shot = try_shoot(agent, l.distance, ctx.now_ms, config, rng);
                    }
                    None
                }
            },
            BotState::Flee { heading } => {
                let recovered = agent.health_fraction() > config.recover_health_fraction;
                if recovered || agent.state_timer >= config.flee_timeout_secs {
                    trace!("[{}] leaving flee, recovered={}", agent.id, recovered);
                    Some(match lock {
                        Some(l) => Self::engage(agent, &l, ctx, rng),
                        None => BotState::Patrol { waypoint: None },
                    })
                } else {
                    let threat = lock.map(|l| l.position).or(agent.last_known_target_pos);
                    flee_step(agent, threat, *heading, ctx, rng);
                    None
                }
            }
            BotState::Dead => None,
        };

        agent.state = state;
        if let Some(next) = next {
            agent.transition(next);
        }

        AgentTick { shot, needs_respawn: false }
    }

    fn engage(agent: &Agent, lock: &TargetLock, ctx: &TickContext<'_>, rng: &mut impl Rng) -> BotState {
        debug!("[{}] engaging {} at {:.1}", agent.id, lock.target, lock.distance);
        BotState::Combat(CombatPlan::roll(agent.position, lock.position, ctx, rng))
    }
}
