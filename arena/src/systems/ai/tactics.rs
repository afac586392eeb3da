// arena/src/systems/ai/tactics.rs
//! Per-state locomotion and the combat micro-positioning sub-strategies.
//!
//! Every position change goes through [`try_move`], which rejects steps that would put the
//! agent's body inside a wall or outside the walkable area.

use super::targeting::TargetLock;
use crate::core::config::AiConfig;
use crate::core::constants::{
    ALERT_ARRIVAL_DISTANCE, COVER_ARRIVAL_DISTANCE, COVER_PEEK_CHANCE_PER_SEC, COVER_PEEK_SECS,
    COVER_STANDOFF, FLEE_LATERAL_JITTER, LOOK_AROUND_TURN_RATE, RETREAT_SPEED_FACTOR,
    STRAFE_FLIP_CHANCE_PER_SEC,
};
use crate::core::types::Vec2;
use crate::entities::agent::Agent;
use crate::world::visibility::{has_line_of_sight, is_position_blocked};
use crate::world::wall_spatial_index::WallSpatialIndex;
use rand::Rng;
use std::f32::consts::TAU;
use tracing::trace;

const PATROL_POINT_ATTEMPTS: usize = 8;
const STRAFE_CORRECTION_WEIGHT: f32 = 0.5;
// Axis components smaller than this are not worth sliding along.
const SLIDE_AXIS_MIN_WEIGHT: f32 = 1e-3;

// Cumulative roll thresholds: aggressive, strafe, cover, remainder flank.
const AGGRESSIVE_WEIGHT: f32 = 0.30;
const STRAFE_WEIGHT: f32 = 0.35;
const COVER_WEIGHT: f32 = 0.20;

/// Everything a handler needs about the current tick besides the agent itself.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub dt: f32,
    pub now_ms: f64,
    pub obstacles: &'a WallSpatialIndex,
    pub config: &'a AiConfig,
    /// Agents keep their centre inside `[-half_extent, half_extent]` on both axes.
    pub half_extent: f32,
    /// Patrol waypoints are drawn from `[-patrol_extent, patrol_extent]`.
    pub patrol_extent: f32,
}

impl TickContext<'_> {
    fn is_blocked(&self, p: Vec2) -> bool {
        is_position_blocked(p, self.config.agent_radius, self.half_extent, self.obstacles)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TacticChoice {
    Aggressive,
    Strafe,
    Cover,
    Flank,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Tactic {
    Aggressive,
    Strafe { clockwise: bool },
    /// `peek_timer > 0` while stepping out sideways; `peek_side` is +1 or -1.
    Cover { point: Vec2, peek_timer: f32, peek_side: f32 },
    Flank { point: Vec2 },
}

/// Sub-strategy of the Combat state together with its own re-roll clock.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatPlan {
    pub tactic: Tactic,
    pub tactic_timer: f32,
    pub reroll_after: f32,
}

impl CombatPlan {
    /// Draws a fresh sub-strategy against a target at `target_pos`.
    pub fn roll(me: Vec2, target_pos: Vec2, ctx: &TickContext<'_>, rng: &mut impl Rng) -> Self {
        let sample: f32 = rng.gen();
        let choice = if sample < AGGRESSIVE_WEIGHT {
            TacticChoice::Aggressive
        } else if sample < AGGRESSIVE_WEIGHT + STRAFE_WEIGHT {
            TacticChoice::Strafe
        } else if sample < AGGRESSIVE_WEIGHT + STRAFE_WEIGHT + COVER_WEIGHT {
            TacticChoice::Cover
        } else {
            TacticChoice::Flank
        };
        Self::for_choice(choice, me, target_pos, ctx, rng)
    }

    /// Builds the plan for `choice`. Cover and flank degrade to strafing when no usable point exists.
    pub fn for_choice(
        choice: TacticChoice,
        me: Vec2,
        target_pos: Vec2,
        ctx: &TickContext<'_>,
        rng: &mut impl Rng,
    ) -> Self {
        let tactic = match choice {
            TacticChoice::Aggressive => Tactic::Aggressive,
            TacticChoice::Strafe => random_strafe(rng),
            TacticChoice::Cover => match find_cover_point(me, target_pos, ctx) {
                Some(point) => Tactic::Cover { point, peek_timer: 0.0, peek_side: 1.0 },
                None => random_strafe(rng),
            },
            TacticChoice::Flank => match flank_point(me, target_pos, ctx, rng) {
                Some(point) => Tactic::Flank { point },
                None => random_strafe(rng),
            },
        };
        let config = ctx.config;
        CombatPlan {
            tactic,
            tactic_timer: 0.0,
            reroll_after: rng.gen_range(config.tactic_reroll_min_secs..=config.tactic_reroll_max_secs),
        }
    }
}

fn random_strafe(rng: &mut impl Rng) -> Tactic {
    Tactic::Strafe { clockwise: rng.gen_bool(0.5) }
}

fn chance(per_sec: f64, dt: f32) -> f64 {
    (per_sec * dt as f64).clamp(0.0, 1.0)
}

/// Moves one step along `direction`. Returns false and leaves the agent in place if the step is blocked.
pub fn try_move(agent: &mut Agent, direction: Vec2, speed: f32, ctx: &TickContext<'_>) -> bool {
    let next = agent.position + direction.normalized() * (speed * ctx.dt);
    if ctx.is_blocked(next) {
        return false;
    }
    agent.position = next;
    true
}

/// Like [`try_move`], but slides along whatever blocks the direct step.
///
/// The slide direction sticks to the agent until the direct step clears again, so an agent
/// pressed against a wall keeps working its way round the same end instead of settling where
/// the two sideways pulls cancel. A fresh slide tries the free axis of `direction` first, then
/// both perpendiculars.
pub fn move_with_deflection(agent: &mut Agent, direction: Vec2, speed: f32, ctx: &TickContext<'_>) -> bool {
    if try_move(agent, direction, speed, ctx) {
        agent.wall_slide = None;
        return true;
    }
    if let Some(slide) = agent.wall_slide {
        if try_move(agent, slide, speed, ctx) {
            return true;
        }
    }

    let dir = direction.normalized();
    let x_axis = Vec2::new(dir.x.signum(), 0.0);
    let y_axis = Vec2::new(0.0, dir.y.signum());
    let (major, minor) = if dir.x.abs() >= dir.y.abs() {
        ((dir.x.abs(), x_axis), (dir.y.abs(), y_axis))
    } else {
        ((dir.y.abs(), y_axis), (dir.x.abs(), x_axis))
    };
    let side = dir.perpendicular();
    let candidates = [major, minor]
        .into_iter()
        .filter(|(weight, _)| *weight > SLIDE_AXIS_MIN_WEIGHT)
        .map(|(_, axis)| axis)
        .chain([side, -side]);

    for slide in candidates {
        if try_move(agent, slide, speed, ctx) {
            agent.wall_slide = Some(slide);
            return true;
        }
    }
    agent.wall_slide = None;
    false
}

/// A random unblocked point inside the patrol area. Falls back to the last sample if every try is blocked.
pub fn random_patrol_point(ctx: &TickContext<'_>, rng: &mut impl Rng) -> Vec2 {
    let extent = ctx.patrol_extent.max(0.0);
    let mut sample = Vec2::zero();
    for _ in 0..PATROL_POINT_ATTEMPTS {
        sample = Vec2::new(rng.gen_range(-extent..=extent), rng.gen_range(-extent..=extent));
        if !ctx.is_blocked(sample) {
            break;
        }
    }
    sample
}

pub fn patrol_step(agent: &mut Agent, waypoint: &mut Option<Vec2>, ctx: &TickContext<'_>, rng: &mut impl Rng) {
    let goal = match *waypoint {
        Some(goal) if agent.position.distance(goal) >= ctx.config.waypoint_reached_distance => goal,
        _ => {
            let goal = random_patrol_point(ctx, rng);
            trace!("[{}] new waypoint ({:.1}, {:.1})", agent.id, goal.x, goal.y);
            *waypoint = Some(goal);
            goal
        }
    };

    let direction = goal - agent.position;
    let speed = ctx.config.move_speed * ctx.config.patrol_speed_factor;
    if try_move(agent, direction, speed, ctx) {
        agent.rotation = direction.facing();
    } else {
        *waypoint = Some(random_patrol_point(ctx, rng));
    }
}

/// Walks toward `spot` until close, then looks around. Returns true once arrived.
pub fn investigate(agent: &mut Agent, spot: Vec2, ctx: &TickContext<'_>) -> bool {
    let direction = spot - agent.position;
    if direction.length() <= ALERT_ARRIVAL_DISTANCE {
        look_around(agent, ctx.dt);
        return true;
    }
    let speed = ctx.config.move_speed * ctx.config.alert_speed_factor;
    if move_with_deflection(agent, direction, speed, ctx) {
        agent.rotation = direction.facing();
    }
    false
}

pub fn look_around(agent: &mut Agent, dt: f32) {
    agent.rotation = (agent.rotation + LOOK_AROUND_TURN_RATE * dt).rem_euclid(TAU);
}

/// Runs away from `threat` (or along `heading` when there is none) and regenerates health.
pub fn flee_step(agent: &mut Agent, threat: Option<Vec2>, heading: Vec2, ctx: &TickContext<'_>, rng: &mut impl Rng) {
    let away = threat
        .map(|t| agent.position - t)
        .filter(|v| v.length() > f32::EPSILON)
        .unwrap_or(heading)
        .normalized();
    let lateral = away.perpendicular() * rng.gen_range(-FLEE_LATERAL_JITTER..=FLEE_LATERAL_JITTER);
    let direction = away + lateral;
    if move_with_deflection(agent, direction, ctx.config.run_speed, ctx) {
        agent.rotation = direction.facing();
    }
    agent.health = (agent.health + ctx.config.flee_regen_per_sec * ctx.dt).min(agent.max_health);
}

/// One tick of combat movement. Facing ends locked on the target whatever the sub-strategy did.
pub fn combat_step(
    agent: &mut Agent,
    plan: &mut CombatPlan,
    lock: &TargetLock,
    ctx: &TickContext<'_>,
    rng: &mut impl Rng,
) {
    plan.tactic_timer += ctx.dt;
    if plan.tactic_timer >= plan.reroll_after {
        *plan = CombatPlan::roll(agent.position, lock.position, ctx, rng);
        trace!("[{}] tactic -> {:?}", agent.id, plan.tactic);
    }

    let config = ctx.config;
    let to_target = lock.position - agent.position;
    let distance = to_target.length();

    match &mut plan.tactic {
        Tactic::Aggressive => {
            if distance > config.aggressive_far_distance {
                move_with_deflection(agent, to_target, config.move_speed, ctx);
            } else if distance < config.aggressive_near_distance {
                move_with_deflection(agent, -to_target, config.move_speed * RETREAT_SPEED_FACTOR, ctx);
            }
        }
        Tactic::Strafe { clockwise } => {
            if rng.gen_bool(chance(STRAFE_FLIP_CHANCE_PER_SEC, ctx.dt)) {
                *clockwise = !*clockwise;
            }
            let sign = if *clockwise { 1.0 } else { -1.0 };
            let tangent = to_target.normalized().perpendicular() * sign;
            let correction = if distance > config.strafe_max_distance {
                to_target.normalized()
            } else if distance < config.strafe_min_distance {
                -to_target.normalized()
            } else {
                Vec2::zero()
            };
            let direction = tangent + correction * STRAFE_CORRECTION_WEIGHT;
            if !move_with_deflection(agent, direction, config.move_speed, ctx) {
                *clockwise = !*clockwise;
            }
        }
        Tactic::Cover { point, peek_timer, peek_side } => {
            if *peek_timer > 0.0 {
                *peek_timer -= ctx.dt;
                let side = (lock.position - *point).normalized().perpendicular() * *peek_side;
                try_move(agent, side, config.move_speed * config.patrol_speed_factor, ctx);
            } else if agent.position.distance(*point) > COVER_ARRIVAL_DISTANCE {
                move_with_deflection(agent, *point - agent.position, config.run_speed, ctx);
            } else if rng.gen_bool(chance(COVER_PEEK_CHANCE_PER_SEC, ctx.dt)) {
                *peek_timer = COVER_PEEK_SECS;
                *peek_side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            }
        }
        Tactic::Flank { point } => {
            if agent.position.distance(*point) > config.waypoint_reached_distance {
                move_with_deflection(agent, *point - agent.position, config.run_speed, ctx);
            } else {
                plan.tactic = random_strafe(rng);
            }
        }
    }

    agent.rotation = (lock.position - agent.position).facing();
}

/// The cover point behind a nearby wall that is quickest to reach from `me`.
///
/// Each wall offers three candidates on its far side from the threat: behind the middle and
/// behind either end, pushed out by the agent radius plus a standoff. A candidate must be
/// walkable and hidden from `threat`. Candidates the agent cannot walk straight to are costed
/// as a detour round the nearer end of their wall.
pub fn find_cover_point(me: Vec2, threat: Vec2, ctx: &TickContext<'_>) -> Option<Vec2> {
    let radius = ctx.config.cover_search_radius;
    let clearance = ctx.config.agent_radius + COVER_STANDOFF;
    let mut best: Option<(Vec2, f32)> = None;

    for wall in ctx.obstacles.query_radius(me, radius) {
        let center = wall.center();
        let away = (center - threat).normalized();
        if away == Vec2::zero() {
            continue;
        }
        let along = away.perpendicular();
        let reach = wall.projected_half_extent(along);
        let behind = center + away * (wall.projected_half_extent(away) + clearance);
        let inset = (reach - clearance).max(0.0);

        for offset in [0.0, inset, -inset] {
            let candidate = behind + along * offset;
            if me.distance(candidate) > radius
                || ctx.is_blocked(candidate)
                || has_line_of_sight(candidate, threat, ctx.obstacles)
            {
                continue;
            }
            let route = route_length(me, candidate, center, along * (reach + clearance), ctx.obstacles);
            if best.map_or(true, |(_, d)| route < d) {
                best = Some((candidate, route));
            }
        }
    }
    best.map(|(point, _)| point)
}

/// Straight-line distance when nothing is in the way, else the shorter way round either end.
fn route_length(me: Vec2, goal: Vec2, wall_center: Vec2, end_offset: Vec2, obstacles: &WallSpatialIndex) -> f32 {
    if has_line_of_sight(me, goal, obstacles) {
        return me.distance(goal);
    }
    [wall_center + end_offset, wall_center - end_offset]
        .into_iter()
        .map(|corner| me.distance(corner) + corner.distance(goal))
        .fold(f32::INFINITY, f32::min)
}

/// A point beside the target, perpendicular to the line of fire, on a random side first.
pub fn flank_point(me: Vec2, target: Vec2, ctx: &TickContext<'_>, rng: &mut impl Rng) -> Option<Vec2> {
    let side = (target - me).normalized().perpendicular();
    if side == Vec2::zero() {
        return None;
    }
    let first = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    [first, -first]
        .into_iter()
        .map(|sign| (target + side * (sign * ctx.config.flank_distance)).clamp_to_half_extent(ctx.half_extent))
        .find(|p| !ctx.is_blocked(*p))
}
