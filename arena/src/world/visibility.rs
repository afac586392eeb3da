// arena/src/world/visibility.rs
//! Line-of-sight and wall-collision queries against the obstacle set.

use super::wall_spatial_index::WallSpatialIndex;
use crate::core::types::{Vec2, Wall};

/// True when nothing in `obstacles` blocks the straight segment from `observer` to `target`.
///
/// The test is bounded by the exact separation of the two points, so a wall
/// behind the target never blocks.
pub fn has_line_of_sight(observer: Vec2, target: Vec2, obstacles: &WallSpatialIndex) -> bool {
    !obstacles
        .query_line_segment(observer, target)
        .any(|wall| segment_intersects_wall(observer, target, wall))
}

/// Darkness gating: the target is only visible inside the flashlight cone range and with clear LOS.
pub fn visible_in_darkness(observer: Vec2, target: Vec2, light_range: f32, obstacles: &WallSpatialIndex) -> bool {
    observer.distance(target) < light_range && has_line_of_sight(observer, target, obstacles)
}

/// True when a body of radius `margin` centred at (`x`, `y`) would overlap any wall footprint.
pub fn check_wall_collision(x: f32, y: f32, margin: f32, obstacles: &WallSpatialIndex) -> bool {
    let p = Vec2::new(x, y);
    obstacles
        .query_radius(p, margin)
        .any(|wall| wall.contains_with_margin(p, margin))
}

/// Movement validation used by the tactics engine: walls plus the arena boundary.
pub fn is_position_blocked(p: Vec2, margin: f32, half_extent: f32, obstacles: &WallSpatialIndex) -> bool {
    p.x.abs() > half_extent || p.y.abs() > half_extent || check_wall_collision(p.x, p.y, margin, obstacles)
}

/// Slab test of segment `a`-`b` against the wall's box.
fn segment_intersects_wall(a: Vec2, b: Vec2, wall: &Wall) -> bool {
    let min = wall.min();
    let max = wall.max();
    let d = b - a;
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    for (origin, delta, lo, hi) in [(a.x, d.x, min.x, max.x), (a.y, d.y, min.y, max.y)] {
        if delta.abs() < 1e-6 {
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }
        let inv = 1.0 / delta;
        let mut t0 = (lo - origin) * inv;
        let mut t1 = (hi - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return false;
        }
    }
    true
}
