// arena/src/world/wall_spatial_index.rs
use crate::core::types::{Vec2, Wall};
use rstar::{RTree, RTreeObject, AABB};
use tracing::debug;

#[derive(Clone, Debug)]
struct SpatialWall {
    wall: Wall,
}

impl RTreeObject for SpatialWall {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let min = [self.wall.x, self.wall.y];
        let max = [self.wall.x + self.wall.width, self.wall.y + self.wall.height];
        AABB::from_corners(min, max)
    }
}

/// Obstacle set for one session, indexed for segment and point queries.
///
/// Built once from the map and passed by reference into every AI update.
/// An empty index is valid and simply never blocks anything.
#[derive(Clone, Debug)]
pub struct WallSpatialIndex {
    rtree: RTree<SpatialWall>,
}

impl WallSpatialIndex {
    pub fn new(walls: &[Wall]) -> Self {
        let spatial_walls: Vec<SpatialWall> = walls
            .iter()
            .filter(|w| w.width > 0.0 && w.height > 0.0)
            .map(|w| SpatialWall { wall: *w })
            .collect();

        let rtree = RTree::bulk_load(spatial_walls);
        debug!("Wall spatial index built with {} walls", rtree.size());
        WallSpatialIndex { rtree }
    }

    pub fn empty() -> Self {
        WallSpatialIndex { rtree: RTree::new() }
    }

    /// Walls whose footprint intersects the given box.
    pub fn query_aabb(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> impl Iterator<Item = &Wall> + '_ {
        let query_aabb = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        self.rtree
            .locate_in_envelope_intersecting(&query_aabb)
            .map(|spatial_wall| &spatial_wall.wall)
    }

    pub fn query_radius(&self, center: Vec2, radius: f32) -> impl Iterator<Item = &Wall> + '_ {
        self.query_aabb(center.x - radius, center.y - radius, center.x + radius, center.y + radius)
    }

    /// Candidate walls for a segment test: everything touching the segment's bounding box.
    pub fn query_line_segment(&self, a: Vec2, b: Vec2) -> impl Iterator<Item = &Wall> + '_ {
        let buffer = 0.01;
        self.query_aabb(
            a.x.min(b.x) - buffer,
            a.y.min(b.y) - buffer,
            a.x.max(b.x) + buffer,
            a.y.max(b.y) + buffer,
        )
    }

    pub fn size(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }
}

impl Default for WallSpatialIndex {
    fn default() -> Self {
        Self::empty()
    }
}
