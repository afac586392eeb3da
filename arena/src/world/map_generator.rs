// arena/src/world/map_generator.rs
use crate::core::constants::{DOOR_WIDTH, MAP_SIZE, WALL_THICKNESS};
use crate::core::types::{EntityId, Vec2, Wall};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    North,
    South,
    West,
    East,
}

/// A rectangular room, described by its centre and size, with door gaps on some sides.
#[derive(Clone, Debug)]
pub struct RoomSpec {
    pub center: Vec2,
    pub width: f32,
    pub depth: f32,
    pub doors: &'static [Side],
}

pub const HOUSE_ROOMS: [RoomSpec; 6] = [
    RoomSpec { center: Vec2 { x: -10.0, y: -10.0 }, width: 8.0, depth: 8.0, doors: &[Side::South, Side::East] },
    RoomSpec { center: Vec2 { x: 2.0, y: -10.0 }, width: 8.0, depth: 8.0, doors: &[Side::South, Side::West] },
    RoomSpec { center: Vec2 { x: -10.0, y: 2.0 }, width: 8.0, depth: 8.0, doors: &[Side::North, Side::East, Side::South] },
    RoomSpec { center: Vec2 { x: 2.0, y: 2.0 }, width: 8.0, depth: 8.0, doors: &[Side::North, Side::West, Side::South] },
    RoomSpec { center: Vec2 { x: -10.0, y: 10.0 }, width: 8.0, depth: 6.0, doors: &[Side::North] },
    RoomSpec { center: Vec2 { x: 2.0, y: 10.0 }, width: 8.0, depth: 6.0, doors: &[Side::North] },
];

const SPAWN_POINTS: [(f32, f32); 17] = [
    (-15.0, -15.0), (15.0, -15.0), (-15.0, 15.0), (15.0, 15.0), // Corners
    (0.0, -15.0), (0.0, 15.0),
    (-8.0, 0.0), (8.0, 0.0),
    (-12.0, -8.0), (12.0, -8.0), (-12.0, 8.0), (12.0, 8.0),
    (0.0, 0.0), // Hallway crossing
    (-5.0, -5.0), (5.0, -5.0), (-5.0, 5.0), (5.0, 5.0),
];

const OUTER_WALL_THICKNESS: f32 = 0.5;
const MIN_WALL_SEGMENT: f32 = 0.5;

pub struct MapGenerator {
    next_id: EntityId,
}

impl MapGenerator {
    pub fn new() -> Self {
        MapGenerator { next_id: 1 }
    }

    /// The default house: every room in [`HOUSE_ROOMS`] plus the outer boundary.
    pub fn generate_house_map() -> Vec<Wall> {
        let mut generator = Self::new();
        let mut walls = Vec::new();
        for room in HOUSE_ROOMS.iter() {
            walls.extend(generator.create_room(room));
        }
        walls.extend(generator.create_border_walls(MAP_SIZE));
        walls
    }

    pub fn default_spawn_points() -> Vec<Vec2> {
        SPAWN_POINTS.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }

    fn next_wall_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn create_room(&mut self, room: &RoomSpec) -> Vec<Wall> {
        let mut walls = Vec::new();
        let half_w = room.width / 2.0;
        let half_d = room.depth / 2.0;
        let sides = [
            (Side::North, Vec2::new(room.center.x, room.center.y - half_d), true),
            (Side::South, Vec2::new(room.center.x, room.center.y + half_d), true),
            (Side::West, Vec2::new(room.center.x - half_w, room.center.y), false),
            (Side::East, Vec2::new(room.center.x + half_w, room.center.y), false),
        ];

        for (side, center, horizontal) in sides {
            let length = if horizontal { room.width } else { room.depth };
            if room.doors.contains(&side) {
                walls.extend(self.create_wall_with_door(center, length, horizontal));
            } else {
                walls.push(self.create_solid_wall(center, length, horizontal));
            }
        }
        walls
    }

    fn create_solid_wall(&mut self, center: Vec2, length: f32, horizontal: bool) -> Wall {
        let (sx, sy) = if horizontal { (length, WALL_THICKNESS) } else { (WALL_THICKNESS, length) };
        Wall::from_center(self.next_wall_id(), center, sx, sy)
    }

    /// Two segments either side of a centred door gap. Stubs shorter than the minimum are skipped.
    fn create_wall_with_door(&mut self, center: Vec2, length: f32, horizontal: bool) -> Vec<Wall> {
        let mut walls = Vec::new();
        let piece = (length - DOOR_WIDTH) / 2.0;
        if piece <= MIN_WALL_SEGMENT {
            return walls;
        }
        let offset = DOOR_WIDTH / 2.0 + piece / 2.0;
        for sign in [-1.0_f32, 1.0] {
            let piece_center = if horizontal {
                Vec2::new(center.x + sign * offset, center.y)
            } else {
                Vec2::new(center.x, center.y + sign * offset)
            };
            walls.push(self.create_solid_wall(piece_center, piece, horizontal));
        }
        walls
    }

    pub fn create_border_walls(&mut self, map_size: f32) -> Vec<Wall> {
        let half = map_size / 2.0;
        let t = OUTER_WALL_THICKNESS;
        vec![
            Wall::from_center(self.next_wall_id(), Vec2::new(0.0, -half - t / 2.0), map_size + t * 2.0, t),
            Wall::from_center(self.next_wall_id(), Vec2::new(0.0, half + t / 2.0), map_size + t * 2.0, t),
            Wall::from_center(self.next_wall_id(), Vec2::new(-half - t / 2.0, 0.0), t, map_size),
            Wall::from_center(self.next_wall_id(), Vec2::new(half + t / 2.0, 0.0), t, map_size),
        ]
    }
}

impl Default for MapGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::AGENT_RADIUS;
    use crate::world::visibility::{check_wall_collision, has_line_of_sight};
    use crate::world::wall_spatial_index::WallSpatialIndex;

    #[test]
    fn house_has_unique_wall_ids() {
        let walls = MapGenerator::generate_house_map();
        let mut ids: Vec<_> = walls.iter().map(|w| w.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), walls.len());
        // 6 rooms: 12 door sides split in two, 12 solid sides, plus 4 border walls.
        assert_eq!(walls.len(), 12 * 2 + 12 + 4);
    }

    #[test]
    fn spawn_points_are_walkable() {
        let index = WallSpatialIndex::new(&MapGenerator::generate_house_map());
        for p in MapGenerator::default_spawn_points() {
            assert!(!check_wall_collision(p.x, p.y, AGENT_RADIUS, &index), "spawn {:?} is inside a wall", p);
        }
    }

    #[test]
    fn door_gap_lets_sight_through() {
        let index = WallSpatialIndex::new(&MapGenerator::generate_house_map());
        // Living room east door faces the hallway at x = -6.
        assert!(has_line_of_sight(Vec2::new(-10.0, 2.0), Vec2::new(-4.0, 2.0), &index));
        // Bathroom south side is solid.
        assert!(!has_line_of_sight(Vec2::new(-10.0, 10.0), Vec2::new(-10.0, 16.0), &index));
    }
}
