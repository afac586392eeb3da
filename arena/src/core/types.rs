// arena/src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

pub type EntityId = u64;

/// Index of an agent inside its fleet roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bot#{}", self.0)
    }
}

// --- Basic Geometric Types ---

/// Point or direction on the ground plane. `y` is the world depth axis; height is fixed.
#[derive(Clone, Debug, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self { Vec2 { x, y } }
    pub fn zero() -> Self { Vec2 { x: 0.0, y: 0.0 } }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Unit vector, or zero when the input is degenerate.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec2::zero()
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }

    /// Left-hand perpendicular.
    pub fn perpendicular(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Unit vector for a facing angle, using the same convention as [`Vec2::facing`].
    pub fn from_facing(angle: f32) -> Vec2 {
        Vec2::new(angle.sin(), angle.cos())
    }

    /// Facing angle of this direction: `atan2(x, y)`, zero points along +y.
    pub fn facing(self) -> f32 {
        self.x.atan2(self.y)
    }

    pub fn clamp_to_half_extent(self, half: f32) -> Vec2 {
        Vec2::new(self.x.clamp(-half, half), self.y.clamp(-half, half))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x + rhs.x, self.y + rhs.y) }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 { Vec2::new(self.x * rhs, self.y * rhs) }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 { Vec2::new(-self.x, -self.y) }
}

/// Axis-aligned wall footprint on the ground plane. Immutable for a session.
#[derive(Clone, Debug, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Wall {
    /// Builds a wall from its centre and full size, the way room layouts describe them.
    pub fn from_center(id: EntityId, center: Vec2, size_x: f32, size_y: f32) -> Self {
        Wall {
            id,
            x: center.x - size_x / 2.0,
            y: center.y - size_y / 2.0,
            width: size_x,
            height: size_y,
        }
    }

    pub fn min(&self) -> Vec2 { Vec2::new(self.x, self.y) }
    pub fn max(&self) -> Vec2 { Vec2::new(self.x + self.width, self.y + self.height) }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half the wall's extent measured along the unit vector `dir`.
    pub fn projected_half_extent(&self, dir: Vec2) -> f32 {
        (dir.x.abs() * self.width + dir.y.abs() * self.height) / 2.0
    }

    pub fn contains_with_margin(&self, p: Vec2, margin: f32) -> bool {
        p.x >= self.x - margin
            && p.x <= self.x + self.width + margin
            && p.y >= self.y - margin
            && p.y <= self.y + self.height + margin
    }
}

// --- Targeting ---

/// Weak handle to something an agent can aim at. Never owns the entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    Player,
    Agent(AgentId),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Player => write!(f, "player"),
            TargetRef::Agent(id) => write!(f, "{}", id),
        }
    }
}

/// Read-only view of anything that can be targeted and damaged.
pub trait Combatant {
    fn position(&self) -> Vec2;
    fn health(&self) -> f32;
    fn max_health(&self) -> f32;
    fn is_alive(&self) -> bool;

    fn health_fraction(&self) -> f32 {
        if self.max_health() <= 0.0 {
            0.0
        } else {
            (self.health() / self.max_health()).clamp(0.0, 1.0)
        }
    }
}

/// Result of applying damage to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DamageOutcome {
    pub died: bool,
}

/// A shot an agent actually fired this tick. Cooldown-blocked attempts produce none.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotResult {
    pub shooter: AgentId,
    pub target: TargetRef,
    pub hit: bool,
    pub damage: f32,
}
