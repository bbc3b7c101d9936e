use serde::{Deserialize, Serialize};

/// Opaque handle for one loaded world (dimension) on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// The host's dimension kind. Drives the drop-rate multipliers and the
/// location heuristic for container fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Normal,
    Nether,
    End,
}

/// A block position inside a specific world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldSite {
    pub world: WorldId,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldSite {
    pub const fn new(world: WorldId, x: i32, y: i32, z: i32) -> Self {
        Self { world, x, y, z }
    }

    pub const fn offset(&self, offset: Offset) -> Self {
        Self {
            world: self.world,
            x: self.x + offset.dx,
            y: self.y + offset.dy,
            z: self.z + offset.dz,
        }
    }

    pub const fn up(&self, dy: i32) -> Self {
        self.offset(Offset::new(0, dy, 0))
    }

    /// Euclidean distance. `None` when the sites are in different worlds.
    pub fn distance(&self, other: &WorldSite) -> Option<f64> {
        if self.world != other.world {
            return None;
        }
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        let dz = f64::from(self.z) - f64::from(other.z);
        Some((dx * dx + dy * dy + dz * dz).sqrt())
    }

    /// Distance in the XZ plane. `None` when the sites are in different worlds.
    pub fn horizontal_distance(&self, other: &WorldSite) -> Option<f64> {
        if self.world != other.world {
            return None;
        }
        let dx = f64::from(self.x) - f64::from(other.x);
        let dz = f64::from(self.z) - f64::from(other.z);
        Some((dx * dx + dz * dz).sqrt())
    }
}

impl std::fmt::Display for WorldSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "world#{} ({}, {}, {})", self.world.0, self.x, self.y, self.z)
    }
}

/// Relative block offset from an altar center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }
}
