//! The engine's view of the host world.
//!
//! The engine never owns blocks. Everything it reads or writes goes through
//! these traits, which the host implements over its own world model. Every
//! call may fail (unloaded chunk, world gone); callers treat a failure as a
//! rejection of the single evaluation that hit it.

pub mod block;
pub mod position;

use block::BlockId;
use position::{WorldId, WorldSite};
use thiserror::Error;

/// A transient failure reported by the host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("unknown world #{0}")]
    UnknownWorld(u32),

    #[error("chunk ({x}, {z}) of world #{world} is not loaded")]
    ChunkNotLoaded { world: u32, x: i32, z: i32 },

    #[error("host error: {0}")]
    Host(String),
}

/// Read access to blocks.
pub trait BlockOracle: Send + Sync {
    fn block_at(&self, site: WorldSite) -> Result<BlockId, HostError>;

    /// Whether the host treats this block as a full solid block.
    fn is_solid(&self, block: BlockId) -> bool;
}

/// Terrain sampling used by the site selector.
pub trait SurfaceSampler: Send + Sync {
    /// The y of the first free block above the ground at column (x, z).
    fn surface_height(&self, world: WorldId, x: i32, z: i32) -> Result<i32, HostError>;

    /// Host biome name, e.g. `"DARK_FOREST"`.
    fn biome_at(&self, site: WorldSite) -> Result<String, HostError>;
}

/// Write access to blocks. Only ever called from the host's primary context.
pub trait BlockMutator: Send + Sync {
    fn set_block(&self, site: WorldSite, block: BlockId) -> Result<(), HostError>;
}
