//! Altar construction. Each god has a fixed literal layout; stamping it at a
//! site must produce a structure that `pattern(god)` accepts.

use crate::god::GodType;
use crate::pattern::{PLATFORM_RADIUS, corners};
use crate::world::block::{self, BlockId};
use crate::world::position::{Offset, WorldSite};
use crate::world::{BlockMutator, HostError};

/// Height of the blackstone pillars on the Fallen altar.
const PILLAR_HEIGHT: i32 = 3;

/// One block write relative to the altar center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub offset: Offset,
    pub block: BlockId,
}

const fn at(dx: i32, dy: i32, dz: i32, block: BlockId) -> Placement {
    Placement {
        offset: Offset::new(dx, dy, dz),
        block,
    }
}

/// The full block list for `god`'s altar, in write order: platform, center,
/// then accents.
pub fn layout(god: GodType) -> Vec<Placement> {
    let (platform, center) = match god {
        GodType::Fallen => (block::BLACKSTONE, block::CRYING_OBSIDIAN),
        GodType::Banishment => (block::NETHER_BRICKS, block::MAGMA_BLOCK),
        GodType::Abyssal => (block::PRISMARINE, block::DARK_PRISMARINE),
        GodType::Sylvan => (block::MOSS_BLOCK, block::OAK_LOG),
        GodType::Tempest => (block::QUARTZ_BLOCK, block::LIGHTNING_ROD),
        GodType::Veil => (block::END_STONE, block::END_PORTAL_FRAME),
    };

    let mut out = Vec::with_capacity(64);
    for dx in -PLATFORM_RADIUS..=PLATFORM_RADIUS {
        for dz in -PLATFORM_RADIUS..=PLATFORM_RADIUS {
            out.push(at(dx, -1, dz, platform));
        }
    }
    out.push(at(0, 0, 0, center));

    match god {
        GodType::Fallen => {
            out.push(at(0, 1, 0, block::SOUL_FIRE));
            for base in corners(3, 0) {
                for dy in 0..PILLAR_HEIGHT {
                    out.push(at(base.dx, dy, base.dz, block::BLACKSTONE));
                }
                out.push(at(base.dx, PILLAR_HEIGHT, base.dz, block::SOUL_FIRE));
            }
        }
        GodType::Banishment => {
            out.push(at(0, 1, 0, block::FIRE));
            out.extend(corners(2, 0).map(|o| at(o.dx, o.dy, o.dz, block::LAVA)));
        }
        GodType::Abyssal => {
            out.push(at(0, 1, 0, block::SEA_LANTERN));
            out.extend(corners(2, 1).map(|o| at(o.dx, o.dy, o.dz, block::WATER)));
        }
        GodType::Sylvan => {
            out.push(at(0, 1, 0, block::OAK_LEAVES));
            out.push(at(2, 1, 2, block::OAK_SAPLING));
            out.push(at(-2, 1, 2, block::BIRCH_SAPLING));
            out.push(at(2, 1, -2, block::SPRUCE_SAPLING));
            out.push(at(-2, 1, -2, block::JUNGLE_SAPLING));
        }
        GodType::Tempest => {
            out.push(at(2, 1, 0, block::WHITE_WOOL));
            out.push(at(-2, 1, 0, block::WHITE_WOOL));
            out.push(at(0, 1, 2, block::WHITE_WOOL));
            out.push(at(0, 1, -2, block::WHITE_WOOL));
        }
        GodType::Veil => {
            out.push(at(0, 1, 0, block::ENDER_CHEST));
            out.extend(corners(3, 1).map(|o| at(o.dx, o.dy, o.dz, block::END_ROD)));
        }
    }
    out
}

/// Write `god`'s altar centered at `site`. Returns the number of blocks set.
///
/// Stops at the first host failure; blocks already written stay written.
pub fn stamp(site: WorldSite, god: GodType, mutator: &dyn BlockMutator) -> Result<usize, HostError> {
    let placements = layout(god);
    for p in &placements {
        mutator.set_block(site.offset(p.offset), p.block)?;
    }
    tracing::debug!("Stamped {} altar at {} ({} blocks)", god, site, placements.len());
    Ok(placements.len())
}
