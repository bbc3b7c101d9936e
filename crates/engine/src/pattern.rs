//! Altar structure patterns and the matcher that validates a site against one.

use std::sync::LazyLock;

use crate::god::GodType;
use crate::world::block::{self, BlockId};
use crate::world::position::{Offset, WorldSite};
use crate::world::BlockOracle;

/// Half-width of the square platform under every altar (7x7).
pub const PLATFORM_RADIUS: i32 = 3;

/// The block layout that identifies an altar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructurePattern {
    pub center: BlockId,
    pub platform: BlockId,
    pub constraints: Vec<(Offset, BlockId)>,
}

impl StructurePattern {
    /// Does the structure centered at `site` match this pattern?
    ///
    /// Center block first, then the full platform layer at y-1, then each
    /// offset constraint. Host failures count as a non-match.
    pub fn matches(&self, site: WorldSite, oracle: &dyn BlockOracle) -> bool {
        let is = |s: WorldSite, want: BlockId| oracle.block_at(s).is_ok_and(|b| b == want);

        if !is(site, self.center) {
            return false;
        }

        for dx in -PLATFORM_RADIUS..=PLATFORM_RADIUS {
            for dz in -PLATFORM_RADIUS..=PLATFORM_RADIUS {
                if !is(site.offset(Offset::new(dx, -1, dz)), self.platform) {
                    return false;
                }
            }
        }

        self.constraints
            .iter()
            .all(|&(offset, want)| is(site.offset(offset), want))
    }
}

/// The pattern for `god`.
pub fn pattern(god: GodType) -> &'static StructurePattern {
    &PATTERNS[god as usize]
}

/// Four offsets mirrored across both horizontal axes.
pub(crate) fn corners(d: i32, dy: i32) -> [Offset; 4] {
    [
        Offset::new(d, dy, d),
        Offset::new(-d, dy, d),
        Offset::new(d, dy, -d),
        Offset::new(-d, dy, -d),
    ]
}

/// A block above the center plus four mirrored accents.
fn with_corners(above: BlockId, d: i32, dy: i32, accent: BlockId) -> Vec<(Offset, BlockId)> {
    let mut out = vec![(Offset::new(0, 1, 0), above)];
    out.extend(corners(d, dy).into_iter().map(|o| (o, accent)));
    out
}

// Indexed by `GodType as usize`; order must follow the enum declaration.
static PATTERNS: LazyLock<[StructurePattern; 6]> = LazyLock::new(|| {
    [
        StructurePattern {
            center: block::CRYING_OBSIDIAN,
            platform: block::BLACKSTONE,
            constraints: with_corners(block::SOUL_FIRE, 3, 0, block::BLACKSTONE),
        },
        StructurePattern {
            center: block::MAGMA_BLOCK,
            platform: block::NETHER_BRICKS,
            constraints: with_corners(block::FIRE, 2, 0, block::LAVA),
        },
        StructurePattern {
            center: block::DARK_PRISMARINE,
            platform: block::PRISMARINE,
            constraints: with_corners(block::SEA_LANTERN, 2, 1, block::WATER),
        },
        StructurePattern {
            center: block::OAK_LOG,
            platform: block::MOSS_BLOCK,
            constraints: vec![
                (Offset::new(0, 1, 0), block::OAK_LEAVES),
                (Offset::new(2, 1, 2), block::OAK_SAPLING),
                (Offset::new(-2, 1, 2), block::BIRCH_SAPLING),
                (Offset::new(2, 1, -2), block::SPRUCE_SAPLING),
                (Offset::new(-2, 1, -2), block::JUNGLE_SAPLING),
            ],
        },
        StructurePattern {
            center: block::LIGHTNING_ROD,
            platform: block::QUARTZ_BLOCK,
            constraints: vec![
                (Offset::new(2, 1, 0), block::WHITE_WOOL),
                (Offset::new(-2, 1, 0), block::WHITE_WOOL),
                (Offset::new(0, 1, 2), block::WHITE_WOOL),
                (Offset::new(0, 1, -2), block::WHITE_WOOL),
            ],
        },
        StructurePattern {
            center: block::END_PORTAL_FRAME,
            platform: block::END_STONE,
            constraints: with_corners(block::ENDER_CHEST, 3, 1, block::END_ROD),
        },
    ]
});
