//! Block physics and naming for the in-memory host.
//!
//! The engine only knows material handles; which of them are solid, and what
//! they are called in save files and logs, is decided here.

use testament_engine::world::block::{self, BlockId};

/// Save-file names for every material the host knows.
const NAMES: &[(BlockId, &str)] = &[
    (block::AIR, "air"),
    (block::STONE, "stone"),
    (block::GRASS_BLOCK, "grass_block"),
    (block::DIRT, "dirt"),
    (block::BEDROCK, "bedrock"),
    (block::SAND, "sand"),
    (block::WATER, "water"),
    (block::LAVA, "lava"),
    (block::SHORT_GRASS, "short_grass"),
    (block::TALL_GRASS, "tall_grass"),
    (block::FERN, "fern"),
    (block::LARGE_FERN, "large_fern"),
    (block::OAK_PLANKS, "oak_planks"),
    (block::BLACKSTONE, "blackstone"),
    (block::CRYING_OBSIDIAN, "crying_obsidian"),
    (block::SOUL_FIRE, "soul_fire"),
    (block::NETHER_BRICKS, "nether_bricks"),
    (block::MAGMA_BLOCK, "magma_block"),
    (block::FIRE, "fire"),
    (block::PRISMARINE, "prismarine"),
    (block::DARK_PRISMARINE, "dark_prismarine"),
    (block::SEA_LANTERN, "sea_lantern"),
    (block::MOSS_BLOCK, "moss_block"),
    (block::OAK_LOG, "oak_log"),
    (block::OAK_LEAVES, "oak_leaves"),
    (block::OAK_SAPLING, "oak_sapling"),
    (block::BIRCH_SAPLING, "birch_sapling"),
    (block::SPRUCE_SAPLING, "spruce_sapling"),
    (block::JUNGLE_SAPLING, "jungle_sapling"),
    (block::QUARTZ_BLOCK, "quartz_block"),
    (block::LIGHTNING_ROD, "lightning_rod"),
    (block::WHITE_WOOL, "white_wool"),
    (block::END_STONE, "end_stone"),
    (block::END_PORTAL_FRAME, "end_portal_frame"),
    (block::END_ROD, "end_rod"),
    (block::CHEST, "chest"),
    (block::TRAPPED_CHEST, "trapped_chest"),
    (block::BARREL, "barrel"),
    (block::SHULKER_BOX, "shulker_box"),
    (block::ENDER_CHEST, "ender_chest"),
];

pub fn name(id: BlockId) -> &'static str {
    NAMES
        .iter()
        .find(|(b, _)| *b == id)
        .map(|(_, n)| *n)
        .unwrap_or("unknown")
}

pub fn from_name(name: &str) -> Option<BlockId> {
    let name = name.strip_prefix("minecraft:").unwrap_or(name);
    NAMES.iter().find(|(_, n)| *n == name).map(|(b, _)| *b)
}

/// Is this a fluid?
pub fn is_fluid(id: BlockId) -> bool {
    id == block::WATER || id == block::LAVA
}

/// Blocks with no collision box: air, fluids, plants, flames and saplings.
pub fn is_passable(id: BlockId) -> bool {
    block::is_replaceable(id)
        || matches!(
            id,
            block::SOUL_FIRE
                | block::FIRE
                | block::OAK_SAPLING
                | block::BIRCH_SAPLING
                | block::SPRUCE_SAPLING
                | block::JUNGLE_SAPLING
        )
}

/// Is this block fully solid?
pub fn is_solid(id: BlockId) -> bool {
    !is_passable(id)
}
