/// Opaque block identifier. The host assigns the numbering; the engine only
/// names the handful of materials the altar layouts and drop tables refer to.
///
/// `BlockId::AIR` (0) is the universal "empty" block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    /// The universal "empty" block.
    pub const AIR: BlockId = BlockId(0);
}

// -- Terrain --
pub const AIR: BlockId = BlockId::AIR;
pub const STONE: BlockId = BlockId(1);
pub const GRASS_BLOCK: BlockId = BlockId(2);
pub const DIRT: BlockId = BlockId(3);
pub const BEDROCK: BlockId = BlockId(4);
pub const SAND: BlockId = BlockId(5);
pub const WATER: BlockId = BlockId(6);
pub const LAVA: BlockId = BlockId(7);
pub const SHORT_GRASS: BlockId = BlockId(8);
pub const TALL_GRASS: BlockId = BlockId(9);
pub const FERN: BlockId = BlockId(10);
pub const LARGE_FERN: BlockId = BlockId(11);
pub const OAK_PLANKS: BlockId = BlockId(12);

// -- Altar materials --
pub const BLACKSTONE: BlockId = BlockId(20);
pub const CRYING_OBSIDIAN: BlockId = BlockId(21);
pub const SOUL_FIRE: BlockId = BlockId(22);
pub const NETHER_BRICKS: BlockId = BlockId(23);
pub const MAGMA_BLOCK: BlockId = BlockId(24);
pub const FIRE: BlockId = BlockId(25);
pub const PRISMARINE: BlockId = BlockId(26);
pub const DARK_PRISMARINE: BlockId = BlockId(27);
pub const SEA_LANTERN: BlockId = BlockId(28);
pub const MOSS_BLOCK: BlockId = BlockId(29);
pub const OAK_LOG: BlockId = BlockId(30);
pub const OAK_LEAVES: BlockId = BlockId(31);
pub const OAK_SAPLING: BlockId = BlockId(32);
pub const BIRCH_SAPLING: BlockId = BlockId(33);
pub const SPRUCE_SAPLING: BlockId = BlockId(34);
pub const JUNGLE_SAPLING: BlockId = BlockId(35);
pub const QUARTZ_BLOCK: BlockId = BlockId(36);
pub const LIGHTNING_ROD: BlockId = BlockId(37);
pub const WHITE_WOOL: BlockId = BlockId(38);
pub const END_STONE: BlockId = BlockId(39);
pub const END_PORTAL_FRAME: BlockId = BlockId(40);
pub const END_ROD: BlockId = BlockId(41);

// -- Containers --
pub const CHEST: BlockId = BlockId(50);
pub const TRAPPED_CHEST: BlockId = BlockId(51);
pub const BARREL: BlockId = BlockId(52);
pub const SHULKER_BOX: BlockId = BlockId(53);
pub const ENDER_CHEST: BlockId = BlockId(54);

/// Blocks an altar may be placed over without counting as an obstruction.
pub fn is_replaceable(id: BlockId) -> bool {
    matches!(
        id,
        AIR | WATER | LAVA | SHORT_GRASS | TALL_GRASS | FERN | LARGE_FERN
    )
}

/// Container blocks whose opening is considered for fragment spawns.
pub fn is_container(id: BlockId) -> bool {
    matches!(id, CHEST | TRAPPED_CHEST | BARREL | SHULKER_BOX | ENDER_CHEST)
}

/// Containers that double the spawn chance.
pub fn is_rare_container(id: BlockId) -> bool {
    matches!(id, ENDER_CHEST | SHULKER_BOX)
}
