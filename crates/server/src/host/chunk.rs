use std::collections::HashMap;

use testament_engine::world::block::BlockId;

use super::terrain::Terrain;

/// Number of blocks along each axis of a chunk section.
pub const SECTION_SIZE: usize = 16;
/// Total block count in one section.
const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// Chunk column position (each chunk is 16x16 blocks horizontally).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The chunk containing block column (x, z).
    pub const fn containing(x: i32, z: i32) -> Self {
        Self { x: x >> 4, z: z >> 4 }
    }
}

/// A 16x16x16 cube of blocks, stored in YZX order.
#[derive(Clone)]
pub struct ChunkSection {
    blocks: Box<[BlockId; SECTION_VOLUME]>,
}

impl ChunkSection {
    /// Materialise the generated terrain for section `sy` of chunk `pos`.
    fn from_terrain(terrain: &Terrain, pos: ChunkPos, sy: i32) -> Self {
        let mut blocks = Box::new([BlockId::AIR; SECTION_VOLUME]);
        for ly in 0..SECTION_SIZE {
            for lz in 0..SECTION_SIZE {
                for lx in 0..SECTION_SIZE {
                    let x = (pos.x << 4) + lx as i32;
                    let z = (pos.z << 4) + lz as i32;
                    let y = (sy << 4) + ly as i32;
                    blocks[Self::index(lx as u8, ly as u8, lz as u8)] = terrain.block_at(x, y, z);
                }
            }
        }
        Self { blocks }
    }

    #[inline]
    const fn index(x: u8, y: u8, z: u8) -> usize {
        (y as usize) * SECTION_SIZE * SECTION_SIZE + (z as usize) * SECTION_SIZE + (x as usize)
    }

    #[inline]
    pub fn get(&self, x: u8, y: u8, z: u8) -> BlockId {
        self.blocks[Self::index(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: u8, y: u8, z: u8, block: BlockId) {
        self.blocks[Self::index(x, y, z)] = block;
    }
}

/// Edits to one chunk column, layered over generated terrain.
///
/// A section is only stored once something in it has been written; until
/// then reads fall through to the terrain generator.
#[derive(Default)]
pub struct Chunk {
    sections: HashMap<i32, ChunkSection>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block at world coordinates inside this chunk.
    pub fn get_block(&self, terrain: &Terrain, x: i32, y: i32, z: i32) -> BlockId {
        match self.sections.get(&(y >> 4)) {
            Some(section) => section.get(local(x), local(y), local(z)),
            None => terrain.block_at(x, y, z),
        }
    }

    pub fn set_block(&mut self, terrain: &Terrain, x: i32, y: i32, z: i32, block: BlockId) {
        let pos = ChunkPos::containing(x, z);
        self.sections
            .entry(y >> 4)
            .or_insert_with(|| ChunkSection::from_terrain(terrain, pos, y >> 4))
            .set(local(x), local(y), local(z), block);
    }

    /// Highest y with an edited section, if any.
    pub fn top_edited_y(&self) -> Option<i32> {
        self.sections.keys().max().map(|sy| (sy << 4) + SECTION_SIZE as i32 - 1)
    }
}

#[inline]
fn local(v: i32) -> u8 {
    v.rem_euclid(SECTION_SIZE as i32) as u8
}
