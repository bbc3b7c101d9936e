//! Procedural base terrain for host worlds. Deterministic in (x, z), so any
//! column can be read without having been generated first.

use testament_engine::world::block::{self, BlockId};

/// How biome names are laid out across a world.
#[derive(Debug, Clone)]
pub enum BiomeLayout {
    Uniform(String),
    /// Stripes along the x axis, `width` blocks each, cycling through `names`.
    Bands { width: i32, names: Vec<String> },
}

impl BiomeLayout {
    pub fn uniform(name: &str) -> Self {
        BiomeLayout::Uniform(name.to_string())
    }

    pub fn bands(width: i32, names: &[&str]) -> Self {
        BiomeLayout::Bands {
            width: width.max(1),
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn biome_at(&self, x: i32) -> &str {
        match self {
            BiomeLayout::Uniform(name) => name,
            BiomeLayout::Bands { width, names } => {
                if names.is_empty() {
                    return "PLAINS";
                }
                let band = x.div_euclid(*width).rem_euclid(names.len() as i32);
                &names[band as usize]
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Terrain {
    /// Bedrock floor. Everything below is void.
    pub min_y: i32,
    /// Mean height of the topmost solid block.
    pub ground_y: i32,
    /// Peak deviation from `ground_y`. Zero gives a flat world.
    pub amplitude: i32,
    pub wavelength: f64,
    pub surface: BlockId,
    pub filler: BlockId,
    /// Columns below this level are flooded up to it.
    pub sea_level: Option<i32>,
    pub biomes: BiomeLayout,
}

impl Terrain {
    pub fn flat(ground_y: i32) -> Self {
        Self {
            min_y: 0,
            ground_y,
            amplitude: 0,
            wavelength: 64.0,
            surface: block::GRASS_BLOCK,
            filler: block::STONE,
            sea_level: None,
            biomes: BiomeLayout::uniform("PLAINS"),
        }
    }

    /// Gentle sine hills around `ground_y`.
    pub fn rolling(ground_y: i32, amplitude: i32) -> Self {
        Self {
            amplitude,
            ..Self::flat(ground_y)
        }
    }

    pub fn with_biomes(mut self, biomes: BiomeLayout) -> Self {
        self.biomes = biomes;
        self
    }

    pub fn with_sea_level(mut self, level: i32) -> Self {
        self.sea_level = Some(level);
        self
    }

    pub fn with_materials(mut self, surface: BlockId, filler: BlockId) -> Self {
        self.surface = surface;
        self.filler = filler;
        self
    }

    /// y of the topmost generated solid block in column (x, z).
    pub fn height(&self, x: i32, z: i32) -> i32 {
        if self.amplitude == 0 {
            return self.ground_y;
        }
        let wave = (f64::from(x) / self.wavelength).sin() * (f64::from(z) / self.wavelength).cos();
        self.ground_y + (f64::from(self.amplitude) * wave).round() as i32
    }

    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        if y < self.min_y {
            return block::AIR;
        }
        if y == self.min_y {
            return block::BEDROCK;
        }
        let h = self.height(x, z);
        if y < h {
            self.filler
        } else if y == h {
            self.surface
        } else if self.sea_level.is_some_and(|sea| y <= sea) {
            block::WATER
        } else {
            block::AIR
        }
    }

    pub fn biome_at(&self, x: i32, _z: i32) -> &str {
        self.biomes.biome_at(x)
    }
}
