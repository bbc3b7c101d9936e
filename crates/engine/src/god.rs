//! The six god factions and the tables keyed by them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::block::{self, BlockId};

/// One of the six god factions. Each has its own altar, fragment set and
/// testament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GodType {
    Fallen,
    Banishment,
    Abyssal,
    Sylvan,
    Tempest,
    Veil,
}

impl GodType {
    /// Canonical order. Generation runs and association lookups iterate in
    /// this order.
    pub const ALL: [GodType; 6] = [
        GodType::Fallen,
        GodType::Banishment,
        GodType::Abyssal,
        GodType::Sylvan,
        GodType::Tempest,
        GodType::Veil,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            GodType::Fallen => "fallen",
            GodType::Banishment => "banishment",
            GodType::Abyssal => "abyssal",
            GodType::Sylvan => "sylvan",
            GodType::Tempest => "tempest",
            GodType::Veil => "veil",
        }
    }

    /// Substrings of host biome names this god's altar prefers.
    /// `None` means any biome is acceptable.
    pub const fn preferred_biomes(self) -> Option<&'static [&'static str]> {
        match self {
            GodType::Fallen => Some(&["SWAMP", "DARK", "SOUL"]),
            GodType::Banishment => Some(&["DESERT", "BADLANDS", "SAVANNA"]),
            GodType::Abyssal => Some(&["OCEAN", "RIVER", "BEACH"]),
            GodType::Sylvan => Some(&["FOREST", "JUNGLE", "TAIGA"]),
            GodType::Tempest => Some(&["MOUNTAIN", "HILL", "PEAK", "PLATEAU"]),
            GodType::Veil => None,
        }
    }

    pub fn suits_biome(self, biome: &str) -> bool {
        match self.preferred_biomes() {
            None => true,
            Some(keys) => {
                let biome = biome.to_ascii_uppercase();
                keys.iter().any(|k| biome.contains(k))
            }
        }
    }

    /// The god whose altar uses `block` as its center, if any.
    pub fn from_center_block(block: BlockId) -> Option<GodType> {
        match block {
            block::CRYING_OBSIDIAN => Some(GodType::Fallen),
            block::MAGMA_BLOCK => Some(GodType::Banishment),
            block::DARK_PRISMARINE => Some(GodType::Abyssal),
            block::OAK_LOG => Some(GodType::Sylvan),
            block::LIGHTNING_ROD => Some(GodType::Tempest),
            block::END_PORTAL_FRAME => Some(GodType::Veil),
            _ => None,
        }
    }

    /// Scoreboard tag carried by pre-authored altar markers (`"veil_altar"`).
    pub fn from_marker_tag(tag: &str) -> Option<GodType> {
        let id = tag.strip_suffix("_altar")?;
        id.parse().ok()
    }
}

impl fmt::Display for GodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown god type: {0:?}")]
pub struct UnknownGodType(pub String);

impl FromStr for GodType {
    type Err = UnknownGodType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GodType::ALL
            .into_iter()
            .find(|g| g.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownGodType(s.to_string()))
    }
}

/// A fragment number, always within 1..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FragmentNumber(u8);

impl FragmentNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub const fn new(n: u8) -> Option<Self> {
        if n >= Self::MIN && n <= Self::MAX {
            Some(Self(n))
        } else {
            None
        }
    }

    /// Clamp `n` into 1..=7.
    pub const fn saturating(n: u8) -> Self {
        if n < Self::MIN {
            Self(Self::MIN)
        } else if n > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(n)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// All seven numbers, ascending.
    pub fn all() -> impl Iterator<Item = FragmentNumber> {
        (Self::MIN..=Self::MAX).map(FragmentNumber)
    }
}

impl TryFrom<u8> for FragmentNumber {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        FragmentNumber::new(n).ok_or_else(|| format!("fragment number {n} outside 1..=7"))
    }
}

impl From<FragmentNumber> for u8 {
    fn from(n: FragmentNumber) -> u8 {
        n.0
    }
}

impl fmt::Display for FragmentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
