use std::sync::Arc;

use testament_engine::god::GodType;
use testament_engine::pattern::pattern;
use testament_engine::world::BlockOracle;
use testament_engine::world::position::{Offset, WorldSite};

/// Horizontal reach of the center search around a clicked block.
const SEARCH_RADIUS: i32 = 3;
/// Vertical reach of the center search.
const SEARCH_HEIGHT: i32 = 1;

/// Re-validates altar structures in the live world.
pub struct AltarDetectionService {
    oracle: Arc<dyn BlockOracle>,
}

impl AltarDetectionService {
    pub fn new(oracle: Arc<dyn BlockOracle>) -> Self {
        Self { oracle }
    }

    /// The god whose intact altar is centered exactly at `site`.
    pub fn detect_altar_at(&self, site: WorldSite) -> Option<GodType> {
        let block = self.oracle.block_at(site).ok()?;
        let god = GodType::from_center_block(block)?;
        self.validate(site, god).then_some(god)
    }

    pub fn validate(&self, site: WorldSite, god: GodType) -> bool {
        pattern(god).matches(site, self.oracle.as_ref())
    }

    /// Find an intact `god` altar centered within a 7x3x7 box around
    /// `clicked`. The clicked block itself is tried first.
    pub fn find_center_near(&self, clicked: WorldSite, god: GodType) -> Option<WorldSite> {
        if self.validate(clicked, god) {
            return Some(clicked);
        }
        for dy in -SEARCH_HEIGHT..=SEARCH_HEIGHT {
            for dx in -SEARCH_RADIUS..=SEARCH_RADIUS {
                for dz in -SEARCH_RADIUS..=SEARCH_RADIUS {
                    let candidate = clicked.offset(Offset::new(dx, dy, dz));
                    if self.validate(candidate, god) {
                        tracing::trace!("Found {} altar center {} near {}", god, candidate, clicked);
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }
}
