use std::collections::HashMap;

use dashmap::DashMap;

use crate::god::GodType;
use crate::world::position::{WorldId, WorldSite};

/// Claimed altar sites, at most one per god per world.
///
/// Thread-safe and lock-sharded: world generation, chunk-load discovery and
/// interaction handlers all hit it from different contexts. Sites are `Copy`,
/// so nothing handed out can alias registry state.
#[derive(Default)]
pub struct AltarRegistry {
    sites: DashMap<(WorldId, GodType), WorldSite>,
}

impl AltarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `site` for `god` in the site's world. Last write wins; the
    /// replaced site, if any, is returned.
    pub fn register(&self, god: GodType, site: WorldSite) -> Option<WorldSite> {
        let previous = self.sites.insert((site.world, god), site);
        match previous {
            Some(old) if old != site => {
                tracing::debug!("Re-registered {} altar: {} -> {}", god, old, site);
            }
            None => tracing::info!("Registered {} altar at {}", god, site),
            _ => {}
        }
        previous
    }

    pub fn unregister(&self, world: WorldId, god: GodType) -> bool {
        let removed = self.sites.remove(&(world, god)).is_some();
        if removed {
            tracing::info!("Removed {} altar registration in world #{}", god, world.0);
        }
        removed
    }

    pub fn get(&self, world: WorldId, god: GodType) -> Option<WorldSite> {
        self.sites.get(&(world, god)).map(|e| *e.value())
    }

    pub fn has(&self, world: WorldId, god: GodType) -> bool {
        self.sites.contains_key(&(world, god))
    }

    /// Every registration across all worlds.
    pub fn all(&self) -> Vec<(GodType, WorldSite)> {
        self.sites.iter().map(|e| (e.key().1, *e.value())).collect()
    }

    pub fn in_world(&self, world: WorldId) -> HashMap<GodType, WorldSite> {
        self.sites
            .iter()
            .filter(|e| e.key().0 == world)
            .map(|e| (e.key().1, *e.value()))
            .collect()
    }

    pub fn sites_in(&self, world: WorldId) -> Vec<WorldSite> {
        self.sites
            .iter()
            .filter(|e| e.key().0 == world)
            .map(|e| *e.value())
            .collect()
    }

    /// Drop every registration in `world`. Returns how many were removed.
    pub fn clear_world(&self, world: WorldId) -> usize {
        let before = self.sites.len();
        self.sites.retain(|(w, _), _| *w != world);
        before.saturating_sub(self.sites.len())
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
