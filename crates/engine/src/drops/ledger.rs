//! Last-success timestamps for players and spawn locations.

use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::world::position::{WorldId, WorldSite};

/// Which drop channel a player cooldown belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Container,
    Kill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerKey {
    Player { player: Uuid, channel: Channel },
    Location { world: WorldId, x: i32, z: i32 },
}

impl LedgerKey {
    pub fn player(player: Uuid, channel: Channel) -> Self {
        LedgerKey::Player { player, channel }
    }

    pub fn location(site: WorldSite) -> Self {
        LedgerKey::Location {
            world: site.world,
            x: site.x,
            z: site.z,
        }
    }
}

/// Concurrent map of `key -> millis of last success`. Every write purges
/// entries older than the horizon, so the map never outgrows the activity
/// of the last `horizon_ms`.
pub struct CooldownLedger {
    entries: DashMap<LedgerKey, u64>,
    horizon_ms: u64,
}

impl CooldownLedger {
    pub fn new(horizon_ms: u64) -> Self {
        Self {
            entries: DashMap::new(),
            horizon_ms,
        }
    }

    pub fn record(&self, key: LedgerKey, now: u64) {
        self.entries.insert(key, now);
        self.purge(now);
    }

    pub fn last(&self, key: &LedgerKey) -> Option<u64> {
        self.entries.get(key).map(|e| *e.value())
    }

    /// True while `key` succeeded less than `cooldown_ms` ago.
    pub fn is_cooling_down(&self, key: &LedgerKey, now: u64, cooldown_ms: u64) -> bool {
        self.last(key)
            .is_some_and(|at| now.saturating_sub(at) < cooldown_ms)
    }

    /// True when a recent location entry in the same world is within
    /// `min_distance` horizontal blocks of `site`, or the site's own column
    /// is still cooling down.
    pub fn location_blocked(
        &self,
        site: WorldSite,
        now: u64,
        cooldown_ms: u64,
        min_distance: f64,
    ) -> bool {
        if self.is_cooling_down(&LedgerKey::location(site), now, cooldown_ms) {
            return true;
        }
        self.entries.iter().any(|e| match *e.key() {
            LedgerKey::Location { world, x, z } if world == site.world => {
                if now.saturating_sub(*e.value()) >= cooldown_ms {
                    return false;
                }
                let recent = WorldSite::new(world, x, site.y, z);
                site.horizontal_distance(&recent)
                    .is_some_and(|d| d < min_distance)
            }
            _ => false,
        })
    }

    /// Drop entries older than the horizon. Returns how many were removed.
    pub fn purge(&self, now: u64) -> usize {
        let before = self.entries.len();
        let horizon = self.horizon_ms;
        self.entries
            .retain(|_, at| now.saturating_sub(*at) <= horizon);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
