//! Lock-free plugin counters.
//!
//! Event handlers bump these with relaxed atomics; `snapshot` reads them at
//! its own pace.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::Instant;

pub struct PluginStats {
    containers_opened: AtomicU64,
    creatures_killed: AtomicU64,
    container_fragments: AtomicU64,
    kill_fragments: AtomicU64,
    boss_drops: AtomicU64,
    altars_built: AtomicU64,
    placements_failed: AtomicU64,
    testaments_completed: AtomicU64,
    started_at: Instant,
}

impl PluginStats {
    pub fn new() -> Self {
        Self {
            containers_opened: AtomicU64::new(0),
            creatures_killed: AtomicU64::new(0),
            container_fragments: AtomicU64::new(0),
            kill_fragments: AtomicU64::new(0),
            boss_drops: AtomicU64::new(0),
            altars_built: AtomicU64::new(0),
            placements_failed: AtomicU64::new(0),
            testaments_completed: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn container_opened(&self) {
        self.containers_opened.fetch_add(1, Relaxed);
    }

    pub fn creature_killed(&self) {
        self.creatures_killed.fetch_add(1, Relaxed);
    }

    pub fn container_fragment(&self) {
        self.container_fragments.fetch_add(1, Relaxed);
    }

    pub fn kill_fragment(&self, boss: bool) {
        self.kill_fragments.fetch_add(1, Relaxed);
        if boss {
            self.boss_drops.fetch_add(1, Relaxed);
        }
    }

    pub fn altar_built(&self) {
        self.altars_built.fetch_add(1, Relaxed);
    }

    pub fn placement_failed(&self) {
        self.placements_failed.fetch_add(1, Relaxed);
    }

    pub fn testament_completed(&self) {
        self.testaments_completed.fetch_add(1, Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime_secs: self.started_at.elapsed().as_secs_f64(),
            containers_opened: self.containers_opened.load(Relaxed),
            creatures_killed: self.creatures_killed.load(Relaxed),
            container_fragments: self.container_fragments.load(Relaxed),
            kill_fragments: self.kill_fragments.load(Relaxed),
            boss_drops: self.boss_drops.load(Relaxed),
            altars_built: self.altars_built.load(Relaxed),
            placements_failed: self.placements_failed.load(Relaxed),
            testaments_completed: self.testaments_completed.load(Relaxed),
        }
    }
}

impl Default for PluginStats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub uptime_secs: f64,
    pub containers_opened: u64,
    pub creatures_killed: u64,
    pub container_fragments: u64,
    pub kill_fragments: u64,
    pub boss_drops: u64,
    pub altars_built: u64,
    pub placements_failed: u64,
    pub testaments_completed: u64,
}
