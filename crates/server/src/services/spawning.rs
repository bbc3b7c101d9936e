//! Glue between host events and the drop-rarity engine.
//!
//! Resolves the world's environment, runs the engine, hands the resulting
//! fragment to the container or the creature's drops, credits the player's
//! testament progress and announces the find.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use testament_engine::clock::Clock;
use testament_engine::config::DropConfig;
use testament_engine::creature::CreatureType;
use testament_engine::drops::{
    ContainerDrop, ContainerOpen, CreatureKill, DropRarityEngine, DropStats, KillDrop,
};
use testament_engine::god::{FragmentNumber, GodType};
use testament_engine::random::RandomSource;
use testament_engine::world::position::WorldSite;

use crate::event_bus::{Announcement, DiscoverySource, EventBus};
use crate::host::Host;
use crate::items::{ItemFactory, ItemStack};
use crate::services::testament::TestamentTracker;
use crate::stats::PluginStats;

/// A creature death as the host reports it. `drops` may be extended.
#[derive(Debug, Clone)]
pub struct CreatureDeath {
    pub species: CreatureType,
    pub killer: Option<Uuid>,
    pub site: WorldSite,
    pub drops: Vec<ItemStack>,
}

impl CreatureDeath {
    pub fn new(species: CreatureType, killer: Option<Uuid>, site: WorldSite) -> Self {
        Self {
            species,
            killer,
            site,
            drops: Vec::new(),
        }
    }
}

/// Engine bookkeeping merged with the event counters.
#[derive(Debug, Clone, Serialize)]
pub struct SpawningStats {
    #[serde(flatten)]
    pub engine: DropStats,
    pub containers_opened: u64,
    pub creatures_killed: u64,
    pub container_fragments: u64,
    pub kill_fragments: u64,
    pub boss_drops: u64,
}

pub struct FragmentSpawningService {
    engine: DropRarityEngine,
    host: Arc<Host>,
    testament: Arc<TestamentTracker>,
    bus: EventBus,
    stats: Arc<PluginStats>,
}

impl FragmentSpawningService {
    pub fn new(
        config: DropConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        host: Arc<Host>,
        testament: Arc<TestamentTracker>,
        bus: EventBus,
        stats: Arc<PluginStats>,
    ) -> Self {
        tracing::info!(
            "Fragment spawning: chest chance {}, mob chance {}, {} chests before first fragment",
            config.chest_spawn_chance,
            config.mob_drop_chance,
            config.min_chests_for_fragments
        );
        Self {
            engine: DropRarityEngine::new(config, clock, random),
            host,
            testament,
            bus,
            stats,
        }
    }

    pub fn handle_container_opened(&self, site: WorldSite, player: Uuid) -> Option<ContainerDrop> {
        self.stats.container_opened();
        let environment = match self.host.environment(site.world) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!("Container open at {} ignored: {}", site, e);
                return None;
            }
        };

        let open = ContainerOpen {
            site,
            environment,
            player,
        };
        let drop = self
            .engine
            .on_container_opened(&open, self.host.as_ref(), self.host.as_ref())?;

        self.stats.container_fragment();
        self.award(player, drop.god, drop.number, DiscoverySource::Container(site));
        Some(drop)
    }

    pub fn handle_creature_killed(&self, death: &mut CreatureDeath) -> Option<KillDrop> {
        self.stats.creature_killed();
        let environment = match self.host.environment(death.site.world) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!("Death of {:?} at {} ignored: {}", death.species, death.site, e);
                return None;
            }
        };

        let kill = CreatureKill {
            species: death.species,
            killer: death.killer,
            environment,
        };
        let drop = self.engine.on_creature_killed(&kill)?;

        death.drops.push(ItemFactory::fragment(drop.god, drop.number));
        self.stats.kill_fragment(drop.boss);
        self.award(drop.killer, drop.god, drop.number, DiscoverySource::Kill(drop.species));
        if drop.boss {
            self.bus.publish(Announcement::BossDrop {
                player: drop.killer,
                god: drop.god,
                number: drop.number,
                species: drop.species,
            });
        }
        Some(drop)
    }

    fn award(&self, player: Uuid, god: GodType, number: FragmentNumber, source: DiscoverySource) {
        self.testament.record_fragment(player, god, number);
        self.bus.publish(Announcement::FragmentDiscovered {
            player,
            god,
            number,
            source,
        });
    }

    pub fn stats(&self) -> SpawningStats {
        let counters = self.stats.snapshot();
        SpawningStats {
            engine: self.engine.stats(),
            containers_opened: counters.containers_opened,
            creatures_killed: counters.creatures_killed,
            container_fragments: counters.container_fragments,
            kill_fragments: counters.kill_fragments,
            boss_drops: counters.boss_drops,
        }
    }

    pub fn clear_caches(&self) {
        self.engine.clear_caches();
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }
}
