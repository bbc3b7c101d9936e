//! Host event listeners.
//!
//! Thin adapters from host events to the services: filter what is
//! irrelevant, schedule what has to wait, forward the rest.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use testament_engine::drops::{ContainerDrop, KillDrop};
use testament_engine::god::GodType;
use testament_engine::registry::AltarRegistry;
use testament_engine::world::BlockOracle;
use testament_engine::world::block;
use testament_engine::world::position::{WorldId, WorldSite};

use crate::host::Host;
use crate::host::chunk::ChunkPos;
use crate::persistence::PendingAltars;
use crate::scheduler::Scheduler;
use crate::services::altar::{AltarOutcome, AltarService};
use crate::services::placement::{AltarPlacementManager, GenerationReport};
use crate::services::spawning::{CreatureDeath, FragmentSpawningService};

/// Tag put on markers whose altar has been claimed.
pub const REGISTERED_TAG: &str = "registered";

pub struct Listeners {
    host: Arc<Host>,
    registry: Arc<AltarRegistry>,
    pending: Arc<PendingAltars>,
    scheduler: Scheduler,
    placement: Arc<AltarPlacementManager>,
    spawning: Arc<FragmentSpawningService>,
    altars: Arc<AltarService>,
}

impl Listeners {
    pub fn new(
        host: Arc<Host>,
        registry: Arc<AltarRegistry>,
        pending: Arc<PendingAltars>,
        scheduler: Scheduler,
        placement: Arc<AltarPlacementManager>,
        spawning: Arc<FragmentSpawningService>,
        altars: Arc<AltarService>,
    ) -> Self {
        Self {
            host,
            registry,
            pending,
            scheduler,
            placement,
            spawning,
            altars,
        }
    }

    // ── World lifecycle ────────────────────────────────────────────────

    /// A world was just created: claim any saved altars for its name, then
    /// schedule fresh-world generation.
    pub fn on_world_init(&self, world: WorldId) -> JoinHandle<GenerationReport> {
        self.pending.adopt(&self.host, world, &self.registry);
        let delay = Duration::from_millis(self.placement.config().init_delay_ms);
        tracing::info!(
            "World '{}' initialised, altar generation in {:?}",
            self.host.world_name(world),
            delay
        );
        let placement = Arc::clone(&self.placement);
        self.scheduler.spawn_later(delay, async move {
            placement.generate_altars_for_new_world(world).await
        })
    }

    /// An existing world was loaded. Saved altars for its name are claimed
    /// first; generation is scheduled only if the world still has none.
    pub fn on_world_load(&self, world: WorldId) -> Option<JoinHandle<GenerationReport>> {
        self.pending.adopt(&self.host, world, &self.registry);
        if !self.registry.sites_in(world).is_empty() {
            tracing::debug!("World '{}' already has altars", self.host.world_name(world));
            return None;
        }
        let delay = Duration::from_millis(self.placement.config().load_delay_ms);
        tracing::info!(
            "World '{}' loaded without altars, generation in {:?}",
            self.host.world_name(world),
            delay
        );
        let placement = Arc::clone(&self.placement);
        Some(self.scheduler.spawn_later(delay, async move {
            placement.generate_altars(world).await
        }))
    }

    /// Claim pre-authored altars whose markers sit in the chunk. Returns
    /// the number of altars registered.
    pub fn on_chunk_load(&self, world: WorldId, pos: ChunkPos) -> usize {
        let markers = match self.host.markers_in_chunk(world, pos) {
            Ok(markers) => markers,
            Err(e) => {
                tracing::warn!("Chunk ({}, {}) markers unavailable: {}", pos.x, pos.z, e);
                return 0;
            }
        };

        let mut registered = 0;
        for marker in markers {
            if marker.tags.contains(REGISTERED_TAG) {
                continue;
            }
            let Some(god) = marker.tags.iter().find_map(|t| GodType::from_marker_tag(t)) else {
                continue;
            };
            self.registry.register(god, marker.site);
            if let Err(e) = self.host.tag_marker(world, marker.id, REGISTERED_TAG) {
                tracing::warn!("Could not tag marker {}: {}", marker.id, e);
            }
            tracing::info!("Registered pre-built {} altar at {}", god, marker.site);
            registered += 1;
        }
        registered
    }

    // ── Player actions ─────────────────────────────────────────────────

    pub fn on_container_open(&self, site: WorldSite, player: Uuid) -> Option<ContainerDrop> {
        match self.host.block_at(site) {
            Ok(b) if block::is_container(b) => self.spawning.handle_container_opened(site, player),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Container open at {} ignored: {}", site, e);
                None
            }
        }
    }

    pub fn on_creature_death(&self, death: &mut CreatureDeath) -> Option<KillDrop> {
        self.spawning.handle_creature_killed(death)
    }

    pub fn on_block_interact(&self, player: Uuid, clicked: WorldSite) -> AltarOutcome {
        self.altars.handle_interaction(player, clicked)
    }
}
