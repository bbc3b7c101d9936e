//! Wires the services together around one host.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;

use testament_engine::clock::Clock;
use testament_engine::random::RandomSource;
use testament_engine::registry::AltarRegistry;
use testament_engine::world::BlockOracle;

use crate::config::PluginConfig;
use crate::event_bus::EventBus;
use crate::host::Host;
use crate::listeners::Listeners;
use crate::persistence::{self, LoadSummary, PendingAltars};
use crate::scheduler::Scheduler;
use crate::services::altar::AltarService;
use crate::services::placement::AltarPlacementManager;
use crate::services::spawning::FragmentSpawningService;
use crate::services::testament::TestamentTracker;
use crate::stats::PluginStats;

pub struct TestamentPlugin {
    config: PluginConfig,
    data_dir: PathBuf,
    host: Arc<Host>,
    registry: Arc<AltarRegistry>,
    pending: Arc<PendingAltars>,
    testament: Arc<TestamentTracker>,
    bus: EventBus,
    stats: Arc<PluginStats>,
    placement: Arc<AltarPlacementManager>,
    spawning: Arc<FragmentSpawningService>,
    altars: Arc<AltarService>,
    listeners: Listeners,
    primary: JoinHandle<()>,
}

impl TestamentPlugin {
    /// Build every service and start the primary context. Must be called
    /// from inside a tokio runtime.
    pub fn start(
        config: PluginConfig,
        host: Arc<Host>,
        data_dir: &Path,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let (scheduler, primary) = Scheduler::start();
        let registry = Arc::new(AltarRegistry::new());
        let pending = Arc::new(PendingAltars::new());
        let testament = Arc::new(TestamentTracker::new());
        let bus = EventBus::new();
        let stats = Arc::new(PluginStats::new());

        let placement = Arc::new(AltarPlacementManager::new(
            config.forge.clone(),
            Arc::clone(&host),
            Arc::clone(&registry),
            scheduler.clone(),
            Arc::clone(&random),
            bus.clone(),
            Arc::clone(&stats),
        ));
        let spawning = Arc::new(FragmentSpawningService::new(
            config.fragments.clone(),
            clock,
            random,
            Arc::clone(&host),
            Arc::clone(&testament),
            bus.clone(),
            Arc::clone(&stats),
        ));
        let altars = Arc::new(AltarService::new(
            Arc::clone(&host) as Arc<dyn BlockOracle>,
            Arc::clone(&registry),
            Arc::clone(&testament),
            bus.clone(),
            Arc::clone(&stats),
            config.altar.interaction_radius,
        ));
        let listeners = Listeners::new(
            Arc::clone(&host),
            Arc::clone(&registry),
            Arc::clone(&pending),
            scheduler,
            Arc::clone(&placement),
            Arc::clone(&spawning),
            Arc::clone(&altars),
        );

        tracing::info!("Testament plugin started, data in {}", data_dir.display());
        Self {
            config,
            data_dir: data_dir.to_path_buf(),
            host,
            registry,
            pending,
            testament,
            bus,
            stats,
            placement,
            spawning,
            altars,
            listeners,
            primary,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn host(&self) -> &Arc<Host> {
        &self.host
    }

    pub fn registry(&self) -> &Arc<AltarRegistry> {
        &self.registry
    }

    /// Saved altars whose world has not been loaded yet.
    pub fn pending_altars(&self) -> &Arc<PendingAltars> {
        &self.pending
    }

    pub fn testament(&self) -> &Arc<TestamentTracker> {
        &self.testament
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn stats(&self) -> &Arc<PluginStats> {
        &self.stats
    }

    pub fn placement(&self) -> &Arc<AltarPlacementManager> {
        &self.placement
    }

    pub fn spawning(&self) -> &Arc<FragmentSpawningService> {
        &self.spawning
    }

    pub fn altars(&self) -> &Arc<AltarService> {
        &self.altars
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Restore saved progress and altar claims.
    pub fn load(&self) -> Result<LoadSummary> {
        persistence::load_into(
            &self.testament,
            &self.registry,
            &self.pending,
            &self.host,
            &self.data_dir,
        )
    }

    pub fn save(&self) -> Result<usize> {
        persistence::save(
            &self.testament,
            &self.registry,
            &self.pending,
            &self.host,
            &self.data_dir,
        )
    }

    /// Cancel placement, drop the drop-engine state, save, and stop the
    /// primary context. Queued block writes that have not run are dropped.
    pub fn shutdown(self) -> Result<usize> {
        tracing::info!("Testament plugin shutting down");
        self.placement.shutdown();
        let saved = self.save();
        self.spawning.shutdown();
        self.primary.abort();
        saved
    }
}
