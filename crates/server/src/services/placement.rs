//! Altar generation across worlds.
//!
//! Each run walks the six gods in order. Site searches go to the auxiliary
//! context, the stamp itself is one closure on the primary context, and the
//! registry is updated right after the stamp lands so the next god's search
//! already sees the claim.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};

use testament_engine::builder;
use testament_engine::config::PlacementConfig;
use testament_engine::god::GodType;
use testament_engine::random::RandomSource;
use testament_engine::registry::AltarRegistry;
use testament_engine::selector::{SearchContext, SiteChoice, SiteSelector};
use testament_engine::world::position::{Environment, WorldId, WorldSite};

use crate::event_bus::{Announcement, EventBus};
use crate::host::Host;
use crate::scheduler::Scheduler;
use crate::stats::PluginStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Standard,
    NewWorld,
}

/// Outcome of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub built: Vec<(GodType, WorldSite)>,
    /// Gods that already had an altar in the world.
    pub skipped: Vec<GodType>,
    pub failed: Vec<GodType>,
}

impl GenerationReport {
    pub fn is_empty(&self) -> bool {
        self.built.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

pub struct AltarPlacementManager {
    config: PlacementConfig,
    host: Arc<Host>,
    registry: Arc<AltarRegistry>,
    scheduler: Scheduler,
    random: Arc<dyn RandomSource>,
    bus: EventBus,
    stats: Arc<PluginStats>,
    cancelled: Arc<AtomicBool>,
}

impl AltarPlacementManager {
    pub fn new(
        config: PlacementConfig,
        host: Arc<Host>,
        registry: Arc<AltarRegistry>,
        scheduler: Scheduler,
        random: Arc<dyn RandomSource>,
        bus: EventBus,
        stats: Arc<PluginStats>,
    ) -> Self {
        Self {
            config,
            host,
            registry,
            scheduler,
            random,
            bus,
            stats,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Standard generation. No-op unless `auto_generate` is set.
    pub async fn generate_altars(&self, world: WorldId) -> GenerationReport {
        if !self.config.auto_generate {
            tracing::info!(
                "Auto-generation disabled for world '{}'",
                self.host.world_name(world)
            );
            return GenerationReport::default();
        }
        self.run(world, Mode::Standard, true).await
    }

    /// Enhanced generation for a freshly created world. Runs if either
    /// `auto_generate` or `force_generation_new_worlds` is set.
    pub async fn generate_altars_for_new_world(&self, world: WorldId) -> GenerationReport {
        if !self.config.auto_generate && !self.config.force_generation_new_worlds {
            tracing::info!(
                "Altar generation disabled for new world '{}'",
                self.host.world_name(world)
            );
            return GenerationReport::default();
        }
        self.run(world, Mode::NewWorld, true).await
    }

    /// Standard generation ignoring the config toggles and dimension skips.
    /// Gods that already have an altar in the world are left alone.
    pub async fn force_generate_altars(&self, world: WorldId) -> GenerationReport {
        tracing::info!(
            "Forced altar generation in world '{}'",
            self.host.world_name(world)
        );
        self.run(world, Mode::Standard, false).await
    }

    /// Stamp `god`'s altar at `site` and register it.
    pub async fn build_altar(&self, site: WorldSite, god: GodType) -> Result<usize> {
        self.place(site, god, false).await
    }

    pub fn altar_location(&self, world: WorldId, god: GodType) -> Option<WorldSite> {
        self.registry.get(world, god)
    }

    /// Stop in-flight searches at their next attempt and refuse new runs.
    pub fn shutdown(&self) {
        if !self.cancelled.swap(true, Ordering::Relaxed) {
            tracing::info!("Altar placement shutting down");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn skips(&self, environment: Environment) -> bool {
        match environment {
            Environment::Normal => false,
            Environment::Nether => self.config.skip_nether,
            Environment::End => self.config.skip_end,
        }
    }

    async fn run(&self, world: WorldId, mode: Mode, respect_skips: bool) -> GenerationReport {
        let mut report = GenerationReport::default();
        let name = self.host.world_name(world);
        let environment = match self.host.environment(world) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!("Cannot generate altars in '{}': {}", name, e);
                return report;
            }
        };
        if respect_skips && self.skips(environment) {
            tracing::info!("Skipping altar generation in '{}' ({:?})", name, environment);
            return report;
        }

        tracing::info!("Generating altars in world '{}' ({:?} mode)", name, mode);
        let spacing = Duration::from_millis(self.config.god_spacing_ms);
        let mut session: Vec<WorldSite> = Vec::new();

        for (i, god) in GodType::ALL.into_iter().enumerate() {
            if i > 0 && !spacing.is_zero() {
                tokio::time::sleep(spacing).await;
            }
            if self.is_shut_down() {
                tracing::info!("Generation in '{}' stopped by shutdown", name);
                break;
            }
            if self.registry.has(world, god) {
                report.skipped.push(god);
                continue;
            }

            let Some(choice) = self.select(world, god, mode, &session).await else {
                tracing::warn!("No suitable location for {} altar in '{}'", god, name);
                self.stats.placement_failed();
                report.failed.push(god);
                continue;
            };

            match self.place(choice.site, god, mode == Mode::NewWorld).await {
                Ok(_) => {
                    session.push(choice.site);
                    report.built.push((god, choice.site));
                }
                Err(e) => {
                    tracing::error!("Failed to build {} altar in '{}': {:#}", god, name, e);
                    self.stats.placement_failed();
                    report.failed.push(god);
                }
            }
        }

        let complete = GodType::ALL.iter().all(|g| self.registry.has(world, *g));
        if mode == Mode::NewWorld && complete && !report.built.is_empty() {
            tracing::info!("All altars established in '{}'", name);
            self.bus.publish(Announcement::AllAltarsEstablished { world });
        }
        tracing::info!(
            "Generation in '{}' done: {} built, {} present, {} failed",
            name,
            report.built.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    async fn select(
        &self,
        world: WorldId,
        god: GodType,
        mode: Mode,
        session: &[WorldSite],
    ) -> Option<SiteChoice> {
        let config = self.config.clone();
        let host = Arc::clone(&self.host);
        let random = Arc::clone(&self.random);
        let cancelled = Arc::clone(&self.cancelled);
        let session = session.to_vec();
        let claimed = self.registry.sites_in(world);

        let searched = self
            .scheduler
            .run_auxiliary(move || {
                let ctx = SearchContext {
                    oracle: host.as_ref(),
                    sampler: host.as_ref(),
                    random: random.as_ref(),
                    cancelled: cancelled.as_ref(),
                };
                let selector = SiteSelector::new(&config);
                match mode {
                    Mode::Standard => selector.select_standard(world, god, &claimed, &ctx),
                    Mode::NewWorld => {
                        selector.select_enhanced(world, god, &session, &claimed, &ctx)
                    }
                }
            })
            .await;

        match searched {
            Ok(choice) => choice,
            Err(e) => {
                tracing::error!("Site search for {} altar failed: {:#}", god, e);
                None
            }
        }
    }

    async fn place(&self, site: WorldSite, god: GodType, new_world: bool) -> Result<usize> {
        tracing::info!("Building {} altar at {}", god, site);
        let host = Arc::clone(&self.host);
        let written = self
            .scheduler
            .call_on_primary(move || builder::stamp(site, god, host.as_ref()))
            .await?
            .with_context(|| format!("stamping {} altar at {}", god, site))?;

        self.registry.register(god, site);
        self.stats.altar_built();
        self.bus.publish(Announcement::AltarEstablished {
            world: site.world,
            god,
            site,
            new_world,
        });
        tracing::debug!("{} altar at {} placed {} blocks", god, site, written);
        Ok(written)
    }
}
