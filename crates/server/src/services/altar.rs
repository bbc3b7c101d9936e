//! Right-click handling on altar center blocks.

use std::sync::Arc;

use uuid::Uuid;

use testament_engine::god::{FragmentNumber, GodType};
use testament_engine::registry::AltarRegistry;
use testament_engine::world::BlockOracle;
use testament_engine::world::position::WorldSite;

use crate::event_bus::{Announcement, EventBus};
use crate::services::detection::AltarDetectionService;
use crate::services::testament::{CompletionRefusal, TestamentTracker};
use crate::stats::PluginStats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AltarOutcome {
    /// The block is not part of an intact altar.
    NotAnAltar,
    /// An intact altar, but no registered altar of that god is near it.
    Unregistered(GodType),
    AlreadyCompleted(GodType),
    MissingFragments {
        god: GodType,
        missing: Vec<FragmentNumber>,
    },
    Completed(GodType),
}

impl AltarOutcome {
    /// Whether the click was consumed by an altar.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::NotAnAltar | Self::Unregistered(_))
    }
}

pub struct AltarService {
    oracle: Arc<dyn BlockOracle>,
    detection: AltarDetectionService,
    registry: Arc<AltarRegistry>,
    testament: Arc<TestamentTracker>,
    bus: EventBus,
    stats: Arc<PluginStats>,
    interaction_radius: f64,
}

impl AltarService {
    pub fn new(
        oracle: Arc<dyn BlockOracle>,
        registry: Arc<AltarRegistry>,
        testament: Arc<TestamentTracker>,
        bus: EventBus,
        stats: Arc<PluginStats>,
        interaction_radius: f64,
    ) -> Self {
        Self {
            detection: AltarDetectionService::new(Arc::clone(&oracle)),
            oracle,
            registry,
            testament,
            bus,
            stats,
            interaction_radius,
        }
    }

    pub fn handle_interaction(&self, player: Uuid, clicked: WorldSite) -> AltarOutcome {
        let Some(god) = self
            .oracle
            .block_at(clicked)
            .ok()
            .and_then(GodType::from_center_block)
        else {
            return AltarOutcome::NotAnAltar;
        };
        let Some(center) = self.detection.find_center_near(clicked, god) else {
            tracing::debug!("{} clicked a loose {} center block at {}", player, god, clicked);
            return AltarOutcome::NotAnAltar;
        };

        let registered = self
            .registry
            .get(center.world, god)
            .and_then(|site| site.distance(&center))
            .is_some_and(|d| d <= self.interaction_radius);
        if !registered {
            tracing::debug!("{} altar at {} is not registered", god, center);
            return AltarOutcome::Unregistered(god);
        }

        match self.testament.complete(player, god) {
            Ok(()) => {
                self.stats.testament_completed();
                self.bus
                    .publish(Announcement::TestamentCompleted { player, god });
                tracing::info!("{} completed the {} testament at {}", player, god, center);
                AltarOutcome::Completed(god)
            }
            Err(CompletionRefusal::AlreadyCompleted) => AltarOutcome::AlreadyCompleted(god),
            Err(CompletionRefusal::MissingFragments(missing)) => {
                AltarOutcome::MissingFragments { god, missing }
            }
        }
    }
}
