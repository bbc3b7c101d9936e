//! Announcement bus for player-facing broadcasts.
//!
//! Services publish an [`Announcement`] whenever something a player should
//! hear about happens: a fragment found, a boss drop, a new altar, a
//! completed testament. Chat, logging and tests subscribe to the same
//! `tokio::sync::broadcast` channel.

use tokio::sync::broadcast;
use uuid::Uuid;

use testament_engine::creature::CreatureType;
use testament_engine::god::{FragmentNumber, GodType};
use testament_engine::world::position::{WorldId, WorldSite};

/// Recommended capacity for the broadcast channel.
pub const BUS_CAPACITY: usize = 256;

/// How a fragment reached the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscoverySource {
    Container(WorldSite),
    Kill(CreatureType),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Announcement {
    /// Private: a player found a fragment.
    FragmentDiscovered {
        player: Uuid,
        god: GodType,
        number: FragmentNumber,
        source: DiscoverySource,
    },
    /// Server-wide: a boss dropped a fragment.
    BossDrop {
        player: Uuid,
        god: GodType,
        number: FragmentNumber,
        species: CreatureType,
    },
    AltarEstablished {
        world: WorldId,
        god: GodType,
        site: WorldSite,
        /// Announced server-wide for fresh worlds.
        new_world: bool,
    },
    AllAltarsEstablished { world: WorldId },
    TestamentCompleted { player: Uuid, god: GodType },
}

/// Cheap-to-clone handle on the broadcast channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Announcement>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Publish to every current subscriber. Having none is fine.
    pub fn publish(&self, announcement: Announcement) {
        let _ = self.tx.send(announcement);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Announcement> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
