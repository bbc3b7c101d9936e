//! Fragment drop gating.
//!
//! Two channels feed the engine: containers opened by players and creatures
//! killed by players. Each event runs through a fixed sequence of gates
//! (counters, cooldowns, probability rolls, spatial spacing) and yields at
//! most one fragment. The engine never touches inventories itself; container
//! delivery goes through [`FragmentDelivery`] and kill drops are returned to
//! the caller.

pub mod chance;
pub mod distribution;
mod engine;
pub mod ledger;

use serde::Serialize;
use uuid::Uuid;

use crate::creature::CreatureType;
use crate::god::{FragmentNumber, GodType};
use crate::world::HostError;
use crate::world::position::{Environment, WorldSite};

pub use engine::DropRarityEngine;

/// Places a fragment item into a container at a site.
pub trait FragmentDelivery: Send + Sync {
    /// `Ok(false)` means the container had no room.
    fn deliver_to_container(
        &self,
        site: WorldSite,
        god: GodType,
        number: FragmentNumber,
    ) -> Result<bool, HostError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerOpen {
    pub site: WorldSite,
    pub environment: Environment,
    pub player: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatureKill {
    pub species: CreatureType,
    pub killer: Option<Uuid>,
    pub environment: Environment,
}

/// A fragment placed into a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContainerDrop {
    pub site: WorldSite,
    pub god: GodType,
    pub number: FragmentNumber,
    pub player: Uuid,
}

/// A fragment to append to a creature's drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KillDrop {
    pub god: GodType,
    pub number: FragmentNumber,
    pub species: CreatureType,
    pub killer: Uuid,
    /// Boss drops are announced to every player.
    pub boss: bool,
}

/// Snapshot of the engine's bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DropStats {
    pub processed_containers: usize,
    pub ledger_entries: usize,
    pub chest_spawn_chance: f64,
    pub mob_drop_chance: f64,
    pub total_container_opens: u64,
    pub total_kills: u64,
}
