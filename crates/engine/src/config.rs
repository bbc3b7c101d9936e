//! Tunables for the drop engine and altar placement.
//!
//! Every field has a default and may be overridden independently; missing
//! keys in a config file fall back to the values below.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::creature::CreatureType;
use crate::world::position::Environment;

/// Hard ceiling on the per-container spawn chance, whatever the config says.
pub const CONTAINER_CHANCE_CEILING: f64 = 0.25;
/// Hard ceiling on the per-kill drop chance.
pub const KILL_CHANCE_CEILING: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentMultipliers {
    pub normal: f64,
    pub nether: f64,
    pub end: f64,
}

impl EnvironmentMultipliers {
    pub fn get(&self, env: Environment) -> f64 {
        match env {
            Environment::Normal => self.normal,
            Environment::Nether => self.nether,
            Environment::End => self.end,
        }
    }
}

impl Default for EnvironmentMultipliers {
    fn default() -> Self {
        Self {
            normal: 1.0,
            nether: 2.0,
            end: 3.0,
        }
    }
}

/// Fragment drop gating (`testament.fragments.*`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Base chance for a container to hold a fragment.
    pub chest_spawn_chance: f64,
    /// Base chance for a kill to drop a fragment.
    pub mob_drop_chance: f64,
    /// Minimum horizontal blocks between two container spawns.
    pub min_distance: f64,
    pub player_chest_cooldown_ms: u64,
    pub player_mob_cooldown_ms: u64,
    /// Containers a player must have opened before any can hold a fragment.
    pub min_chests_for_fragments: u64,
    /// How long a spawn location blocks its surroundings.
    pub location_cooldown_ms: u64,
    /// Ledger entries older than this are purged.
    pub ledger_horizon_ms: u64,
    /// Independent pass rate applied after every other container gate.
    pub final_pass_rate: f64,
    /// Extra pass rate for non-boss kills.
    pub regular_mob_pass_rate: f64,
    /// Chance an eligible kill with no god association still drops.
    pub unassociated_mob_pass_rate: f64,
    pub rare_container_multiplier: f64,
    pub environment_multipliers: EnvironmentMultipliers,
    pub mob_multipliers: HashMap<CreatureType, f64>,
}

impl DropConfig {
    pub fn mob_multiplier(&self, species: CreatureType) -> f64 {
        self.mob_multipliers.get(&species).copied().unwrap_or(1.0)
    }
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            chest_spawn_chance: 0.02,
            mob_drop_chance: 0.001,
            min_distance: 2000.0,
            player_chest_cooldown_ms: 2 * 60 * 60 * 1000,
            player_mob_cooldown_ms: 60 * 60 * 1000,
            min_chests_for_fragments: 50,
            location_cooldown_ms: 4 * 60 * 60 * 1000,
            ledger_horizon_ms: 48 * 60 * 60 * 1000,
            final_pass_rate: 0.33,
            regular_mob_pass_rate: 0.3,
            unassociated_mob_pass_rate: 0.1,
            rare_container_multiplier: 2.0,
            environment_multipliers: EnvironmentMultipliers::default(),
            mob_multipliers: default_mob_multipliers(),
        }
    }
}

fn default_mob_multipliers() -> HashMap<CreatureType, f64> {
    use CreatureType::*;
    HashMap::from([
        (EnderDragon, 25.0),
        (Wither, 20.0),
        (ElderGuardian, 15.0),
        (Warden, 12.0),
        (Evoker, 10.0),
        (WitherSkeleton, 8.0),
        (Shulker, 6.0),
        (Blaze, 4.0),
        (Ghast, 3.0),
        (Enderman, 2.0),
        (Guardian, 2.0),
        (PiglinBrute, 2.0),
    ])
}

/// Altar generation (`forge.*`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub auto_generate: bool,
    pub force_generation_new_worlds: bool,
    /// Minimum blocks between two altars in the same world.
    pub min_distance: f64,
    pub standard_search_radius: i32,
    pub standard_attempts: u32,
    pub new_world_search_radius: i32,
    pub max_attempts: u32,
    pub skip_nether: bool,
    pub skip_end: bool,
    /// Delay before generating in a freshly initialised world.
    pub init_delay_ms: u64,
    /// Delay before generating in a loaded world that has no altars.
    pub load_delay_ms: u64,
    /// Pause between god types within one generation run.
    pub god_spacing_ms: u64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            auto_generate: true,
            force_generation_new_worlds: true,
            min_distance: 5000.0,
            standard_search_radius: 1000,
            standard_attempts: 50,
            new_world_search_radius: 2000,
            max_attempts: 100,
            skip_nether: true,
            skip_end: true,
            init_delay_ms: 5_000,
            load_delay_ms: 10_000,
            god_spacing_ms: 100,
        }
    }
}
