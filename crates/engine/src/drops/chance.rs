//! Probability formulas for both drop channels.
//!
//! Pure functions of the config and the event; the engine feeds them the
//! live counters.

use crate::config::{CONTAINER_CHANCE_CEILING, DropConfig, KILL_CHANCE_CEILING};
use crate::creature::CreatureType;
use crate::world::position::Environment;

/// Containers opened before the exploration bonus starts.
pub const EXPLORATION_THRESHOLD: u64 = 100;
const EXPLORATION_STEP: f64 = 0.001;
const EXPLORATION_MAX_BONUS: f64 = 0.5;

const DEPTH_STEP: f64 = 0.01;
const DEPTH_MAX: f64 = 2.0;

/// Kills of a species before the kill bonus starts.
pub const KILL_BONUS_THRESHOLD: u64 = 10;
const KILL_BONUS_STEP: f64 = 0.01;
const KILL_BONUS_MAX: f64 = 1.5;

/// Deep overworld containers are richer. No effect in other environments.
pub fn depth_multiplier(env: Environment, y: i32) -> f64 {
    if env != Environment::Normal || y >= 0 {
        return 1.0;
    }
    (1.0 + f64::from(y.unsigned_abs()) * DEPTH_STEP).min(DEPTH_MAX)
}

pub fn exploration_multiplier(opens: u64) -> f64 {
    if opens <= EXPLORATION_THRESHOLD {
        return 1.0;
    }
    let extra = (opens - EXPLORATION_THRESHOLD) as f64 * EXPLORATION_STEP;
    1.0 + extra.min(EXPLORATION_MAX_BONUS)
}

pub fn kill_bonus(kills: u64) -> f64 {
    if kills <= KILL_BONUS_THRESHOLD {
        return 1.0;
    }
    let bonus = 1.0 + (kills - KILL_BONUS_THRESHOLD) as f64 * KILL_BONUS_STEP;
    bonus.min(KILL_BONUS_MAX)
}

/// Chance that a freshly opened container holds a fragment.
pub fn container_chance(
    config: &DropConfig,
    env: Environment,
    y: i32,
    rare: bool,
    opens: u64,
) -> f64 {
    let rare = if rare {
        config.rare_container_multiplier
    } else {
        1.0
    };
    let chance = config.chest_spawn_chance
        * config.environment_multipliers.get(env)
        * rare
        * depth_multiplier(env, y)
        * exploration_multiplier(opens);
    chance.clamp(0.0, CONTAINER_CHANCE_CEILING)
}

/// Chance that a kill drops a fragment, given the species' global kill count.
pub fn kill_chance(config: &DropConfig, species: CreatureType, env: Environment, kills: u64) -> f64 {
    let chance = config.mob_drop_chance
        * config.mob_multiplier(species)
        * config.environment_multipliers.get(env)
        * kill_bonus(kills);
    chance.clamp(0.0, KILL_CHANCE_CEILING)
}
