use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use super::chance;
use super::distribution::weighted_fragment_number;
use super::ledger::{Channel, CooldownLedger, LedgerKey};
use super::{ContainerDrop, ContainerOpen, CreatureKill, DropStats, FragmentDelivery, KillDrop};
use crate::clock::Clock;
use crate::config::DropConfig;
use crate::creature::CreatureType;
use crate::god::{FragmentNumber, GodType};
use crate::random::RandomSource;
use crate::world::position::{Environment, WorldSite};
use crate::world::{BlockOracle, HostError, block};

/// Gatekeeper for both drop channels.
///
/// All state is in concurrent maps, so the engine is shared behind an `Arc`
/// and called from whichever context delivers the event.
pub struct DropRarityEngine {
    config: DropConfig,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    ledger: CooldownLedger,
    processed: DashSet<WorldSite>,
    exploration: DashMap<Uuid, u64>,
    kills: DashMap<CreatureType, u64>,
}

impl DropRarityEngine {
    pub fn new(config: DropConfig, clock: Arc<dyn Clock>, random: Arc<dyn RandomSource>) -> Self {
        let ledger = CooldownLedger::new(config.ledger_horizon_ms);
        Self {
            config,
            clock,
            random,
            ledger,
            processed: DashSet::new(),
            exploration: DashMap::new(),
            kills: DashMap::new(),
        }
    }

    pub fn config(&self) -> &DropConfig {
        &self.config
    }

    // ── Container channel ──────────────────────────────────────────────

    /// Evaluate a container the first time any player opens it.
    ///
    /// The site is marked processed before anything else, so a container is
    /// judged once no matter how the evaluation ends.
    pub fn on_container_opened(
        &self,
        open: &ContainerOpen,
        oracle: &dyn BlockOracle,
        delivery: &dyn FragmentDelivery,
    ) -> Option<ContainerDrop> {
        if !self.processed.insert(open.site) {
            return None;
        }

        match self.evaluate_container(open, oracle, delivery) {
            Ok(drop) => drop,
            Err(e) => {
                tracing::warn!("Container at {} skipped: {}", open.site, e);
                None
            }
        }
    }

    fn evaluate_container(
        &self,
        open: &ContainerOpen,
        oracle: &dyn BlockOracle,
        delivery: &dyn FragmentDelivery,
    ) -> Result<Option<ContainerDrop>, HostError> {
        let opens = {
            let mut count = self.exploration.entry(open.player).or_insert(0);
            *count += 1;
            *count
        };

        if opens < self.config.min_chests_for_fragments {
            return Ok(None);
        }
        let now = self.clock.now_millis();
        let player_key = LedgerKey::player(open.player, Channel::Container);
        if self
            .ledger
            .is_cooling_down(&player_key, now, self.config.player_chest_cooldown_ms)
        {
            tracing::trace!("Player {} container cooldown active", open.player);
            return Ok(None);
        }

        let rare = block::is_rare_container(oracle.block_at(open.site)?);
        let chance = self.container_chance(open.environment, open.site.y, rare, opens);
        if self.random.next_f64() > chance {
            return Ok(None);
        }

        if self.ledger.location_blocked(
            open.site,
            now,
            self.config.location_cooldown_ms,
            self.config.min_distance,
        ) {
            tracing::debug!("Container at {} too close to a recent spawn", open.site);
            return Ok(None);
        }

        if self.random.next_f64() > self.config.final_pass_rate {
            return Ok(None);
        }

        let god = self.god_for_location(open.environment, open.site.y);
        let number = self.roll_fragment_number();
        if !delivery.deliver_to_container(open.site, god, number)? {
            tracing::debug!("Container at {} is full, fragment discarded", open.site);
            return Ok(None);
        }

        self.ledger.record(LedgerKey::location(open.site), now);
        self.ledger.record(player_key, now);
        tracing::info!(
            "{} fragment {} spawned in container at {} for {}",
            god,
            number,
            open.site,
            open.player
        );
        Ok(Some(ContainerDrop {
            site: open.site,
            god,
            number,
            player: open.player,
        }))
    }

    pub fn container_chance(&self, env: Environment, y: i32, rare: bool, opens: u64) -> f64 {
        chance::container_chance(&self.config, env, y, rare, opens)
    }

    /// The god whose fragment a container at this depth and dimension holds.
    pub fn god_for_location(&self, env: Environment, y: i32) -> GodType {
        match env {
            Environment::Nether => {
                if self.random.next_bool() {
                    GodType::Banishment
                } else {
                    GodType::Fallen
                }
            }
            Environment::End => GodType::Veil,
            Environment::Normal => match y {
                y if y < -20 => GodType::Abyssal,
                y if y < 30 => GodType::Fallen,
                y if y > 100 => GodType::Tempest,
                _ => GodType::Sylvan,
            },
        }
    }

    // ── Kill channel ───────────────────────────────────────────────────

    pub fn on_creature_killed(&self, kill: &CreatureKill) -> Option<KillDrop> {
        let killer = kill.killer?;
        if !self.is_eligible(kill.species) {
            return None;
        }

        let kills = {
            let mut count = self.kills.entry(kill.species).or_insert(0);
            *count += 1;
            *count
        };

        let chance = self.kill_chance(kill.species, kill.environment, kills);
        if self.random.next_f64() > chance {
            return None;
        }

        let now = self.clock.now_millis();
        let killer_key = LedgerKey::player(killer, Channel::Kill);
        if self
            .ledger
            .is_cooling_down(&killer_key, now, self.config.player_mob_cooldown_ms)
        {
            tracing::trace!("Player {} kill cooldown active", killer);
            return None;
        }
        let boss = kill.species.is_boss();
        if !boss && self.random.next_f64() >= self.config.regular_mob_pass_rate {
            return None;
        }

        let god = match kill.species.primary_god() {
            Some(god) => god,
            None => {
                if self.random.next_f64() >= self.config.unassociated_mob_pass_rate {
                    return None;
                }
                GodType::ALL[self.random.pick(GodType::ALL.len())]
            }
        };
        let number = self.roll_fragment_number();

        self.ledger.record(killer_key, now);
        tracing::info!(
            "{} fragment {} dropped by {} for {}",
            god,
            number,
            kill.species.display_name(),
            killer
        );
        Some(KillDrop {
            god,
            number,
            species: kill.species,
            killer,
            boss,
        })
    }

    pub fn kill_chance(&self, species: CreatureType, env: Environment, kills: u64) -> f64 {
        chance::kill_chance(&self.config, species, env, kills)
    }

    /// Species with a configured multiplier or a god association.
    pub fn is_eligible(&self, species: CreatureType) -> bool {
        self.config.mob_multipliers.contains_key(&species) || !species.associated_gods().is_empty()
    }

    // ── Maintenance ────────────────────────────────────────────────────

    pub fn stats(&self) -> DropStats {
        DropStats {
            processed_containers: self.processed.len(),
            ledger_entries: self.ledger.len(),
            chest_spawn_chance: self.config.chest_spawn_chance,
            mob_drop_chance: self.config.mob_drop_chance,
            total_container_opens: self.exploration.iter().map(|e| *e.value()).sum(),
            total_kills: self.kills.iter().map(|e| *e.value()).sum(),
        }
    }

    pub fn exploration_count(&self, player: Uuid) -> u64 {
        self.exploration.get(&player).map(|e| *e.value()).unwrap_or(0)
    }

    pub fn kill_count(&self, species: CreatureType) -> u64 {
        self.kills.get(&species).map(|e| *e.value()).unwrap_or(0)
    }

    pub fn is_processed(&self, site: &WorldSite) -> bool {
        self.processed.contains(site)
    }

    /// Forget processed containers, cooldowns and exploration progress.
    /// Kill counters survive.
    pub fn clear_caches(&self) {
        self.processed.clear();
        self.ledger.clear();
        self.exploration.clear();
        tracing::info!("Drop engine caches cleared");
    }

    pub fn shutdown(&self) {
        self.clear_caches();
        self.kills.clear();
    }

    fn roll_fragment_number(&self) -> FragmentNumber {
        weighted_fragment_number(self.random.next_f64())
    }
}
