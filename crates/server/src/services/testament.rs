//! Per-player testament progress.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use testament_engine::god::{FragmentNumber, GodType};

/// One player's progress: fragments held per god, and completed gods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTestamentData {
    pub fragments: BTreeMap<GodType, BTreeSet<FragmentNumber>>,
    pub completed: BTreeSet<GodType>,
}

impl PlayerTestamentData {
    /// Returns true if the fragment was new.
    pub fn add_fragment(&mut self, god: GodType, number: FragmentNumber) -> bool {
        self.fragments.entry(god).or_default().insert(number)
    }

    pub fn fragment_count(&self, god: GodType) -> usize {
        self.fragments.get(&god).map_or(0, BTreeSet::len)
    }

    pub fn has_fragment(&self, god: GodType, number: FragmentNumber) -> bool {
        self.fragments.get(&god).is_some_and(|s| s.contains(&number))
    }

    pub fn missing(&self, god: GodType) -> Vec<FragmentNumber> {
        FragmentNumber::all()
            .filter(|n| !self.has_fragment(god, *n))
            .collect()
    }

    pub fn has_all(&self, god: GodType) -> bool {
        self.fragment_count(god) == usize::from(FragmentNumber::MAX)
    }

    pub fn is_completed(&self, god: GodType) -> bool {
        self.completed.contains(&god)
    }
}

/// Why a completion attempt was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionRefusal {
    AlreadyCompleted,
    MissingFragments(Vec<FragmentNumber>),
}

/// All players' progress, shared between the spawning service, the altar
/// service and persistence.
#[derive(Default)]
pub struct TestamentTracker {
    players: DashMap<Uuid, PlayerTestamentData>,
}

impl TestamentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `player` with a fragment. Returns true if it was new.
    pub fn record_fragment(&self, player: Uuid, god: GodType, number: FragmentNumber) -> bool {
        let mut data = self.players.entry(player).or_default();
        let fresh = data.add_fragment(god, number);
        if fresh {
            tracing::info!(
                "Player {} obtained {} fragment {} ({}/7)",
                player,
                god,
                number,
                data.fragment_count(god)
            );
        }
        fresh
    }

    pub fn fragment_count(&self, player: Uuid, god: GodType) -> usize {
        self.players
            .get(&player)
            .map_or(0, |d| d.fragment_count(god))
    }

    pub fn missing(&self, player: Uuid, god: GodType) -> Vec<FragmentNumber> {
        self.players
            .get(&player)
            .map(|d| d.missing(god))
            .unwrap_or_else(|| FragmentNumber::all().collect())
    }

    pub fn is_completed(&self, player: Uuid, god: GodType) -> bool {
        self.players
            .get(&player)
            .is_some_and(|d| d.is_completed(god))
    }

    /// Consume all seven fragments and mark the testament complete.
    /// Succeeds at most once per player and god.
    pub fn complete(&self, player: Uuid, god: GodType) -> Result<(), CompletionRefusal> {
        let mut data = self.players.entry(player).or_default();
        if data.is_completed(god) {
            return Err(CompletionRefusal::AlreadyCompleted);
        }
        if !data.has_all(god) {
            return Err(CompletionRefusal::MissingFragments(data.missing(god)));
        }
        data.fragments.remove(&god);
        data.completed.insert(god);
        tracing::info!("Testament completed: {} finished {}", player, god);
        Ok(())
    }

    pub fn get(&self, player: Uuid) -> Option<PlayerTestamentData> {
        self.players.get(&player).map(|d| d.value().clone())
    }

    pub fn snapshot(&self) -> HashMap<Uuid, PlayerTestamentData> {
        self.players
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect()
    }

    /// Replace all progress with `players`.
    pub fn restore(&self, players: HashMap<Uuid, PlayerTestamentData>) {
        self.players.clear();
        for (id, data) in players {
            self.players.insert(id, data);
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
