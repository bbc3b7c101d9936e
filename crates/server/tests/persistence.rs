//! Saving and restoring testament progress and altar claims.

use std::path::PathBuf;

use uuid::Uuid;

use testament_engine::god::{FragmentNumber, GodType};
use testament_engine::registry::AltarRegistry;
use testament_engine::world::position::{Environment, WorldSite};
use testament_server::host::Host;
use testament_server::host::terrain::Terrain;
use testament_server::persistence::{self, LoadSummary, PendingAltars};
use testament_server::services::testament::TestamentTracker;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Removes its directory when dropped.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("testament-persist-{}", Uuid::new_v4())))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn host_with(names: &[&str]) -> Host {
    let host = Host::new();
    for name in names {
        host.create_world(name, Environment::Normal, Terrain::flat(64), 0);
    }
    host
}

fn n(v: u8) -> FragmentNumber {
    FragmentNumber::new(v).unwrap()
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn progress_and_altars_round_trip() {
    let dir = ScratchDir::new();
    let host = host_with(&["world", "world_nether"]);
    let overworld = host.world_by_name("world").unwrap();
    let nether = host.world_by_name("world_nether").unwrap();

    let tracker = TestamentTracker::new();
    let registry = AltarRegistry::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    for v in 1..=7 {
        tracker.record_fragment(alice, GodType::Veil, n(v));
    }
    tracker.complete(alice, GodType::Veil).unwrap();
    tracker.record_fragment(alice, GodType::Fallen, n(3));
    tracker.record_fragment(bob, GodType::Tempest, n(1));
    tracker.record_fragment(bob, GodType::Tempest, n(6));
    registry.register(GodType::Sylvan, WorldSite::new(overworld, 120, 65, -40));
    registry.register(GodType::Fallen, WorldSite::new(nether, -8, 33, 12));

    let saved = persistence::save(&tracker, &registry, &PendingAltars::new(), &host, &dir.0);
    assert_eq!(saved.unwrap(), 2);

    // A fresh host creating the same worlds in a different order.
    let reloaded_host = host_with(&["world_nether", "world"]);
    let tracker2 = TestamentTracker::new();
    let registry2 = AltarRegistry::new();
    let summary = persistence::load_into(
        &tracker2,
        &registry2,
        &PendingAltars::new(),
        &reloaded_host,
        &dir.0,
    )
    .unwrap();

    assert_eq!(
        summary,
        LoadSummary {
            players: 2,
            altars: 2,
            orphaned: 0
        }
    );
    assert_eq!(tracker2.get(alice), tracker.get(alice));
    assert_eq!(tracker2.get(bob), tracker.get(bob));
    assert!(tracker2.is_completed(alice, GodType::Veil));

    let new_overworld = reloaded_host.world_by_name("world").unwrap();
    let new_nether = reloaded_host.world_by_name("world_nether").unwrap();
    assert_eq!(
        registry2.get(new_overworld, GodType::Sylvan),
        Some(WorldSite::new(new_overworld, 120, 65, -40))
    );
    assert_eq!(
        registry2.get(new_nether, GodType::Fallen),
        Some(WorldSite::new(new_nether, -8, 33, 12))
    );
}

#[test]
fn altars_in_missing_worlds_are_orphaned() {
    let dir = ScratchDir::new();
    let host = host_with(&["world", "skylands"]);
    let registry = AltarRegistry::new();
    registry.register(
        GodType::Tempest,
        WorldSite::new(host.world_by_name("skylands").unwrap(), 0, 90, 0),
    );
    persistence::save(&TestamentTracker::new(), &registry, &PendingAltars::new(), &host, &dir.0)
        .unwrap();

    let registry2 = AltarRegistry::new();
    let pending = PendingAltars::new();
    let summary = persistence::load_into(
        &TestamentTracker::new(),
        &registry2,
        &pending,
        &host_with(&["world"]),
        &dir.0,
    )
    .unwrap();
    assert_eq!(summary.altars, 0);
    assert_eq!(summary.orphaned, 1);
    assert!(registry2.is_empty());
    assert_eq!(pending.len(), 1);
}

#[test]
fn orphaned_altars_survive_a_save_without_their_world() {
    let dir = ScratchDir::new();
    let host = host_with(&["world", "skylands"]);
    let registry = AltarRegistry::new();
    let site = WorldSite::new(host.world_by_name("skylands").unwrap(), 12, 90, -7);
    registry.register(GodType::Tempest, site);
    let tracker = TestamentTracker::new();
    persistence::save(&tracker, &registry, &PendingAltars::new(), &host, &dir.0).unwrap();

    // Second run: the skylands are not loaded, and the save still runs.
    let host2 = host_with(&["world"]);
    let registry2 = AltarRegistry::new();
    let pending2 = PendingAltars::new();
    persistence::load_into(&tracker, &registry2, &pending2, &host2, &dir.0).unwrap();
    persistence::save(&tracker, &registry2, &pending2, &host2, &dir.0).unwrap();

    // Third run: the skylands are back.
    let host3 = host_with(&["skylands", "world"]);
    let registry3 = AltarRegistry::new();
    let summary =
        persistence::load_into(&tracker, &registry3, &PendingAltars::new(), &host3, &dir.0)
            .unwrap();
    assert_eq!(summary.altars, 1);
    assert_eq!(summary.orphaned, 0);
    let skylands = host3.world_by_name("skylands").unwrap();
    assert_eq!(
        registry3.get(skylands, GodType::Tempest),
        Some(WorldSite::new(skylands, 12, 90, -7))
    );
}

#[test]
fn pending_altars_are_claimed_when_their_world_appears() {
    let dir = ScratchDir::new();
    let host = host_with(&["nether"]);
    let registry = AltarRegistry::new();
    let nether = host.world_by_name("nether").unwrap();
    registry.register(GodType::Fallen, WorldSite::new(nether, 3, 40, 3));
    registry.register(GodType::Abyssal, WorldSite::new(nether, 300, 40, 3));
    persistence::save(&TestamentTracker::new(), &registry, &PendingAltars::new(), &host, &dir.0)
        .unwrap();

    let host2 = host_with(&[]);
    let registry2 = AltarRegistry::new();
    let pending = PendingAltars::new();
    persistence::load_into(&TestamentTracker::new(), &registry2, &pending, &host2, &dir.0)
        .unwrap();
    assert_eq!(pending.len(), 2);

    let other = host2.create_world("world", Environment::Normal, Terrain::flat(64), 0);
    assert_eq!(pending.adopt(&host2, other, &registry2), 0);

    // A god already claimed in the world keeps its altar.
    let nether2 = host2.create_world("nether", Environment::Nether, Terrain::flat(32), 0);
    let existing = WorldSite::new(nether2, -50, 33, -50);
    registry2.register(GodType::Abyssal, existing);

    assert_eq!(pending.adopt(&host2, nether2, &registry2), 1);
    assert!(pending.is_empty());
    assert_eq!(
        registry2.get(nether2, GodType::Fallen),
        Some(WorldSite::new(nether2, 3, 40, 3))
    );
    assert_eq!(registry2.get(nether2, GodType::Abyssal), Some(existing));
}

// ---------------------------------------------------------------------------
// Missing and damaged files
// ---------------------------------------------------------------------------

#[test]
fn missing_file_loads_nothing() {
    let dir = ScratchDir::new();
    let tracker = TestamentTracker::new();
    tracker.record_fragment(Uuid::new_v4(), GodType::Abyssal, n(2));

    let summary =
        persistence::load_into(
            &tracker,
            &AltarRegistry::new(),
            &PendingAltars::new(),
            &host_with(&[]),
            &dir.0,
        )
        .unwrap();
    assert_eq!(summary, LoadSummary::default());
    assert_eq!(tracker.len(), 1, "existing progress must be left alone");
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = ScratchDir::new();
    std::fs::create_dir_all(&dir.0).unwrap();
    std::fs::write(persistence::save_path(&dir.0), "{ not json").unwrap();

    let err = persistence::load_into(
        &TestamentTracker::new(),
        &AltarRegistry::new(),
        &PendingAltars::new(),
        &host_with(&[]),
        &dir.0,
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("parsing"));
}

#[test]
fn unknown_format_version_is_rejected() {
    let dir = ScratchDir::new();
    std::fs::create_dir_all(&dir.0).unwrap();
    std::fs::write(persistence::save_path(&dir.0), r#"{"version": 99}"#).unwrap();

    assert!(
        persistence::load_into(
            &TestamentTracker::new(),
            &AltarRegistry::new(),
            &PendingAltars::new(),
            &host_with(&[]),
            &dir.0,
        )
        .is_err()
    );
}

#[test]
fn out_of_range_fragment_numbers_are_rejected() {
    let dir = ScratchDir::new();
    std::fs::create_dir_all(&dir.0).unwrap();
    let player = Uuid::new_v4();
    let text = format!(
        r#"{{"version": 1, "players": {{"{}": {{"fragments": {{"veil": [1, 8]}}}}}}}}"#,
        player
    );
    std::fs::write(persistence::save_path(&dir.0), text).unwrap();

    assert!(
        persistence::load_into(
            &TestamentTracker::new(),
            &AltarRegistry::new(),
            &PendingAltars::new(),
            &host_with(&[]),
            &dir.0,
        )
        .is_err()
    );
}
