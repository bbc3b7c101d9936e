//! Right-clicking altars: structure detection, registration checks and
//! testament completion.

use std::sync::Arc;

use uuid::Uuid;

use testament_engine::builder;
use testament_engine::god::{FragmentNumber, GodType};
use testament_engine::registry::AltarRegistry;
use testament_engine::world::position::{Environment, Offset, WorldId, WorldSite};
use testament_engine::world::{BlockMutator, BlockOracle, block};
use testament_server::event_bus::{Announcement, EventBus};
use testament_server::host::Host;
use testament_server::host::terrain::Terrain;
use testament_server::services::altar::{AltarOutcome, AltarService};
use testament_server::services::detection::AltarDetectionService;
use testament_server::services::testament::TestamentTracker;
use testament_server::stats::PluginStats;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const GROUND: i32 = 64;

struct Fixture {
    host: Arc<Host>,
    world: WorldId,
    registry: Arc<AltarRegistry>,
    testament: Arc<TestamentTracker>,
    bus: EventBus,
    stats: Arc<PluginStats>,
    service: AltarService,
}

fn fixture() -> Fixture {
    let host = Arc::new(Host::new());
    let world = host.create_world("world", Environment::Normal, Terrain::flat(GROUND), 4);
    let registry = Arc::new(AltarRegistry::new());
    let testament = Arc::new(TestamentTracker::new());
    let bus = EventBus::new();
    let stats = Arc::new(PluginStats::new());
    let service = AltarService::new(
        Arc::clone(&host) as Arc<dyn BlockOracle>,
        Arc::clone(&registry),
        Arc::clone(&testament),
        bus.clone(),
        Arc::clone(&stats),
        3.0,
    );
    Fixture {
        host,
        world,
        registry,
        testament,
        bus,
        stats,
        service,
    }
}

fn altar(f: &Fixture, god: GodType, register: bool) -> WorldSite {
    let site = WorldSite::new(f.world, 8, GROUND + 1, 8);
    builder::stamp(site, god, f.host.as_ref()).unwrap();
    if register {
        f.registry.register(god, site);
    }
    site
}

fn give(f: &Fixture, player: Uuid, god: GodType, numbers: impl IntoIterator<Item = u8>) {
    for n in numbers {
        f.testament
            .record_fragment(player, god, FragmentNumber::new(n).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[test]
fn seven_fragments_complete_the_testament() {
    let f = fixture();
    let player = Uuid::new_v4();
    let center = altar(&f, GodType::Abyssal, true);
    give(&f, player, GodType::Abyssal, 1..=7);
    let mut rx = f.bus.subscribe();

    assert_eq!(
        f.service.handle_interaction(player, center),
        AltarOutcome::Completed(GodType::Abyssal)
    );
    assert!(f.testament.is_completed(player, GodType::Abyssal));
    assert_eq!(f.testament.fragment_count(player, GodType::Abyssal), 0);
    assert_eq!(
        rx.try_recv().unwrap(),
        Announcement::TestamentCompleted {
            player,
            god: GodType::Abyssal
        }
    );
    assert_eq!(f.stats.snapshot().testaments_completed, 1);
}

#[test]
fn missing_fragments_are_listed() {
    let f = fixture();
    let player = Uuid::new_v4();
    let center = altar(&f, GodType::Sylvan, true);
    give(&f, player, GodType::Sylvan, [1, 2, 4, 5, 6]);

    let outcome = f.service.handle_interaction(player, center);
    assert_eq!(
        outcome,
        AltarOutcome::MissingFragments {
            god: GodType::Sylvan,
            missing: vec![FragmentNumber::new(3).unwrap(), FragmentNumber::new(7).unwrap()],
        }
    );
    assert!(outcome.is_handled());
    assert!(!f.testament.is_completed(player, GodType::Sylvan));
    assert_eq!(f.testament.fragment_count(player, GodType::Sylvan), 5);
}

#[test]
fn completion_happens_once() {
    let f = fixture();
    let player = Uuid::new_v4();
    let center = altar(&f, GodType::Veil, true);
    give(&f, player, GodType::Veil, 1..=7);

    assert_eq!(
        f.service.handle_interaction(player, center),
        AltarOutcome::Completed(GodType::Veil)
    );
    give(&f, player, GodType::Veil, 1..=7);
    assert_eq!(
        f.service.handle_interaction(player, center),
        AltarOutcome::AlreadyCompleted(GodType::Veil)
    );
    assert_eq!(f.stats.snapshot().testaments_completed, 1);
}

#[test]
fn other_gods_fragments_do_not_count() {
    let f = fixture();
    let player = Uuid::new_v4();
    let center = altar(&f, GodType::Fallen, true);
    give(&f, player, GodType::Tempest, 1..=7);

    assert!(matches!(
        f.service.handle_interaction(player, center),
        AltarOutcome::MissingFragments { god: GodType::Fallen, ref missing } if missing.len() == 7
    ));
}

// ---------------------------------------------------------------------------
// Detection and registration
// ---------------------------------------------------------------------------

#[test]
fn unregistered_structure_is_refused() {
    let f = fixture();
    let player = Uuid::new_v4();
    let center = altar(&f, GodType::Tempest, false);
    give(&f, player, GodType::Tempest, 1..=7);

    let outcome = f.service.handle_interaction(player, center);
    assert_eq!(outcome, AltarOutcome::Unregistered(GodType::Tempest));
    assert!(!outcome.is_handled());
    assert!(!f.testament.is_completed(player, GodType::Tempest));
}

#[test]
fn registration_elsewhere_is_too_far() {
    let f = fixture();
    let player = Uuid::new_v4();
    let center = altar(&f, GodType::Banishment, false);
    f.registry
        .register(GodType::Banishment, center.offset(Offset::new(4, 0, 0)));

    assert_eq!(
        f.service.handle_interaction(player, center),
        AltarOutcome::Unregistered(GodType::Banishment)
    );
}

#[test]
fn loose_center_block_is_not_an_altar() {
    let f = fixture();
    let site = WorldSite::new(f.world, 0, GROUND + 1, 0);
    f.host.set_block(site, block::CRYING_OBSIDIAN).unwrap();
    f.registry.register(GodType::Fallen, site);

    assert_eq!(
        f.service.handle_interaction(Uuid::new_v4(), site),
        AltarOutcome::NotAnAltar
    );
}

#[test]
fn broken_platform_is_not_an_altar() {
    let f = fixture();
    let center = altar(&f, GodType::Abyssal, true);
    f.host
        .set_block(center.offset(Offset::new(3, -1, 3)), block::DIRT)
        .unwrap();

    assert_eq!(
        f.service.handle_interaction(Uuid::new_v4(), center),
        AltarOutcome::NotAnAltar
    );
}

#[test]
fn ordinary_blocks_are_ignored() {
    let f = fixture();
    let site = WorldSite::new(f.world, 2, GROUND, 2);
    assert_eq!(
        f.service.handle_interaction(Uuid::new_v4(), site),
        AltarOutcome::NotAnAltar
    );
}

#[test]
fn center_found_from_a_nearby_offset() {
    let f = fixture();
    let center = altar(&f, GodType::Sylvan, true);
    let detection = AltarDetectionService::new(Arc::clone(&f.host) as Arc<dyn BlockOracle>);

    let probe = center.offset(Offset::new(2, 1, -3));
    assert_eq!(detection.find_center_near(probe, GodType::Sylvan), Some(center));
    assert_eq!(detection.find_center_near(probe, GodType::Veil), None);
    assert_eq!(
        detection.find_center_near(center.offset(Offset::new(0, 3, 0)), GodType::Sylvan),
        None
    );
}
