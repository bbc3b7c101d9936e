//! Host event listeners wired through the full plugin.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use uuid::Uuid;

use testament_engine::clock::ManualClock;
use testament_engine::config::{DropConfig, PlacementConfig};
use testament_engine::creature::CreatureType;
use testament_engine::god::GodType;
use testament_engine::random::SeededRandom;
use testament_engine::registry::AltarRegistry;
use testament_engine::world::BlockMutator;
use testament_engine::world::block;
use testament_engine::world::position::{Environment, WorldSite};
use testament_server::config::PluginConfig;
use testament_server::host::Host;
use testament_server::host::chunk::ChunkPos;
use testament_server::host::terrain::Terrain;
use testament_server::listeners::REGISTERED_TAG;
use testament_server::persistence::{self, PendingAltars};
use testament_server::plugin::TestamentPlugin;
use testament_server::services::spawning::CreatureDeath;
use testament_server::services::testament::TestamentTracker;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const GROUND: i32 = 64;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("testament-listeners-{}", Uuid::new_v4()))
}

fn config() -> PluginConfig {
    PluginConfig {
        fragments: DropConfig {
            min_chests_for_fragments: 1,
            chest_spawn_chance: 0.25,
            final_pass_rate: 1.0,
            ..DropConfig::default()
        },
        forge: PlacementConfig {
            min_distance: 100.0,
            standard_search_radius: 300,
            standard_attempts: 200,
            new_world_search_radius: 300,
            max_attempts: 200,
            god_spacing_ms: 0,
            init_delay_ms: 0,
            load_delay_ms: 0,
            ..PlacementConfig::default()
        },
        ..PluginConfig::default()
    }
}

fn plugin() -> TestamentPlugin {
    plugin_in(&scratch_dir())
}

fn plugin_in(dir: &Path) -> TestamentPlugin {
    let host = Arc::new(Host::new());
    host.create_world("world", Environment::Normal, Terrain::flat(GROUND), 20);
    TestamentPlugin::start(
        config(),
        host,
        dir,
        Arc::new(ManualClock::new(0)),
        Arc::new(SeededRandom::new(3)),
    )
}

// ---------------------------------------------------------------------------
// World lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn world_init_schedules_generation() {
    let plugin = plugin();
    let world = plugin.host().world_by_name("world").unwrap();

    let report = plugin.listeners().on_world_init(world).await.unwrap();
    assert!(!report.built.is_empty());
    assert_eq!(plugin.registry().sites_in(world).len(), report.built.len());
}

#[tokio::test]
async fn world_load_with_altars_schedules_nothing() {
    let plugin = plugin();
    let world = plugin.host().world_by_name("world").unwrap();
    plugin
        .registry()
        .register(GodType::Veil, WorldSite::new(world, 0, GROUND + 1, 0));

    assert!(plugin.listeners().on_world_load(world).is_none());
}

#[tokio::test]
async fn world_load_without_altars_generates() {
    let plugin = plugin();
    let world = plugin.host().world_by_name("world").unwrap();

    let handle = plugin.listeners().on_world_load(world).expect("scheduled");
    let report = handle.await.unwrap();
    assert!(!report.built.is_empty());
}

#[tokio::test]
async fn saved_altars_are_claimed_when_their_world_loads_late() {
    let dir = scratch_dir();
    let earlier = Host::new();
    let skylands = earlier.create_world("skylands", Environment::Normal, Terrain::flat(90), 0);
    let registry = AltarRegistry::new();
    registry.register(GodType::Tempest, WorldSite::new(skylands, 4, 91, 4));
    persistence::save(&TestamentTracker::new(), &registry, &PendingAltars::new(), &earlier, &dir)
        .unwrap();

    let plugin = plugin_in(&dir);
    assert_eq!(plugin.load().unwrap().orphaned, 1);
    assert_eq!(plugin.pending_altars().len(), 1);

    let world = plugin
        .host()
        .create_world("skylands", Environment::Normal, Terrain::flat(90), 2);
    assert!(plugin.listeners().on_world_load(world).is_none());
    assert_eq!(
        plugin.registry().get(world, GodType::Tempest),
        Some(WorldSite::new(world, 4, 91, 4))
    );
    assert!(plugin.pending_altars().is_empty());
    std::fs::remove_dir_all(&dir).unwrap();
}

// ---------------------------------------------------------------------------
// Chunk markers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chunk_load_claims_marked_altars_once() {
    let plugin = plugin();
    let host = plugin.host();
    let world = host.world_by_name("world").unwrap();
    let site = WorldSite::new(world, 20, GROUND + 1, 20);
    let marker = host.add_marker(site, &["veil_altar"]).unwrap();
    host.add_marker(WorldSite::new(world, 21, GROUND + 1, 21), &["spawn_point"])
        .unwrap();
    let chunk = ChunkPos::containing(20, 20);

    assert_eq!(plugin.listeners().on_chunk_load(world, chunk), 1);
    assert_eq!(plugin.registry().get(world, GodType::Veil), Some(site));

    let tagged = host.markers_in_chunk(world, chunk).unwrap();
    let tagged = tagged.iter().find(|m| m.id == marker).unwrap();
    assert!(tagged.tags.contains(REGISTERED_TAG));

    assert_eq!(plugin.listeners().on_chunk_load(world, chunk), 0);
}

// ---------------------------------------------------------------------------
// Player actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn only_containers_reach_the_spawning_service() {
    let plugin = plugin();
    let host = plugin.host();
    let world = host.world_by_name("world").unwrap();
    let player = Uuid::new_v4();

    let dirt = WorldSite::new(world, 3, GROUND, 3);
    assert!(plugin.listeners().on_container_open(dirt, player).is_none());
    assert_eq!(plugin.stats().snapshot().containers_opened, 0);

    let barrel = WorldSite::new(world, 5, GROUND + 1, 5);
    host.set_block(barrel, block::BARREL).unwrap();
    plugin.listeners().on_container_open(barrel, player);
    assert_eq!(plugin.stats().snapshot().containers_opened, 1);
    assert_eq!(plugin.spawning().stats().engine.processed_containers, 1);
}

#[tokio::test]
async fn kills_and_clicks_are_forwarded() {
    let plugin = plugin();
    let world = plugin.host().world_by_name("world").unwrap();
    let player = Uuid::new_v4();

    let mut death = CreatureDeath::new(
        CreatureType::Zombie,
        Some(player),
        WorldSite::new(world, 0, GROUND + 1, 0),
    );
    plugin.listeners().on_creature_death(&mut death);
    assert_eq!(plugin.stats().snapshot().creatures_killed, 1);

    let outcome = plugin
        .listeners()
        .on_block_interact(player, WorldSite::new(world, 0, GROUND, 0));
    assert!(!outcome.is_handled());
}

#[tokio::test]
async fn shutdown_saves_progress() {
    let dir = scratch_dir();
    let plugin = plugin_in(&dir);
    let world = plugin.host().world_by_name("world").unwrap();
    plugin
        .registry()
        .register(GodType::Fallen, WorldSite::new(world, 1, GROUND + 1, 1));

    assert_eq!(plugin.shutdown().unwrap(), 0);
    assert!(testament_server::persistence::save_path(&dir).exists());
    std::fs::remove_dir_all(&dir).unwrap();
}
