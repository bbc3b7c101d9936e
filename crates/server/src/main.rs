use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use testament_engine::clock::SystemClock;
use testament_engine::creature::CreatureType;
use testament_engine::random::{RandomSource, SeededRandom, ThreadRandom};
use testament_engine::world::SurfaceSampler;
use testament_engine::world::block;
use testament_engine::world::position::{Environment, WorldId, WorldSite};
use testament_server::config;
use testament_server::event_bus::{Announcement, EventBus};
use testament_server::host::Host;
use testament_server::host::terrain::{BiomeLayout, Terrain};
use testament_server::plugin::TestamentPlugin;
use testament_server::services::spawning::CreatureDeath;

/// Chunks loaded around the origin of the overworld. Covers the fresh-world
/// search square.
const LOAD_RADIUS: i32 = 128;

#[tokio::main]
async fn main() {
    let demo_mode = std::env::args().any(|a| a == "--demo");
    let config_path: PathBuf = std::env::args()
        .skip_while(|a| a != "--config")
        .nth(1)
        .unwrap_or_else(|| "testament.config.json".into())
        .into();
    let data_dir: PathBuf = std::env::args()
        .skip_while(|a| a != "--data")
        .nth(1)
        .unwrap_or_else(|| "data".into())
        .into();
    let seed: Option<u64> = std::env::args()
        .skip_while(|a| a != "--seed")
        .nth(1)
        .and_then(|s| s.parse().ok());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let config = match config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Bad config, falling back to defaults: {:#}", e);
            config::PluginConfig::default()
        }
    };
    let random: Arc<dyn RandomSource> = match seed {
        Some(s) => {
            tracing::info!("Using seeded randomness ({})", s);
            Arc::new(SeededRandom::new(s))
        }
        None => Arc::new(ThreadRandom),
    };

    tracing::info!("Testament altars -- fragment drops and divine altars");

    // ── Host worlds ─────────────────────────────────────────────────────
    let host = Arc::new(Host::new());
    let overworld = host.create_world("world", Environment::Normal, overworld_terrain(), LOAD_RADIUS);
    let nether = host.create_world(
        "world_nether",
        Environment::Nether,
        Terrain::flat(32).with_materials(block::NETHER_BRICKS, block::NETHER_BRICKS),
        4,
    );

    let plugin = TestamentPlugin::start(
        config,
        Arc::clone(&host),
        &data_dir,
        Arc::new(SystemClock),
        Arc::clone(&random),
    );
    match plugin.load() {
        Ok(s) if s.players == 0 && s.altars == 0 => tracing::info!("No saved testament data"),
        Ok(s) => tracing::info!("Restored {} players, {} altars", s.players, s.altars),
        Err(e) => tracing::error!("Failed to load testament data: {:#}", e),
    }
    spawn_announcer(plugin.bus());

    if demo_mode {
        run_demo(&plugin, overworld, random.as_ref()).await;
        match plugin.shutdown() {
            Ok(n) => tracing::info!("Demo finished, {} players saved", n),
            Err(e) => tracing::error!("Demo save failed: {:#}", e),
        }
        return;
    }

    // ── World events ───────────────────────────────────────────────────
    for world in [overworld, nether] {
        if plugin.registry().sites_in(world).is_empty() {
            plugin.listeners().on_world_init(world);
        } else {
            plugin.listeners().on_world_load(world);
        }
    }

    // ── Periodic autosave ────────────────────────────────────────────────
    let interval_len = plugin.config().autosave_interval();
    let mut autosave = tokio::time::interval(interval_len);
    autosave.tick().await; // first tick is immediate, skip it

    loop {
        tokio::select! {
            _ = autosave.tick() => {
                tracing::info!("Autosaving...");
                match plugin.save() {
                    Ok(n) => tracing::info!("Autosave complete: {} players", n),
                    Err(e) => tracing::error!("Autosave failed: {:#}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, shutting down...");
                break;
            }
        }
    }

    // ── Save on shutdown ─────────────────────────────────────────────────
    match plugin.shutdown() {
        Ok(n) => tracing::info!("Shutdown save complete: {} players written", n),
        Err(e) => tracing::error!("Shutdown save failed: {:#}", e),
    }
}

fn overworld_terrain() -> Terrain {
    Terrain::rolling(64, 6).with_biomes(BiomeLayout::bands(
        300,
        &[
            "PLAINS",
            "DARK_FOREST",
            "DESERT",
            "WARM_OCEAN",
            "BIRCH_FOREST",
            "JAGGED_PEAKS",
        ],
    ))
}

/// Log every announcement; chat delivery would hook in here.
fn spawn_announcer(bus: &EventBus) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(Announcement::FragmentDiscovered { player, god, number, .. }) => {
                    tracing::info!("[private {}] You found {} fragment {}", player, god, number);
                }
                Ok(Announcement::BossDrop { god, number, species, .. }) => {
                    tracing::info!("[broadcast] {} dropped {} fragment {}!", species.display_name(), god, number);
                }
                Ok(Announcement::AltarEstablished { god, site, new_world: true, .. }) => {
                    tracing::info!("[broadcast] The {} altar has been discovered at {}", god, site);
                }
                Ok(Announcement::AltarEstablished { .. }) => {}
                Ok(Announcement::AllAltarsEstablished { world }) => {
                    tracing::info!("[broadcast] All divine altars established in world #{}", world.0);
                }
                Ok(Announcement::TestamentCompleted { player, god }) => {
                    tracing::info!("[broadcast] {} completed the {} testament", player, god);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Announcer lagged, {} announcements skipped", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Generate altars, scatter chests, and let a few players loot and hunt.
async fn run_demo(plugin: &TestamentPlugin, world: WorldId, random: &dyn RandomSource) {
    let report = plugin.placement().generate_altars_for_new_world(world).await;
    tracing::info!(
        "Altars: {} built, {} failed",
        report.built.len(),
        report.failed.len()
    );

    let host = plugin.host();
    let listeners = plugin.listeners();
    let players: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

    let mut chests = Vec::new();
    for _ in 0..400 {
        let x = random.next_in_range(-1500, 1500);
        let z = random.next_in_range(-1500, 1500);
        let Ok(y) = host.surface_height(world, x, z) else {
            continue;
        };
        let site = WorldSite::new(world, x, y, z);
        let kind = if random.next_f64() < 0.1 { block::BARREL } else { block::CHEST };
        if host.place_container(site, kind).is_ok() {
            chests.push(site);
        }
    }
    tracing::info!("Placed {} containers", chests.len());

    for (i, site) in chests.iter().enumerate() {
        listeners.on_container_open(*site, players[i % players.len()]);
    }

    const HUNT: [CreatureType; 6] = [
        CreatureType::Zombie,
        CreatureType::Skeleton,
        CreatureType::Enderman,
        CreatureType::Drowned,
        CreatureType::Blaze,
        CreatureType::Wither,
    ];
    for i in 0..600 {
        let species = HUNT[random.pick(HUNT.len())];
        let mut death = CreatureDeath::new(
            species,
            Some(players[i % players.len()]),
            WorldSite::new(world, 0, 64, 0),
        );
        listeners.on_creature_death(&mut death);
    }

    match serde_json::to_string_pretty(&plugin.spawning().stats()) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Could not render stats: {}", e),
    }
    for player in &players {
        if let Some(data) = plugin.testament().get(*player) {
            let held: usize = data.fragments.values().map(|s| s.len()).sum();
            tracing::info!("Player {} holds {} fragments", player, held);
        }
    }
}
