//! Testament persistence.
//!
//! Player progress and the altar registry are saved together as one JSON
//! document, `testament.json`, under the data directory. Altars are keyed by
//! world name since world ids are only stable for one run. Altars saved for
//! a world the host does not have are held in [`PendingAltars`], written back
//! on every save, and claimed when a world of that name shows up.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use testament_engine::god::GodType;
use testament_engine::registry::AltarRegistry;
use testament_engine::world::position::{WorldId, WorldSite};

use crate::host::Host;
use crate::services::testament::{PlayerTestamentData, TestamentTracker};

pub const SAVE_FILE: &str = "testament.json";

/// Bumped on incompatible layout changes.
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SaveDocument {
    version: u32,
    #[serde(default)]
    players: HashMap<Uuid, PlayerTestamentData>,
    #[serde(default)]
    altars: Vec<SavedAltar>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedAltar {
    world: String,
    god: GodType,
    x: i32,
    y: i32,
    z: i32,
}

/// What `load_into` restored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub players: usize,
    pub altars: usize,
    /// Altars whose world does not exist on this host. They stay pending.
    pub orphaned: usize,
}

/// Saved altars waiting for their world, keyed by world name and god.
#[derive(Default)]
pub struct PendingAltars {
    altars: DashMap<(String, GodType), SavedAltar>,
}

impl PendingAltars {
    pub fn new() -> Self {
        Self::default()
    }

    fn hold(&self, altar: SavedAltar) {
        self.altars.insert((altar.world.clone(), altar.god), altar);
    }

    /// Register every pending altar saved for `world`'s name. A god that
    /// already has an altar there keeps it. Returns the number registered.
    pub fn adopt(&self, host: &Host, world: WorldId, registry: &AltarRegistry) -> usize {
        let name = host.world_name(world);
        let mut adopted = 0;
        self.altars.retain(|(world_name, god), altar| {
            if *world_name != name {
                return true;
            }
            if registry.has(world, *god) {
                tracing::warn!(
                    "Dropping saved {} altar in '{}', one is already registered",
                    god,
                    name
                );
            } else {
                registry.register(*god, WorldSite::new(world, altar.x, altar.y, altar.z));
                tracing::info!("Restored saved {} altar in '{}'", god, name);
                adopted += 1;
            }
            false
        });
        adopted
    }

    pub fn len(&self) -> usize {
        self.altars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.altars.is_empty()
    }
}

pub fn save_path(dir: &Path) -> PathBuf {
    dir.join(SAVE_FILE)
}

/// Write all progress and altar claims, pending ones included. Returns the
/// number of players saved.
pub fn save(
    testament: &TestamentTracker,
    registry: &AltarRegistry,
    pending: &PendingAltars,
    host: &Host,
    dir: &Path,
) -> Result<usize> {
    let start = Instant::now();
    fs::create_dir_all(dir)
        .with_context(|| format!("creating data directory {}", dir.display()))?;

    let players = testament.snapshot();
    let mut altars: Vec<SavedAltar> = registry
        .all()
        .into_iter()
        .map(|(god, site)| SavedAltar {
            world: host.world_name(site.world),
            god,
            x: site.x,
            y: site.y,
            z: site.z,
        })
        .collect();
    for entry in pending.altars.iter() {
        let held = entry.value();
        if !altars.iter().any(|a| a.world == held.world && a.god == held.god) {
            altars.push(held.clone());
        }
    }
    let doc = SaveDocument {
        version: FORMAT_VERSION,
        players,
        altars,
    };

    let text = serde_json::to_string_pretty(&doc).context("serializing testament data")?;
    let path = save_path(dir);
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, text).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;

    tracing::info!(
        "Saved {} players and {} altars to {} in {:.1}ms",
        doc.players.len(),
        doc.altars.len(),
        path.display(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(doc.players.len())
}

/// Replay a saved document into the tracker and registry. Altars of unknown
/// worlds go to `pending`. A missing file leaves everything untouched.
pub fn load_into(
    testament: &TestamentTracker,
    registry: &AltarRegistry,
    pending: &PendingAltars,
    host: &Host,
    dir: &Path,
) -> Result<LoadSummary> {
    let path = save_path(dir);
    if !path.exists() {
        return Ok(LoadSummary::default());
    }

    let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let doc: SaveDocument =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    if doc.version != FORMAT_VERSION {
        anyhow::bail!(
            "{} has format version {}, expected {}",
            path.display(),
            doc.version,
            FORMAT_VERSION
        );
    }

    let mut summary = LoadSummary {
        players: doc.players.len(),
        ..LoadSummary::default()
    };
    testament.restore(doc.players);

    for altar in doc.altars {
        let Some(world) = host.world_by_name(&altar.world) else {
            tracing::warn!(
                "Saved {} altar in unknown world '{}', holding it until the world loads",
                altar.god,
                altar.world
            );
            summary.orphaned += 1;
            pending.hold(altar);
            continue;
        };
        registry.register(altar.god, WorldSite::new(world, altar.x, altar.y, altar.z));
        summary.altars += 1;
    }

    tracing::info!(
        "Loaded {} players and {} altars from {}",
        summary.players,
        summary.altars,
        path.display()
    );
    Ok(summary)
}
