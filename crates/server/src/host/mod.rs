//! In-memory game host.
//!
//! Several worlds, each a procedural terrain with a sparse overlay of edits,
//! a set of loaded chunks, container inventories and marker entities. The
//! host implements every engine-facing trait, so the plugin services run
//! against it exactly as they would against a real server.

pub mod chunk;
pub mod terrain;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use dashmap::{DashMap, DashSet};
use testament_engine::drops::FragmentDelivery;
use testament_engine::god::{FragmentNumber, GodType};
use testament_engine::world::block::{self, BlockId};
use testament_engine::world::position::{Environment, WorldId, WorldSite};
use testament_engine::world::{BlockMutator, BlockOracle, HostError, SurfaceSampler};

use crate::items::{Inventory, ItemFactory};
use chunk::{Chunk, ChunkPos};
use terrain::Terrain;

/// Exclusive upper bound of the build height.
pub const MAX_Y: i32 = 320;

/// An invisible tagged entity, used by pre-authored structures to mark
/// where an altar sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub id: u64,
    pub site: WorldSite,
    pub tags: BTreeSet<String>,
}

/// One loaded world.
pub struct HostWorld {
    pub id: WorldId,
    pub name: String,
    pub environment: Environment,
    terrain: Terrain,
    chunks: DashMap<ChunkPos, Chunk>,
    loaded: DashSet<ChunkPos>,
    containers: DashMap<WorldSite, Inventory>,
    markers: DashMap<ChunkPos, Vec<Marker>>,
}

impl HostWorld {
    fn new(id: WorldId, name: &str, environment: Environment, terrain: Terrain) -> Self {
        Self {
            id,
            name: name.to_string(),
            environment,
            terrain,
            chunks: DashMap::new(),
            loaded: DashSet::new(),
            containers: DashMap::new(),
            markers: DashMap::new(),
        }
    }

    fn check_loaded(&self, x: i32, z: i32) -> Result<ChunkPos, HostError> {
        let pos = ChunkPos::containing(x, z);
        if !self.loaded.contains(&pos) {
            return Err(HostError::ChunkNotLoaded {
                world: self.id.0,
                x: pos.x,
                z: pos.z,
            });
        }
        Ok(pos)
    }

    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Result<BlockId, HostError> {
        let pos = self.check_loaded(x, z)?;
        Ok(match self.chunks.get(&pos) {
            Some(chunk) => chunk.get_block(&self.terrain, x, y, z),
            None => self.terrain.block_at(x, y, z),
        })
    }

    pub fn set_block(&self, x: i32, y: i32, z: i32, block: BlockId) -> Result<(), HostError> {
        let pos = self.check_loaded(x, z)?;
        self.chunks
            .entry(pos)
            .or_default()
            .set_block(&self.terrain, x, y, z, block);

        let site = WorldSite::new(self.id, x, y, z);
        if block::is_container(block) {
            self.containers.entry(site).or_insert_with(Inventory::container);
        } else {
            self.containers.remove(&site);
        }
        Ok(())
    }

    /// First non-solid y above the highest solid block of column (x, z).
    pub fn surface_height(&self, x: i32, z: i32) -> Result<i32, HostError> {
        let pos = self.check_loaded(x, z)?;
        let edited_top = self.chunks.get(&pos).and_then(|c| c.top_edited_y());
        let top = edited_top
            .unwrap_or(i32::MIN)
            .max(self.terrain.height(x, z) + 1)
            .min(MAX_Y - 1);

        for y in (self.terrain.min_y..=top).rev() {
            if crate::block::is_solid(self.block_at(x, y, z)?) {
                return Ok(y + 1);
            }
        }
        Ok(self.terrain.min_y)
    }

    pub fn biome_at(&self, x: i32, z: i32) -> Result<String, HostError> {
        self.check_loaded(x, z)?;
        Ok(self.terrain.biome_at(x, z).to_string())
    }

    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.loaded.contains(&pos)
    }

    pub fn loaded_chunks(&self) -> usize {
        self.loaded.len()
    }

    pub fn edited_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn markers_in(&self, pos: ChunkPos) -> Vec<Marker> {
        self.markers
            .get(&pos)
            .map(|m| m.value().clone())
            .unwrap_or_default()
    }
}

/// The host: every world it runs, keyed by id.
#[derive(Default)]
pub struct Host {
    worlds: DashMap<WorldId, Arc<HostWorld>>,
    next_world: AtomicU32,
    next_marker: AtomicU64,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world and load every chunk within `load_radius` chunks of
    /// the origin.
    pub fn create_world(
        &self,
        name: &str,
        environment: Environment,
        terrain: Terrain,
        load_radius: i32,
    ) -> WorldId {
        let id = WorldId(self.next_world.fetch_add(1, Ordering::Relaxed) + 1);
        let world = Arc::new(HostWorld::new(id, name, environment, terrain));
        for cx in -load_radius..=load_radius {
            for cz in -load_radius..=load_radius {
                world.loaded.insert(ChunkPos::new(cx, cz));
            }
        }
        tracing::info!(
            "Created world '{}' (#{}, {:?}, {} chunks loaded)",
            name,
            id.0,
            environment,
            world.loaded.len()
        );
        self.worlds.insert(id, world);
        id
    }

    pub fn world(&self, id: WorldId) -> Result<Arc<HostWorld>, HostError> {
        self.worlds
            .get(&id)
            .map(|w| Arc::clone(w.value()))
            .ok_or(HostError::UnknownWorld(id.0))
    }

    pub fn worlds(&self) -> Vec<WorldId> {
        let mut ids: Vec<WorldId> = self.worlds.iter().map(|w| *w.key()).collect();
        ids.sort();
        ids
    }

    pub fn world_by_name(&self, name: &str) -> Option<WorldId> {
        self.worlds
            .iter()
            .find(|w| w.value().name == name)
            .map(|w| *w.key())
    }

    pub fn environment(&self, id: WorldId) -> Result<Environment, HostError> {
        Ok(self.world(id)?.environment)
    }

    pub fn world_name(&self, id: WorldId) -> String {
        self.world(id)
            .map(|w| w.name.clone())
            .unwrap_or_else(|_| format!("#{}", id.0))
    }

    /// Mark a chunk loaded. Returns false if it already was.
    pub fn load_chunk(&self, world: WorldId, pos: ChunkPos) -> Result<bool, HostError> {
        Ok(self.world(world)?.loaded.insert(pos))
    }

    pub fn unload_chunk(&self, world: WorldId, pos: ChunkPos) -> Result<bool, HostError> {
        Ok(self.world(world)?.loaded.remove(&pos).is_some())
    }

    // ── Containers ─────────────────────────────────────────────────────

    pub fn place_container(&self, site: WorldSite, kind: BlockId) -> Result<(), HostError> {
        if !block::is_container(kind) {
            return Err(HostError::Host(format!("block {} is not a container", kind.0)));
        }
        self.set_block(site, kind)
    }

    /// Copy of the inventory at `site`, if it is a container.
    pub fn container(&self, site: WorldSite) -> Option<Inventory> {
        let world = self.world(site.world).ok()?;
        world.containers.get(&site).map(|inv| inv.value().clone())
    }

    pub fn with_container<R>(
        &self,
        site: WorldSite,
        f: impl FnOnce(&mut Inventory) -> R,
    ) -> Result<R, HostError> {
        let world = self.world(site.world)?;
        let mut inv = world
            .containers
            .get_mut(&site)
            .ok_or_else(|| HostError::Host(format!("no container at {}", site)))?;
        Ok(f(inv.value_mut()))
    }

    // ── Markers ────────────────────────────────────────────────────────

    pub fn add_marker(&self, site: WorldSite, tags: &[&str]) -> Result<u64, HostError> {
        let world = self.world(site.world)?;
        let id = self.next_marker.fetch_add(1, Ordering::Relaxed) + 1;
        let marker = Marker {
            id,
            site,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };
        world
            .markers
            .entry(ChunkPos::containing(site.x, site.z))
            .or_default()
            .push(marker);
        Ok(id)
    }

    pub fn markers_in_chunk(&self, world: WorldId, pos: ChunkPos) -> Result<Vec<Marker>, HostError> {
        Ok(self.world(world)?.markers_in(pos))
    }

    /// Add `tag` to the marker. Returns false if no such marker exists.
    pub fn tag_marker(&self, world: WorldId, marker: u64, tag: &str) -> Result<bool, HostError> {
        let world = self.world(world)?;
        for mut entry in world.markers.iter_mut() {
            if let Some(m) = entry.value_mut().iter_mut().find(|m| m.id == marker) {
                m.tags.insert(tag.to_string());
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl BlockOracle for Host {
    fn block_at(&self, site: WorldSite) -> Result<BlockId, HostError> {
        self.world(site.world)?.block_at(site.x, site.y, site.z)
    }

    fn is_solid(&self, block: BlockId) -> bool {
        crate::block::is_solid(block)
    }
}

impl SurfaceSampler for Host {
    fn surface_height(&self, world: WorldId, x: i32, z: i32) -> Result<i32, HostError> {
        self.world(world)?.surface_height(x, z)
    }

    fn biome_at(&self, site: WorldSite) -> Result<String, HostError> {
        self.world(site.world)?.biome_at(site.x, site.z)
    }
}

impl BlockMutator for Host {
    fn set_block(&self, site: WorldSite, block: BlockId) -> Result<(), HostError> {
        self.world(site.world)?.set_block(site.x, site.y, site.z, block)
    }
}

impl FragmentDelivery for Host {
    fn deliver_to_container(
        &self,
        site: WorldSite,
        god: GodType,
        number: FragmentNumber,
    ) -> Result<bool, HostError> {
        let item = ItemFactory::fragment(god, number);
        let slot = self.with_container(site, |inv| inv.insert_preferred(item))?;
        if let Some(slot) = slot {
            tracing::debug!("Placed {} fragment {} in slot {} at {}", god, number, slot, site);
        }
        Ok(slot.is_some())
    }
}
