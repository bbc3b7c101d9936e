//! Site selection: distance spacing, clearance, biome preference, the
//! relaxed fallback and cancellation.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;

use testament_engine::config::PlacementConfig;
use testament_engine::god::GodType;
use testament_engine::random::SeededRandom;
use testament_engine::selector::{SearchContext, SearchPass, SiteSelector, has_clearance};
use testament_engine::world::block::{self, BlockId};
use testament_engine::world::position::{Offset, WorldId, WorldSite};
use testament_engine::world::{BlockOracle, HostError, SurfaceSampler};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const WORLD: WorldId = WorldId(1);
const GROUND: i32 = 64;

/// Infinite flat world: stone below `GROUND`, air from `GROUND` up, with
/// optional per-block overrides and a single biome everywhere.
struct FlatWorld {
    overrides: HashMap<WorldSite, BlockId>,
    biome: &'static str,
    broken: bool,
}

impl FlatWorld {
    fn new(biome: &'static str) -> Self {
        Self {
            overrides: HashMap::new(),
            biome,
            broken: false,
        }
    }

    /// Plank pillars every `step` blocks along both axes.
    fn with_pillars(mut self, span: i32, step: i32) -> Self {
        let mut x = -span;
        while x <= span {
            let mut z = -span;
            while z <= span {
                for dy in 0..3 {
                    self.overrides
                        .insert(WorldSite::new(WORLD, x, GROUND + dy, z), block::OAK_PLANKS);
                }
                z += step;
            }
            x += step;
        }
        self
    }
}

impl BlockOracle for FlatWorld {
    fn block_at(&self, site: WorldSite) -> Result<BlockId, HostError> {
        if site.world != WORLD {
            return Err(HostError::UnknownWorld(site.world.0));
        }
        if let Some(&b) = self.overrides.get(&site) {
            return Ok(b);
        }
        Ok(if site.y < GROUND { block::STONE } else { block::AIR })
    }

    fn is_solid(&self, b: BlockId) -> bool {
        b != block::AIR && !block::is_replaceable(b)
    }
}

impl SurfaceSampler for FlatWorld {
    fn surface_height(&self, world: WorldId, x: i32, z: i32) -> Result<i32, HostError> {
        if self.broken {
            return Err(HostError::ChunkNotLoaded {
                world: world.0,
                x: x >> 4,
                z: z >> 4,
            });
        }
        Ok(GROUND)
    }

    fn biome_at(&self, _site: WorldSite) -> Result<String, HostError> {
        Ok(self.biome.to_string())
    }
}

fn small_config() -> PlacementConfig {
    PlacementConfig {
        min_distance: 200.0,
        standard_search_radius: 600,
        standard_attempts: 200,
        new_world_search_radius: 600,
        max_attempts: 100,
        ..PlacementConfig::default()
    }
}

fn ctx<'a>(
    world: &'a FlatWorld,
    random: &'a SeededRandom,
    cancelled: &'a AtomicBool,
) -> SearchContext<'a> {
    SearchContext {
        oracle: world,
        sampler: world,
        random,
        cancelled,
    }
}

fn site(x: i32, z: i32) -> WorldSite {
    WorldSite::new(WORLD, x, GROUND, z)
}

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

#[test]
fn standard_pass_respects_min_distance() {
    let config = small_config();
    let selector = SiteSelector::new(&config);
    let world = FlatWorld::new("PLAINS");
    let cancelled = AtomicBool::new(false);
    let claimed = [site(0, 0), site(300, 300), site(-300, 200)];

    for seed in 0..40 {
        let random = SeededRandom::new(seed);
        let choice = selector
            .select_standard(WORLD, GodType::Fallen, &claimed, &ctx(&world, &random, &cancelled))
            .expect("flat world always has room");
        assert_eq!(choice.pass, SearchPass::Standard);
        for other in &claimed {
            let d = choice.site.distance(other).unwrap();
            assert!(d >= config.min_distance, "seed {seed}: {d} too close");
        }
    }
}

#[test]
fn claimed_sites_in_other_worlds_do_not_block() {
    let config = small_config();
    let selector = SiteSelector::new(&config);
    let world = FlatWorld::new("PLAINS");
    let cancelled = AtomicBool::new(false);
    let random = SeededRandom::new(3);

    // A dense grid of claims in a different world.
    let claimed: Vec<WorldSite> = (-6..=6)
        .flat_map(|x| (-6..=6).map(move |z| WorldSite::new(WorldId(2), x * 100, GROUND, z * 100)))
        .collect();
    let choice = selector.select_standard(
        WORLD,
        GodType::Veil,
        &claimed,
        &ctx(&world, &random, &cancelled),
    );
    assert!(choice.is_some());
}

#[test]
fn distances_span_the_whole_coordinate_range() {
    let west = WorldSite::new(WORLD, i32::MIN, -64, i32::MIN);
    let east = WorldSite::new(WORLD, i32::MAX, 320, i32::MAX);
    let span = f64::from(i32::MAX) - f64::from(i32::MIN);

    let horizontal = west.horizontal_distance(&east).unwrap();
    assert!((horizontal - span * 2f64.sqrt()).abs() < 1.0);
    assert!(west.distance(&east).unwrap() > horizontal);
    assert_eq!(west.distance(&WorldSite::new(WorldId(2), 0, 0, 0)), None);
}

#[test]
fn default_config_cannot_fit_second_altar_in_standard_square() {
    let config = PlacementConfig::default();
    let selector = SiteSelector::new(&config);
    let world = FlatWorld::new("PLAINS");
    let cancelled = AtomicBool::new(false);
    let random = SeededRandom::new(11);

    let choice = selector.select_standard(
        WORLD,
        GodType::Sylvan,
        &[site(0, 0)],
        &ctx(&world, &random, &cancelled),
    );
    assert_eq!(choice, None);
}

#[test]
fn strict_pass_prefers_matching_biome() {
    let config = small_config();
    let selector = SiteSelector::new(&config);
    let world = FlatWorld::new("DARK_FOREST");
    let cancelled = AtomicBool::new(false);
    let random = SeededRandom::new(5);

    let choice = selector
        .select_enhanced(WORLD, GodType::Fallen, &[], &[], &ctx(&world, &random, &cancelled))
        .unwrap();
    assert_eq!(choice.pass, SearchPass::Strict);
}

#[test]
fn relaxed_pass_halves_distance_and_ignores_biome() {
    let config = small_config();
    let selector = SiteSelector::new(&config);
    // No Abyssal keyword in this biome, so the strict pass always fails.
    let world = FlatWorld::new("DESERT");
    let cancelled = AtomicBool::new(false);
    let session = [site(0, 0)];
    let claimed = [site(150, -150)];

    for seed in 0..20 {
        let random = SeededRandom::new(seed);
        let choice = selector
            .select_enhanced(
                WORLD,
                GodType::Abyssal,
                &session,
                &claimed,
                &ctx(&world, &random, &cancelled),
            )
            .expect("relaxed pass finds a site");
        assert_eq!(choice.pass, SearchPass::Relaxed);
        assert!(choice.site.x.abs() <= 300 && choice.site.z.abs() <= 300);
        for other in session.iter().chain(&claimed) {
            assert!(choice.site.distance(other).unwrap() >= config.min_distance / 2.0);
        }
    }
}

#[test]
fn veil_accepts_any_biome_in_strict_pass() {
    let config = small_config();
    let selector = SiteSelector::new(&config);
    let world = FlatWorld::new("THE_VOID");
    let cancelled = AtomicBool::new(false);
    let random = SeededRandom::new(8);

    let choice = selector
        .select_enhanced(WORLD, GodType::Veil, &[], &[], &ctx(&world, &random, &cancelled))
        .unwrap();
    assert_eq!(choice.pass, SearchPass::Strict);
}

// ---------------------------------------------------------------------------
// Clearance
// ---------------------------------------------------------------------------

#[test]
fn clearance_on_flat_ground() {
    let world = FlatWorld::new("PLAINS");
    assert_eq!(has_clearance(site(0, 0), &world), Ok(true));
    // One block too high: the ground layer is air.
    assert_eq!(has_clearance(site(0, 0).up(1), &world), Ok(false));
    // One block too low: the volume is inside stone.
    assert_eq!(has_clearance(site(0, 0).up(-1), &world), Ok(false));
}

#[test]
fn clearance_tolerates_plants_and_fluids() {
    let mut world = FlatWorld::new("PLAINS");
    world.overrides.insert(site(1, 1), block::TALL_GRASS);
    world.overrides.insert(site(-2, 3), block::WATER);
    world.overrides.insert(site(0, -3).up(2), block::FERN);
    assert_eq!(has_clearance(site(0, 0), &world), Ok(true));
}

#[test]
fn clearance_rejects_obstruction_in_volume() {
    let mut world = FlatWorld::new("PLAINS");
    world.overrides.insert(site(3, -3).up(2), block::OAK_PLANKS);
    assert_eq!(has_clearance(site(0, 0), &world), Ok(false));
    // Just outside the 7x7 footprint is fine.
    assert_eq!(has_clearance(site(-1, 0), &world), Ok(true));
}

#[test]
fn clearance_propagates_host_errors() {
    let world = FlatWorld::new("PLAINS");
    let other = WorldSite::new(WorldId(7), 0, GROUND, 0);
    assert_eq!(has_clearance(other, &world), Err(HostError::UnknownWorld(7)));
}

#[test]
fn chosen_sites_always_have_clearance() {
    let config = small_config();
    let selector = SiteSelector::new(&config);
    let world = FlatWorld::new("PLAINS").with_pillars(600, 9);
    let cancelled = AtomicBool::new(false);

    for seed in 0..30 {
        let random = SeededRandom::new(seed);
        if let Some(choice) =
            selector.select_standard(WORLD, GodType::Tempest, &[], &ctx(&world, &random, &cancelled))
        {
            for dx in -3..=3 {
                for dz in -3..=3 {
                    for dy in 0..3 {
                        let b = world
                            .block_at(choice.site.offset(Offset::new(dx, dy, dz)))
                            .unwrap();
                        assert_ne!(b, block::OAK_PLANKS, "seed {seed}: obstructed site");
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn cancelled_search_returns_none() {
    let config = small_config();
    let selector = SiteSelector::new(&config);
    let world = FlatWorld::new("PLAINS");
    let cancelled = AtomicBool::new(true);
    let random = SeededRandom::new(1);

    let c = ctx(&world, &random, &cancelled);
    assert_eq!(selector.select_standard(WORLD, GodType::Fallen, &[], &c), None);
    assert_eq!(selector.select_enhanced(WORLD, GodType::Veil, &[], &[], &c), None);
}

#[test]
fn sampling_errors_exhaust_attempts() {
    let config = small_config();
    let selector = SiteSelector::new(&config);
    let mut world = FlatWorld::new("PLAINS");
    world.broken = true;
    let cancelled = AtomicBool::new(false);
    let random = SeededRandom::new(1);

    let c = ctx(&world, &random, &cancelled);
    assert_eq!(selector.select_standard(WORLD, GodType::Fallen, &[], &c), None);
    assert_eq!(selector.select_enhanced(WORLD, GodType::Fallen, &[], &[], &c), None);
}
