//! Procedural altar site selection.
//!
//! Random surface sampling under three constraints: distance from other
//! altars, a clear 7x4x7 footprint, and (for fresh worlds) a biome the god
//! favours. Each search is bounded by an attempt budget; there is no
//! wall-clock timeout.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::PlacementConfig;
use crate::god::GodType;
use crate::pattern::PLATFORM_RADIUS;
use crate::random::RandomSource;
use crate::world::block;
use crate::world::position::{Offset, WorldId, WorldSite};
use crate::world::{BlockOracle, HostError, SurfaceSampler};

/// Layers above the ground that must be free of obstructions.
pub const CLEARANCE_HEIGHT: i32 = 3;

/// Which search pass produced a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPass {
    Standard,
    Strict,
    Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteChoice {
    pub site: WorldSite,
    pub pass: SearchPass,
}

/// Host access and randomness for one search.
pub struct SearchContext<'a> {
    pub oracle: &'a dyn BlockOracle,
    pub sampler: &'a dyn SurfaceSampler,
    pub random: &'a dyn RandomSource,
    /// Set by the host on shutdown; the search stops at the next attempt.
    pub cancelled: &'a AtomicBool,
}

/// Parameters of a single sampling pass.
#[derive(Debug, Clone, Copy)]
struct PassParams {
    kind: SearchPass,
    radius: i32,
    attempts: u32,
    min_distance: f64,
    check_biome: bool,
}

pub struct SiteSelector<'a> {
    config: &'a PlacementConfig,
}

impl<'a> SiteSelector<'a> {
    pub fn new(config: &'a PlacementConfig) -> Self {
        Self { config }
    }

    /// Search the standard square for a site at least `min_distance` from
    /// every site in `claimed`.
    pub fn select_standard(
        &self,
        world: WorldId,
        god: GodType,
        claimed: &[WorldSite],
        ctx: &SearchContext<'_>,
    ) -> Option<SiteChoice> {
        let pass = PassParams {
            kind: SearchPass::Standard,
            radius: self.config.standard_search_radius,
            attempts: self.config.standard_attempts,
            min_distance: self.config.min_distance,
            check_biome: false,
        };
        self.run_pass(world, god, &pass, &[claimed], ctx)
    }

    /// Fresh-world search: wider square, more attempts, biome preference.
    /// Falls back to a relaxed pass (half radius, half attempts, half
    /// distance, any biome) when the strict pass finds nothing.
    pub fn select_enhanced(
        &self,
        world: WorldId,
        god: GodType,
        session: &[WorldSite],
        claimed: &[WorldSite],
        ctx: &SearchContext<'_>,
    ) -> Option<SiteChoice> {
        let strict = PassParams {
            kind: SearchPass::Strict,
            radius: self.config.new_world_search_radius,
            attempts: self.config.max_attempts,
            min_distance: self.config.min_distance,
            check_biome: true,
        };
        if let Some(choice) = self.run_pass(world, god, &strict, &[session, claimed], ctx) {
            return Some(choice);
        }
        if ctx.cancelled.load(Ordering::Relaxed) {
            return None;
        }

        tracing::warn!(
            "Relaxing constraints for {} altar in world #{}",
            god,
            world.0
        );
        let relaxed = PassParams {
            kind: SearchPass::Relaxed,
            radius: strict.radius / 2,
            attempts: strict.attempts / 2,
            min_distance: strict.min_distance / 2.0,
            check_biome: false,
        };
        self.run_pass(world, god, &relaxed, &[session, claimed], ctx)
    }

    fn run_pass(
        &self,
        world: WorldId,
        god: GodType,
        pass: &PassParams,
        exclusions: &[&[WorldSite]],
        ctx: &SearchContext<'_>,
    ) -> Option<SiteChoice> {
        for attempt in 0..pass.attempts {
            if ctx.cancelled.load(Ordering::Relaxed) {
                tracing::debug!("Site search for {} cancelled after {} attempts", god, attempt);
                return None;
            }

            let x = ctx.random.next_in_range(-pass.radius, pass.radius);
            let z = ctx.random.next_in_range(-pass.radius, pass.radius);
            let y = match ctx.sampler.surface_height(world, x, z) {
                Ok(y) => y,
                Err(e) => {
                    tracing::trace!("Surface sample at ({}, {}) failed: {}", x, z, e);
                    continue;
                }
            };
            let candidate = WorldSite::new(world, x, y, z);

            match self.accepts(candidate, god, pass, exclusions, ctx) {
                Ok(true) => {
                    tracing::debug!(
                        "{:?} pass found {} site {} after {} attempts",
                        pass.kind,
                        god,
                        candidate,
                        attempt + 1
                    );
                    return Some(SiteChoice {
                        site: candidate,
                        pass: pass.kind,
                    });
                }
                Ok(false) => {}
                Err(e) => tracing::trace!("Candidate {} rejected: {}", candidate, e),
            }
        }
        None
    }

    fn accepts(
        &self,
        candidate: WorldSite,
        god: GodType,
        pass: &PassParams,
        exclusions: &[&[WorldSite]],
        ctx: &SearchContext<'_>,
    ) -> Result<bool, HostError> {
        let too_close = exclusions
            .iter()
            .flat_map(|sites| sites.iter())
            .any(|other| {
                candidate
                    .distance(other)
                    .is_some_and(|d| d < pass.min_distance)
            });
        if too_close {
            return Ok(false);
        }

        if !has_clearance(candidate, ctx.oracle)? {
            return Ok(false);
        }

        if pass.check_biome {
            let biome = ctx.sampler.biome_at(candidate)?;
            return Ok(god.suits_biome(&biome));
        }
        Ok(true)
    }
}

/// Is the 7x4x7 volume around `site` buildable?
///
/// The ground layer (y-1) must be solid everywhere. The layers from `site.y`
/// up to `CLEARANCE_HEIGHT` blocks may only hold non-solid or replaceable
/// blocks.
pub fn has_clearance(site: WorldSite, oracle: &dyn BlockOracle) -> Result<bool, HostError> {
    for dx in -PLATFORM_RADIUS..=PLATFORM_RADIUS {
        for dz in -PLATFORM_RADIUS..=PLATFORM_RADIUS {
            let ground = oracle.block_at(site.offset(Offset::new(dx, -1, dz)))?;
            if !oracle.is_solid(ground) {
                return Ok(false);
            }
            for dy in 0..CLEARANCE_HEIGHT {
                let b = oracle.block_at(site.offset(Offset::new(dx, dy, dz)))?;
                if oracle.is_solid(b) && !block::is_replaceable(b) {
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}
