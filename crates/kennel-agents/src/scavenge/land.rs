//! Scavenging dark soil around a land station.
//!
//! Unlike the water and vegetation profiles this one is assembled from
//! parts: an acceptance predicate decides which sampled cells are targets
//! and a harvest action decides what a successful harvest does to the
//! world. [`LandScavengeProfile::mushrooms`] wires up the stock pair.

use core::fmt;

use kennel_types::{
    BlockId, BlockPos, BlockState, BlockTag, Effect, ItemStack, Particle, Sound, WorkRole,
};
use kennel_world::{LootKey, World};
use rand::Rng;
use tracing::{debug, warn};

use super::profile::{TerrainProfile, sample_offset};
use crate::behavior::BehaviorContext;
use crate::config::LandSearch;

/// Loot tier for land scavenging.
const LOOT_BASE: &str = "land_scavenge";

/// Statistic recorded on the trainer for every planted mushroom.
pub const MUSHROOMS_PLANTED: &str = "mushrooms_planted";

/// Mushrooms the stock harvest action may plant.
const MUSHROOMS: [&str; 2] = ["minecraft:red_mushroom", "minecraft:brown_mushroom"];

/// Decides whether a sampled cell is a target.
pub type LandPredicate = Box<dyn Fn(&dyn World, BlockPos) -> bool + Send + Sync>;

/// Applied to the target after a successful harvest.
pub type HarvestAction = Box<dyn Fn(&mut BehaviorContext<'_>, BlockPos) + Send + Sync>;

/// Land scavenging built from a predicate and a harvest action.
pub struct LandScavengeProfile {
    search: LandSearch,
    predicate: LandPredicate,
    action: HarvestAction,
}

impl fmt::Debug for LandScavengeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LandScavengeProfile")
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

impl LandScavengeProfile {
    /// Assemble a profile from its parts.
    pub fn new(search: LandSearch, predicate: LandPredicate, action: HarvestAction) -> Self {
        Self {
            search,
            predicate,
            action,
        }
    }

    /// Dark empty cells on mushroom soil; a harvest plants a mushroom and
    /// gathers the matching mushrooms around it.
    pub fn mushrooms(search: LandSearch) -> Self {
        Self::new(
            search,
            Box::new(is_mushroom_bed),
            Box::new(plant_and_gather),
        )
    }
}

/// An empty cell over mushroom soil.
pub fn is_mushroom_bed(world: &dyn World, pos: BlockPos) -> bool {
    world.block(pos).is_air() && world.block_has_tag(pos.below(), BlockTag::MushroomSoil)
}

fn plant_and_gather(cx: &mut BehaviorContext<'_>, pos: BlockPos) {
    let pick = cx.body.rng().random_range(0..MUSHROOMS.len());
    let Some(&mushroom) = MUSHROOMS.get(pick) else {
        return;
    };
    if let Err(err) = cx.world.set_block(pos, BlockState::passable(mushroom)) {
        debug!(%pos, %err, "mushroom planting rejected");
        return;
    }
    match cx.work.trainer.as_ref() {
        Some(trainer) => cx.stats.track(trainer, MUSHROOMS_PLANTED, mushroom, 1),
        None => warn!(agent = %cx.body.id(), "planted without a trainer; stat dropped"),
    }
    cx.world.emit(
        pos.center(),
        Effect::Particles {
            particle: Particle::Spore,
            count: 6,
        },
    );
    cx.world.emit(pos.center(), Effect::Sound(Sound::FungusPlace));
    gather_matching(cx, pos, &BlockId::new(mushroom));
}

/// Pick every block equal to `block` in the 3x3x3 around `pos`, skipping
/// `pos` itself, and route the drops into the store.
fn gather_matching(cx: &mut BehaviorContext<'_>, pos: BlockPos, block: &BlockId) {
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let p = pos.offset(dx, dy, dz);
                if p == pos || &cx.world.block(p).block != block {
                    continue;
                }
                if cx.world.set_block(p, BlockState::air()).is_err() {
                    continue;
                }
                let id = cx.world.spawn_item(p.center(), ItemStack::new(block.as_str(), 1));
                if let Err(err) = cx.work.store.absorb(&mut *cx.world, id) {
                    debug!(pos = %p, %err, "gathered drop left on the ground");
                }
            }
        }
    }
}

impl TerrainProfile for LandScavengeProfile {
    fn name(&self) -> &'static str {
        "scavenge_land"
    }

    fn required_role(&self) -> WorkRole {
        WorkRole::ScavengeLand
    }

    fn find_target(&self, cx: &mut BehaviorContext<'_>, radius: i32) -> Option<BlockPos> {
        let origin = cx.work.work_location()?;
        for _ in 0..self.search.samples {
            let rng = cx.body.rng();
            let dx = sample_offset(rng, radius);
            let dy = rng.random_range(-3..=2);
            let dz = sample_offset(rng, radius);
            let candidate = origin.offset(dx, dy, dz);
            let world: &dyn World = &*cx.world;
            if world.light_level(candidate) < self.search.max_light
                && (self.predicate)(world, candidate)
            {
                return Some(candidate);
            }
        }
        None
    }

    fn navigation_anchor(&self, _cx: &BehaviorContext<'_>, target: BlockPos) -> BlockPos {
        target
    }

    fn navigation_y_offset(&self) -> f64 {
        0.0
    }

    fn is_harvestable(&self, world: &dyn World, pos: BlockPos, _state: &BlockState) -> bool {
        (self.predicate)(world, pos)
    }

    /// Keyed by the soil under the target, since the target itself is open.
    fn loot_key(&self, world: &dyn World, pos: BlockPos, state: &BlockState) -> Option<LootKey> {
        if !self.is_harvestable(world, pos, state) {
            return None;
        }
        let soil = world.block(pos.below());
        Some(LootKey::scavenge(LOOT_BASE, soil.block.path()))
    }

    fn on_harvest_success(&self, cx: &mut BehaviorContext<'_>, pos: BlockPos) {
        (self.action)(cx, pos);
    }
}
