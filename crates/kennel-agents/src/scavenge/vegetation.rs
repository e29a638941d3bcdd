//! Picking ripe fruit and shaking leaves.
//!
//! Three tiers, each with its own loot key: fruit (`fruit/<id>`), leaves
//! that may drop apples (`apple_leaves/<id>`) and other leaves
//! (`other_leaves/<id>`). Fruit is only picked when ripe, and picking
//! knocks it back to an earlier growth stage. Leaves are never changed.

use kennel_types::block::{AGE, BERRIES};
use kennel_types::{BlockPos, BlockState, BlockTag, Effect, Locomotion, Particle, Sound, WorkRole};
use kennel_world::terrain::{find_hover_spot_near, find_standable_near};
use kennel_world::{LootKey, World};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use super::profile::TerrainProfile;
use crate::behavior::BehaviorContext;
use crate::config::VegetationSearch;

/// Loot tier root for vegetation.
const LOOT_BASE: &str = "vegetation_scavenge";

/// Smallest horizontal sampling radius.
const MIN_RADIUS: i32 = 3;

/// Candidates collected before one is picked.
const MAX_CANDIDATES: usize = 24;

/// Deepest descent looking for ground beside a fruit block.
const FRUIT_DOWN_SEARCH: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Fruit,
    AppleLeaves,
    OtherLeaves,
}

impl Tier {
    fn of(world: &dyn World, state: &BlockState) -> Option<Self> {
        if world.has_tag(&state.block, BlockTag::Fruit) {
            Some(Self::Fruit)
        } else if world.has_tag(&state.block, BlockTag::AppleLeaves) {
            Some(Self::AppleLeaves)
        } else if world.has_tag(&state.block, BlockTag::Leaves) {
            Some(Self::OtherLeaves)
        } else {
            None
        }
    }

    const fn path(self) -> &'static str {
        match self {
            Self::Fruit => "fruit",
            Self::AppleLeaves => "apple_leaves",
            Self::OtherLeaves => "other_leaves",
        }
    }
}

/// Samples the canopy around the agent for fruit and leaves.
#[derive(Debug, Clone)]
pub struct VegetationScavengeProfile {
    search: VegetationSearch,
}

impl Default for VegetationScavengeProfile {
    fn default() -> Self {
        Self::new(&VegetationSearch::default())
    }
}

impl VegetationScavengeProfile {
    /// Build from sampling bounds. Out-of-range values are clamped.
    pub fn new(search: &VegetationSearch) -> Self {
        Self {
            search: search.clamped(),
        }
    }

    /// Sampling bounds in effect.
    pub const fn search(&self) -> &VegetationSearch {
        &self.search
    }

    /// Ripeness check: an `age` property must be at its maximum, otherwise
    /// a `berries` flag must be set, otherwise the block is always ripe.
    pub fn is_ripe(state: &BlockState) -> bool {
        if let Some(age) = state.int_property(AGE) {
            return age.value >= age.max;
        }
        state.bool_property(BERRIES).unwrap_or(true)
    }

    /// State a fruit block is left in after picking, `None` if unchanged.
    ///
    /// Ages reset to 1 when the plant has at least four stages (berry
    /// bushes) and to the minimum otherwise (cocoa). A `berries` flag is
    /// cleared.
    pub fn picked_state(state: &BlockState) -> Option<BlockState> {
        if let Some(age) = state.int_property(AGE) {
            let next = if age.max >= 3 { age.max.min(1) } else { age.min };
            if next == age.value {
                return None;
            }
            return state.with_int_value(AGE, next);
        }
        if state.bool_property(BERRIES) == Some(true) {
            return state.with_bool_value(BERRIES, false);
        }
        None
    }

    fn ground_anchor(world: &dyn World, target: BlockPos, max_down: u32) -> BlockPos {
        find_standable_near(world, target, 2, max_down).unwrap_or(target)
    }

    fn hover_anchor(world: &dyn World, target: BlockPos, vertical: i32) -> BlockPos {
        find_hover_spot_near(world, target, 2, vertical).unwrap_or(target)
    }
}

impl TerrainProfile for VegetationScavengeProfile {
    fn name(&self) -> &'static str {
        "scavenge_vegetation"
    }

    fn required_role(&self) -> WorkRole {
        WorkRole::ScavengeVegetation
    }

    fn find_target(&self, cx: &mut BehaviorContext<'_>, radius: i32) -> Option<BlockPos> {
        let origin = cx.body.block_position();
        let r = radius.max(MIN_RADIUS);
        let top = self.search.max_vertical;
        let mut candidates = Vec::with_capacity(MAX_CANDIDATES);
        for _ in 0..self.search.samples {
            let rng = cx.body.rng();
            let dx = rng.random_range(-r..=r);
            let dz = rng.random_range(-r..=r);
            let dy = rng.random_range(-2..=top);
            let pos = origin.offset(dx, dy, dz);
            let world: &dyn World = &*cx.world;
            if !world.is_loaded(pos) || !self.is_harvestable(world, pos, world.block(pos)) {
                continue;
            }
            candidates.push(pos);
            if candidates.len() >= MAX_CANDIDATES {
                break;
            }
        }
        let picked = candidates.choose(cx.body.rng()).copied();
        debug!(
            agent = %cx.body.id(),
            found = candidates.len(),
            target = ?picked,
            "vegetation search"
        );
        picked
    }

    fn navigation_anchor(&self, cx: &BehaviorContext<'_>, target: BlockPos) -> BlockPos {
        let world: &dyn World = &*cx.world;
        let flyer = cx.body.locomotion() == Locomotion::Flying;
        match Tier::of(world, world.block(target)) {
            Some(Tier::Fruit) if flyer => Self::hover_anchor(world, target, 2),
            Some(Tier::Fruit) => Self::ground_anchor(world, target, FRUIT_DOWN_SEARCH),
            Some(Tier::AppleLeaves) if flyer => Self::hover_anchor(world, target, 3),
            Some(Tier::AppleLeaves) => {
                Self::ground_anchor(world, target, self.search.down_search)
            }
            Some(Tier::OtherLeaves) | None => target,
        }
    }

    fn navigation_y_offset(&self) -> f64 {
        0.0
    }

    fn is_harvestable(&self, world: &dyn World, _pos: BlockPos, state: &BlockState) -> bool {
        match Tier::of(world, state) {
            Some(Tier::Fruit) => Self::is_ripe(state),
            Some(Tier::AppleLeaves | Tier::OtherLeaves) => true,
            None => false,
        }
    }

    fn loot_key(&self, world: &dyn World, pos: BlockPos, state: &BlockState) -> Option<LootKey> {
        if !self.is_harvestable(world, pos, state) {
            return None;
        }
        let tier = Tier::of(world, state)?;
        let base = format!("{LOOT_BASE}/{}", tier.path());
        Some(LootKey::scavenge(&base, state.block.path()))
    }

    fn on_harvest_success(&self, cx: &mut BehaviorContext<'_>, pos: BlockPos) {
        let state = cx.world.block(pos).clone();
        let center = pos.center();
        match Tier::of(&*cx.world, &state) {
            Some(Tier::Fruit) => {
                if let Some(next) = Self::picked_state(&state) {
                    if let Err(err) = cx.world.set_block(pos, next) {
                        debug!(%pos, %err, "fruit reset rejected");
                    }
                }
                cx.world.emit(center, Effect::Sound(Sound::BerryPick));
                cx.world.emit(
                    center.offset(0.0, 0.3, 0.0),
                    Effect::Particles {
                        particle: Particle::HappyVillager,
                        count: 6,
                    },
                );
            }
            Some(Tier::AppleLeaves | Tier::OtherLeaves) => {
                cx.world.emit(center, Effect::Sound(Sound::GrassBreak));
                cx.world.emit(
                    center.offset(0.0, 0.2, 0.0),
                    Effect::Particles {
                        particle: Particle::Composter,
                        count: 8,
                    },
                );
            }
            None => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use kennel_types::DimensionId;
    use kennel_world::GridWorld;

    fn bush(age: i32) -> BlockState {
        BlockState::passable("minecraft:sweet_berry_bush").with_int(AGE, age, 0, 3)
    }

    #[test]
    fn age_gates_at_maximum() {
        assert!(!VegetationScavengeProfile::is_ripe(&bush(2)));
        assert!(VegetationScavengeProfile::is_ripe(&bush(3)));
    }

    #[test]
    fn berries_flag_gates_when_no_age() {
        let vine = BlockState::passable("minecraft:cave_vines").with_bool(BERRIES, false);
        assert!(!VegetationScavengeProfile::is_ripe(&vine));
        assert!(VegetationScavengeProfile::is_ripe(&vine.with_bool(BERRIES, true)));
    }

    #[test]
    fn plain_fruit_is_always_ripe() {
        assert!(VegetationScavengeProfile::is_ripe(&BlockState::solid("minecraft:melon")));
    }

    #[test]
    fn picking_resets_to_documented_stage() {
        let picked = VegetationScavengeProfile::picked_state(&bush(3)).unwrap();
        assert_eq!(picked.int_property(AGE).map(|a| a.value), Some(1));

        let cocoa = BlockState::solid("minecraft:cocoa").with_int(AGE, 2, 0, 2);
        let picked = VegetationScavengeProfile::picked_state(&cocoa).unwrap();
        assert_eq!(picked.int_property(AGE).map(|a| a.value), Some(0));

        let vine = BlockState::passable("minecraft:cave_vines").with_bool(BERRIES, true);
        let picked = VegetationScavengeProfile::picked_state(&vine).unwrap();
        assert_eq!(picked.bool_property(BERRIES), Some(false));
    }

    #[test]
    fn leaves_are_always_harvestable_and_keyed_by_tier() {
        let mut w = GridWorld::new(DimensionId::overworld());
        w.tag(BlockTag::AppleLeaves, "minecraft:oak_leaves");
        w.tag(BlockTag::Leaves, "minecraft:birch_leaves");
        w.tag(BlockTag::Fruit, "minecraft:sweet_berry_bush");
        let profile = VegetationScavengeProfile::default();
        let pos = BlockPos::new(1, 4, 1);

        let oak = BlockState::solid("minecraft:oak_leaves");
        let key = profile.loot_key(&w, pos, &oak).unwrap();
        assert_eq!(key.as_str(), "pet/vegetation_scavenge/apple_leaves/oak_leaves");

        let birch = BlockState::solid("minecraft:birch_leaves");
        let key = profile.loot_key(&w, pos, &birch).unwrap();
        assert_eq!(key.as_str(), "pet/vegetation_scavenge/other_leaves/birch_leaves");

        let key = profile.loot_key(&w, pos, &bush(3)).unwrap();
        assert_eq!(key.as_str(), "pet/vegetation_scavenge/fruit/sweet_berry_bush");
        assert!(profile.loot_key(&w, pos, &bush(1)).is_none());
        assert!(!profile.is_harvestable(&w, pos, &BlockState::solid("minecraft:stone")));
    }

    #[test]
    fn sampling_bounds_are_clamped() {
        let profile = VegetationScavengeProfile::new(&VegetationSearch {
            samples: 5,
            max_vertical: 0,
            down_search: 1,
        });
        assert_eq!(profile.search().samples, 40);
        assert_eq!(profile.search().max_vertical, 2);
        assert_eq!(profile.search().down_search, 2);
    }
}
