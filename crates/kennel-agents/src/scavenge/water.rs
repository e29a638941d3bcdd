//! Dredging the floor of shallow water.

use kennel_types::{BlockPos, BlockState, BlockTag, Effect, Particle, Sound, WorkRole};
use kennel_world::terrain::{is_icy, is_open_or_ice, is_water_or_ice, top_of_water_column};
use kennel_world::{LootKey, World};
use rand::Rng;

use super::profile::{TerrainProfile, sample_offset};
use crate::behavior::BehaviorContext;

/// Random cells tried per search.
const SAMPLES: u32 = 20;

/// Loot tier for dredged floors.
const LOOT_BASE: &str = "water_scavenge";

/// Finds floor cells under one or two blocks of water (or an ice sheet)
/// next to a dredgeable material, sampling around the work location.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterScavengeProfile;

impl WaterScavengeProfile {
    /// Create the profile.
    pub const fn new() -> Self {
        Self
    }

    /// Whether `pos` is a shallow floor or an ice plateau with a tagged
    /// material on it, under it, beside it, or directly above it.
    pub fn is_dredge_site(world: &dyn World, pos: BlockPos) -> bool {
        Self::is_shallow(world, pos) && Self::has_material_nearby(world, pos)
    }

    fn is_shallow(world: &dyn World, pos: BlockPos) -> bool {
        let state = world.block(pos);
        let above = world.block(pos.above());
        let two_above = world.block(pos.above_by(2));
        let three_above = world.block(pos.above_by(3));

        let solid_floor = !state.water && !is_icy(world, state) && !state.is_air();
        let ice_plateau = is_icy(world, state) && is_open_or_ice(world, above);
        let depth_one = is_water_or_ice(world, above) && is_open_or_ice(world, two_above);
        let depth_two = is_water_or_ice(world, above)
            && is_water_or_ice(world, two_above)
            && is_open_or_ice(world, three_above);

        (solid_floor && (depth_one || depth_two)) || ice_plateau
    }

    fn has_material_nearby(world: &dyn World, pos: BlockPos) -> bool {
        let [north, south, east, west] = pos.horizontal_neighbors();
        [pos, pos.below(), north, south, east, west, pos.above()]
            .into_iter()
            .any(|p| world.block_has_tag(p, BlockTag::WaterScavenge))
    }
}

impl TerrainProfile for WaterScavengeProfile {
    fn name(&self) -> &'static str {
        "scavenge_water"
    }

    fn required_role(&self) -> WorkRole {
        WorkRole::ScavengeWater
    }

    fn find_target(&self, cx: &mut BehaviorContext<'_>, radius: i32) -> Option<BlockPos> {
        let origin = cx.work.work_location()?;
        for _ in 0..SAMPLES {
            let rng = cx.body.rng();
            let dx = sample_offset(rng, radius);
            let dy = rng.random_range(-2..=0);
            let dz = sample_offset(rng, radius);
            let candidate = origin.offset(dx, dy, dz);
            if Self::is_dredge_site(&*cx.world, candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn navigation_anchor(&self, cx: &BehaviorContext<'_>, target: BlockPos) -> BlockPos {
        let world: &dyn World = &*cx.world;
        let column_base = if is_water_or_ice(world, world.block(target)) {
            target
        } else {
            target.above()
        };
        top_of_water_column(world, column_base).unwrap_or(target)
    }

    fn navigation_y_offset(&self) -> f64 {
        1.0
    }

    fn is_harvestable(&self, world: &dyn World, _pos: BlockPos, state: &BlockState) -> bool {
        world.has_tag(&state.block, BlockTag::WaterScavenge)
    }

    fn loot_key(&self, world: &dyn World, pos: BlockPos, state: &BlockState) -> Option<LootKey> {
        self.is_harvestable(world, pos, state)
            .then(|| LootKey::scavenge(LOOT_BASE, state.block.path()))
    }

    fn on_harvest_success(&self, cx: &mut BehaviorContext<'_>, pos: BlockPos) {
        let at = pos.center().offset(0.0, 0.5, 0.0);
        cx.world.emit(
            at,
            Effect::Particles {
                particle: Particle::Bubble,
                count: 20,
            },
        );
        cx.world.emit(at, Effect::Sound(Sound::ShovelFlatten));
    }
}
