//! The demo scene the simulation runs in.
//!
//! One colony on a flat meadow with a work site for every role: a shallow
//! lake watched by a dredger, a berry grove around a harvest post, a dark
//! podzol patch beside a scavenge station, and a feeding trough. A trainer
//! hut in the middle owns every agent.

use kennel_types::block::AGE;
use kennel_types::{
    BlockPos, BlockState, BlockTag, ColonyId, DimensionId, StructureKind, StructureRef, WorkRole,
};
use kennel_world::GridWorld;

/// Half-width of the loaded square.
const EXTENT: i32 = 32;

/// Light level over the podzol patch.
const PATCH_LIGHT: u8 = 4;

/// Block that marks a vegetation work location.
pub const HARVEST_POST: &str = "kennel:harvest_post";

/// Where everything in the scene sits.
#[derive(Debug, Clone)]
pub struct SceneSites {
    /// Colony every agent belongs to.
    pub colony: ColonyId,
    /// Trainer hut that owns every agent.
    pub trainer: StructureRef,
    /// Dredger on the lake shore.
    pub dredger: BlockPos,
    /// Scavenge station beside the podzol patch.
    pub land_station: BlockPos,
    /// Harvest post in the berry grove.
    pub harvest_post: BlockPos,
    /// Feeding trough.
    pub trough: BlockPos,
    /// Where new agents appear.
    pub spawn: BlockPos,
}

impl SceneSites {
    /// Work location that yields `role`, if the scene has one.
    pub const fn work_location(&self, role: WorkRole) -> Option<BlockPos> {
        match role {
            WorkRole::ScavengeWater => Some(self.dredger),
            WorkRole::ScavengeLand => Some(self.land_station),
            WorkRole::ScavengeVegetation => Some(self.harvest_post),
            WorkRole::Herding => Some(self.trough),
            WorkRole::None => None,
        }
    }
}

/// A built world plus the positions of its sites.
#[derive(Debug, Clone)]
pub struct Scene {
    /// The world itself.
    pub world: GridWorld,
    /// Named positions within it.
    pub sites: SceneSites,
}

/// Build the demo scene.
pub fn build_scene() -> Scene {
    let dimension = DimensionId::overworld();
    let mut world = GridWorld::new(dimension.clone()).with_loaded_bounds(
        BlockPos::new(-EXTENT, -4, -EXTENT),
        BlockPos::new(EXTENT, 16, EXTENT),
    );
    tag_blocks(&mut world);
    world.fill(
        BlockPos::new(-EXTENT, 0, -EXTENT),
        BlockPos::new(EXTENT, 0, EXTENT),
        &BlockState::solid("minecraft:grass_block"),
    );

    let sites = SceneSites {
        colony: ColonyId(1),
        trainer: StructureRef::new(BlockPos::new(0, 1, -4), dimension),
        dredger: BlockPos::new(-7, 1, -12),
        land_station: BlockPos::new(7, 1, 12),
        harvest_post: BlockPos::new(12, 1, -12),
        trough: BlockPos::new(-12, 1, 12),
        spawn: BlockPos::new(0, 1, 0),
    };

    world.place_structure(sites.trainer.position, StructureKind::TrainerHut);
    world.place_structure(sites.trough, StructureKind::Trough);
    lake(&mut world, sites.dredger);
    grove(&mut world, sites.harvest_post);
    podzol_patch(&mut world, sites.land_station);

    Scene { world, sites }
}

fn tag_blocks(world: &mut GridWorld) {
    for block in ["minecraft:gravel", "minecraft:clay", "minecraft:sand"] {
        world.tag(BlockTag::WaterScavenge, block);
    }
    world.tag(BlockTag::Icy, "minecraft:ice");
    world.tag(BlockTag::Fruit, "minecraft:sweet_berry_bush");
    world.tag(BlockTag::AppleLeaves, "minecraft:oak_leaves");
    world.tag(BlockTag::Leaves, "minecraft:birch_leaves");
    for block in ["minecraft:dirt", "minecraft:podzol", "minecraft:mycelium"] {
        world.tag(BlockTag::MushroomSoil, block);
    }
    world.tag(BlockTag::Door, "minecraft:oak_door");
    world.tag(BlockTag::VegetationStation, HARVEST_POST);
}

/// One block of water over a gravel floor with a clay seam, west of the
/// dredger.
fn lake(world: &mut GridWorld, dredger: BlockPos) {
    let near = dredger.offset(-1, -1, -4);
    let far = dredger.offset(-9, -1, 4);
    world.fill(near.below(), far.below(), &BlockState::solid("minecraft:gravel"));
    world.fill(
        BlockPos::new(dredger.x.saturating_sub(5), -1, near.z),
        BlockPos::new(dredger.x.saturating_sub(5), -1, far.z),
        &BlockState::solid("minecraft:clay"),
    );
    world.fill(near, far, &BlockState::water());
    world.place_structure(dredger, StructureKind::Dredger);
}

/// Ripe bushes in two rows either side of the post, an oak to the east and
/// a birch to the west.
fn grove(world: &mut GridWorld, post: BlockPos) {
    world.place(post, BlockState::solid(HARVEST_POST));
    world.place_container(post);

    let ripe = BlockState::passable("minecraft:sweet_berry_bush").with_int(AGE, 3, 0, 3);
    for dx in -3..=3 {
        world.place(post.offset(dx, 0, -3), ripe.clone());
        world.place(post.offset(dx, 0, 3), ripe.clone());
    }

    tree(world, post.offset(4, 0, 0), "minecraft:oak_log", "minecraft:oak_leaves");
    tree(world, post.offset(-4, 0, 0), "minecraft:birch_log", "minecraft:birch_leaves");
}

/// A three-high trunk under a 3x3 canopy.
fn tree(world: &mut GridWorld, base: BlockPos, log: &str, leaves: &str) {
    world.fill(base, base.above_by(2), &BlockState::solid(log));
    world.fill(
        base.offset(-1, 3, -1),
        base.offset(1, 3, 1),
        &BlockState::solid(leaves),
    );
}

/// Dim podzol east of the station.
fn podzol_patch(world: &mut GridWorld, station: BlockPos) {
    let a = station.offset(1, -1, -4);
    let b = station.offset(9, -1, 4);
    world.fill(a, b, &BlockState::solid("minecraft:podzol"));
    world.set_light(a.above(), b.above_by(3), PATCH_LIGHT);
    world.place_structure(station, StructureKind::ScavengeStation);
}
