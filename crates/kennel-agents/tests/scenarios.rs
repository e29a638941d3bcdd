//! Multi-tick scenarios for `kennel-agents`.
//!
//! Each test builds a small [`GridWorld`], spawns one or more agents with a
//! full [`AgentWorkContext`] and [`PriorityScheduler`], and drives them
//! through the public host API the simulation binary uses.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::indexing_slicing
)]

use std::sync::Arc;

use kennel_agents::{
    AgentBody, AgentConfig, AgentLookup, AgentRegistry, AgentWorkContext, BehaviorContext,
    BehaviorScheduler, HostServices, PetBody, PriorityScheduler, ProfileSet, TerrainProfile,
    VegetationScavengeProfile, Watchdog, WatchdogAction, WatchdogConfig, WorkState,
};
use kennel_types::block::AGE;
use kennel_types::{
    AgentId, BlockPos, BlockState, BlockTag, ColonyId, DimensionId, Locomotion, RemovalReason,
    StructureKind, StructureRef,
};
use kennel_world::{GridWorld, LootTables, StatsBook, World};

// =============================================================================
// Helper: a one-colony kennel
// =============================================================================

struct Pet {
    body: PetBody,
    scheduler: PriorityScheduler,
    context: AgentWorkContext,
}

struct Kennel {
    world: GridWorld,
    pets: Vec<Pet>,
    loot: LootTables,
    stats: StatsBook,
    registry: AgentRegistry,
    config: Arc<AgentConfig>,
    profiles: Arc<ProfileSet>,
}

impl Kennel {
    /// Flat grass from -20 to 20 at y=0.
    fn meadow() -> Self {
        let mut world = GridWorld::new(DimensionId::overworld())
            .with_loaded_bounds(BlockPos::new(-20, -4, -20), BlockPos::new(20, 12, 20));
        world.fill(
            BlockPos::new(-20, 0, -20),
            BlockPos::new(20, 0, 20),
            &BlockState::solid("minecraft:grass_block"),
        );
        let config = Arc::new(AgentConfig::default());
        let profiles = Arc::new(ProfileSet::new(&config.scavenge));
        Self {
            world,
            pets: Vec::new(),
            loot: LootTables::new(),
            stats: StatsBook::new(),
            registry: AgentRegistry::new(),
            config,
            profiles,
        }
    }

    fn spawn(&mut self, at: BlockPos) -> usize {
        let entity_id = u32::try_from(self.pets.len()).unwrap().saturating_add(1);
        let body = PetBody::new(
            AgentId::new(),
            entity_id,
            at,
            DimensionId::overworld(),
            Locomotion::Ground,
            u64::from(entity_id),
        );
        let context = AgentWorkContext::new(
            &body,
            Arc::clone(&self.config),
            Arc::clone(&self.profiles),
        );
        self.pets.push(Pet {
            body,
            scheduler: PriorityScheduler::new(),
            context,
        });
        self.pets.len().saturating_sub(1)
    }

    /// Run `f` with the host services of pet `idx`.
    fn with_pet<R>(
        &mut self,
        idx: usize,
        f: impl FnOnce(&mut AgentWorkContext, &mut HostServices<'_>) -> R,
    ) -> R {
        let pet = &mut self.pets[idx];
        let mut host = HostServices {
            world: &mut self.world,
            body: &mut pet.body,
            scheduler: &mut pet.scheduler,
            loot: &self.loot,
            stats: &mut self.stats,
            registry: &mut self.registry,
        };
        f(&mut pet.context, &mut host)
    }

    fn tick(&mut self) {
        self.world.tick();
        for idx in 0..self.pets.len() {
            self.with_pet(idx, |ctx, host| ctx.tick(host));
            let pet = &mut self.pets[idx];
            pet.body.advance(&self.world);
        }
    }
}

impl AgentLookup for Kennel {
    type Agent = PetBody;

    fn dimension_exists(&self, dimension: &DimensionId) -> bool {
        self.world.dimension() == dimension
    }

    fn find(&self, dimension: &DimensionId, entity_id: u32, id: AgentId) -> Option<&PetBody> {
        self.pets.iter().map(|p| &p.body).find(|b| {
            b.dimension() == Some(dimension)
                && b.entity_id() == entity_id
                && b.id() == id
                && b.is_alive()
        })
    }
}

// =============================================================================
// Watchdog
// =============================================================================

#[test]
fn idle_agent_is_reregistered_once_per_thousand_ticks() {
    let mut kennel = Kennel::meadow();
    let pet = kennel.spawn(BlockPos::new(0, 1, 0));

    let mut rebuilt_at = Vec::new();
    let mut last = 0;
    for t in 0..2100u64 {
        kennel.tick();
        let now = kennel.pets[pet].context.registrations();
        if now != last && last != 0 {
            rebuilt_at.push(t);
        }
        last = now;
        if t == 1199 {
            assert_eq!(now, 2, "initial registration plus one watchdog rebuild");
        }
    }
    assert_eq!(kennel.pets[pet].scheduler.running_count(), 0);
    assert!(!rebuilt_at.is_empty());
    for pair in rebuilt_at.windows(2) {
        assert!(pair[1].saturating_sub(pair[0]) >= 1000);
    }
}

#[test]
fn bare_watchdog_fires_one_rebuild_in_a_thousand_ticks() {
    let config = WatchdogConfig {
        grace_ticks: 0,
        ..WatchdogConfig::default()
    };
    let mut dog = Watchdog::new(config);
    let idle = kennel_agents::ActivitySignals {
        free_to_act: true,
        ..Default::default()
    };
    let rebuilds = (0..1000)
        .filter(|_| dog.tick(|| idle) == Some(WatchdogAction::Reregister))
        .count();
    assert_eq!(rebuilds, 1);
}

// =============================================================================
// Work location
// =============================================================================

#[test]
fn repeated_assignment_rebuilds_behaviors_once() {
    let mut kennel = Kennel::meadow();
    let dredger = BlockPos::new(6, 1, 6);
    kennel.world.place_structure(dredger, StructureKind::Dredger);
    let pet = kennel.spawn(BlockPos::new(0, 1, 0));
    kennel.tick();
    assert_eq!(kennel.pets[pet].context.registrations(), 1);

    let changed: Vec<bool> = (0..3)
        .map(|_| kennel.with_pet(pet, |ctx, host| ctx.set_work_location(Some(dredger), host)))
        .collect();
    assert_eq!(changed, vec![true, false, false]);
    for _ in 0..10 {
        kennel.tick();
    }
    assert_eq!(kennel.pets[pet].context.registrations(), 2);
    let registered = kennel.pets[pet].scheduler.registered();
    assert!(registered.contains(&(7, "scavenge_water")));
}

#[test]
fn moving_work_switches_the_role_behavior() {
    let mut kennel = Kennel::meadow();
    let dredger = BlockPos::new(6, 1, 6);
    let station = BlockPos::new(-6, 1, 6);
    kennel.world.place_structure(dredger, StructureKind::Dredger);
    kennel.world.place_structure(station, StructureKind::ScavengeStation);
    let pet = kennel.spawn(BlockPos::new(0, 1, 0));

    kennel.with_pet(pet, |ctx, host| ctx.set_work_location(Some(dredger), host));
    kennel.tick();
    kennel.with_pet(pet, |ctx, host| ctx.set_work_location(Some(station), host));
    kennel.tick();

    let names: Vec<&str> = kennel.pets[pet]
        .scheduler
        .registered()
        .into_iter()
        .map(|(_, name)| name)
        .collect();
    assert!(names.contains(&"scavenge_land"));
    assert!(!names.contains(&"scavenge_water"));
    assert_eq!(kennel.pets[pet].context.registrations(), 2);
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn reload_does_not_duplicate_queue_entries() {
    let mut kennel = Kennel::meadow();
    let hut = StructureRef::new(BlockPos::new(10, 1, 10), DimensionId::overworld());
    kennel.world.place_structure(hut.position, StructureKind::TrainerHut);
    let pet = kennel.spawn(BlockPos::new(0, 1, 0));
    kennel.pets[pet].context.set_colony(Some(ColonyId(1)));
    let inserted = kennel.with_pet(pet, |ctx, host| {
        ctx.assign_trainer(Some(hut.clone()), host.registry)
    });
    assert!(inserted.unwrap());

    let tag = kennel.pets[pet].context.save().unwrap();
    kennel.pets[pet].context.load(&tag);
    for _ in 0..3 {
        kennel.tick();
    }
    assert_eq!(kennel.registry.queue_len(&hut), 1);
    assert_eq!(kennel.registry.agents_for(&hut, &kennel).len(), 1);
    assert_eq!(kennel.registry.agents_for_colony(ColonyId(1), &kennel).len(), 1);
}

#[test]
fn removed_agent_stops_resolving() {
    let mut kennel = Kennel::meadow();
    let hut = StructureRef::new(BlockPos::new(10, 1, 10), DimensionId::overworld());
    let a = kennel.spawn(BlockPos::new(0, 1, 0));
    let b = kennel.spawn(BlockPos::new(2, 1, 0));
    for idx in [a, b] {
        kennel
            .with_pet(idx, |ctx, host| ctx.assign_trainer(Some(hut.clone()), host.registry))
            .unwrap();
    }
    assert_eq!(kennel.registry.agents_for(&hut, &kennel).len(), 2);

    kennel.pets[a].body.kill();
    assert_eq!(kennel.registry.agents_for(&hut, &kennel).len(), 1);

    let Kennel {
        world,
        pets,
        registry,
        stats,
        ..
    } = &mut kennel;
    pets[a]
        .context
        .on_removal(RemovalReason::Killed, &*world, registry, stats);
    assert_eq!(registry.queue_len(&hut), 1);
    assert_eq!(stats.total(&hut, "pets_died"), 1);
}

// =============================================================================
// Vegetation
// =============================================================================

#[test]
fn vegetation_search_skips_unripe_bushes_and_picking_resets_age() {
    let mut world = GridWorld::new(DimensionId::overworld());
    world.tag(BlockTag::Fruit, "minecraft:sweet_berry_bush");
    world.fill(
        BlockPos::new(-6, 0, -6),
        BlockPos::new(6, 0, 6),
        &BlockState::solid("minecraft:grass_block"),
    );
    let bush = |age| BlockState::passable("minecraft:sweet_berry_bush").with_int(AGE, age, 0, 3);
    for x in -3..=3 {
        world.place(BlockPos::new(x, 1, 2), bush(1));
        world.place(BlockPos::new(x, 1, -2), bush(2));
    }
    let ripe = BlockPos::new(1, 1, 2);
    world.place(ripe, bush(3));

    let mut body = PetBody::new(
        AgentId::new(),
        1,
        BlockPos::new(0, 1, 0),
        DimensionId::overworld(),
        Locomotion::Ground,
        99,
    );
    let mut work = WorkState::new(9);
    let loot = LootTables::new();
    let mut stats = StatsBook::new();
    let profile = VegetationScavengeProfile::default();
    let mut cx = BehaviorContext {
        world: &mut world,
        body: &mut body,
        work: &mut work,
        loot: &loot,
        stats: &mut stats,
    };

    for _ in 0..5 {
        if let Some(target) = profile.find_target(&mut cx, 3) {
            assert_eq!(target, ripe);
        }
    }
    let anchor = profile.navigation_anchor(&cx, ripe);
    assert!(anchor.dist_sqr(ripe) <= 8);

    profile.on_harvest_success(&mut cx, ripe);
    let age = cx.world.block(ripe).int_property(AGE).map(|a| a.value);
    assert_eq!(age, Some(1));
    assert!(profile.find_target(&mut cx, 3).is_none());
}
