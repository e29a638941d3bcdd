//! The tick loop.
//!
//! [`Simulation`] owns the scene and every agent, and drives them one tick
//! at a time: world clock first, then each agent's work context, then the
//! agent's movement. It is also the host-side lookup the registry resolves
//! handles through.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use kennel_agents::scavenge::ITEMS_SCAVENGED;
use kennel_agents::{
    AgentBody, AgentConfig, AgentLookup, AgentRegistry, AgentWorkContext, BehaviorScheduler,
    HostServices, PetBody, PriorityScheduler, ProfileSet,
};
use kennel_types::{AgentId, DimensionId, Locomotion, RemovalReason, WorkRole};
use kennel_world::{GridWorld, LootTables, StatsBook, World};

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::scene::{Scene, SceneSites};

/// Roles the simulation staffs, in spawn order.
pub const STAFFED_ROLES: [WorkRole; 4] = [
    WorkRole::ScavengeWater,
    WorkRole::ScavengeLand,
    WorkRole::ScavengeVegetation,
    WorkRole::Herding,
];

struct Pet {
    role: WorkRole,
    body: PetBody,
    scheduler: PriorityScheduler,
    context: AgentWorkContext,
}

/// One agent's line in the run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentReport {
    /// Stable identity.
    pub id: AgentId,
    /// Role the agent was staffed for.
    pub staffed_as: WorkRole,
    /// Role its behaviors are currently built for.
    pub registered_role: Option<WorkRole>,
    /// Full behavior registrations over the run.
    pub registrations: u32,
    /// Items held in the store.
    pub carried: u32,
    /// Whether the body is still alive.
    pub alive: bool,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Ticks simulated so far.
    pub ticks: u64,
    /// Per-agent reports, in spawn order.
    pub agents: Vec<AgentReport>,
    /// Items scavenged, summed over every label.
    pub items_scavenged: u64,
    /// Items sitting in the trainer hut and work-site containers.
    pub deposited: u32,
    /// Item entities left on the ground.
    pub items_on_ground: usize,
}

/// The scene plus every agent living in it.
pub struct Simulation {
    world: GridWorld,
    sites: SceneSites,
    pets: Vec<Pet>,
    loot: LootTables,
    stats: StatsBook,
    registry: AgentRegistry,
    ticks: u64,
}

impl core::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Simulation")
            .field("agents", &self.pets.len())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Populate `scene` with `agents_per_role` agents for each staffed role.
    ///
    /// Every agent joins the scene's colony, is queued at its trainer hut,
    /// and is sent to the work site for its role.
    pub fn new(config: &SimulationConfig, scene: Scene) -> Result<Self, SimError> {
        config.validate()?;
        let agent_config = Arc::new(config.agents.clone());
        let profiles = Arc::new(ProfileSet::new(&agent_config.scavenge));
        let mut sim = Self {
            world: scene.world,
            sites: scene.sites,
            pets: Vec::new(),
            loot: config.loot.clone(),
            stats: StatsBook::new(),
            registry: AgentRegistry::new(),
            ticks: 0,
        };
        for role in STAFFED_ROLES {
            for _ in 0..config.agents_per_role {
                sim.spawn(role, config.seed, &agent_config, &profiles)?;
            }
        }
        info!(
            agents = sim.pets.len(),
            colony = %sim.sites.colony,
            trainer = %sim.sites.trainer,
            "Simulation populated"
        );
        Ok(sim)
    }

    fn spawn(
        &mut self,
        role: WorkRole,
        seed: u64,
        config: &Arc<AgentConfig>,
        profiles: &Arc<ProfileSet>,
    ) -> Result<(), SimError> {
        let entity_id = u32::try_from(self.pets.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        let body = PetBody::new(
            AgentId::new(),
            entity_id,
            self.sites.spawn,
            self.world.dimension().clone(),
            Locomotion::Ground,
            seed.wrapping_add(u64::from(entity_id)),
        );
        let mut context = AgentWorkContext::new(&body, Arc::clone(config), Arc::clone(profiles));
        context.set_colony(Some(self.sites.colony));
        context.assign_trainer(Some(self.sites.trainer.clone()), &mut self.registry)?;
        self.pets.push(Pet {
            role,
            body,
            scheduler: PriorityScheduler::new(),
            context,
        });

        let idx = self.pets.len().saturating_sub(1);
        let site = self.sites.work_location(role);
        self.with_pet(idx, |ctx, host| ctx.set_work_location(site, host));
        debug!(entity_id, role = role.name(), ?site, "agent spawned");
        Ok(())
    }

    /// Run `f` with pet `idx` and the host services it ticks against.
    fn with_pet<R>(
        &mut self,
        idx: usize,
        f: impl FnOnce(&mut AgentWorkContext, &mut HostServices<'_>) -> R,
    ) -> Option<R> {
        let pet = self.pets.get_mut(idx)?;
        let mut host = HostServices {
            world: &mut self.world,
            body: &mut pet.body,
            scheduler: &mut pet.scheduler,
            loot: &self.loot,
            stats: &mut self.stats,
            registry: &mut self.registry,
        };
        Some(f(&mut pet.context, &mut host))
    }

    /// Advance the world and every live agent by one tick.
    pub fn step(&mut self) {
        self.world.tick();
        for idx in 0..self.pets.len() {
            let alive = self.pets.get(idx).is_some_and(|p| p.body.is_alive());
            if !alive {
                continue;
            }
            self.with_pet(idx, |ctx, host| ctx.tick(host));
            if let Some(pet) = self.pets.get_mut(idx) {
                pet.body.advance(&self.world);
            }
        }
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Run `ticks` ticks, logging progress every `report_every`.
    pub fn run(&mut self, ticks: u64, report_every: u64) -> RunSummary {
        info!(ticks, report_every, "Simulation starting");
        for _ in 0..ticks {
            self.step();
            if self.ticks.checked_rem(report_every) == Some(0) {
                info!(
                    tick = self.ticks,
                    night = self.world.is_night(),
                    items_scavenged = self.stats.total(&self.sites.trainer, ITEMS_SCAVENGED),
                    items_on_ground = self.world.item_count(),
                    "Progress"
                );
            }
        }
        self.summary()
    }

    /// Current state of the run.
    pub fn summary(&self) -> RunSummary {
        let agents = self
            .pets
            .iter()
            .map(|pet| AgentReport {
                id: pet.context.agent(),
                staffed_as: pet.role,
                registered_role: pet.context.registered_role(),
                registrations: pet.context.registrations(),
                carried: pet
                    .context
                    .work()
                    .store
                    .stacks()
                    .fold(0u32, |acc, s| acc.saturating_add(s.count)),
                alive: pet.body.is_alive(),
            })
            .collect();
        let containers = [
            Some(self.sites.trainer.position),
            self.sites.work_location(WorkRole::ScavengeWater),
            self.sites.work_location(WorkRole::ScavengeLand),
            self.sites.work_location(WorkRole::ScavengeVegetation),
            self.sites.work_location(WorkRole::Herding),
        ];
        let deposited = containers
            .into_iter()
            .flatten()
            .filter_map(|pos| self.world.container(pos))
            .flatten()
            .fold(0u32, |acc, s| acc.saturating_add(s.count));
        RunSummary {
            ticks: self.ticks,
            agents,
            items_scavenged: self.stats.total(&self.sites.trainer, ITEMS_SCAVENGED),
            deposited,
            items_on_ground: self.world.item_count(),
        }
    }

    /// Statistic rows recorded so far, as `(structure, stat, label, count)`.
    pub fn stat_rows(&self) -> Vec<(String, String, String, u64)> {
        self.stats
            .rows()
            .map(|(s, stat, label, n)| (s.to_string(), stat.to_owned(), label.to_owned(), n))
            .collect()
    }

    /// Persist every agent's work context.
    pub fn save_all(&self) -> Result<Vec<serde_json::Value>, SimError> {
        self.pets
            .iter()
            .map(|pet| pet.context.save().map_err(SimError::from))
            .collect()
    }

    /// Restore every agent's work context from `tags`, in spawn order.
    ///
    /// Extra tags are ignored; agents without a tag keep their state.
    pub fn load_all(&mut self, tags: &[serde_json::Value]) {
        if tags.len() != self.pets.len() {
            warn!(tags = tags.len(), agents = self.pets.len(), "tag count mismatch");
        }
        for (pet, tag) in self.pets.iter_mut().zip(tags) {
            pet.context.load(tag);
        }
    }

    /// Kill agent `idx` and take it out of the registry.
    pub fn remove(&mut self, idx: usize, reason: RemovalReason) -> bool {
        let Some(pet) = self.pets.get_mut(idx) else {
            return false;
        };
        pet.body.kill();
        pet.context
            .on_removal(reason, &self.world, &mut self.registry, &mut self.stats);
        true
    }

    /// The scene's named positions.
    pub const fn sites(&self) -> &SceneSites {
        &self.sites
    }

    /// The agent registry.
    pub const fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Registered `(priority, name)` pairs for agent `idx`.
    pub fn behaviors(&self, idx: usize) -> Vec<(u32, &'static str)> {
        self.pets
            .get(idx)
            .map(|pet| pet.scheduler.registered())
            .unwrap_or_default()
    }
}

impl AgentLookup for Simulation {
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

/// Log the end-of-run summary.
pub fn log_run_end(summary: &RunSummary) {
    info!(
        ticks = summary.ticks,
        agents = summary.agents.len(),
        items_scavenged = summary.items_scavenged,
        deposited = summary.deposited,
        items_on_ground = summary.items_on_ground,
        "Simulation ended"
    );
    for agent in &summary.agents {
        info!(
            agent = %agent.id,
            role = agent.staffed_as.name(),
            registered = agent.registered_role.map(WorkRole::name),
            registrations = agent.registrations,
            carried = agent.carried,
            alive = agent.alive,
            "Agent"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::scene::build_scene;

    fn small() -> Simulation {
        Simulation::new(&SimulationConfig::default(), build_scene()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected_before_spawning() {
        let config = SimulationConfig {
            report_every: 0,
            ..SimulationConfig::default()
        };
        let result = Simulation::new(&config, build_scene());
        assert!(matches!(result, Err(SimError::Config { .. })));
    }

    #[test]
    fn one_agent_per_role_all_queued_at_the_trainer() {
        let sim = small();
        assert_eq!(sim.pets.len(), STAFFED_ROLES.len());
        assert_eq!(sim.registry().queue_len(&sim.sites().trainer), 4);
        assert_eq!(sim.registry().agents_for(&sim.sites().trainer, &sim).len(), 4);
        assert_eq!(
            sim.registry()
                .agents_for_colony(sim.sites().colony, &sim)
                .len(),
            4
        );
    }

    #[test]
    fn scavengers_get_their_role_behavior() {
        let mut sim = small();
        sim.step();
        let expect = [
            (0, "scavenge_water"),
            (1, "scavenge_land"),
            (2, "scavenge_vegetation"),
        ];
        for (idx, name) in expect {
            let names: Vec<&str> = sim.behaviors(idx).into_iter().map(|(_, n)| n).collect();
            assert!(names.contains(&name), "{idx}: {names:?}");
            assert!(names.contains(&"return_to_trainer_at_night"));
        }
        let herder: Vec<&str> = sim.behaviors(3).into_iter().map(|(_, n)| n).collect();
        assert!(!herder.iter().any(|n| n.starts_with("scavenge_")));
    }

    #[test]
    fn registered_roles_match_staffing_after_a_step() {
        let mut sim = small();
        sim.step();
        let summary = sim.summary();
        for report in &summary.agents {
            assert_eq!(report.registered_role, Some(report.staffed_as));
            assert!(report.alive);
        }
        assert_eq!(summary.ticks, 1);
    }

    #[test]
    fn save_and_load_keep_queues_single() {
        let mut sim = small();
        sim.run(5, 1000);
        let tags = sim.save_all().unwrap();
        assert_eq!(tags.len(), 4);
        sim.load_all(&tags);
        sim.run(5, 1000);
        assert_eq!(sim.registry().queue_len(&sim.sites().trainer), 4);
    }

    #[test]
    fn removed_agent_leaves_the_queue_and_is_skipped() {
        let mut sim = small();
        assert!(sim.remove(0, RemovalReason::Killed));
        assert!(!sim.remove(42, RemovalReason::Killed));
        sim.run(3, 1000);
        let trainer = sim.sites().trainer.clone();
        assert_eq!(sim.registry().queue_len(&trainer), 3);
        assert_eq!(sim.registry().agents_for(&trainer, &sim).len(), 3);
        let rows = sim.stat_rows();
        assert!(
            rows.iter()
                .any(|(_, stat, label, n)| stat == "pets_died" && label == "SCAVENGE_WATER" && *n == 1)
        );
        assert!(!sim.summary().agents.first().unwrap().alive);
    }
}
