//! Per-agent work context: assignment, behavior registration, the stall
//! watchdog, and persistence.
//!
//! The host owns the agent's body and behavior scheduler and hands both in,
//! together with the shared services, as [`HostServices`] on every call.
//! The context owns everything that must survive a save: identity, colony,
//! trainer, work location, and the item store.
//!
//! Behaviors are rebuilt from scratch whenever the role derived from the
//! work location differs from the role they were built for, when the work
//! location or trainer is changed, and when the watchdog gives up on a
//! stalled agent.

use std::sync::Arc;

use kennel_types::{
    AgentId, BlockPos, ColonyId, DimensionId, ItemStack, RemovalReason, StructureRef, WorkRole,
};
use kennel_world::{LootResolver, StatsTracker, World};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::behavior::{
    BehaviorContext, BehaviorScheduler, ControlFlags, EatFromInventoryBehavior, FloatBehavior,
    OpenDoorBehavior, ReturnToTrainerAtNightBehavior, UnloadInventoryBehavior,
    WalkToWorkBehavior,
};
use crate::body::AgentBody;
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::registry::{AgentHandle, AgentRegistry};
use crate::scavenge::ProfileSet;
use crate::watchdog::{ActivitySignals, Watchdog, WatchdogAction};
use crate::work::WorkState;

/// Behavior priorities. Lower runs first.
mod priority {
    pub const FLOAT: u32 = 1;
    pub const DOOR: u32 = 2;
    pub const UNLOAD: u32 = 3;
    pub const WALK_TO_WORK: u32 = 5;
    pub const EAT: u32 = 6;
    pub const ROLE: u32 = 7;
    pub const NIGHT: u32 = 30;
}

/// Host collaborators for one call into the context.
pub struct HostServices<'a> {
    /// The world the agent is in.
    pub world: &'a mut dyn World,
    /// The agent's body.
    pub body: &'a mut dyn AgentBody,
    /// The agent's behavior scheduler.
    pub scheduler: &'a mut dyn BehaviorScheduler,
    /// Loot tables.
    pub loot: &'a dyn LootResolver,
    /// Structure statistics.
    pub stats: &'a mut dyn StatsTracker,
    /// Shared agent registry.
    pub registry: &'a mut AgentRegistry,
}

impl HostServices<'_> {
    fn split<'s>(
        &'s mut self,
        work: &'s mut WorkState,
    ) -> (BehaviorContext<'s>, &'s mut dyn BehaviorScheduler) {
        (
            BehaviorContext {
                world: &mut *self.world,
                body: &mut *self.body,
                work,
                loot: self.loot,
                stats: &mut *self.stats,
            },
            &mut *self.scheduler,
        )
    }
}

/// Persisted form of a context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentTag {
    uuid: AgentId,
    entity_id: u32,
    #[serde(default)]
    colony_id: Option<ColonyId>,
    #[serde(default)]
    trainer: Option<StructureRef>,
    #[serde(default)]
    work_location: Option<BlockPos>,
    #[serde(default)]
    role: WorkRole,
    #[serde(default)]
    inventory: Vec<ItemStack>,
    #[serde(default)]
    last_night_cycle: Option<u64>,
}

/// Everything one agent carries between ticks and across saves.
pub struct AgentWorkContext {
    agent: AgentId,
    entity_id: u32,
    dimension: Option<DimensionId>,
    work: WorkState,
    config: Arc<AgentConfig>,
    profiles: Arc<ProfileSet>,
    watchdog: Watchdog,
    goals_initialized: bool,
    registered_role: Option<WorkRole>,
    persisted_role: WorkRole,
    pending_inventory: Option<Vec<ItemStack>>,
    registrations: u32,
    needs_registry_sync: bool,
}

impl core::fmt::Debug for AgentWorkContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AgentWorkContext")
            .field("agent", &self.agent)
            .field("entity_id", &self.entity_id)
            .field("dimension", &self.dimension)
            .field("work", &self.work)
            .field("registered_role", &self.registered_role)
            .field("registrations", &self.registrations)
            .finish_non_exhaustive()
    }
}

impl AgentWorkContext {
    /// Fresh, unassigned context for `body`.
    pub fn new(body: &dyn AgentBody, config: Arc<AgentConfig>, profiles: Arc<ProfileSet>) -> Self {
        Self {
            agent: body.id(),
            entity_id: body.entity_id(),
            dimension: body.dimension().cloned(),
            work: WorkState::new(config.store_slots),
            watchdog: Watchdog::new(config.watchdog.clone()),
            config,
            profiles,
            goals_initialized: false,
            registered_role: None,
            persisted_role: WorkRole::None,
            pending_inventory: None,
            registrations: 0,
            needs_registry_sync: false,
        }
    }

    /// Stable identity.
    pub const fn agent(&self) -> AgentId {
        self.agent
    }

    /// Assignment and store.
    pub const fn work(&self) -> &WorkState {
        &self.work
    }

    /// Role the current behaviors were built for.
    pub const fn registered_role(&self) -> Option<WorkRole> {
        self.registered_role
    }

    /// Role read from the last loaded tag.
    pub const fn persisted_role(&self) -> WorkRole {
        self.persisted_role
    }

    /// Full behavior registrations so far.
    pub const fn registrations(&self) -> u32 {
        self.registrations
    }

    /// Stacks still waiting for a world to be restored into.
    pub fn pending_inventory(&self) -> Option<&[ItemStack]> {
        self.pending_inventory.as_deref()
    }

    /// The watchdog.
    pub const fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }

    /// Role derived from the work location right now.
    pub fn role(&self, world: &dyn World) -> WorkRole {
        self.work.role(world)
    }

    /// Registry handle for this agent.
    pub fn handle(&self) -> AgentHandle {
        AgentHandle {
            id: self.agent,
            entity_id: self.entity_id,
            dimension: self.dimension.clone(),
        }
    }

    /// Set the owning colony.
    pub const fn set_colony(&mut self, colony: Option<ColonyId>) {
        self.work.colony = colony;
    }

    /// Advance one tick.
    ///
    /// Nothing below this call escapes as an error: failures are logged and
    /// the agent carries on.
    pub fn tick(&mut self, host: &mut HostServices<'_>) {
        self.dimension = host.body.dimension().cloned();
        if self.dimension.as_ref() != Some(host.world.dimension()) {
            return;
        }

        self.apply_pending_inventory(host);
        if self.needs_registry_sync {
            self.sync_registry(host.registry);
        }

        let role = self.work.role(&*host.world);
        if !self.goals_initialized || self.registered_role != Some(role) {
            self.register_behaviors(host, role);
        }

        {
            let (mut cx, scheduler) = host.split(&mut self.work);
            scheduler.tick(&mut cx);
        }

        let scheduler = &*host.scheduler;
        let body = &*host.body;
        let action = self.watchdog.tick(|| ActivitySignals {
            behavior_running: scheduler.running_count() > 0,
            navigating: body.navigator().is_in_progress(),
            moving: body.is_moving(),
            attacking: body.has_attack_target(),
            free_to_act: body.is_free_to_act() && !body.is_ai_disabled(),
        });
        match action {
            Some(WatchdogAction::EnableControlFlags) => {
                host.scheduler
                    .set_control_flags_enabled(ControlFlags::ALL, true);
            }
            Some(WatchdogAction::StopNavigation) => host.body.navigator_mut().stop(),
            Some(WatchdogAction::Reregister) => {
                let role = self.work.role(&*host.world);
                self.register_behaviors(host, role);
            }
            None => {}
        }
    }

    /// Tear down every behavior and register the set for `role`.
    pub fn register_behaviors(&mut self, host: &mut HostServices<'_>, role: WorkRole) {
        let baseline = &self.config.baseline;
        let (mut cx, scheduler) = host.split(&mut self.work);
        scheduler.set_control_flags_enabled(ControlFlags::ALL, true);
        cx.body.navigator_mut().stop();
        scheduler.clear(&mut cx);

        scheduler.add(priority::FLOAT, Box::new(FloatBehavior));
        scheduler.add(
            priority::DOOR,
            Box::new(OpenDoorBehavior::new(baseline.door_close_delay)),
        );
        scheduler.add(priority::UNLOAD, Box::new(UnloadInventoryBehavior::new(baseline)));
        if cx.work.work_location().is_some() {
            scheduler.add(priority::WALK_TO_WORK, Box::new(WalkToWorkBehavior::new(baseline)));
        }
        scheduler.add(priority::EAT, Box::new(EatFromInventoryBehavior::new(baseline)));
        if let Some(engine) = self.profiles.engine_for(role) {
            scheduler.add(priority::ROLE, Box::new(engine));
        }
        if cx.work.trainer.is_some() {
            scheduler.add(
                priority::NIGHT,
                Box::new(ReturnToTrainerAtNightBehavior::new(baseline)),
            );
        }
        let behaviors = scheduler.registered().len();

        self.registrations = self.registrations.saturating_add(1);
        self.registered_role = Some(role);
        self.goals_initialized = true;
        self.watchdog.start_grace();
        info!(
            agent = %self.agent,
            role = role.name(),
            behaviors,
            registrations = self.registrations,
            "behaviors registered"
        );
    }

    /// Assign a work location.
    ///
    /// A change registers the location with the colony and rebuilds the
    /// behaviors once. Returns whether the location changed.
    pub fn set_work_location(&mut self, pos: Option<BlockPos>, host: &mut HostServices<'_>) -> bool {
        if !self.work.replace_work_location(pos) {
            return false;
        }
        match (self.work.colony, self.work.work_location()) {
            (Some(colony), Some(pos)) => {
                host.registry.register_work_location(colony, pos);
            }
            (None, Some(pos)) => debug!(agent = %self.agent, %pos, "work location without colony"),
            (_, None) => {}
        }
        let role = self.work.role(&*host.world);
        self.register_behaviors(host, role);
        true
    }

    /// Assign a trainer structure and queue the agent there.
    ///
    /// The agent leaves its previous trainer's queue first. Returns whether
    /// a new queue entry was made.
    pub fn assign_trainer(
        &mut self,
        trainer: Option<StructureRef>,
        registry: &mut AgentRegistry,
    ) -> Result<bool, AgentError> {
        if trainer == self.work.trainer {
            return Ok(false);
        }
        registry.unregister(self.agent, self.work.trainer.as_ref());
        self.work.trainer = trainer;
        // The night return is only registered while a trainer is set.
        self.goals_initialized = false;
        if self.work.trainer.is_none() {
            return Ok(false);
        }
        registry.register(self.handle(), self.work.trainer.as_ref(), self.work.colony)
    }

    /// Leave the registry and record why the agent is gone.
    pub fn on_removal(
        &self,
        reason: RemovalReason,
        world: &dyn World,
        registry: &mut AgentRegistry,
        stats: &mut dyn StatsTracker,
    ) {
        let role = self.work.role(world);
        registry.unregister(self.agent, self.work.trainer.as_ref());
        match self.work.trainer.as_ref() {
            Some(trainer) => stats.track(trainer, reason.stat_name(), role.name(), 1),
            None => debug!(agent = %self.agent, ?reason, "removed without trainer"),
        }
        info!(agent = %self.agent, ?reason, "agent removed");
    }

    /// Persist the context.
    pub fn save(&self) -> Result<serde_json::Value, AgentError> {
        let mut inventory: Vec<ItemStack> = self.work.store.stacks().cloned().collect();
        if let Some(pending) = &self.pending_inventory {
            inventory.extend(pending.iter().cloned());
        }
        let tag = AgentTag {
            uuid: self.agent,
            entity_id: self.entity_id,
            colony_id: self.work.colony,
            trainer: self.work.trainer.clone(),
            work_location: self.work.work_location(),
            role: self.registered_role.unwrap_or(self.persisted_role),
            inventory,
            last_night_cycle: self.work.last_night_cycle,
        };
        serde_json::to_value(tag).map_err(|err| AgentError::TagEncode {
            reason: err.to_string(),
        })
    }

    /// Restore from a persisted tag.
    ///
    /// A malformed tag leaves an unassigned context. Stored items are held
    /// back until the first tick with a world.
    pub fn load(&mut self, tag: &serde_json::Value) {
        self.work = WorkState::new(self.config.store_slots);
        self.pending_inventory = None;
        self.persisted_role = WorkRole::None;
        self.goals_initialized = false;
        self.registered_role = None;

        let tag = match AgentTag::deserialize(tag) {
            Ok(tag) => tag,
            Err(err) => {
                let err = AgentError::MalformedTag {
                    reason: err.to_string(),
                };
                warn!(agent = %self.agent, %err, "persisted tag ignored");
                return;
            }
        };
        if tag.uuid != self.agent {
            debug!(body = %self.agent, persisted = %tag.uuid, "identity taken from tag");
        }
        self.agent = tag.uuid;
        self.entity_id = tag.entity_id;
        self.work.colony = tag.colony_id;
        self.work.trainer = tag.trainer;
        self.work.replace_work_location(tag.work_location);
        self.work.last_night_cycle = tag.last_night_cycle;
        self.persisted_role = tag.role;
        self.pending_inventory = (!tag.inventory.is_empty()).then_some(tag.inventory);
        self.needs_registry_sync = true;
    }

    fn apply_pending_inventory(&mut self, host: &mut HostServices<'_>) {
        let Some(stacks) = self.pending_inventory.take() else {
            return;
        };
        let count = stacks.len();
        match self.work.store.restore(stacks.clone()) {
            Ok(()) => debug!(agent = %self.agent, stacks = count, "inventory restored"),
            Err(err) => {
                warn!(agent = %self.agent, %err, "inventory restored partially");
                let at = host.body.position();
                for stack in stacks {
                    let rest = self.work.store.insert(stack);
                    if !rest.is_empty() {
                        host.world.spawn_item(at, rest);
                    }
                }
            }
        }
    }

    fn sync_registry(&mut self, registry: &mut AgentRegistry) {
        self.needs_registry_sync = false;
        if let (Some(colony), Some(pos)) = (self.work.colony, self.work.work_location()) {
            registry.register_work_location(colony, pos);
        }
        if self.work.trainer.is_none() {
            return;
        }
        if let Err(err) = registry.register(self.handle(), self.work.trainer.as_ref(), self.work.colony) {
            warn!(agent = %self.agent, %err, "registry sync failed");
        }
    }
}
