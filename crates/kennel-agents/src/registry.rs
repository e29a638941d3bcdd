//! Which agents train at which structure, and where a colony has put them
//! to work.
//!
//! The registry stores handles, never agents. A handle is re-hydrated
//! through an [`AgentLookup`] supplied by the host, so a handle whose agent
//! has been removed or whose dimension has unloaded simply stops resolving.

use std::collections::{BTreeMap, BTreeSet};

use kennel_types::{AgentId, BlockPos, ColonyId, DimensionId, StructureRef};
use kennel_world::{World, WorkRoleClassifier};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AgentError;

/// Value reference to an agent: identity plus where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentHandle {
    /// Stable identity.
    pub id: AgentId,
    /// Numeric entity id inside its dimension.
    pub entity_id: u32,
    /// Dimension the agent was last seen in, `None` while unloaded.
    pub dimension: Option<DimensionId>,
}

/// Host-side lookup of live agents.
pub trait AgentLookup {
    /// Live agent type.
    type Agent;

    /// Whether the dimension is loaded.
    fn dimension_exists(&self, dimension: &DimensionId) -> bool;

    /// Live, non-removed agent with this identity, if any.
    fn find(&self, dimension: &DimensionId, entity_id: u32, id: AgentId) -> Option<&Self::Agent>;
}

/// Per-structure agent queues and per-colony work locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentRegistry {
    queues: BTreeMap<StructureRef, Vec<AgentHandle>>,
    colony_structures: BTreeMap<ColonyId, BTreeSet<StructureRef>>,
    work_locations: BTreeMap<ColonyId, BTreeSet<BlockPos>>,
}

impl AgentRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            queues: BTreeMap::new(),
            colony_structures: BTreeMap::new(),
            work_locations: BTreeMap::new(),
        }
    }

    /// Add an agent to its trainer's queue.
    ///
    /// Returns whether the handle was inserted; an agent already queued is
    /// left as is. Fails when the agent has no trainer.
    pub fn register(
        &mut self,
        handle: AgentHandle,
        trainer: Option<&StructureRef>,
        colony: Option<ColonyId>,
    ) -> Result<bool, AgentError> {
        let trainer = trainer.ok_or(AgentError::MissingTrainer(handle.id))?;
        if let Some(colony) = colony {
            self.colony_structures
                .entry(colony)
                .or_default()
                .insert(trainer.clone());
        }
        let queue = self.queues.entry(trainer.clone()).or_default();
        if queue.iter().any(|h| h.id == handle.id) {
            return Ok(false);
        }
        info!(agent = %handle.id, %trainer, "agent registered");
        queue.push(handle);
        Ok(true)
    }

    /// Drop an agent from its trainer's queue. No-op without a trainer.
    pub fn unregister(&mut self, id: AgentId, trainer: Option<&StructureRef>) -> bool {
        let Some(trainer) = trainer else {
            debug!(agent = %id, "unregister without trainer");
            return false;
        };
        let Some(queue) = self.queues.get_mut(trainer) else {
            return false;
        };
        let before = queue.len();
        queue.retain(|h| h.id != id);
        let removed = queue.len() < before;
        if queue.is_empty() {
            self.queues.remove(trainer);
        }
        if removed {
            info!(agent = %id, %trainer, "agent unregistered");
        }
        removed
    }

    /// Whether the agent sits in its trainer's queue.
    pub fn is_registered(&self, id: AgentId, trainer: Option<&StructureRef>) -> bool {
        trainer
            .and_then(|t| self.queues.get(t))
            .is_some_and(|queue| queue.iter().any(|h| h.id == id))
    }

    /// Re-hydrate a handle into a live agent.
    pub fn resolve<'l, L: AgentLookup>(
        handle: &AgentHandle,
        lookup: &'l L,
    ) -> Option<&'l L::Agent> {
        let dimension = handle.dimension.as_ref()?;
        if !lookup.dimension_exists(dimension) {
            return None;
        }
        lookup.find(dimension, handle.entity_id, handle.id)
    }

    /// Handles queued at `structure` that still resolve.
    pub fn agents_for<L: AgentLookup>(
        &self,
        structure: &StructureRef,
        lookup: &L,
    ) -> Vec<AgentHandle> {
        self.queues
            .get(structure)
            .into_iter()
            .flatten()
            .filter(|h| Self::resolve(h, lookup).is_some())
            .cloned()
            .collect()
    }

    /// Live handles across every structure of a colony.
    pub fn agents_for_colony<L: AgentLookup>(
        &self,
        colony: ColonyId,
        lookup: &L,
    ) -> Vec<AgentHandle> {
        self.colony_structures
            .get(&colony)
            .into_iter()
            .flatten()
            .flat_map(|structure| self.agents_for(structure, lookup))
            .collect()
    }

    /// Remember `pos` as a work location of `colony`. Returns whether it was
    /// new.
    pub fn register_work_location(&mut self, colony: ColonyId, pos: BlockPos) -> bool {
        if pos.is_unset() {
            return false;
        }
        self.work_locations.entry(colony).or_default().insert(pos)
    }

    /// Forget one work location.
    pub fn unregister_work_location(&mut self, colony: ColonyId, pos: BlockPos) -> bool {
        self.work_locations
            .get_mut(&colony)
            .is_some_and(|set| set.remove(&pos))
    }

    /// Work locations of `colony` that still hold a valid structure.
    ///
    /// Positions that no longer classify to a role are pruned.
    pub fn work_locations(&mut self, colony: ColonyId, world: &dyn World) -> Vec<BlockPos> {
        let Some(set) = self.work_locations.get_mut(&colony) else {
            return Vec::new();
        };
        let classifier = WorkRoleClassifier;
        let before = set.len();
        set.retain(|pos| classifier.is_work_location(world, *pos));
        let pruned = before.saturating_sub(set.len());
        if pruned > 0 {
            debug!(%colony, pruned, "stale work locations pruned");
        }
        set.iter().copied().collect()
    }

    /// Drop everything kept for a colony that no longer exists.
    pub fn forget_colony(&mut self, colony: ColonyId) {
        self.work_locations.remove(&colony);
        self.colony_structures.remove(&colony);
    }

    /// Number of handles queued at `structure`, resolvable or not.
    pub fn queue_len(&self, structure: &StructureRef) -> usize {
        self.queues.get(structure).map_or(0, Vec::len)
    }

    /// Drop every queue and work location.
    pub fn clear(&mut self) {
        self.queues.clear();
        self.colony_structures.clear();
        self.work_locations.clear();
    }
}
