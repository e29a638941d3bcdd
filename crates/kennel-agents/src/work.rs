//! Cross-session work assignment of one agent.

use kennel_types::{BlockPos, ColonyId, StructureRef, WorkRole};
use kennel_world::{World, classify};

use crate::inventory::ItemStore;

/// Who the agent works for, where, and what it carries.
///
/// The role is never stored here: [`WorkState::role`] derives it from the
/// work location every time it is asked.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkState {
    /// Owning colony, if known.
    pub colony: Option<ColonyId>,
    /// Structure the agent is registered to.
    pub trainer: Option<StructureRef>,
    work_location: Option<BlockPos>,
    /// Carried items.
    pub store: ItemStore,
    /// Night cycle of the last completed return to the trainer.
    pub last_night_cycle: Option<u64>,
}

impl WorkState {
    /// Unassigned state with an empty store.
    pub fn new(store_slots: usize) -> Self {
        Self {
            colony: None,
            trainer: None,
            work_location: None,
            store: ItemStore::new(store_slots),
            last_night_cycle: None,
        }
    }

    /// Assigned work location. The unset sentinel reads as `None`.
    pub const fn work_location(&self) -> Option<BlockPos> {
        self.work_location
    }

    /// Replace the work location. Returns whether the value changed.
    pub(crate) fn replace_work_location(&mut self, pos: Option<BlockPos>) -> bool {
        let pos = pos.filter(|p| !p.is_unset());
        if pos == self.work_location {
            return false;
        }
        self.work_location = pos;
        true
    }

    /// Role derived from whatever occupies the work location right now.
    pub fn role(&self, world: &dyn World) -> WorkRole {
        self.work_location
            .map_or(WorkRole::None, |pos| classify(world, pos))
    }
}
