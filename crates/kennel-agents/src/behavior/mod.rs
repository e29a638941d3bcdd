//! Behaviors and the scheduler that arbitrates between them.
//!
//! A [`Behavior`] is a small state machine the scheduler starts, ticks, and
//! stops. Each one claims a set of [`ControlFlag`]s while it runs; two
//! running behaviors never hold the same flag. The scheduler lives in
//! [`scheduler`]; the fixed baseline set every agent carries lives in the
//! sibling modules.

pub mod door;
pub mod eat;
pub mod float;
pub mod night;
pub mod scheduler;
pub mod unload;
pub mod walk_to_work;

use kennel_types::{BlockPos, ControlFlag, WorkRole};
use kennel_world::{LootResolver, StatsTracker, World};

use crate::body::AgentBody;
use crate::work::WorkState;

pub use door::OpenDoorBehavior;
pub use eat::EatFromInventoryBehavior;
pub use float::FloatBehavior;
pub use night::ReturnToTrainerAtNightBehavior;
pub use scheduler::{BehaviorScheduler, PriorityScheduler};
pub use unload::UnloadInventoryBehavior;
pub use walk_to_work::WalkToWorkBehavior;

/// Set of [`ControlFlag`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ControlFlags(u8);

impl ControlFlags {
    /// No flags.
    pub const NONE: Self = Self(0);

    /// Every flag.
    pub const ALL: Self = Self(0b1111);

    /// Set holding exactly `flag`.
    pub const fn of(flag: ControlFlag) -> Self {
        Self(flag.bit())
    }

    /// Set plus `flag`.
    #[must_use]
    pub const fn with(self, flag: ControlFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    /// Set minus `flag`.
    #[must_use]
    pub const fn without(self, flag: ControlFlag) -> Self {
        Self(self.0 & !flag.bit())
    }

    /// Whether `flag` is in the set.
    pub const fn contains(self, flag: ControlFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Whether the sets share a flag.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The flags in the set.
    pub fn iter(self) -> impl Iterator<Item = ControlFlag> {
        ControlFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

/// Everything a behavior may touch during one call.
pub struct BehaviorContext<'a> {
    /// The world the agent is in.
    pub world: &'a mut dyn World,
    /// The agent's body.
    pub body: &'a mut dyn AgentBody,
    /// The agent's assignment and store.
    pub work: &'a mut WorkState,
    /// Loot tables.
    pub loot: &'a dyn LootResolver,
    /// Structure statistics.
    pub stats: &'a mut dyn StatsTracker,
}

impl BehaviorContext<'_> {
    /// Current game time.
    pub fn now(&self) -> u64 {
        self.world.game_time()
    }

    /// Role derived from the work location this tick.
    pub fn role(&self) -> WorkRole {
        self.work.role(&*self.world)
    }

    /// The agent's current block.
    pub fn block_position(&self) -> BlockPos {
        self.body.block_position()
    }
}

/// A schedulable unit of agent behavior.
///
/// The scheduler calls [`can_start`](Behavior::can_start) on idle behaviors
/// and [`can_continue`](Behavior::can_continue) on running ones every tick.
/// [`stop`](Behavior::stop) is called exactly once per run, whether the run
/// ended on its own or was preempted.
pub trait Behavior {
    /// Short name for logs and queries.
    fn name(&self) -> &'static str;

    /// Control flags claimed while running.
    fn flags(&self) -> ControlFlags;

    /// Whether a new run may begin now.
    fn can_start(&mut self, cx: &mut BehaviorContext<'_>) -> bool;

    /// Whether the current run should go on.
    fn can_continue(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        self.can_start(cx)
    }

    /// Begin a run.
    fn start(&mut self, _cx: &mut BehaviorContext<'_>) {}

    /// Advance a running behavior by one tick.
    fn tick(&mut self, _cx: &mut BehaviorContext<'_>) {}

    /// End a run.
    fn stop(&mut self, _cx: &mut BehaviorContext<'_>) {}

    /// Whether a higher-priority behavior may take its flags.
    fn is_interruptible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_sets_compose() {
        let move_look = ControlFlags::of(ControlFlag::Move).with(ControlFlag::Look);
        assert!(move_look.contains(ControlFlag::Look));
        assert!(!move_look.contains(ControlFlag::Jump));
        assert!(move_look.intersects(ControlFlags::of(ControlFlag::Move)));
        assert!(!move_look.intersects(ControlFlags::of(ControlFlag::Target)));
        assert_eq!(move_look.without(ControlFlag::Move), ControlFlags::of(ControlFlag::Look));
        assert_eq!(ControlFlags::ALL.iter().count(), 4);
        assert!(ControlFlags::NONE.is_empty());
    }
}
