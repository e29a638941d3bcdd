//! Priority-ordered behavior arbitration.
//!
//! Lower priority numbers win. Every tick the scheduler:
//!
//! 1. stops running behaviors that cannot continue or hold a disabled flag,
//! 2. starts idle behaviors whose flags are free, or held only by
//!    interruptible behaviors with a strictly larger priority number (those
//!    holders are stopped first),
//! 3. ticks everything that is running.

use tracing::debug;

use super::{Behavior, BehaviorContext, ControlFlags};

/// Host scheduler contract used by the work context.
pub trait BehaviorScheduler {
    /// Register a behavior at `priority`.
    fn add(&mut self, priority: u32, behavior: Box<dyn Behavior>);

    /// Stop every running behavior, then drop all registrations.
    fn clear(&mut self, cx: &mut BehaviorContext<'_>);

    /// Whether a behavior with this name is running.
    fn is_running(&self, name: &str) -> bool;

    /// Number of running behaviors.
    fn running_count(&self) -> usize;

    /// Registered `(priority, name)` pairs in priority order.
    fn registered(&self) -> Vec<(u32, &'static str)>;

    /// Enable or disable control flags.
    fn set_control_flags_enabled(&mut self, flags: ControlFlags, enabled: bool);

    /// Advance arbitration and running behaviors by one tick.
    fn tick(&mut self, cx: &mut BehaviorContext<'_>);
}

struct Slot {
    priority: u32,
    behavior: Box<dyn Behavior>,
    running: bool,
}

/// Goal-selector style scheduler.
#[derive(Default)]
pub struct PriorityScheduler {
    slots: Vec<Slot>,
    disabled: ControlFlags,
}

impl PriorityScheduler {
    /// Create an empty scheduler with every flag enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags currently disabled.
    pub const fn disabled_flags(&self) -> ControlFlags {
        self.disabled
    }

    fn can_claim(&self, priority: u32, flags: ControlFlags) -> bool {
        self.slots
            .iter()
            .filter(|o| o.running && o.behavior.flags().intersects(flags))
            .all(|o| o.priority > priority && o.behavior.is_interruptible())
    }
}

impl core::fmt::Debug for PriorityScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PriorityScheduler")
            .field("registered", &self.registered())
            .field("disabled", &self.disabled)
            .finish()
    }
}

impl BehaviorScheduler for PriorityScheduler {
    fn add(&mut self, priority: u32, behavior: Box<dyn Behavior>) {
        let at = self.slots.partition_point(|s| s.priority <= priority);
        self.slots.insert(
            at,
            Slot {
                priority,
                behavior,
                running: false,
            },
        );
    }

    fn clear(&mut self, cx: &mut BehaviorContext<'_>) {
        for slot in self.slots.iter_mut().filter(|s| s.running) {
            slot.behavior.stop(cx);
            slot.running = false;
        }
        self.slots.clear();
    }

    fn is_running(&self, name: &str) -> bool {
        self.slots
            .iter()
            .any(|s| s.running && s.behavior.name() == name)
    }

    fn running_count(&self) -> usize {
        self.slots.iter().filter(|s| s.running).count()
    }

    fn registered(&self) -> Vec<(u32, &'static str)> {
        self.slots
            .iter()
            .map(|s| (s.priority, s.behavior.name()))
            .collect()
    }

    fn set_control_flags_enabled(&mut self, flags: ControlFlags, enabled: bool) {
        for flag in flags.iter() {
            self.disabled = if enabled {
                self.disabled.without(flag)
            } else {
                self.disabled.with(flag)
            };
        }
    }

    fn tick(&mut self, cx: &mut BehaviorContext<'_>) {
        let disabled = self.disabled;
        for slot in self.slots.iter_mut().filter(|s| s.running) {
            if slot.behavior.flags().intersects(disabled) || !slot.behavior.can_continue(cx) {
                slot.behavior.stop(cx);
                slot.running = false;
                debug!(behavior = slot.behavior.name(), "behavior finished");
            }
        }

        for idx in 0..self.slots.len() {
            let Some(slot) = self.slots.get(idx) else {
                continue;
            };
            if slot.running {
                continue;
            }
            let priority = slot.priority;
            let flags = slot.behavior.flags();
            if flags.intersects(disabled) || !self.can_claim(priority, flags) {
                continue;
            }
            let Some(slot) = self.slots.get_mut(idx) else {
                continue;
            };
            if !slot.behavior.can_start(cx) {
                continue;
            }
            for holder in self
                .slots
                .iter_mut()
                .filter(|o| o.running && o.behavior.flags().intersects(flags))
            {
                holder.behavior.stop(cx);
                holder.running = false;
                debug!(behavior = holder.behavior.name(), "behavior preempted");
            }
            if let Some(slot) = self.slots.get_mut(idx) {
                slot.behavior.start(cx);
                slot.running = true;
                debug!(behavior = slot.behavior.name(), priority, "behavior started");
            }
        }

        for slot in self.slots.iter_mut().filter(|s| s.running) {
            slot.behavior.tick(cx);
        }
    }
}
