//! Carry a filling store back to the work location and empty it there.

use kennel_types::{BlockPos, ControlFlag, Vec3};
use rand::seq::SliceRandom;
use tracing::{debug, info};

use super::{Behavior, BehaviorContext, ControlFlags};
use crate::config::BaselineConfig;

/// Ticks without progress before a re-plan.
const STUCK_TICKS_LIMIT: u32 = 40;

/// Squared movement per tick below which the agent counts as stuck.
const PROGRESS_EPSILON_SQR: f64 = 0.0025;

/// Walk speed for the trip.
const SPEED: f64 = 1.1;

/// Unloads the item store into the container at the work location once
/// enough slots are occupied.
///
/// A trip re-plans a bounded number of times (first to the work location,
/// then to a shuffled ring around it), gives up after a timeout, and backs
/// off before the next attempt when it fails.
#[derive(Debug, Clone)]
pub struct UnloadInventoryBehavior {
    threshold: f32,
    reach_sqr: f64,
    max_replans: u32,
    timeout: u64,
    backoff: u64,
    target: Option<BlockPos>,
    ticks_running: u64,
    stuck_ticks: u32,
    replans: u32,
    last_pos: Vec3,
    done: bool,
    cooldown_until: u64,
}

impl UnloadInventoryBehavior {
    /// Build from baseline tunables.
    pub fn new(config: &BaselineConfig) -> Self {
        Self {
            threshold: config.unload_threshold,
            reach_sqr: config.unload_reach * config.unload_reach,
            max_replans: config.unload_max_repaths,
            timeout: config.unload_timeout_ticks,
            backoff: config.unload_backoff_ticks,
            target: None,
            ticks_running: 0,
            stuck_ticks: 0,
            replans: 0,
            last_pos: Vec3::default(),
            done: false,
            cooldown_until: 0,
        }
    }

    fn close_enough(&self, cx: &BehaviorContext<'_>, target: BlockPos) -> bool {
        cx.body.position().distance_sqr(target.center()) <= self.reach_sqr
    }

    fn plan_to(cx: &mut BehaviorContext<'_>, target: BlockPos) -> bool {
        if cx.body.position().distance_sqr(target.center()) < 1.0 {
            return true;
        }
        let from = cx.body.block_position();
        let nav = cx.body.navigator_mut();
        nav.move_to(&*cx.world, from, target.bottom_center(), SPEED) && nav.is_in_progress()
    }

    fn replan(&mut self, cx: &mut BehaviorContext<'_>, target: BlockPos) -> bool {
        if self.replans >= self.max_replans {
            return false;
        }
        self.replans = self.replans.saturating_add(1);
        if Self::plan_to(cx, target) {
            return true;
        }
        let mut ring = target.ring8();
        ring.shuffle(cx.body.rng());
        ring.into_iter().any(|c| Self::plan_to(cx, c))
    }

    fn give_up(&mut self, cx: &BehaviorContext<'_>) {
        self.cooldown_until = cx.now().saturating_add(self.backoff);
        self.done = true;
        debug!(agent = %cx.body.id(), "unload trip abandoned");
    }

    fn unload(&mut self, cx: &mut BehaviorContext<'_>, target: BlockPos) {
        let mut moved = 0u32;
        let mut kept = Vec::new();
        for stack in cx.work.store.drain() {
            let offered = stack.count;
            match cx.world.deposit(target, stack.clone()) {
                Ok(rest) => {
                    moved = moved.saturating_add(offered.saturating_sub(rest.count));
                    if !rest.is_empty() {
                        kept.push(rest);
                    }
                }
                Err(err) => {
                    debug!(agent = %cx.body.id(), %err, "deposit refused");
                    kept.push(stack);
                }
            }
        }
        for stack in kept {
            let lost = cx.work.store.insert(stack);
            if !lost.is_empty() {
                cx.world.spawn_item(cx.body.position(), lost);
            }
        }
        if moved == 0 {
            self.give_up(cx);
            return;
        }
        info!(agent = %cx.body.id(), pos = %target, items = moved, "unloaded store");
        self.done = true;
    }
}

impl Behavior for UnloadInventoryBehavior {
    fn name(&self) -> &'static str {
        "unload_inventory"
    }

    fn flags(&self) -> ControlFlags {
        ControlFlags::of(ControlFlag::Move)
    }

    fn can_start(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        if cx.body.navigator().is_in_progress() || cx.now() < self.cooldown_until {
            return false;
        }
        cx.work.work_location().is_some() && cx.work.store.is_filled_to(self.threshold)
    }

    fn can_continue(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        !self.done
            && self.ticks_running <= self.timeout
            && (cx.body.navigator().is_in_progress() || self.close_enough(cx, target))
    }

    fn start(&mut self, cx: &mut BehaviorContext<'_>) {
        self.target = cx.work.work_location();
        self.ticks_running = 0;
        self.stuck_ticks = 0;
        self.replans = 0;
        self.done = false;
        self.last_pos = cx.body.position();
        if let Some(target) = self.target {
            Self::plan_to(cx, target);
        }
    }

    fn tick(&mut self, cx: &mut BehaviorContext<'_>) {
        let Some(target) = self.target else {
            return;
        };
        self.ticks_running = self.ticks_running.saturating_add(1);
        let now = cx.body.position();
        if now.distance_sqr(self.last_pos) <= PROGRESS_EPSILON_SQR {
            self.stuck_ticks = self.stuck_ticks.saturating_add(1);
        } else {
            self.stuck_ticks = 0;
            self.last_pos = now;
        }

        if self.close_enough(cx, target) {
            self.unload(cx, target);
            return;
        }
        let lost_path = !cx.body.navigator().is_in_progress();
        if (lost_path || self.stuck_ticks > STUCK_TICKS_LIMIT) && !self.replan(cx, target) {
            self.give_up(cx);
            return;
        }
        if self.stuck_ticks > STUCK_TICKS_LIMIT {
            self.stuck_ticks = 0;
        }
        if self.ticks_running > self.timeout {
            self.give_up(cx);
        }
    }

    fn stop(&mut self, cx: &mut BehaviorContext<'_>) {
        self.target = None;
        self.done = false;
        self.ticks_running = 0;
        self.stuck_ticks = 0;
        self.replans = 0;
        cx.body.navigator_mut().stop();
    }
}
