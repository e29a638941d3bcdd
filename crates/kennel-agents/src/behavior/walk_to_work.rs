//! Daytime leash back to the work location.

use kennel_types::{BlockPos, ControlFlag};

use super::{Behavior, BehaviorContext, ControlFlags};
use crate::config::BaselineConfig;

/// Walks back to the work location during the day once the agent strays
/// past the leash distance.
#[derive(Debug, Clone)]
pub struct WalkToWorkBehavior {
    leash_sqr: f64,
    stop_sqr: f64,
    speed: f64,
}

impl WalkToWorkBehavior {
    /// Build from baseline tunables.
    pub fn new(config: &BaselineConfig) -> Self {
        Self {
            leash_sqr: config.work_leash * config.work_leash,
            stop_sqr: config.work_stop_distance * config.work_stop_distance,
            speed: config.work_walk_speed,
        }
    }

    fn distance_sqr(cx: &BehaviorContext<'_>, work: BlockPos) -> f64 {
        cx.body.position().distance_sqr(work.center())
    }
}

impl Behavior for WalkToWorkBehavior {
    fn name(&self) -> &'static str {
        "walk_to_work"
    }

    fn flags(&self) -> ControlFlags {
        ControlFlags::of(ControlFlag::Move)
    }

    fn can_start(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        let Some(work) = cx.work.work_location() else {
            return false;
        };
        !cx.world.is_night() && Self::distance_sqr(cx, work) > self.leash_sqr
    }

    fn can_continue(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        let Some(work) = cx.work.work_location() else {
            return false;
        };
        Self::distance_sqr(cx, work) > self.stop_sqr && !cx.body.navigator().is_done()
    }

    fn start(&mut self, cx: &mut BehaviorContext<'_>) {
        if let Some(work) = cx.work.work_location() {
            let from = cx.body.block_position();
            cx.body
                .navigator_mut()
                .move_to(&*cx.world, from, work.bottom_center(), self.speed);
        }
    }

    fn stop(&mut self, cx: &mut BehaviorContext<'_>) {
        cx.body.navigator_mut().stop();
    }
}
