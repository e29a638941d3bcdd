//! Go home to the trainer structure once per night.

use kennel_types::{BlockPos, ControlFlag};
use kennel_world::DAY_LENGTH;
use tracing::debug;

use super::{Behavior, BehaviorContext, ControlFlags};
use crate::config::BaselineConfig;

/// Walks to the trainer structure at nightfall.
///
/// Completion is stamped into [`WorkState::last_night_cycle`], which is
/// persisted, so a reload mid-night does not send the agent home twice.
///
/// [`WorkState::last_night_cycle`]: crate::work::WorkState::last_night_cycle
#[derive(Debug, Clone)]
pub struct ReturnToTrainerAtNightBehavior {
    start_distance: f64,
    arrive_distance: f64,
    repath_ticks: u64,
    arrived: bool,
    last_move: Option<u64>,
}

impl ReturnToTrainerAtNightBehavior {
    /// Build from baseline tunables.
    pub fn new(config: &BaselineConfig) -> Self {
        Self {
            start_distance: config.night_start_distance,
            arrive_distance: config.night_arrive_distance,
            repath_ticks: config.night_repath_ticks,
            arrived: false,
            last_move: None,
        }
    }

    fn home(cx: &BehaviorContext<'_>) -> Option<BlockPos> {
        let trainer = cx.work.trainer.as_ref()?;
        (&trainer.dimension == cx.world.dimension() && cx.world.is_loaded(trainer.position))
            .then_some(trainer.position)
    }

    fn cycle(cx: &BehaviorContext<'_>) -> u64 {
        cx.world.game_time().checked_div(DAY_LENGTH).unwrap_or(0)
    }

    fn is_near(cx: &BehaviorContext<'_>, home: BlockPos, radius: f64) -> bool {
        cx.body
            .block_position()
            .is_closer_to_center_than(home.center(), radius)
    }

    fn issue_move(&mut self, cx: &mut BehaviorContext<'_>, home: BlockPos) {
        let from = cx.body.block_position();
        cx.body
            .navigator_mut()
            .move_to(&*cx.world, from, home.bottom_center(), 1.0);
        self.last_move = Some(cx.now());
    }
}

impl Behavior for ReturnToTrainerAtNightBehavior {
    fn name(&self) -> &'static str {
        "return_to_trainer_at_night"
    }

    fn flags(&self) -> ControlFlags {
        ControlFlags::of(ControlFlag::Move)
    }

    fn can_start(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        if !cx.body.is_alive() || !cx.world.is_night() {
            return false;
        }
        let Some(home) = Self::home(cx) else {
            return false;
        };
        let cycle = Self::cycle(cx);
        if cx.work.last_night_cycle == Some(cycle) {
            return false;
        }
        if Self::is_near(cx, home, self.start_distance) {
            cx.work.last_night_cycle = Some(cycle);
            return false;
        }
        true
    }

    fn can_continue(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        cx.body.is_alive() && Self::home(cx).is_some() && !self.arrived && cx.world.is_night()
    }

    fn start(&mut self, cx: &mut BehaviorContext<'_>) {
        self.arrived = false;
        if let Some(home) = Self::home(cx) {
            self.issue_move(cx, home);
        }
    }

    fn tick(&mut self, cx: &mut BehaviorContext<'_>) {
        let Some(home) = Self::home(cx) else {
            return;
        };
        if Self::is_near(cx, home, self.arrive_distance) {
            self.arrived = true;
            cx.work.last_night_cycle = Some(Self::cycle(cx));
            cx.body.navigator_mut().stop();
            debug!(agent = %cx.body.id(), pos = %home, "home for the night");
            return;
        }
        let now = cx.now();
        let ready = self
            .last_move
            .is_none_or(|t| now.saturating_sub(t) >= self.repath_ticks);
        if ready && cx.body.navigator().is_done() {
            self.issue_move(cx, home);
        }
    }

    fn stop(&mut self, _cx: &mut BehaviorContext<'_>) {
        self.arrived = false;
    }
}
