//! The resumable scavenging state machine.
//!
//! One engine drives one agent through gate check, search, approach,
//! harvest rolls and reset, with a [`TerrainProfile`] supplying everything
//! terrain-specific. The engine is a [`Behavior`]: the scheduler starts,
//! ticks and stops it, and a stop that lands mid-approach pauses the run
//! instead of discarding it.

use std::sync::Arc;

use kennel_types::{Aabb, BlockPos, ControlFlag, Vec3};
use rand::Rng;
use tracing::{debug, info, warn};

use super::pathing::flexible_pathing;
use super::profile::TerrainProfile;
use crate::behavior::{Behavior, BehaviorContext, ControlFlags};
use crate::config::EngineTuning;

/// Statistic recorded on the trainer for every harvested item.
pub const ITEMS_SCAVENGED: &str = "items_scavenged";

/// Speed of the nudge back toward the anchor after drifting off it.
const DRIFT_SPEED: f64 = 0.3;

/// Re-issued approaches forfeit a try on one tick in this many.
const REISSUE_PENALTY_PERIOD: u64 = 5;

/// Reach beyond the target block swept for loose items.
const SWEEP_INFLATE: f64 = 1.0;

/// Scavenging behavior for one agent and one profile.
pub struct ScavengeEngine {
    profile: Arc<dyn TerrainProfile>,
    tuning: EngineTuning,
    target: Option<BlockPos>,
    anchor: Option<BlockPos>,
    last_start_target: Option<BlockPos>,
    arrived: bool,
    tries: u32,
    last_scavenge: Option<u64>,
    next_gate: Option<u64>,
    resume_until: Option<u64>,
    last_sample: Option<BlockPos>,
    stuck: u32,
}

impl core::fmt::Debug for ScavengeEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScavengeEngine")
            .field("profile", &self.profile.name())
            .field("target", &self.target)
            .field("anchor", &self.anchor)
            .field("arrived", &self.arrived)
            .field("tries", &self.tries)
            .field("last_scavenge", &self.last_scavenge)
            .field("resume_until", &self.resume_until)
            .finish_non_exhaustive()
    }
}

impl ScavengeEngine {
    /// Idle engine. The first run is not held back by the cooldown.
    pub fn new(profile: Arc<dyn TerrainProfile>, tuning: EngineTuning) -> Self {
        let tries = tuning.max_search_tries;
        Self {
            profile,
            tuning,
            target: None,
            anchor: None,
            last_start_target: None,
            arrived: false,
            tries,
            last_scavenge: None,
            next_gate: None,
            resume_until: None,
            last_sample: None,
            stuck: 0,
        }
    }

    /// The profile this engine runs.
    pub fn profile(&self) -> &dyn TerrainProfile {
        &*self.profile
    }

    /// Active tuning.
    pub const fn tuning(&self) -> &EngineTuning {
        &self.tuning
    }

    /// Current harvest target.
    pub const fn target(&self) -> Option<BlockPos> {
        self.target
    }

    /// Cell navigated to for the current target.
    pub const fn anchor(&self) -> Option<BlockPos> {
        self.anchor
    }

    /// Whether the agent reached the anchor during this run.
    pub const fn has_arrived(&self) -> bool {
        self.arrived
    }

    /// Search tries left in this run.
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    /// Tick of the last reset, `None` before the first one.
    pub const fn last_scavenge(&self) -> Option<u64> {
        self.last_scavenge
    }

    /// Deadline for resuming a paused run.
    pub const fn resume_until(&self) -> Option<u64> {
        self.resume_until
    }

    fn is_resumable(&self) -> bool {
        self.target.is_some() && self.anchor.is_some() && self.tries > 0
    }

    fn cooling_down(&self, now: u64) -> bool {
        self.last_scavenge
            .is_some_and(|at| now.saturating_sub(at) < self.tuning.cooldown_ticks)
    }

    /// Jittered periodic gate. The first evaluation schedules an opening a
    /// few ticks out, derived from the entity id so a population spreads
    /// its searches; each opening schedules the next one a period later.
    fn periodic_gate_open(&mut self, now: u64, entity_id: u32) -> bool {
        let period = self.tuning.gate_period_ticks.max(1);
        let next = *self.next_gate.get_or_insert_with(|| {
            now.saturating_add(u64::from(entity_id).checked_rem(period).unwrap_or(0))
        });
        if now < next {
            return false;
        }
        self.next_gate = Some(now.saturating_add(period));
        true
    }

    fn goal_point(&self, anchor: BlockPos) -> Vec3 {
        anchor
            .bottom_center()
            .offset(0.0, self.profile.navigation_y_offset(), 0.0)
    }

    fn is_near(&self, cx: &BehaviorContext<'_>, anchor: BlockPos) -> bool {
        cx.block_position()
            .is_closer_to_center_than(anchor.center(), self.tuning.acceptance_radius)
    }

    /// Drop one try, resetting on the spot when none are left. Returns
    /// whether the run was reset.
    fn forfeit_try(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        self.tries = self.tries.saturating_sub(1);
        if self.tries == 0 {
            self.reset(cx);
            return true;
        }
        false
    }

    fn reset(&mut self, cx: &mut BehaviorContext<'_>) {
        if let Some(target) = self.target {
            debug!(agent = %cx.body.id(), %target, "scavenge run reset");
        }
        self.target = None;
        self.anchor = None;
        self.last_start_target = None;
        self.last_sample = None;
        self.arrived = false;
        self.stuck = 0;
        self.tries = self.tuning.max_search_tries;
        self.next_gate = None;
        self.resume_until = None;
        self.last_scavenge = Some(cx.now());
        cx.body.navigator_mut().stop();
    }

    /// Roll loot for `pos` and route the drops into the store.
    fn harvest(&self, cx: &mut BehaviorContext<'_>, pos: BlockPos) {
        let state = cx.world.block(pos).clone();
        if !self.profile.is_harvestable(&*cx.world, pos, &state) {
            debug!(agent = %cx.body.id(), %pos, "target no longer harvestable");
            return;
        }
        let Some(key) = self.profile.loot_key(&*cx.world, pos, &state) else {
            return;
        };
        let drops = cx.loot.resolve(&key, cx.body.rng());
        for drop in drops {
            let label = drop.item.as_str().to_owned();
            let count = drop.count;
            let entity = cx.world.spawn_item(pos.center(), drop);
            if let Err(err) = cx.work.store.absorb(&mut *cx.world, entity) {
                warn!(agent = %cx.body.id(), %err, "harvest drop left on the ground");
            }
            match cx.work.trainer.as_ref() {
                Some(trainer) => cx.stats.track(trainer, ITEMS_SCAVENGED, &label, count),
                None => warn!(agent = %cx.body.id(), item = %label, "harvest without a trainer"),
            }
        }
        self.profile.on_harvest_success(cx, pos);
        info!(
            agent = %cx.body.id(),
            role = ?self.profile.required_role(),
            %key,
            target = %pos,
            "harvested"
        );
    }

    fn sweep_loose_items(cx: &mut BehaviorContext<'_>, target: BlockPos) {
        let area = Aabb::of_block(target).inflate(SWEEP_INFLATE);
        for entity in cx.world.loose_items(&area) {
            if let Err(err) = cx.work.store.absorb(&mut *cx.world, entity) {
                debug!(agent = %cx.body.id(), %err, "loose item skipped");
            }
        }
    }
}

impl Behavior for ScavengeEngine {
    fn name(&self) -> &'static str {
        self.profile.name()
    }

    fn flags(&self) -> ControlFlags {
        ControlFlags::of(ControlFlag::Move)
    }

    fn can_start(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        if !cx.body.is_free_to_act() || cx.role() != self.profile.required_role() {
            return false;
        }
        let now = cx.now();

        if self.is_resumable() {
            if self.resume_until.is_some_and(|until| now <= until) {
                debug!(agent = %cx.body.id(), target = ?self.target, "resuming paused run");
                return true;
            }
            self.reset(cx);
        }

        if self.cooling_down(now) || !self.periodic_gate_open(now, cx.body.entity_id()) {
            return false;
        }
        if cx.body.rng().random::<f32>() >= self.tuning.gate_acceptance {
            return false;
        }

        let Some(target) = self.profile.find_target(cx, self.tuning.search_radius) else {
            return false;
        };
        let anchor = self.profile.navigation_anchor(cx, target);
        debug!(agent = %cx.body.id(), %target, %anchor, "scavenge target found");
        self.target = Some(target);
        self.anchor = Some(anchor);
        true
    }

    fn can_continue(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        if self.target.is_none() || !cx.body.is_alive() {
            return false;
        }
        if self.arrived {
            self.tries > 0
        } else {
            cx.body.navigator().is_in_progress() || self.tries > 0
        }
    }

    fn start(&mut self, cx: &mut BehaviorContext<'_>) {
        let Some(target) = self.target else {
            return;
        };
        if self.last_start_target != Some(target) {
            self.arrived = false;
            self.tries = self.tuning.max_search_tries;
            self.last_start_target = Some(target);
            self.last_sample = None;
            self.stuck = 0;
        }
        self.resume_until = None;
        let anchor = match self.anchor {
            Some(anchor) => anchor,
            None => {
                let anchor = self.profile.navigation_anchor(cx, target);
                self.anchor = Some(anchor);
                anchor
            }
        };
        if !flexible_pathing(cx, anchor, self.tuning.speed) {
            debug!(agent = %cx.body.id(), %anchor, tries = self.tries, "no path to anchor");
            self.forfeit_try(cx);
        }
    }

    fn tick(&mut self, cx: &mut BehaviorContext<'_>) {
        let (Some(target), Some(anchor)) = (self.target, self.anchor) else {
            self.reset(cx);
            return;
        };
        let now = cx.now();
        let near = self.is_near(cx, anchor);

        if !self.arrived && !near && cx.body.navigator().is_done() {
            let from = cx.body.block_position();
            let goal = self.goal_point(anchor);
            cx.body
                .navigator_mut()
                .move_to(&*cx.world, from, goal, self.tuning.speed);
            let phase = u64::from(cx.body.entity_id())
                .checked_rem(REISSUE_PENALTY_PERIOD)
                .unwrap_or(0);
            if now
                .saturating_add(phase)
                .checked_rem(REISSUE_PENALTY_PERIOD)
                == Some(0)
            {
                self.forfeit_try(cx);
            }
            return;
        }

        if self.arrived && !near {
            let from = cx.body.block_position();
            let goal = self.goal_point(anchor);
            cx.body
                .navigator_mut()
                .move_to(&*cx.world, from, goal, DRIFT_SPEED);
        }

        if near || self.arrived {
            if !self.arrived {
                debug!(agent = %cx.body.id(), %anchor, "arrived at anchor");
            }
            self.arrived = true;
            let roll: f32 = cx.body.rng().random();
            if roll < self.tuning.chance_to_find {
                self.tries = 0;
                self.harvest(cx, target);
            } else {
                self.tries = self.tries.saturating_sub(1);
            }
            Self::sweep_loose_items(cx, target);
            if self.tries == 0 {
                self.reset(cx);
                return;
            }
        }

        let interval = self.tuning.stuck_sample_interval.max(1);
        if self.arrived || now.checked_rem(interval) != Some(0) {
            return;
        }
        let here = cx.block_position();
        if cx.body.navigator().is_in_progress() && self.last_sample == Some(here) {
            self.stuck = self.stuck.saturating_add(1);
        } else {
            self.stuck = 0;
        }
        self.last_sample = Some(here);
        if self.stuck > self.tuning.stuck_limit {
            debug!(agent = %cx.body.id(), %here, samples = self.stuck, "no progress toward anchor");
            self.forfeit_try(cx);
        }
    }

    fn stop(&mut self, cx: &mut BehaviorContext<'_>) {
        if self.target.is_some() && !self.arrived && self.tries > 0 {
            let until = cx.now().saturating_add(self.tuning.resume_grace_ticks);
            self.resume_until = Some(until);
            if cx.body.navigator().is_in_progress() {
                cx.body.navigator_mut().stop();
            }
            debug!(agent = %cx.body.id(), target = ?self.target, until, "scavenge run paused");
            return;
        }
        self.reset(cx);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::body::{AgentBody, PetBody};
    use crate::scavenge::WaterScavengeProfile;
    use crate::work::WorkState;
    use kennel_types::{AgentId, BlockState, BlockTag, DimensionId, Locomotion, StructureKind};
    use kennel_world::{GridWorld, LootEntry, LootKey, LootTables, StatsBook};

    const WORK: BlockPos = BlockPos::new(10, 1, 10);

    /// Stone shore, a gravel lake bed two blocks deep, a dredger at `WORK`.
    fn lake() -> GridWorld {
        let mut w = GridWorld::new(DimensionId::overworld())
            .with_loaded_bounds(BlockPos::new(-10, -2, -10), BlockPos::new(30, 10, 30));
        w.tag(BlockTag::WaterScavenge, "minecraft:gravel");
        w.fill(
            BlockPos::new(-10, 0, -10),
            BlockPos::new(30, 0, 30),
            &BlockState::solid("minecraft:stone"),
        );
        w.fill(
            BlockPos::new(-2, 0, -2),
            BlockPos::new(22, 0, 22),
            &BlockState::solid("minecraft:gravel"),
        );
        w.fill(
            BlockPos::new(-2, 1, -2),
            BlockPos::new(22, 2, 22),
            &BlockState::water(),
        );
        w.place_structure(WORK, StructureKind::Dredger);
        w
    }

    fn tuning() -> EngineTuning {
        EngineTuning {
            gate_acceptance: 1.0,
            ..EngineTuning::water()
        }
    }

    struct Rig {
        world: GridWorld,
        body: PetBody,
        work: WorkState,
        loot: LootTables,
        stats: StatsBook,
    }

    impl Rig {
        fn new(at: BlockPos) -> Self {
            let mut work = WorkState::new(9);
            work.replace_work_location(Some(WORK));
            let mut loot = LootTables::new();
            loot.insert(
                &LootKey::scavenge("water_scavenge", "gravel"),
                vec![LootEntry::always("minecraft:flint", 1)],
            );
            Self {
                world: lake(),
                body: PetBody::new(
                    AgentId::new(),
                    8,
                    at,
                    DimensionId::overworld(),
                    Locomotion::Ground,
                    42,
                ),
                work,
                loot,
                stats: StatsBook::new(),
            }
        }

        fn with<R>(&mut self, f: impl FnOnce(&mut BehaviorContext<'_>) -> R) -> R {
            let mut cx = BehaviorContext {
                world: &mut self.world,
                body: &mut self.body,
                work: &mut self.work,
                loot: &self.loot,
                stats: &mut self.stats,
            };
            f(&mut cx)
        }

        fn at_tick(&mut self, tick: u64) -> &mut Self {
            self.world.set_game_time(tick);
            self
        }
    }

    fn engine(tuning: EngineTuning) -> ScavengeEngine {
        ScavengeEngine::new(Arc::new(WaterScavengeProfile::new()), tuning)
    }

    /// Keep asking until the gates and the search line up.
    fn start_within(rig: &mut Rig, engine: &mut ScavengeEngine, from: u64, ticks: u64) -> u64 {
        (from..from.saturating_add(ticks))
            .find(|t| {
                rig.at_tick(*t);
                rig.with(|cx| engine.can_start(cx))
            })
            .expect("engine never started")
    }

    #[test]
    fn wrong_role_never_starts() {
        let mut rig = Rig::new(WORK);
        rig.world.remove_structure(WORK);
        let mut e = engine(tuning());
        for t in 0..50 {
            rig.at_tick(t);
            assert!(!rig.with(|cx| e.can_start(cx)));
        }
    }

    #[test]
    fn no_search_during_cooldown() {
        let mut rig = Rig::new(WORK);
        let mut e = engine(tuning());
        let t = start_within(&mut rig, &mut e, 1, 40);
        rig.with(|cx| e.start(cx));
        // Arrived runs reset on preemption, which stamps the cooldown.
        e.arrived = true;
        rig.with(|cx| e.stop(cx));
        assert_eq!(e.last_scavenge(), Some(t));
        assert!(e.target().is_none());

        let cooldown = e.tuning().cooldown_ticks;
        for tick in t..t.saturating_add(cooldown) {
            rig.at_tick(tick);
            assert!(!rig.with(|cx| e.can_start(cx)), "search began at {tick}");
        }
        start_within(&mut rig, &mut e, t.saturating_add(cooldown), 40);
    }

    #[test]
    fn periodic_gate_only_opens_once_per_period() {
        let mut e = engine(tuning());
        let opened: Vec<u64> = (100..132).filter(|t| e.periodic_gate_open(*t, 3)).collect();
        assert_eq!(opened, vec![103, 111, 119, 127]);
    }

    #[test]
    fn failed_rolls_burn_tries_and_reset_on_the_last() {
        let mut rig = Rig::new(WORK);
        let mut e = engine(EngineTuning {
            chance_to_find: 0.0,
            ..tuning()
        });
        let t = start_within(&mut rig, &mut e, 1, 40);
        let anchor = e.anchor().unwrap();
        rig.body.teleport(anchor);
        rig.with(|cx| e.start(cx));

        let max = e.tuning().max_search_tries;
        let mut previous = e.tries();
        for step in 1..=u64::from(max) {
            rig.at_tick(t.saturating_add(step));
            rig.with(|cx| e.tick(cx));
            if e.target().is_none() {
                assert_eq!(step, u64::from(max));
                break;
            }
            assert!(e.has_arrived());
            assert!(e.tries() < previous);
            previous = e.tries();
        }
        assert!(e.target().is_none());
        assert_eq!(e.tries(), max);
        assert_eq!(e.last_scavenge(), Some(t.saturating_add(u64::from(max))));
    }

    #[test]
    fn certain_roll_harvests_into_the_store() {
        let mut rig = Rig::new(WORK);
        let mut e = engine(EngineTuning {
            chance_to_find: 1.0,
            ..tuning()
        });
        let t = start_within(&mut rig, &mut e, 1, 40);
        let anchor = e.anchor().unwrap();
        rig.body.teleport(anchor);
        rig.with(|cx| e.start(cx));
        rig.at_tick(t.saturating_add(1));
        rig.with(|cx| e.tick(cx));

        assert!(e.target().is_none());
        let flint = kennel_types::ItemId::new("minecraft:flint");
        assert_eq!(rig.work.store.count_of(&flint), 1);
        assert_eq!(rig.world.item_count(), 0);
    }

    #[test]
    fn preempted_run_resumes_inside_grace_window() {
        let mut rig = Rig::new(BlockPos::new(-8, 1, -8));
        let mut e = engine(tuning());
        let t = start_within(&mut rig, &mut e, 1, 40);
        rig.with(|cx| e.start(cx));
        let (target, anchor, tries) = (e.target(), e.anchor(), e.tries());
        assert!(!e.has_arrived());

        rig.with(|cx| e.stop(cx));
        assert_eq!(e.resume_until(), Some(t.saturating_add(100)));
        assert!(rig.body.navigator().is_done());

        rig.at_tick(t.saturating_add(60));
        assert!(rig.with(|cx| e.can_start(cx)));
        rig.with(|cx| e.start(cx));
        assert_eq!(e.target(), target);
        assert_eq!(e.anchor(), anchor);
        assert_eq!(e.tries(), tries);
        assert!(e.resume_until().is_none());
    }

    #[test]
    fn preempted_run_expires_after_grace_window() {
        let mut rig = Rig::new(BlockPos::new(-8, 1, -8));
        let mut e = engine(tuning());
        let t = start_within(&mut rig, &mut e, 1, 40);
        rig.with(|cx| e.start(cx));
        rig.with(|cx| e.stop(cx));

        let late = t.saturating_add(101);
        rig.at_tick(late);
        assert!(!rig.with(|cx| e.can_start(cx)));
        assert!(e.target().is_none());
        assert_eq!(e.last_scavenge(), Some(late));

        let fresh = start_within(&mut rig, &mut e, late.saturating_add(200), 40);
        assert!(fresh >= late.saturating_add(200));
        assert!(e.target().is_some());
    }

    /// Replay ticks after `t` until the run resets, noting every tick that
    /// cost a try. Each entry must cost exactly one.
    fn forfeit_ticks(rig: &mut Rig, e: &mut ScavengeEngine, t: u64, ticks: u64) -> Vec<u64> {
        let mut lost = Vec::new();
        for step in 1..=ticks {
            let now = t.saturating_add(step);
            let before = e.tries();
            rig.at_tick(now);
            rig.with(|cx| e.tick(cx));
            if e.target().is_none() {
                assert_eq!(before, 1, "reset at {now} with {before} tries left");
                lost.push(now);
                break;
            }
            if e.tries() != before {
                assert_eq!(e.tries(), before.saturating_sub(1), "tick {now}");
                lost.push(now);
            }
        }
        lost
    }

    #[test]
    fn stuck_agent_forfeits_one_try_per_sample() {
        let mut rig = Rig::new(BlockPos::new(-8, 1, -8));
        let mut e = engine(tuning());
        let t = start_within(&mut rig, &mut e, 1, 40);
        rig.with(|cx| e.start(cx));
        assert!(rig.body.navigator().is_in_progress());
        let max = e.tuning().max_search_tries;
        assert_eq!(e.tries(), max);

        // The body never advances, so every sample matches the last. The
        // first sample only records a position; the limit is passed on the
        // sample `stuck_limit + 1` intervals later.
        let interval = e.tuning().stuck_sample_interval;
        let limit = u64::from(e.tuning().stuck_limit);
        let first_sample = t
            .saturating_div(interval)
            .saturating_add(1)
            .saturating_mul(interval);
        let first_forfeit =
            first_sample.saturating_add(interval.saturating_mul(limit.saturating_add(1)));
        let expected: Vec<u64> = (0..u64::from(max))
            .map(|n| first_forfeit.saturating_add(n.saturating_mul(interval)))
            .collect();

        let lost = forfeit_ticks(&mut rig, &mut e, t, 300);
        let still = first_forfeit.saturating_sub(t);
        assert!(still >= 50, "first forfeit after {still} still ticks");
        assert_eq!(lost, expected);
        assert!(e.target().is_none());
        assert_eq!(e.tries(), max);
        assert_eq!(e.last_scavenge(), expected.last().copied());
    }

    #[test]
    fn moving_agent_is_never_counted_stuck() {
        let mut rig = Rig::new(BlockPos::new(-8, 1, -8));
        let mut e = engine(tuning());
        let t = start_within(&mut rig, &mut e, 1, 40);
        rig.with(|cx| e.start(cx));
        let max = e.tries();
        for step in 1..=80 {
            rig.at_tick(t.saturating_add(step));
            // One cell between every pair of samples.
            let next = if step.checked_rem(10) == Some(5) {
                rig.body.navigator_mut().next_step()
            } else {
                None
            };
            if let Some(next) = next {
                rig.body.teleport(next);
            }
            rig.with(|cx| e.tick(cx));
            if e.has_arrived() {
                break;
            }
            assert_eq!(e.tries(), max, "tick {}", t.saturating_add(step));
        }
    }

    #[test]
    fn enclosed_agent_burns_tries_on_blind_reissues() {
        let at = BlockPos::new(-8, 1, -8);
        let mut rig = Rig::new(at);
        rig.world.fill(
            at.offset(-1, 0, -1),
            at.offset(1, 2, 1),
            &BlockState::solid("minecraft:stone"),
        );
        rig.world.place(at, BlockState::air());
        rig.world.place(at.above(), BlockState::air());
        let mut e = engine(tuning());
        let t = start_within(&mut rig, &mut e, 1, 40);

        let max = e.tuning().max_search_tries;
        assert_eq!(e.tries(), max);
        rig.with(|cx| e.start(cx));
        assert_eq!(e.tries(), max.saturating_sub(1));
        assert!(rig.body.navigator().is_done());

        let phase = u64::from(rig.body.entity_id())
            .checked_rem(REISSUE_PENALTY_PERIOD)
            .unwrap();
        let expected: Vec<u64> = (t.saturating_add(1)..)
            .filter(|tick| {
                tick.saturating_add(phase)
                    .checked_rem(REISSUE_PENALTY_PERIOD)
                    == Some(0)
            })
            .take(usize::try_from(max.saturating_sub(1)).unwrap())
            .collect();

        let lost = forfeit_ticks(&mut rig, &mut e, t, 100);
        assert_eq!(lost, expected);
        assert!(e.target().is_none());
        assert_eq!(e.tries(), max);
        assert_eq!(e.last_scavenge(), expected.last().copied());
    }
}
