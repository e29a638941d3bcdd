//! Open doors that lie on the current path, and close them behind.

use std::collections::BTreeMap;

use kennel_types::{BlockPos, BlockState, BlockTag};
use tracing::debug;

use super::{Behavior, BehaviorContext, ControlFlags};

/// Property toggled on door blocks.
const OPEN: &str = "open";

/// Upcoming path nodes inspected for doors.
const LOOKAHEAD_NODES: usize = 3;

/// Farthest door, squared, that is opened.
const MAX_TRIGGER_DIST_SQR: f64 = 16.0;

/// Distance past the door center that counts as through it.
const CLEARED_DIST: f64 = 1.4;

/// Ticks a door is left alone after this behavior closes it.
const REVISIT_TICKS: u64 = 100;

/// Ticks between runs.
const COOLDOWN_TICKS: u64 = 10;

/// Longest a door is held open while the agent dithers.
const MAX_HOLD_TICKS: u64 = 200;

/// Opens a closed door ahead on the path and closes it once the agent is
/// through. Claims no control flags, so it runs beside whatever is moving
/// the agent.
#[derive(Debug, Clone)]
pub struct OpenDoorBehavior {
    close_delay: u64,
    door: Option<BlockPos>,
    countdown: u64,
    held: u64,
    cooldown_until: u64,
    revisit: BTreeMap<BlockPos, u64>,
}

impl OpenDoorBehavior {
    /// Close doors `close_delay` ticks after the agent clears them.
    pub fn new(close_delay: u64) -> Self {
        Self {
            close_delay: close_delay.max(1),
            door: None,
            countdown: 0,
            held: 0,
            cooldown_until: 0,
            revisit: BTreeMap::new(),
        }
    }

    fn is_closed_door(cx: &BehaviorContext<'_>, pos: BlockPos) -> bool {
        let state = cx.world.block(pos);
        cx.world.has_tag(&state.block, BlockTag::Door) && state.bool_property(OPEN) == Some(false)
    }

    /// Both halves of the door whose lower or upper half is at `pos`.
    fn halves(cx: &BehaviorContext<'_>, pos: BlockPos) -> Vec<BlockPos> {
        [pos.below(), pos, pos.above()]
            .into_iter()
            .filter(|p| cx.world.block_has_tag(*p, BlockTag::Door))
            .collect()
    }

    fn set_open(cx: &mut BehaviorContext<'_>, pos: BlockPos, open: bool) {
        for half in Self::halves(cx, pos) {
            let Some(mut next) = cx.world.block(half).with_bool_value(OPEN, open) else {
                continue;
            };
            next.collision = !open;
            next.sturdy_top = false;
            if let Err(err) = cx.world.set_block(half, next) {
                debug!(pos = %half, %err, "door toggle rejected");
            }
        }
    }

    fn has_cleared(cx: &BehaviorContext<'_>, door: BlockPos) -> bool {
        let body = cx.body.position();
        let center = door.center();
        let dx = body.x - center.x;
        let dz = body.z - center.z;
        dx.hypot(dz) > CLEARED_DIST && !cx.body.navigator().upcoming(LOOKAHEAD_NODES).contains(&door)
    }

    fn reset(&mut self, now: u64) {
        if let Some(door) = self.door.take() {
            self.revisit.insert(door, now.saturating_add(REVISIT_TICKS));
        }
        self.cooldown_until = now.saturating_add(COOLDOWN_TICKS);
        self.countdown = 0;
        self.held = 0;
    }
}

impl Behavior for OpenDoorBehavior {
    fn name(&self) -> &'static str {
        "open_door"
    }

    fn flags(&self) -> ControlFlags {
        ControlFlags::NONE
    }

    fn can_start(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        let now = cx.now();
        self.revisit.retain(|_, until| *until > now);
        if now < self.cooldown_until || !cx.body.is_alive() || cx.body.is_passenger() {
            return false;
        }
        let view: &BehaviorContext<'_> = cx;
        let here = view.body.position();
        let found = view
            .body
            .navigator()
            .upcoming(LOOKAHEAD_NODES)
            .into_iter()
            .flat_map(|node| [node, node.above()])
            .find(|p| {
                !self.revisit.contains_key(p)
                    && Self::is_closed_door(view, *p)
                    && p.center().distance_sqr(here) <= MAX_TRIGGER_DIST_SQR
            });
        self.door = found;
        found.is_some()
    }

    fn can_continue(&mut self, _cx: &mut BehaviorContext<'_>) -> bool {
        self.door.is_some()
    }

    fn start(&mut self, cx: &mut BehaviorContext<'_>) {
        if let Some(door) = self.door {
            Self::set_open(cx, door, true);
            self.countdown = self.close_delay;
            self.held = 0;
            debug!(agent = %cx.body.id(), pos = %door, "door opened");
        }
    }

    fn tick(&mut self, cx: &mut BehaviorContext<'_>) {
        let Some(door) = self.door else {
            return;
        };
        self.held = self.held.saturating_add(1);
        if Self::has_cleared(cx, door) {
            self.countdown = self.countdown.saturating_sub(1);
        } else {
            self.countdown = self.close_delay;
        }
        if self.countdown == 0 || self.held >= MAX_HOLD_TICKS {
            Self::set_open(cx, door, false);
            debug!(agent = %cx.body.id(), pos = %door, "door closed");
            self.reset(cx.now());
        }
    }

    fn stop(&mut self, cx: &mut BehaviorContext<'_>) {
        if let Some(door) = self.door {
            if Self::has_cleared(cx, door) {
                Self::set_open(cx, door, false);
            }
        }
        self.reset(cx.now());
    }
}

/// A closed door block for scene building.
pub fn closed_door(block: &str) -> BlockState {
    BlockState::solid(block).with_bool(OPEN, false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::body::{AgentBody, PetBody};
    use crate::work::WorkState;
    use kennel_types::{AgentId, DimensionId, Locomotion};
    use kennel_world::{GridWorld, LootTables, StatsBook, World};

    #[test]
    fn opens_door_on_path_and_closes_after_passing() {
        let mut world = GridWorld::new(DimensionId::overworld());
        world.fill(
            BlockPos::new(-4, 0, -4),
            BlockPos::new(8, 0, 4),
            &BlockState::solid("minecraft:stone"),
        );
        world.fill(
            BlockPos::new(2, 1, -4),
            BlockPos::new(2, 2, 4),
            &BlockState::solid("minecraft:stone"),
        );
        world.tag(BlockTag::Door, "minecraft:oak_door");
        world.place(BlockPos::new(2, 1, 0), closed_door("minecraft:oak_door"));
        world.place(BlockPos::new(2, 2, 0), closed_door("minecraft:oak_door"));

        let mut body = PetBody::new(
            AgentId::new(),
            1,
            BlockPos::new(0, 1, 0),
            DimensionId::overworld(),
            Locomotion::Ground,
            9,
        );
        let path = body
            .navigator()
            .create_path(&world, BlockPos::new(0, 1, 0), BlockPos::new(6, 1, 0), 0)
            .unwrap();
        body.navigator_mut().follow(path, 1.0);
        let mut work = WorkState::new(9);
        let loot = LootTables::new();
        let mut stats = StatsBook::new();
        let mut door = OpenDoorBehavior::new(5);

        let mut opened = false;
        let mut running = false;
        for _ in 0..40 {
            {
                let mut cx = BehaviorContext {
                    world: &mut world,
                    body: &mut body,
                    work: &mut work,
                    loot: &loot,
                    stats: &mut stats,
                };
                if running && !door.can_continue(&mut cx) {
                    door.stop(&mut cx);
                    running = false;
                }
                if !running && door.can_start(&mut cx) {
                    door.start(&mut cx);
                    running = true;
                }
                if running {
                    door.tick(&mut cx);
                }
            }
            if world.block(BlockPos::new(2, 1, 0)).bool_property(OPEN) == Some(true) {
                opened = true;
            }
            body.advance(&world);
            world.tick();
        }
        assert!(opened);
        assert_eq!(body.block_position(), BlockPos::new(6, 1, 0));
        let lower = world.block(BlockPos::new(2, 1, 0));
        assert_eq!(lower.bool_property(OPEN), Some(false));
        assert!(lower.collision);
    }
}
