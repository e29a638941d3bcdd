//! Getting near an anchor that may not be standable itself.

use kennel_types::BlockPos;
use kennel_world::World;
use kennel_world::terrain::is_water_or_ice;
use tracing::debug;

use crate::behavior::BehaviorContext;

/// Path tolerances tried per candidate, tightest first.
const TOLERANCES: [u32; 3] = [0, 1, 2];

/// Cells tried in order: the anchor, its ring of eight, and the cell above
/// when the anchor is water or ice resting on something solid.
fn candidates(world: &dyn World, anchor: BlockPos) -> Vec<BlockPos> {
    let mut out = Vec::with_capacity(10);
    out.push(anchor);
    out.extend(anchor.ring8());
    if is_water_or_ice(world, world.block(anchor)) && world.block(anchor.below()).collision {
        out.push(anchor.above());
    }
    out
}

/// Start navigation toward `anchor`, settling for a nearby cell.
///
/// Each candidate is tried at every tolerance before moving to the next.
/// When none yields a path the navigator is asked for a blind move, which
/// walks as close as the terrain allows. Returns whether any movement was
/// set up.
pub fn flexible_pathing(cx: &mut BehaviorContext<'_>, anchor: BlockPos, speed: f64) -> bool {
    let from = cx.body.block_position();
    for candidate in candidates(&*cx.world, anchor) {
        for tolerance in TOLERANCES {
            let Some(path) = cx
                .body
                .navigator()
                .create_path(&*cx.world, from, candidate, tolerance)
            else {
                continue;
            };
            if cx.body.navigator_mut().follow(path, speed) {
                debug!(agent = %cx.body.id(), %anchor, %candidate, tolerance, "path found");
                return true;
            }
        }
    }
    let moved = cx
        .body
        .navigator_mut()
        .move_to(&*cx.world, from, anchor.bottom_center(), speed);
    debug!(agent = %cx.body.id(), %anchor, moved, "blind move");
    moved
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::body::{AgentBody, PetBody};
    use crate::work::WorkState;
    use kennel_types::{AgentId, BlockState, DimensionId, Locomotion};
    use kennel_world::{GridWorld, LootTables, StatsBook};

    #[test]
    fn water_anchor_adds_the_cell_above() {
        let mut w = GridWorld::new(DimensionId::overworld());
        w.place(BlockPos::new(0, 0, 0), BlockState::solid("minecraft:sand"));
        w.place(BlockPos::new(0, 1, 0), BlockState::water());
        let cells = candidates(&w, BlockPos::new(0, 1, 0));
        assert_eq!(cells.len(), 10);
        assert_eq!(cells.last(), Some(&BlockPos::new(0, 2, 0)));
        assert_eq!(candidates(&w, BlockPos::new(0, 0, 0)).len(), 9);
    }

    #[test]
    fn boxed_in_anchor_falls_back_to_a_ring_cell() {
        let mut w = GridWorld::new(DimensionId::overworld())
            .with_loaded_bounds(BlockPos::new(-8, 0, -8), BlockPos::new(8, 6, 8));
        w.fill(
            BlockPos::new(-8, 0, -8),
            BlockPos::new(8, 0, 8),
            &BlockState::solid("minecraft:dirt"),
        );
        let anchor = BlockPos::new(4, 1, 0);
        w.place(anchor, BlockState::solid("minecraft:stone"));
        w.place(anchor.above(), BlockState::solid("minecraft:stone"));
        let mut body = PetBody::new(
            AgentId::new(),
            1,
            BlockPos::new(-4, 1, 0),
            DimensionId::overworld(),
            Locomotion::Ground,
            5,
        );
        let mut work = WorkState::new(9);
        let loot = LootTables::new();
        let mut stats = StatsBook::new();
        let mut cx = BehaviorContext {
            world: &mut w,
            body: &mut body,
            work: &mut work,
            loot: &loot,
            stats: &mut stats,
        };
        assert!(flexible_pathing(&mut cx, anchor, 1.0));
        let end = cx.body.navigator().upcoming(64).last().copied().unwrap();
        assert!(end.dist_sqr(anchor) <= 2);
    }
}
