//! Terrain predicates shared by profiles and navigation.
//!
//! "Open" means air. "Icy" means the block carries [`BlockTag::Icy`]; ice is
//! treated as both a floor and a water surface.

use kennel_types::{BlockPos, BlockState, BlockTag};

use crate::world::World;

/// Upper bound on how far a water column is climbed.
const MAX_COLUMN_CLIMB: u32 = 256;

/// Whether the state carries the icy tag.
pub fn is_icy(world: &dyn World, state: &BlockState) -> bool {
    world.has_tag(&state.block, BlockTag::Icy)
}

/// Water (including waterlogged) or ice.
pub fn is_water_or_ice(world: &dyn World, state: &BlockState) -> bool {
    state.water || is_icy(world, state)
}

/// Air or ice.
pub fn is_open_or_ice(world: &dyn World, state: &BlockState) -> bool {
    state.is_air() || is_icy(world, state)
}

/// Climb from `start` to the highest water or ice cell of its column.
///
/// Returns `None` when `start` is not water or ice, or when the column is
/// capped by something other than air or ice.
pub fn top_of_water_column(world: &dyn World, start: BlockPos) -> Option<BlockPos> {
    if !is_water_or_ice(world, world.block(start)) {
        return None;
    }
    let mut cur = start;
    for _ in 0..MAX_COLUMN_CLIMB {
        if !is_water_or_ice(world, world.block(cur.above())) {
            break;
        }
        cur = cur.above();
    }
    let cap = world.block(cur.above());
    (cap.is_air() || is_icy(world, cap)).then_some(cur)
}

/// Headroom for a two-high body at `pos`: both cells are non-colliding.
pub fn has_headroom(world: &dyn World, pos: BlockPos) -> bool {
    !world.block(pos).collision && !world.block(pos.above()).collision
}

/// A walker can stand at `pos`: headroom plus a sturdy top face below.
pub fn is_standable(world: &dyn World, pos: BlockPos) -> bool {
    has_headroom(world, pos) && world.block(pos.below()).sturdy_top
}

/// Walk down from `start` (inclusive) at most `max_down` cells looking for
/// a standable cell.
pub fn descend_to_standable(world: &dyn World, start: BlockPos, max_down: u32) -> Option<BlockPos> {
    let mut p = start;
    for _ in 0..=max_down {
        if is_standable(world, p) {
            return Some(p);
        }
        p = p.below();
    }
    None
}

/// Nearest standable cell to `target`, scanning a square of columns of
/// half-width `horiz` at the target's height and descending each column.
///
/// Ties keep the first cell found in scan order.
pub fn find_standable_near(
    world: &dyn World,
    target: BlockPos,
    horiz: i32,
    max_down: u32,
) -> Option<BlockPos> {
    let mut best: Option<BlockPos> = None;
    for dx in -horiz..=horiz {
        for dz in -horiz..=horiz {
            let Some(stand) = descend_to_standable(world, target.offset(dx, 0, dz), max_down) else {
                continue;
            };
            if best.is_none_or(|b| stand.dist_sqr(target) < b.dist_sqr(target)) {
                best = Some(stand);
            }
        }
    }
    best
}

/// An open-air cell near `target` a flyer can hover in.
///
/// Layers are scanned bottom-up from the target's height to `vert` above
/// it; the target cell itself is skipped. Falls back to the cell directly
/// above the target.
pub fn find_hover_spot_near(
    world: &dyn World,
    target: BlockPos,
    horiz: i32,
    vert: i32,
) -> Option<BlockPos> {
    for dy in 0..=vert {
        for dx in -horiz..=horiz {
            for dz in -horiz..=horiz {
                let p = target.offset(dx, dy, dz);
                if p != target && has_headroom(world, p) {
                    return Some(p);
                }
            }
        }
    }
    let above = target.above();
    has_headroom(world, above).then_some(above)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridWorld;
    use kennel_types::DimensionId;

    fn pond() -> GridWorld {
        // Floor at y=0, two water cells at y=1..=2, air above.
        let mut w = GridWorld::new(DimensionId::overworld());
        w.fill(
            BlockPos::new(-3, 0, -3),
            BlockPos::new(3, 0, 3),
            &BlockState::solid("minecraft:dirt"),
        );
        w.fill(
            BlockPos::new(-1, 1, -1),
            BlockPos::new(1, 2, 1),
            &BlockState::water(),
        );
        w.tag(BlockTag::Icy, "minecraft:ice");
        w
    }

    #[test]
    fn water_column_climbs_to_surface() {
        let w = pond();
        assert_eq!(
            top_of_water_column(&w, BlockPos::new(0, 1, 0)),
            Some(BlockPos::new(0, 2, 0))
        );
        assert_eq!(top_of_water_column(&w, BlockPos::new(0, 0, 0)), None);
    }

    #[test]
    fn ice_cap_counts_as_surface() {
        let mut w = pond();
        w.place(BlockPos::new(0, 3, 0), BlockState::solid("minecraft:ice"));
        assert_eq!(
            top_of_water_column(&w, BlockPos::new(0, 1, 0)),
            Some(BlockPos::new(0, 3, 0))
        );
    }

    #[test]
    fn stone_cap_rejects_column() {
        let mut w = pond();
        w.place(BlockPos::new(0, 3, 0), BlockState::solid("minecraft:stone"));
        assert_eq!(top_of_water_column(&w, BlockPos::new(0, 1, 0)), None);
    }

    #[test]
    fn descends_to_first_sturdy_floor() {
        let w = pond();
        assert_eq!(
            descend_to_standable(&w, BlockPos::new(3, 6, 3), 8),
            Some(BlockPos::new(3, 1, 3))
        );
        assert_eq!(descend_to_standable(&w, BlockPos::new(3, 6, 3), 2), None);
    }

    #[test]
    fn nearest_standable_descends_through_water() {
        let w = pond();
        let found = find_standable_near(&w, BlockPos::new(0, 2, 0), 2, 5);
        assert_eq!(found, Some(BlockPos::new(0, 1, 0)));
    }

    #[test]
    fn hover_spot_skips_target() {
        let w = pond();
        let target = BlockPos::new(2, 1, 2);
        let hover = find_hover_spot_near(&w, target, 1, 1);
        assert!(hover.is_some_and(|h| h != target));
    }
}
