//! The world query-and-mutate surface consumed by agents.

use serde::{Deserialize, Serialize};

use kennel_types::{
    Aabb, BlockId, BlockPos, BlockState, BlockTag, DimensionId, Effect, ItemStack, StructureKind,
    Vec3,
};

use crate::error::WorldError;

/// Ticks in one full day.
pub const DAY_LENGTH: u64 = 24_000;

/// Day-time tick at which night begins.
pub const NIGHT_START: u64 = 12_000;

/// Handle to a loose item entity lying in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemEntityId(pub u64);

impl core::fmt::Display for ItemEntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Everything an agent may ask of, or do to, the world.
///
/// All calls are synchronous. Reads outside the loaded region return air.
pub trait World {
    /// Which dimension this world represents.
    fn dimension(&self) -> &DimensionId;

    /// Monotonic tick counter.
    fn game_time(&self) -> u64;

    /// Position within the current day, `0..DAY_LENGTH`.
    fn day_time(&self) -> u64 {
        self.game_time().checked_rem(DAY_LENGTH).unwrap_or_default()
    }

    /// Whether it is currently night.
    fn is_night(&self) -> bool {
        self.day_time() >= NIGHT_START
    }

    /// Whether the cell is inside the loaded region.
    fn is_loaded(&self, pos: BlockPos) -> bool;

    /// Block state at a cell.
    fn block(&self, pos: BlockPos) -> &BlockState;

    /// Replace the block at a cell.
    fn set_block(&mut self, pos: BlockPos, state: BlockState) -> Result<(), WorldError>;

    /// Whether a block id carries a tag.
    fn has_tag(&self, block: &BlockId, tag: BlockTag) -> bool;

    /// Structure anchored at a cell, if any.
    fn structure_at(&self, pos: BlockPos) -> Option<StructureKind>;

    /// Light level at a cell, `0..=15`.
    fn light_level(&self, pos: BlockPos) -> u8;

    /// Drop an item entity with no pickup delay.
    fn spawn_item(&mut self, at: Vec3, stack: ItemStack) -> ItemEntityId;

    /// Live item entities inside `area` that can be picked up now.
    fn loose_items(&self, area: &Aabb) -> Vec<ItemEntityId>;

    /// Current stack of an item entity.
    fn item(&self, id: ItemEntityId) -> Option<&ItemStack>;

    /// Replace an item entity's stack. An empty stack discards the entity.
    fn set_item(&mut self, id: ItemEntityId, stack: ItemStack) -> Result<(), WorldError>;

    /// Put a stack into the container at `at`, returning what did not fit.
    fn deposit(&mut self, at: BlockPos, stack: ItemStack) -> Result<ItemStack, WorldError>;

    /// Play a cosmetic effect.
    fn emit(&mut self, at: Vec3, effect: Effect);

    /// Convenience: whether the block at `pos` carries `tag`.
    fn block_has_tag(&self, pos: BlockPos, tag: BlockTag) -> bool {
        self.has_tag(&self.block(pos).block, tag)
    }
}
