//! Sparse in-memory world.
//!
//! Only non-air cells are stored. Everything outside the optional loaded
//! bounds reads as air and rejects writes, which is how the scavenging code
//! sees unloaded terrain.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use kennel_types::{
    Aabb, BlockId, BlockPos, BlockState, BlockTag, DimensionId, Effect, ItemStack, StructureKind,
    Vec3,
};

use crate::error::WorldError;
use crate::world::{ItemEntityId, World};

/// Slots in a structure's deposit container.
pub const CONTAINER_SLOTS: usize = 27;

/// Light level of cells without an explicit override.
pub const DEFAULT_LIGHT: u8 = 15;

#[derive(Debug, Clone)]
struct LooseItem {
    at: Vec3,
    stack: ItemStack,
    pickup_delay: u32,
}

/// A sparse block map plus the entities and containers that live in it.
#[derive(Debug, Clone)]
pub struct GridWorld {
    dimension: DimensionId,
    loaded: Option<(BlockPos, BlockPos)>,
    blocks: HashMap<BlockPos, BlockState>,
    air: BlockState,
    tags: BTreeMap<BlockTag, BTreeSet<BlockId>>,
    structures: BTreeMap<BlockPos, StructureKind>,
    containers: BTreeMap<BlockPos, Vec<ItemStack>>,
    items: BTreeMap<ItemEntityId, LooseItem>,
    next_item: u64,
    light: HashMap<BlockPos, u8>,
    effects: Vec<(Vec3, Effect)>,
    game_time: u64,
}

impl GridWorld {
    /// Create an empty, fully loaded world.
    pub fn new(dimension: DimensionId) -> Self {
        Self {
            dimension,
            loaded: None,
            blocks: HashMap::new(),
            air: BlockState::air(),
            tags: BTreeMap::new(),
            structures: BTreeMap::new(),
            containers: BTreeMap::new(),
            items: BTreeMap::new(),
            next_item: 0,
            light: HashMap::new(),
            effects: Vec::new(),
            game_time: 0,
        }
    }

    /// Restrict the loaded region to the box spanned by two corners.
    #[must_use]
    pub fn with_loaded_bounds(mut self, a: BlockPos, b: BlockPos) -> Self {
        let min = BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        self.loaded = Some((min, max));
        self
    }

    /// Set a block regardless of loaded bounds. Used to build scenes.
    pub fn place(&mut self, pos: BlockPos, state: BlockState) {
        if state.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
    }

    /// Fill the box spanned by two corners with copies of `state`.
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, state: &BlockState) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for z in a.z.min(b.z)..=a.z.max(b.z) {
                    self.place(BlockPos::new(x, y, z), state.clone());
                }
            }
        }
    }

    /// Add a block id to a tag.
    pub fn tag(&mut self, tag: BlockTag, block: &str) {
        self.tags.entry(tag).or_default().insert(BlockId::new(block));
    }

    /// Anchor a structure at a cell. Every structure gets a deposit container.
    pub fn place_structure(&mut self, pos: BlockPos, kind: StructureKind) {
        self.structures.insert(pos, kind);
        self.containers.entry(pos).or_default();
    }

    /// Give a plain block (a chest, a station block) a deposit container.
    pub fn place_container(&mut self, pos: BlockPos) {
        self.containers.entry(pos).or_default();
    }

    /// Remove whatever structure is anchored at a cell.
    pub fn remove_structure(&mut self, pos: BlockPos) -> Option<StructureKind> {
        self.containers.remove(&pos);
        self.structures.remove(&pos)
    }

    /// Override the light level across a box.
    pub fn set_light(&mut self, a: BlockPos, b: BlockPos, level: u8) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for z in a.z.min(b.z)..=a.z.max(b.z) {
                    self.light.insert(BlockPos::new(x, y, z), level.min(DEFAULT_LIGHT));
                }
            }
        }
    }

    /// Drop an item entity that cannot be picked up for `pickup_delay` ticks.
    pub fn drop_item(&mut self, at: Vec3, stack: ItemStack, pickup_delay: u32) -> ItemEntityId {
        let id = ItemEntityId(self.next_item);
        self.next_item = self.next_item.saturating_add(1);
        self.items.insert(
            id,
            LooseItem {
                at,
                stack,
                pickup_delay,
            },
        );
        id
    }

    /// Advance world time by one tick.
    pub fn tick(&mut self) {
        self.game_time = self.game_time.saturating_add(1);
        for item in self.items.values_mut() {
            item.pickup_delay = item.pickup_delay.saturating_sub(1);
        }
    }

    /// Jump world time to an absolute tick.
    pub const fn set_game_time(&mut self, tick: u64) {
        self.game_time = tick;
    }

    /// Effects emitted so far.
    pub fn effects(&self) -> &[(Vec3, Effect)] {
        &self.effects
    }

    /// Contents of the container at `pos`.
    pub fn container(&self, pos: BlockPos) -> Option<&[ItemStack]> {
        self.containers.get(&pos).map(Vec::as_slice)
    }

    /// Number of live item entities.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl World for GridWorld {
    fn dimension(&self) -> &DimensionId {
        &self.dimension
    }

    fn game_time(&self) -> u64 {
        self.game_time
    }

    fn is_loaded(&self, pos: BlockPos) -> bool {
        self.loaded.is_none_or(|(min, max)| {
            (min.x..=max.x).contains(&pos.x)
                && (min.y..=max.y).contains(&pos.y)
                && (min.z..=max.z).contains(&pos.z)
        })
    }

    fn block(&self, pos: BlockPos) -> &BlockState {
        if !self.is_loaded(pos) {
            return &self.air;
        }
        self.blocks.get(&pos).unwrap_or(&self.air)
    }

    fn set_block(&mut self, pos: BlockPos, state: BlockState) -> Result<(), WorldError> {
        if !self.is_loaded(pos) {
            return Err(WorldError::NotLoaded(pos));
        }
        debug!(%pos, block = %state.block, "block set");
        self.place(pos, state);
        Ok(())
    }

    fn has_tag(&self, block: &BlockId, tag: BlockTag) -> bool {
        self.tags.get(&tag).is_some_and(|ids| ids.contains(block))
    }

    fn structure_at(&self, pos: BlockPos) -> Option<StructureKind> {
        self.structures.get(&pos).copied()
    }

    fn light_level(&self, pos: BlockPos) -> u8 {
        self.light.get(&pos).copied().unwrap_or(DEFAULT_LIGHT)
    }

    fn spawn_item(&mut self, at: Vec3, stack: ItemStack) -> ItemEntityId {
        self.drop_item(at, stack, 0)
    }

    fn loose_items(&self, area: &Aabb) -> Vec<ItemEntityId> {
        self.items
            .iter()
            .filter(|(_, item)| {
                item.pickup_delay == 0 && !item.stack.is_empty() && area.contains(item.at)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn item(&self, id: ItemEntityId) -> Option<&ItemStack> {
        self.items.get(&id).map(|item| &item.stack)
    }

    fn set_item(&mut self, id: ItemEntityId, stack: ItemStack) -> Result<(), WorldError> {
        if stack.is_empty() {
            return self
                .items
                .remove(&id)
                .map(|_| ())
                .ok_or(WorldError::ItemNotFound(id));
        }
        let item = self.items.get_mut(&id).ok_or(WorldError::ItemNotFound(id))?;
        item.stack = stack;
        Ok(())
    }

    fn deposit(&mut self, at: BlockPos, mut stack: ItemStack) -> Result<ItemStack, WorldError> {
        let slots = self.containers.get_mut(&at).ok_or(WorldError::NoContainer(at))?;
        let item = stack.item.clone();
        for slot in slots.iter_mut().filter(|s| s.item == item) {
            let moved = stack.split(slot.space_left());
            slot.count = slot.count.saturating_add(moved.count);
            if stack.is_empty() {
                return Ok(stack);
            }
        }
        if slots.len() < CONTAINER_SLOTS && !stack.is_empty() {
            let count = stack.count;
            slots.push(stack.split(count));
        }
        Ok(stack)
    }

    fn emit(&mut self, at: Vec3, effect: Effect) {
        self.effects.push((at, effect));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn world() -> GridWorld {
        GridWorld::new(DimensionId::overworld())
            .with_loaded_bounds(BlockPos::new(-8, 0, -8), BlockPos::new(8, 16, 8))
    }

    #[test]
    fn unloaded_cells_read_as_air_and_reject_writes() {
        let mut w = world();
        let outside = BlockPos::new(20, 4, 0);
        w.place(outside, BlockState::solid("minecraft:stone"));
        assert!(w.block(outside).is_air());
        assert_eq!(
            w.set_block(outside, BlockState::solid("minecraft:stone")),
            Err(WorldError::NotLoaded(outside))
        );
    }

    #[test]
    fn tags_are_per_block_id() {
        let mut w = world();
        w.tag(BlockTag::WaterScavenge, "minecraft:gravel");
        let p = BlockPos::new(1, 1, 1);
        w.place(p, BlockState::solid("minecraft:gravel"));
        assert!(w.block_has_tag(p, BlockTag::WaterScavenge));
        assert!(!w.block_has_tag(p, BlockTag::Icy));
    }

    #[test]
    fn pickup_delay_hides_items_until_elapsed() {
        let mut w = world();
        let area = Aabb::of_block(BlockPos::new(0, 1, 0)).inflate(1.0);
        let id = w.drop_item(Vec3::new(0.5, 1.0, 0.5), ItemStack::new("minecraft:stick", 1), 2);
        assert!(w.loose_items(&area).is_empty());
        w.tick();
        w.tick();
        assert_eq!(w.loose_items(&area), vec![id]);
    }

    #[test]
    fn empty_stack_discards_item_entity() {
        let mut w = world();
        let id = w.spawn_item(Vec3::new(0.5, 1.0, 0.5), ItemStack::new("minecraft:stick", 1));
        w.set_item(id, ItemStack::new("minecraft:stick", 0)).unwrap();
        assert_eq!(w.item_count(), 0);
        assert!(w.set_item(id, ItemStack::new("minecraft:stick", 1)).is_err());
    }

    #[test]
    fn deposit_merges_then_returns_remainder() {
        let mut w = world();
        let hut = BlockPos::new(0, 1, 0);
        w.place_structure(hut, StructureKind::TrainerHut);
        let rest = w.deposit(hut, ItemStack::new("minecraft:clay_ball", 40)).unwrap();
        assert!(rest.is_empty());
        let rest = w.deposit(hut, ItemStack::new("minecraft:clay_ball", 30)).unwrap();
        assert!(rest.is_empty());
        let slots = w.container(hut).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].count, 64);
        assert_eq!(slots[1].count, 6);
        assert_eq!(
            w.deposit(BlockPos::new(3, 1, 3), ItemStack::new("minecraft:clay_ball", 1)),
            Err(WorldError::NoContainer(BlockPos::new(3, 1, 3)))
        );
    }

    #[test]
    fn day_time_wraps() {
        let mut w = world();
        w.set_game_time(24_000 + 13_000);
        assert_eq!(w.day_time(), 13_000);
        assert!(w.is_night());
    }
}
