//! The bounded item store every work agent carries.
//!
//! A store has a fixed number of slots, each holding at most one stack of
//! up to [`MAX_STACK_SIZE`] items. Insertion tops up matching stacks first
//! and then spills into the first empty slot, handing back whatever did not
//! fit. All arithmetic is saturating -- counts never wrap.

use kennel_types::item::MAX_STACK_SIZE;
use kennel_types::{ItemId, ItemStack};
use kennel_world::{ItemEntityId, World};

use crate::error::AgentError;

/// Fixed-size item store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStore {
    slots: Vec<Option<ItemStack>>,
}

impl ItemStore {
    /// Create an empty store with `slot_count` slots.
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots holding a stack.
    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether no slot holds anything.
    pub fn is_empty(&self) -> bool {
        self.occupied_slots() == 0
    }

    /// Whether at least `fraction` of the slots are occupied.
    pub fn is_filled_to(&self, fraction: f32) -> bool {
        let total = u32::try_from(self.slot_count()).unwrap_or(u32::MAX);
        let used = u32::try_from(self.occupied_slots()).unwrap_or(u32::MAX);
        if total == 0 {
            return false;
        }
        f64::from(used) >= f64::from(fraction) * f64::from(total)
    }

    /// Total count of `item` across all slots.
    pub fn count_of(&self, item: &ItemId) -> u32 {
        self.stacks()
            .filter(|s| &s.item == item)
            .fold(0u32, |acc, s| acc.saturating_add(s.count))
    }

    /// Iterate the held stacks in slot order.
    pub fn stacks(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().flatten()
    }

    /// Insert a stack, returning the remainder that did not fit.
    ///
    /// Matching stacks are topped up in slot order; whatever is left goes
    /// into the first empty slot only.
    pub fn insert(&mut self, mut stack: ItemStack) -> ItemStack {
        if stack.is_empty() {
            return stack;
        }
        for existing in self.slots.iter_mut().flatten() {
            if existing.item != stack.item {
                continue;
            }
            let moved = stack.split(existing.space_left());
            existing.count = existing.count.saturating_add(moved.count);
            if stack.is_empty() {
                return stack;
            }
        }
        if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(stack.split(MAX_STACK_SIZE));
        }
        stack
    }

    /// Move a loose item entity into the store.
    ///
    /// The entity is discarded if it fits entirely, otherwise it is shrunk
    /// to the remainder. Returns how many items were taken.
    pub fn absorb(&mut self, world: &mut dyn World, id: ItemEntityId) -> Result<u32, AgentError> {
        let Some(stack) = world.item(id).cloned() else {
            return Ok(0);
        };
        if stack.is_empty() {
            return Ok(0);
        }
        let offered = stack.count;
        let remainder = self.insert(stack);
        let taken = offered.saturating_sub(remainder.count);
        world.set_item(id, remainder)?;
        Ok(taken)
    }

    /// Remove a single item matching `accept` and return it.
    pub fn take_one(&mut self, accept: impl Fn(&ItemId) -> bool) -> Option<ItemStack> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|stack| accept(&stack.item)))?;
        let stack = slot.as_mut()?;
        let one = stack.split(1);
        if stack.is_empty() {
            *slot = None;
        }
        Some(one)
    }

    /// Empty every slot, returning the stacks in slot order.
    pub fn drain(&mut self) -> Vec<ItemStack> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    /// Replace the contents with persisted stacks.
    ///
    /// Fails without touching the store when there are more stacks than
    /// slots.
    pub fn restore(&mut self, stacks: Vec<ItemStack>) -> Result<(), AgentError> {
        let stacks: Vec<ItemStack> = stacks.into_iter().filter(|s| !s.is_empty()).collect();
        if stacks.len() > self.slot_count() {
            return Err(AgentError::StoreOverflow {
                stacks: stacks.len(),
                slots: self.slot_count(),
            });
        }
        let slot_count = self.slot_count();
        self.slots = stacks
            .into_iter()
            .map(|mut s| {
                s.count = s.count.min(MAX_STACK_SIZE);
                Some(s)
            })
            .chain(std::iter::repeat(None))
            .take(slot_count)
            .collect();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use kennel_types::{DimensionId, Vec3};
    use kennel_world::GridWorld;

    #[test]
    fn insert_tops_up_before_using_empty_slot() {
        let mut store = ItemStore::new(3);
        assert!(store.insert(ItemStack::new("minecraft:clay_ball", 60)).is_empty());
        let rest = store.insert(ItemStack::new("minecraft:clay_ball", 10));
        assert!(rest.is_empty());
        assert_eq!(store.occupied_slots(), 2);
        assert_eq!(store.count_of(&ItemId::new("minecraft:clay_ball")), 70);
    }

    #[test]
    fn full_store_returns_remainder() {
        let mut store = ItemStore::new(1);
        store.insert(ItemStack::new("minecraft:kelp", 64));
        let rest = store.insert(ItemStack::new("minecraft:sand", 5));
        assert_eq!(rest.count, 5);
        assert_eq!(rest.item, ItemId::new("minecraft:sand"));
    }

    #[test]
    fn oversized_stack_only_fills_one_empty_slot() {
        let mut store = ItemStore::new(4);
        let rest = store.insert(ItemStack::new("minecraft:gravel", 100));
        assert_eq!(rest.count, 36);
        assert_eq!(store.occupied_slots(), 1);
    }

    #[test]
    fn fill_fraction_counts_slots_not_items() {
        let mut store = ItemStore::new(5);
        store.insert(ItemStack::new("a", 1));
        assert!(!store.is_filled_to(0.4));
        store.insert(ItemStack::new("b", 1));
        assert!(store.is_filled_to(0.4));
    }

    #[test]
    fn absorb_discards_entity_when_fully_taken() {
        let mut world = GridWorld::new(DimensionId::overworld());
        let id = world.drop_item(Vec3::new(0.5, 1.0, 0.5), ItemStack::new("minecraft:kelp", 3), 0);
        let mut store = ItemStore::new(2);
        assert_eq!(store.absorb(&mut world, id).unwrap(), 3);
        assert!(world.item(id).is_none());
    }

    #[test]
    fn absorb_shrinks_entity_when_store_is_full() {
        let mut world = GridWorld::new(DimensionId::overworld());
        let id = world.drop_item(Vec3::new(0.5, 1.0, 0.5), ItemStack::new("minecraft:kelp", 10), 0);
        let mut store = ItemStore::new(1);
        store.insert(ItemStack::new("minecraft:kelp", 60));
        assert_eq!(store.absorb(&mut world, id).unwrap(), 4);
        assert_eq!(world.item(id).map(|s| s.count), Some(6));
    }

    #[test]
    fn take_one_clears_emptied_slot() {
        let mut store = ItemStore::new(2);
        store.insert(ItemStack::new("minecraft:apple", 1));
        let apple = store.take_one(|id| id.as_str() == "minecraft:apple").unwrap();
        assert_eq!(apple.count, 1);
        assert!(store.is_empty());
        assert!(store.take_one(|_| true).is_none());
    }

    #[test]
    fn restore_rejects_too_many_stacks() {
        let mut store = ItemStore::new(1);
        let err = store
            .restore(vec![ItemStack::new("a", 1), ItemStack::new("b", 1)])
            .unwrap_err();
        assert_eq!(err, AgentError::StoreOverflow { stacks: 2, slots: 1 });
        assert!(store.is_empty());
    }

    #[test]
    fn drain_empties_in_slot_order() {
        let mut store = ItemStore::new(3);
        store.insert(ItemStack::new("a", 2));
        store.insert(ItemStack::new("b", 3));
        let out = store.drain();
        assert_eq!(out, vec![ItemStack::new("a", 2), ItemStack::new("b", 3)]);
        assert!(store.is_empty());
    }
}
