//! Item identifiers and stacks.

use serde::{Deserialize, Serialize};

/// Largest number of items a single stack may hold.
pub const MAX_STACK_SIZE: u32 = 64;

/// Namespaced item identifier, e.g. `minecraft:clay_ball`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create an item id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the full id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A quantity of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Which item.
    pub item: ItemId,
    /// How many. Zero means the stack is empty.
    pub count: u32,
}

impl ItemStack {
    /// Build a stack.
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: ItemId::new(item),
            count,
        }
    }

    /// Whether the stack holds nothing.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Room left before the stack is full.
    pub const fn space_left(&self) -> u32 {
        MAX_STACK_SIZE.saturating_sub(self.count)
    }

    /// Split off up to `amount` items into a new stack.
    pub fn split(&mut self, amount: u32) -> Self {
        let taken = amount.min(self.count);
        self.count = self.count.saturating_sub(taken);
        Self {
            item: self.item.clone(),
            count: taken,
        }
    }
}
