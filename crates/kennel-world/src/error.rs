//! Error types for the `kennel-world` crate.

use kennel_types::BlockPos;

use crate::world::ItemEntityId;

/// Errors that can occur while mutating the world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The position lies outside the loaded region.
    #[error("position {0} is not loaded")]
    NotLoaded(BlockPos),

    /// No container exists at the position.
    #[error("no container at {0}")]
    NoContainer(BlockPos),

    /// The item entity was removed or never existed.
    #[error("item entity {0} not found")]
    ItemNotFound(ItemEntityId),

    /// A loot table definition was rejected.
    #[error("invalid loot table {key}: {reason}")]
    InvalidLootTable {
        /// The offending key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
}
