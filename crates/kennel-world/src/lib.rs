//! The physical world as seen by work agents.
//!
//! Agents never touch a concrete world type. They go through the [`World`]
//! trait, which covers block reads and writes, tags, structures, loose item
//! entities, containers, and cosmetic effects. [`GridWorld`] is the sparse
//! in-memory implementation used by the simulation binary and the tests.
//!
//! # Modules
//!
//! - [`world`] -- The [`World`] trait and day-cycle constants.
//! - [`grid`] -- [`GridWorld`], a sparse block map with loaded bounds.
//! - [`terrain`] -- Water-column, standability, and hover-spot predicates.
//! - [`classifier`] -- Maps a work location to a [`WorkRole`].
//! - [`navigation`] -- The [`Navigator`] trait and a breadth-first
//!   [`GridNavigator`].
//! - [`loot`] -- Symbolic loot keys resolved to item stacks.
//! - [`stats`] -- Per-structure named counters.
//! - [`error`] -- Error types for world mutation.
//!
//! [`WorkRole`]: kennel_types::WorkRole

pub mod classifier;
pub mod error;
pub mod grid;
pub mod loot;
pub mod navigation;
pub mod stats;
pub mod terrain;
pub mod world;

// Re-export primary types at crate root.
pub use classifier::{WorkRoleClassifier, classify};
pub use error::WorldError;
pub use grid::GridWorld;
pub use loot::{LootEntry, LootKey, LootResolver, LootTables};
pub use navigation::{GridNavigator, NavPath, Navigator};
pub use stats::{StatsBook, StatsTracker};
pub use world::{DAY_LENGTH, ItemEntityId, NIGHT_START, World};
