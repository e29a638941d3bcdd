//! Shared type definitions for the Kennel work-pet simulation.
//!
//! This crate is the single source of truth for the value types that flow
//! between the world surface, the agent behaviors, and the simulation
//! binary. Nothing in here owns mutable simulation state.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers (agents, colonies, dimensions)
//! - [`position`] -- Block coordinates, continuous vectors, and boxes
//! - [`block`] -- Block states and their integer/boolean properties
//! - [`item`] -- Item identifiers and stacks
//! - [`enums`] -- Work roles, tags, structure kinds, effects, and flags

pub mod block;
pub mod enums;
pub mod ids;
pub mod item;
pub mod position;

// Re-export all public types at crate root for convenience.
pub use block::{BlockId, BlockProperty, BlockState, IntProperty};
pub use enums::{
    BlockTag, ControlFlag, Effect, Locomotion, Particle, RemovalReason, Sound, StructureKind,
    WorkRole,
};
pub use ids::{AgentId, ColonyId, DimensionId, StructureRef};
pub use item::{ItemId, ItemStack};
pub use position::{Aabb, BlockPos, Vec3};
