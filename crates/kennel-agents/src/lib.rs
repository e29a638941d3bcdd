//! Work agents for the Kennel simulation.
//!
//! An agent is a [`body`] driven by a behavior [`scheduler`] and owned by an
//! [`AgentWorkContext`]. The context derives the agent's role from its work
//! location every tick and rebuilds the behavior set whenever that role
//! changes: a fixed baseline plus, for scavenging roles, one
//! [`ScavengeEngine`] bound to the matching [`TerrainProfile`].
//!
//! # Modules
//!
//! - [`behavior`] -- The [`Behavior`] trait, the priority scheduler, and the
//!   baseline behaviors.
//! - [`body`] -- The [`AgentBody`] contract and the in-memory [`PetBody`].
//! - [`config`] -- Tunables for engines, the watchdog, and the baseline.
//! - [`context`] -- [`AgentWorkContext`]: assignment, registration, saves.
//! - [`error`] -- Error types for agent operations.
//! - [`inventory`] -- The bounded [`ItemStore`].
//! - [`registry`] -- [`AgentRegistry`]: trainer queues and work locations.
//! - [`scavenge`] -- Terrain profiles and the scavenge engine.
//! - [`watchdog`] -- Stall detection.
//! - [`work`] -- [`WorkState`], the persisted assignment.
//!
//! [`scheduler`]: behavior::scheduler

pub mod behavior;
pub mod body;
pub mod config;
pub mod context;
pub mod error;
pub mod inventory;
pub mod registry;
pub mod scavenge;
pub mod watchdog;
pub mod work;

// Re-export primary types at crate root.
pub use behavior::{Behavior, BehaviorContext, BehaviorScheduler, ControlFlags, PriorityScheduler};
pub use body::{AgentBody, PetBody};
pub use config::{AgentConfig, BaselineConfig, EngineTuning, ScavengeConfig, WatchdogConfig};
pub use context::{AgentWorkContext, HostServices};
pub use error::AgentError;
pub use inventory::ItemStore;
pub use registry::{AgentHandle, AgentLookup, AgentRegistry};
pub use scavenge::{
    LandScavengeProfile, ProfileSet, ScavengeEngine, TerrainProfile, VegetationScavengeProfile,
    WaterScavengeProfile,
};
pub use watchdog::{ActivitySignals, Watchdog, WatchdogAction};
pub use work::WorkState;
