//! Simulation host for the Kennel work agents.
//!
//! Builds a one-colony scene, staffs every work role, and drives the agents
//! through the same host API an embedding game would use.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration for a run.
//! - [`error`] -- Error types for the simulation host.
//! - [`scene`] -- The demo world and its work sites.
//! - [`sim`] -- The tick loop and run summary.

pub mod config;
pub mod error;
pub mod scene;
pub mod sim;

pub use config::{ConfigError, SimulationConfig};
pub use error::SimError;
pub use scene::{Scene, SceneSites, build_scene};
pub use sim::{AgentReport, RunSummary, Simulation, log_run_end};
