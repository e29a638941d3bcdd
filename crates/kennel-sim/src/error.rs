//! Error types for the simulation binary.
//!
//! [`SimError`] wraps every subsystem failure so `main` can propagate with
//! `?`.

use kennel_agents::AgentError;

use crate::config::ConfigError;

/// Top-level error for the simulation binary.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// An agent operation outside the tick path failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}
