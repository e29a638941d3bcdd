//! Error types for the kennel-agents crate.
//!
//! Errors here only cross the crate boundary for registry bookkeeping,
//! persisted-tag decoding, and configuration checks. Anything raised inside
//! the tick path is absorbed and logged by the work context.

use kennel_types::AgentId;
use kennel_world::WorldError;

/// Errors that can occur during agent work operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgentError {
    /// The agent has no trainer structure to register with.
    #[error("agent {0} has no trainer structure")]
    MissingTrainer(AgentId),

    /// A restored item list holds more stacks than the store has slots.
    #[error("item store overflow: {stacks} stacks for {slots} slots")]
    StoreOverflow {
        /// Number of stacks offered.
        stacks: usize,
        /// Slots available.
        slots: usize,
    },

    /// A persisted tag could not be decoded.
    #[error("malformed persisted tag: {reason}")]
    MalformedTag {
        /// Decoder message.
        reason: String,
    },

    /// A persisted tag could not be produced.
    #[error("persisted tag encoding failed: {reason}")]
    TagEncode {
        /// Encoder message.
        reason: String,
    },

    /// A tunable is outside its accepted range.
    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A world mutation was rejected.
    #[error(transparent)]
    World(#[from] WorldError),
}
