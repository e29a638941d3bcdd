//! Simulation configuration loaded from YAML.
//!
//! Every field may be omitted. The defaults run one agent per role for two
//! in-game days with the stock loot tables.

use std::path::Path;

use kennel_agents::{AgentConfig, AgentError};
use kennel_world::{LootEntry, LootKey, LootTables, WorldError};
use serde::{Deserialize, Serialize};

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Agent tunables are out of range.
    #[error("invalid agent tunables: {source}")]
    Agents {
        /// The underlying validation error.
        #[from]
        source: AgentError,
    },

    /// A loot table is malformed.
    #[error("invalid loot tables: {source}")]
    Loot {
        /// The underlying validation error.
        #[from]
        source: WorldError,
    },

    /// A top-level value is out of range.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Base seed; agent `n` uses `seed + n` (default: 7).
    pub seed: u64,

    /// Ticks to simulate (default: 48000, two in-game days).
    pub ticks: u64,

    /// Agents spawned for each work role (default: 1).
    pub agents_per_role: u32,

    /// Ticks between progress reports (default: 2000).
    pub report_every: u64,

    /// Agent tunables.
    pub agents: AgentConfig,

    /// Loot tables keyed by `pet/<tier>/<block>`.
    pub loot: LootTables,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            ticks: 48_000,
            agents_per_role: 1,
            report_every: 2_000,
            agents: AgentConfig::default(),
            loot: default_loot(),
        }
    }
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, and a validation
    /// variant if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report_every == 0 {
            return Err(ConfigError::Invalid {
                field: String::from("report_every"),
                reason: String::from("must be non-zero"),
            });
        }
        self.agents.validate()?;
        self.loot.validate()?;
        Ok(())
    }
}

/// Stock loot for the demo scene.
fn default_loot() -> LootTables {
    let mut loot = LootTables::new();
    let entry = |item: &str, min: u32, max: u32, chance: f32| LootEntry {
        item: item.to_owned(),
        min,
        max,
        chance,
    };
    loot.insert(
        &LootKey::scavenge("water_scavenge", "gravel"),
        vec![
            entry("minecraft:flint", 1, 2, 0.7),
            entry("minecraft:gold_nugget", 1, 1, 0.05),
        ],
    );
    loot.insert(
        &LootKey::scavenge("water_scavenge", "clay"),
        vec![LootEntry::always("minecraft:clay_ball", 2)],
    );
    loot.insert(
        &LootKey::scavenge("land_scavenge", "podzol"),
        vec![
            entry("minecraft:bone_meal", 1, 2, 0.5),
            entry("minecraft:stick", 1, 1, 0.5),
        ],
    );
    loot.insert(
        &LootKey::scavenge("vegetation_scavenge/fruit", "sweet_berry_bush"),
        vec![entry("minecraft:sweet_berries", 1, 3, 1.0)],
    );
    loot.insert(
        &LootKey::scavenge("vegetation_scavenge/apple_leaves", "oak_leaves"),
        vec![
            entry("minecraft:apple", 1, 1, 0.2),
            entry("minecraft:stick", 1, 2, 0.4),
        ],
    );
    loot.insert(
        &LootKey::scavenge("vegetation_scavenge/other_leaves", "birch_leaves"),
        vec![entry("minecraft:stick", 1, 2, 0.5)],
    );
    loot
}
