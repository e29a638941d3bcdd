//! Loot resolution.
//!
//! Profiles never decide what items a harvest yields. They produce a
//! symbolic [`LootKey`] and a [`LootResolver`] turns that into stacks. The
//! bundled [`LootTables`] is a YAML-loadable map from key to weighted
//! entries.

use std::collections::BTreeMap;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kennel_types::ItemStack;

use crate::error::WorldError;

/// Prefix shared by every work-agent loot key.
pub const LOOT_ROOT: &str = "pet";

/// Symbolic loot table key, e.g. `pet/water_scavenge/gravel`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LootKey(pub String);

impl LootKey {
    /// Build `pet/<base>/<block path>`.
    pub fn scavenge(base: &str, block_path: &str) -> Self {
        Self(format!("{LOOT_ROOT}/{base}/{block_path}"))
    }

    /// Borrow the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for LootKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves a loot key to zero or more item stacks.
pub trait LootResolver {
    /// Roll the table for `key`. Unknown keys yield nothing.
    fn resolve(&self, key: &LootKey, rng: &mut dyn RngCore) -> Vec<ItemStack>;
}

/// One possible drop within a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Item id to drop.
    pub item: String,
    /// Minimum count when the entry fires.
    #[serde(default = "default_count")]
    pub min: u32,
    /// Maximum count when the entry fires.
    #[serde(default = "default_count")]
    pub max: u32,
    /// Probability in `0.0..=1.0` that the entry fires.
    #[serde(default = "default_chance")]
    pub chance: f32,
}

impl LootEntry {
    /// Entry that always drops exactly `count` of `item`.
    pub fn always(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            min: count,
            max: count,
            chance: 1.0,
        }
    }
}

const fn default_count() -> u32 {
    1
}

const fn default_chance() -> f32 {
    1.0
}

/// Key-to-entries loot tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LootTables {
    tables: BTreeMap<String, Vec<LootEntry>>,
}

impl LootTables {
    /// Create an empty set of tables.
    pub const fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    /// Add or replace the table for `key`.
    pub fn insert(&mut self, key: &LootKey, entries: Vec<LootEntry>) {
        self.tables.insert(key.0.clone(), entries);
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether there are no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Check every entry for sane bounds.
    pub fn validate(&self) -> Result<(), WorldError> {
        for (key, entries) in &self.tables {
            for entry in entries {
                if entry.min > entry.max {
                    return Err(WorldError::InvalidLootTable {
                        key: key.clone(),
                        reason: format!(
                            "{}: min {} exceeds max {}",
                            entry.item, entry.min, entry.max
                        ),
                    });
                }
                if !(0.0..=1.0).contains(&entry.chance) {
                    return Err(WorldError::InvalidLootTable {
                        key: key.clone(),
                        reason: format!("{}: chance {} outside 0..=1", entry.item, entry.chance),
                    });
                }
            }
        }
        Ok(())
    }
}

impl LootResolver for LootTables {
    fn resolve(&self, key: &LootKey, rng: &mut dyn RngCore) -> Vec<ItemStack> {
        let Some(entries) = self.tables.get(key.as_str()) else {
            debug!(%key, "no loot table");
            return Vec::new();
        };
        let mut drops = Vec::new();
        for entry in entries {
            if rng.random::<f32>() >= entry.chance {
                continue;
            }
            let count = rng.random_range(entry.min..=entry.max.max(entry.min));
            if count > 0 {
                drops.push(ItemStack::new(entry.item.clone(), count));
            }
        }
        drops
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn keys_follow_pet_base_block_layout() {
        let key = LootKey::scavenge("vegetation_scavenge/fruit", "sweet_berry_bush");
        assert_eq!(key.as_str(), "pet/vegetation_scavenge/fruit/sweet_berry_bush");
    }

    #[test]
    fn yaml_tables_resolve_with_bounds() {
        let yaml = r"
pet/water_scavenge/gravel:
  - item: minecraft:flint
    min: 1
    max: 3
  - item: minecraft:gold_nugget
    chance: 0.0
";
        let tables: LootTables = serde_yml::from_str(yaml).unwrap();
        tables.validate().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let key = LootKey::scavenge("water_scavenge", "gravel");
        for _ in 0..20 {
            let drops = tables.resolve(&key, &mut rng);
            assert_eq!(drops.len(), 1);
            assert_eq!(drops[0].item.as_str(), "minecraft:flint");
            assert!((1..=3).contains(&drops[0].count));
        }
    }

    #[test]
    fn unknown_keys_yield_nothing() {
        let tables = LootTables::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(tables.resolve(&LootKey::scavenge("x", "y"), &mut rng).is_empty());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut tables = LootTables::new();
        tables.insert(
            &LootKey::scavenge("land_scavenge", "air"),
            vec![LootEntry {
                item: "minecraft:red_mushroom".into(),
                min: 3,
                max: 1,
                chance: 1.0,
            }],
        );
        assert!(tables.validate().is_err());
    }
}
