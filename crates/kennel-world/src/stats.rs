//! Named counters kept per structure.

use std::collections::BTreeMap;

use kennel_types::StructureRef;

/// Records statistics against a structure.
pub trait StatsTracker {
    /// Add `amount` to the `stat` counter for `label` on `structure`.
    fn track(&mut self, structure: &StructureRef, stat: &str, label: &str, amount: u32);
}

/// In-memory statistics, keyed by structure, then stat, then label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsBook {
    counters: BTreeMap<StructureRef, BTreeMap<String, BTreeMap<String, u64>>>,
}

impl StatsBook {
    /// Create an empty book.
    pub const fn new() -> Self {
        Self {
            counters: BTreeMap::new(),
        }
    }

    /// Count for a single label.
    pub fn count(&self, structure: &StructureRef, stat: &str, label: &str) -> u64 {
        self.counters
            .get(structure)
            .and_then(|stats| stats.get(stat))
            .and_then(|labels| labels.get(label))
            .copied()
            .unwrap_or(0)
    }

    /// Sum over all labels of a stat.
    pub fn total(&self, structure: &StructureRef, stat: &str) -> u64 {
        self.counters
            .get(structure)
            .and_then(|stats| stats.get(stat))
            .map_or(0, |labels| labels.values().fold(0u64, |acc, v| acc.saturating_add(*v)))
    }

    /// Iterate `(structure, stat, label, count)` rows.
    pub fn rows(&self) -> impl Iterator<Item = (&StructureRef, &str, &str, u64)> {
        self.counters.iter().flat_map(|(structure, stats)| {
            stats.iter().flat_map(move |(stat, labels)| {
                labels
                    .iter()
                    .map(move |(label, n)| (structure, stat.as_str(), label.as_str(), *n))
            })
        })
    }
}

impl StatsTracker for StatsBook {
    fn track(&mut self, structure: &StructureRef, stat: &str, label: &str, amount: u32) {
        let slot = self
            .counters
            .entry(structure.clone())
            .or_default()
            .entry(stat.to_owned())
            .or_default()
            .entry(label.to_owned())
            .or_default();
        *slot = slot.saturating_add(u64::from(amount));
    }
}
