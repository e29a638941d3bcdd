//! Tunables for scavenging, the watchdog, and the baseline behaviors.
//!
//! Every struct deserializes with `#[serde(default)]`, so a YAML document
//! only needs to name the values it overrides. The [`Default`] impls carry
//! the values the simulation has always shipped with.

use kennel_types::WorkRole;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Tuning for one [`ScavengeEngine`](crate::scavenge::ScavengeEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    /// Horizontal sampling radius around the search origin (default: 8).
    pub search_radius: i32,

    /// Probability that one harvest roll succeeds (default: 0.08).
    pub chance_to_find: f32,

    /// Ticks after a reset before a new search may begin (default: 200).
    pub cooldown_ticks: u64,

    /// Search tries granted to each run (default: 10).
    pub max_search_tries: u32,

    /// Period of the jittered activation gate, in ticks (default: 8).
    pub gate_period_ticks: u64,

    /// Probability that an open gate lets the run start (default: 0.25).
    pub gate_acceptance: f32,

    /// Ticks a preempted run may be resumed without re-rolling (default: 100).
    pub resume_grace_ticks: u64,

    /// Distance to the anchor center that counts as arrived (default: 2.25).
    pub acceptance_radius: f64,

    /// Ticks between stuck-position samples (default: 10).
    pub stuck_sample_interval: u64,

    /// Consecutive unchanged samples tolerated; every sample past this
    /// forfeits one try (default: 4).
    pub stuck_limit: u32,

    /// Navigation speed used for the approach (default: 1.0).
    pub speed: f64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self::water()
    }
}

impl EngineTuning {
    /// Tuning for dredging shallow water.
    pub const fn water() -> Self {
        Self {
            search_radius: 8,
            chance_to_find: 0.08,
            cooldown_ticks: 200,
            max_search_tries: 10,
            gate_period_ticks: 8,
            gate_acceptance: 0.25,
            resume_grace_ticks: 100,
            acceptance_radius: 2.25,
            stuck_sample_interval: 10,
            stuck_limit: 4,
            speed: 1.0,
        }
    }

    /// Tuning for the dark-soil land role.
    pub const fn land() -> Self {
        Self {
            search_radius: 16,
            chance_to_find: 0.3,
            cooldown_ticks: 1000,
            ..Self::water()
        }
    }

    /// Tuning for fruit and leaf gathering.
    pub const fn vegetation() -> Self {
        Self {
            search_radius: 12,
            chance_to_find: 0.25,
            cooldown_ticks: 400,
            ..Self::water()
        }
    }

    /// Check ranges that would otherwise make the engine spin or stall.
    pub fn validate(&self, role: &str) -> Result<(), AgentError> {
        let field = |name: &str| format!("scavenge.{role}.{name}");
        if self.search_radius < 1 {
            return Err(AgentError::InvalidConfig {
                field: field("search_radius"),
                reason: String::from("must be at least 1"),
            });
        }
        if !(0.0..=1.0).contains(&self.chance_to_find) {
            return Err(AgentError::InvalidConfig {
                field: field("chance_to_find"),
                reason: String::from("must lie in 0..=1"),
            });
        }
        if !(0.0..=1.0).contains(&self.gate_acceptance) {
            return Err(AgentError::InvalidConfig {
                field: field("gate_acceptance"),
                reason: String::from("must lie in 0..=1"),
            });
        }
        if self.max_search_tries == 0 {
            return Err(AgentError::InvalidConfig {
                field: field("max_search_tries"),
                reason: String::from("must be at least 1"),
            });
        }
        if self.gate_period_ticks == 0 || self.stuck_sample_interval == 0 {
            return Err(AgentError::InvalidConfig {
                field: field("gate_period_ticks"),
                reason: String::from("periods must be non-zero"),
            });
        }
        Ok(())
    }
}

/// Sampling bounds for the vegetation profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationSearch {
    /// Random cells sampled per search, clamped to 40..=240 (default: 140).
    pub samples: u32,

    /// Highest sampled layer above the agent, at least 2 (default: 10).
    pub max_vertical: i32,

    /// Deepest descent when looking for ground under a canopy, at least 2
    /// (default: 14).
    pub down_search: u32,
}

impl Default for VegetationSearch {
    fn default() -> Self {
        Self {
            samples: 140,
            max_vertical: 10,
            down_search: 14,
        }
    }
}

impl VegetationSearch {
    /// Copy with every field forced into its accepted range.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            samples: self.samples.clamp(40, 240),
            max_vertical: self.max_vertical.max(2),
            down_search: self.down_search.max(2),
        }
    }
}

/// Sampling bounds for the land profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandSearch {
    /// Light level a candidate must stay below (default: 8).
    pub max_light: u8,

    /// Random cells sampled per search (default: 20).
    pub samples: u32,
}

impl Default for LandSearch {
    fn default() -> Self {
        Self {
            max_light: 8,
            samples: 20,
        }
    }
}

/// Per-role scavenging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScavengeConfig {
    /// Water role tuning.
    pub water: EngineTuning,
    /// Land role tuning.
    pub land: EngineTuning,
    /// Vegetation role tuning.
    pub vegetation: EngineTuning,
    /// Vegetation sampling bounds.
    pub vegetation_search: VegetationSearch,
    /// Land sampling bounds.
    pub land_search: LandSearch,
}

impl Default for ScavengeConfig {
    fn default() -> Self {
        Self {
            water: EngineTuning::water(),
            land: EngineTuning::land(),
            vegetation: EngineTuning::vegetation(),
            vegetation_search: VegetationSearch::default(),
            land_search: LandSearch::default(),
        }
    }
}

impl ScavengeConfig {
    /// Tuning for a scavenging role, `None` for the others.
    pub const fn tuning_for(&self, role: WorkRole) -> Option<&EngineTuning> {
        match role {
            WorkRole::ScavengeWater => Some(&self.water),
            WorkRole::ScavengeLand => Some(&self.land),
            WorkRole::ScavengeVegetation => Some(&self.vegetation),
            WorkRole::None | WorkRole::Herding => None,
        }
    }
}

/// Stall watchdog thresholds.
///
/// Thresholds count evaluations, not ticks: with the default interval an
/// agent is re-registered after 50 idle evaluations, i.e. 1000 ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Ticks between evaluations (default: 20).
    pub interval_ticks: u64,

    /// Stalled evaluations before control flags are forced on (default: 10).
    pub enable_flags_at: u32,

    /// Stalled evaluations before navigation is stopped (default: 20).
    pub stop_navigation_at: u32,

    /// Stalled evaluations before behaviors are re-registered (default: 50).
    pub reregister_at: u32,

    /// Ticks after any re-registration during which nothing is evaluated
    /// (default: 60).
    pub grace_ticks: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 20,
            enable_flags_at: 10,
            stop_navigation_at: 20,
            reregister_at: 50,
            grace_ticks: 60,
        }
    }
}

/// Tunables for the baseline behavior set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Ticks between meals (default: 300).
    pub eat_cooldown_ticks: u64,

    /// Ticks spent chewing before the heal lands (default: 10).
    pub eat_windup_ticks: u64,

    /// Health restored per meal (default: 2.0).
    pub heal_per_meal: f32,

    /// Items the agent will eat.
    pub food_items: Vec<String>,

    /// Occupied slot fraction that sends the agent to unload (default: 0.4).
    pub unload_threshold: f32,

    /// Distance to the work location at which unloading happens
    /// (default: 2.5).
    pub unload_reach: f64,

    /// Re-path attempts before an unload trip gives up (default: 3).
    pub unload_max_repaths: u32,

    /// Ticks before an unload trip gives up (default: 240).
    pub unload_timeout_ticks: u64,

    /// Ticks to wait after a failed unload trip (default: 40).
    pub unload_backoff_ticks: u64,

    /// Distance from work beyond which the agent walks back (default: 16.0).
    pub work_leash: f64,

    /// Distance from work at which the walk back ends (default: 2.0).
    pub work_stop_distance: f64,

    /// Speed of the walk back (default: 1.2).
    pub work_walk_speed: f64,

    /// Ticks a door stays open after the agent passes (default: 20).
    pub door_close_delay: u64,

    /// Distance from the trainer that triggers the night return
    /// (default: 2.0).
    pub night_start_distance: f64,

    /// Distance from the trainer that ends the night return (default: 1.5).
    pub night_arrive_distance: f64,

    /// Ticks between night-return re-paths (default: 40).
    pub night_repath_ticks: u64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            eat_cooldown_ticks: 300,
            eat_windup_ticks: 10,
            heal_per_meal: 2.0,
            food_items: vec![
                String::from("minecraft:sweet_berries"),
                String::from("minecraft:apple"),
                String::from("minecraft:kelp"),
            ],
            unload_threshold: 0.4,
            unload_reach: 2.5,
            unload_max_repaths: 3,
            unload_timeout_ticks: 240,
            unload_backoff_ticks: 40,
            work_leash: 16.0,
            work_stop_distance: 2.0,
            work_walk_speed: 1.2,
            door_close_delay: 20,
            night_start_distance: 2.0,
            night_arrive_distance: 1.5,
            night_repath_ticks: 40,
        }
    }
}

/// Everything an [`AgentWorkContext`](crate::context::AgentWorkContext)
/// needs to build its behaviors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Slots in each agent's item store (default: 9).
    pub store_slots: usize,
    /// Scavenging tunables.
    pub scavenge: ScavengeConfig,
    /// Watchdog thresholds.
    pub watchdog: WatchdogConfig,
    /// Baseline behavior tunables.
    pub baseline: BaselineConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            store_slots: 9,
            scavenge: ScavengeConfig::default(),
            watchdog: WatchdogConfig::default(),
            baseline: BaselineConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Check every section.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.store_slots == 0 {
            return Err(AgentError::InvalidConfig {
                field: String::from("store_slots"),
                reason: String::from("must be at least 1"),
            });
        }
        if self.watchdog.interval_ticks == 0 {
            return Err(AgentError::InvalidConfig {
                field: String::from("watchdog.interval_ticks"),
                reason: String::from("must be non-zero"),
            });
        }
        let dog = &self.watchdog;
        if !(dog.enable_flags_at < dog.stop_navigation_at && dog.stop_navigation_at < dog.reregister_at)
            || dog.enable_flags_at == 0
        {
            return Err(AgentError::InvalidConfig {
                field: String::from("watchdog"),
                reason: String::from("thresholds must be non-zero and strictly increasing"),
            });
        }
        if !(0.0..=1.0).contains(&self.baseline.unload_threshold) {
            return Err(AgentError::InvalidConfig {
                field: String::from("baseline.unload_threshold"),
                reason: String::from("must lie in 0..=1"),
            });
        }
        self.scavenge.water.validate("water")?;
        self.scavenge.land.validate("land")?;
        self.scavenge.vegetation.validate("vegetation")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_differ_only_in_radius_chance_and_cooldown() {
        let land = EngineTuning::land();
        assert_eq!(land.search_radius, 16);
        assert_eq!(land.cooldown_ticks, 1000);
        assert_eq!(land.max_search_tries, EngineTuning::water().max_search_tries);
        let veg = EngineTuning::vegetation();
        assert_eq!(veg.search_radius, 12);
        assert!((veg.chance_to_find - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "scavenge:\n  water:\n    cooldown_ticks: 50\nwatchdog:\n  reregister_at: 60\n";
        let config: AgentConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.scavenge.water.cooldown_ticks, 50);
        assert_eq!(config.scavenge.water.search_radius, 8);
        assert_eq!(config.scavenge.land, EngineTuning::land());
        assert_eq!(config.watchdog.reregister_at, 60);
        assert_eq!(config.watchdog.interval_ticks, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn vegetation_search_is_clamped() {
        let wild = VegetationSearch {
            samples: 5000,
            max_vertical: 0,
            down_search: 1,
        };
        let c = wild.clamped();
        assert_eq!(c.samples, 240);
        assert_eq!(c.max_vertical, 2);
        assert_eq!(c.down_search, 2);
        assert_eq!(VegetationSearch { samples: 3, ..wild }.clamped().samples, 40);
    }

    #[test]
    fn out_of_range_chance_is_rejected() {
        let mut config = AgentConfig::default();
        config.scavenge.land.chance_to_find = 1.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AgentError::InvalidConfig { ref field, .. } if field == "scavenge.land.chance_to_find"));
    }

    #[test]
    fn non_scavenge_roles_have_no_tuning() {
        let config = ScavengeConfig::default();
        assert!(config.tuning_for(WorkRole::Herding).is_none());
        assert!(config.tuning_for(WorkRole::None).is_none());
        assert_eq!(
            config.tuning_for(WorkRole::ScavengeWater),
            Some(&EngineTuning::water())
        );
    }
}
