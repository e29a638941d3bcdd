//! Scavenging: terrain profiles and the engine that runs them.
//!
//! Each scavenging role pairs one shared [`TerrainProfile`] with one
//! [`ScavengeEngine`] per agent. [`ProfileSet`] owns the shared profiles and
//! hands out the one matching a role.

pub mod engine;
pub mod land;
pub mod pathing;
pub mod profile;
pub mod vegetation;
pub mod water;

use std::sync::Arc;

use kennel_types::WorkRole;

use crate::config::ScavengeConfig;

pub use engine::{ITEMS_SCAVENGED, ScavengeEngine};
pub use land::{HarvestAction, LandPredicate, LandScavengeProfile, MUSHROOMS_PLANTED};
pub use pathing::flexible_pathing;
pub use profile::TerrainProfile;
pub use vegetation::VegetationScavengeProfile;
pub use water::WaterScavengeProfile;

/// One shared profile per scavenging role, plus the tuning for each.
#[derive(Clone)]
pub struct ProfileSet {
    config: ScavengeConfig,
    water: Arc<dyn TerrainProfile>,
    land: Arc<dyn TerrainProfile>,
    vegetation: Arc<dyn TerrainProfile>,
}

impl core::fmt::Debug for ProfileSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProfileSet")
            .field("water", &self.water.name())
            .field("land", &self.land.name())
            .field("vegetation", &self.vegetation.name())
            .finish_non_exhaustive()
    }
}

impl ProfileSet {
    /// Build the stock profiles from configuration.
    pub fn new(config: &ScavengeConfig) -> Self {
        Self {
            config: config.clone(),
            water: Arc::new(WaterScavengeProfile::new()),
            land: Arc::new(LandScavengeProfile::mushrooms(config.land_search.clone())),
            vegetation: Arc::new(VegetationScavengeProfile::new(&config.vegetation_search)),
        }
    }

    /// Swap in a custom land profile.
    #[must_use]
    pub fn with_land(mut self, land: LandScavengeProfile) -> Self {
        self.land = Arc::new(land);
        self
    }

    /// Profile serving `role`, `None` for roles that do not scavenge.
    pub fn for_role(&self, role: WorkRole) -> Option<Arc<dyn TerrainProfile>> {
        match role {
            WorkRole::ScavengeWater => Some(Arc::clone(&self.water)),
            WorkRole::ScavengeLand => Some(Arc::clone(&self.land)),
            WorkRole::ScavengeVegetation => Some(Arc::clone(&self.vegetation)),
            WorkRole::None | WorkRole::Herding => None,
        }
    }

    /// A fresh engine for `role`, `None` for roles that do not scavenge.
    pub fn engine_for(&self, role: WorkRole) -> Option<ScavengeEngine> {
        let profile = self.for_role(role)?;
        let tuning = self.config.tuning_for(role)?.clone();
        Some(ScavengeEngine::new(profile, tuning))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;

    #[test]
    fn every_scavenge_role_gets_its_own_profile() {
        let set = ProfileSet::new(&ScavengeConfig::default());
        for role in WorkRole::ALL {
            let profile = set.for_role(role);
            assert_eq!(profile.is_some(), role.is_scavenge());
            if let Some(profile) = profile {
                assert_eq!(profile.required_role(), role);
            }
        }
    }

    #[test]
    fn engines_carry_role_tuning() {
        let set = ProfileSet::new(&ScavengeConfig::default());
        let land = set.engine_for(WorkRole::ScavengeLand).unwrap();
        assert_eq!(land.tuning().cooldown_ticks, 1000);
        assert_eq!(land.name(), "scavenge_land");
        assert!(set.engine_for(WorkRole::Herding).is_none());
    }
}
