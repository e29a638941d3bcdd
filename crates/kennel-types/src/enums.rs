//! Enumeration types for the Kennel simulation.
//!
//! [`WorkRole`] is persisted by name rather than ordinal so that adding or
//! reordering variants never corrupts saved agents; unknown names decode to
//! [`WorkRole::None`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Work roles
// ---------------------------------------------------------------------------

/// Behavioral category of a work agent, derived from its work location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum WorkRole {
    /// No recognized work location.
    #[default]
    None,
    /// Herds livestock around a trough.
    Herding,
    /// Scavenges dark soil around a scavenge station.
    ScavengeLand,
    /// Dredges shallow water near a dredger.
    ScavengeWater,
    /// Picks fruit and leaves near a vegetation station.
    ScavengeVegetation,
}

impl WorkRole {
    /// Every role, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Herding,
        Self::ScavengeLand,
        Self::ScavengeWater,
        Self::ScavengeVegetation,
    ];

    /// Stable wire name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Herding => "HERDING",
            Self::ScavengeLand => "SCAVENGE_LAND",
            Self::ScavengeWater => "SCAVENGE_WATER",
            Self::ScavengeVegetation => "SCAVENGE_VEGETATION",
        }
    }

    /// Decode a wire name. Unknown names map to [`WorkRole::None`].
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|role| role.name() == name)
            .unwrap_or_default()
    }

    /// Whether this role is served by a scavenging engine.
    pub const fn is_scavenge(self) -> bool {
        matches!(
            self,
            Self::ScavengeLand | Self::ScavengeWater | Self::ScavengeVegetation
        )
    }
}

impl From<String> for WorkRole {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<WorkRole> for &'static str {
    fn from(role: WorkRole) -> Self {
        role.name()
    }
}

impl core::fmt::Display for WorkRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// World vocabulary
// ---------------------------------------------------------------------------

/// Block tags the agents query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTag {
    /// Floor materials worth dredging (gravel, clay, sand).
    WaterScavenge,
    /// Ice-like blocks that count as both floor and water surface.
    Icy,
    /// Fruiting plants.
    Fruit,
    /// Leaves that may drop apples.
    AppleLeaves,
    /// Any other leaves.
    Leaves,
    /// Soil a mushroom may be planted on: plain dirt as well as the
    /// blocks mushrooms spread on in any light, such as podzol and mycelium.
    MushroomSoil,
    /// Doors and gates an agent may open.
    Door,
    /// Work-location block for vegetation scavenging.
    VegetationStation,
}

impl BlockTag {
    /// Tag path used when composing loot keys.
    pub const fn path(self) -> &'static str {
        match self {
            Self::WaterScavenge => "water_scavenge",
            Self::Icy => "icy",
            Self::Fruit => "fruit",
            Self::AppleLeaves => "apple_leaves",
            Self::Leaves => "leaves",
            Self::MushroomSoil => "mushroom_soil",
            Self::Door => "door",
            Self::VegetationStation => "vegetation_station",
        }
    }
}

/// Kinds of colony structure that can occupy a work location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Feeding trough. Herding work location.
    Trough,
    /// Land scavenge station.
    ScavengeStation,
    /// Water dredger.
    Dredger,
    /// Trainer hut that owns agents.
    TrainerHut,
}

/// How an agent gets around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locomotion {
    /// Walks on sturdy floors.
    #[default]
    Ground,
    /// Flies through open air.
    Flying,
}

/// Control channels a behavior may claim while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ControlFlag {
    /// Body movement.
    Move,
    /// Head rotation.
    Look,
    /// Jumping and swimming.
    Jump,
    /// Attack targeting.
    Target,
}

impl ControlFlag {
    /// Every flag.
    pub const ALL: [Self; 4] = [Self::Move, Self::Look, Self::Jump, Self::Target];

    /// Bit used in flag sets.
    pub const fn bit(self) -> u8 {
        match self {
            Self::Move => 0b0001,
            Self::Look => 0b0010,
            Self::Jump => 0b0100,
            Self::Target => 0b1000,
        }
    }
}

/// Why an agent left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// It died.
    Killed,
    /// It was retired by its owner.
    Discarded,
    /// Anything else (unloaded with its chunk, wandered off).
    Other,
}

impl RemovalReason {
    /// Statistic recorded on the trainer structure.
    pub const fn stat_name(self) -> &'static str {
        match self {
            Self::Killed => "pets_died",
            Self::Discarded => "pets_retired",
            Self::Other => "pets_ranaway",
        }
    }
}

// ---------------------------------------------------------------------------
// Cosmetic effects
// ---------------------------------------------------------------------------

/// Particle kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Particle {
    /// Underwater bubbles.
    Bubble,
    /// Green sparkles.
    HappyVillager,
    /// Compost specks.
    Composter,
    /// Mushroom spores.
    Spore,
}

/// Sound kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    /// Shovel scraping a floor.
    ShovelFlatten,
    /// Berries popping off a bush.
    BerryPick,
    /// Rustling leaves.
    GrassBreak,
    /// Fungus being set down.
    FungusPlace,
}

/// A cosmetic world effect. Never mutates blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// A burst of particles.
    Particles {
        /// Which particle.
        particle: Particle,
        /// How many.
        count: u32,
    },
    /// A one-shot sound.
    Sound(Sound),
}
