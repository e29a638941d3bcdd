//! Type-safe identifier wrappers.
//!
//! Agents carry a UUID v7 identity that survives serialization. Colonies
//! are numbered by the host, and dimensions are named. A [`StructureRef`]
//! pins a structure down by position plus dimension so it can be resolved
//! lazily after a reload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::position::BlockPos;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Stable identity of a work agent, persisted across save/load.
    AgentId
}

/// Host-assigned colony number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ColonyId(pub u32);

impl core::fmt::Display for ColonyId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "colony#{}", self.0)
    }
}

/// Name of a world dimension, e.g. `overworld`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DimensionId(pub String);

impl DimensionId {
    /// Create a dimension id from any string-like name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The default surface dimension.
    pub fn overworld() -> Self {
        Self::new("overworld")
    }

    /// Borrow the dimension name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DimensionId {
    fn default() -> Self {
        Self::overworld()
    }
}

impl core::fmt::Display for DimensionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A structure handle: position plus dimension, resolved lazily.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StructureRef {
    /// Anchor block of the structure.
    pub position: BlockPos,
    /// Dimension the structure lives in.
    pub dimension: DimensionId,
}

impl StructureRef {
    /// Build a structure handle.
    pub const fn new(position: BlockPos, dimension: DimensionId) -> Self {
        Self {
            position,
            dimension,
        }
    }
}

impl core::fmt::Display for StructureRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}@{}", self.position, self.dimension)
    }
}
