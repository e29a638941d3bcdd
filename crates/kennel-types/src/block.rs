//! Block states and their properties.
//!
//! A [`BlockState`] is a block id plus the physical facts the scavenging
//! code cares about (collision, whether the top face can carry weight,
//! whether the cell holds water) and an open property map. Properties are
//! either bounded integers (`age`) or booleans (`berries`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the integer growth-stage property on crops and bushes.
pub const AGE: &str = "age";

/// Name of the boolean fruit flag on berry vines.
pub const BERRIES: &str = "berries";

/// Namespaced block identifier, e.g. `minecraft:sweet_berry_bush`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub String);

impl BlockId {
    /// Create a block id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the full id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id without its namespace (`sweet_berry_bush`).
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, path)| path)
    }
}

impl core::fmt::Display for BlockId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bounded integer property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntProperty {
    /// Current value.
    pub value: i32,
    /// Smallest legal value.
    pub min: i32,
    /// Largest legal value.
    pub max: i32,
}

/// A single block-state property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockProperty {
    /// Bounded integer (growth stage and similar).
    Int(IntProperty),
    /// Boolean flag.
    Bool(bool),
}

/// Full state of a block cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
    /// Which block this is.
    pub block: BlockId,
    /// Whether entities collide with it.
    pub collision: bool,
    /// Whether its top face can be stood on.
    pub sturdy_top: bool,
    /// Whether the cell holds water (source, flowing, or waterlogged).
    pub water: bool,
    properties: BTreeMap<String, BlockProperty>,
}

impl BlockState {
    /// Empty air.
    pub fn air() -> Self {
        Self::passable("minecraft:air")
    }

    /// A full solid cube.
    pub fn solid(id: impl Into<String>) -> Self {
        Self {
            block: BlockId::new(id),
            collision: true,
            sturdy_top: true,
            water: false,
            properties: BTreeMap::new(),
        }
    }

    /// A non-colliding block that is not air (plants, mushrooms, fruit).
    pub fn passable(id: impl Into<String>) -> Self {
        Self {
            block: BlockId::new(id),
            collision: false,
            sturdy_top: false,
            water: false,
            properties: BTreeMap::new(),
        }
    }

    /// A water source block.
    pub fn water() -> Self {
        Self {
            water: true,
            ..Self::passable("minecraft:water")
        }
    }

    /// Builder: attach a bounded integer property.
    #[must_use]
    pub fn with_int(mut self, name: &str, value: i32, min: i32, max: i32) -> Self {
        self.properties.insert(
            name.to_owned(),
            BlockProperty::Int(IntProperty {
                value: value.clamp(min, max),
                min,
                max,
            }),
        );
        self
    }

    /// Builder: attach a boolean property.
    #[must_use]
    pub fn with_bool(mut self, name: &str, value: bool) -> Self {
        self.properties
            .insert(name.to_owned(), BlockProperty::Bool(value));
        self
    }

    /// Whether this is air.
    pub fn is_air(&self) -> bool {
        self.block.as_str() == "minecraft:air"
    }

    /// Integer property by name, if this block exposes one.
    pub fn int_property(&self, name: &str) -> Option<IntProperty> {
        match self.properties.get(name) {
            Some(BlockProperty::Int(p)) => Some(*p),
            _ => None,
        }
    }

    /// Boolean property by name, if this block exposes one.
    pub fn bool_property(&self, name: &str) -> Option<bool> {
        match self.properties.get(name) {
            Some(BlockProperty::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Copy of this state with an integer property changed.
    ///
    /// The value is clamped to the property's bounds. Returns `None` if the
    /// property does not exist or is not an integer.
    pub fn with_int_value(&self, name: &str, value: i32) -> Option<Self> {
        let current = self.int_property(name)?;
        Some(self.clone().with_int(name, value, current.min, current.max))
    }

    /// Copy of this state with a boolean property changed.
    ///
    /// Returns `None` if the property does not exist or is not a boolean.
    pub fn with_bool_value(&self, name: &str, value: bool) -> Option<Self> {
        self.bool_property(name)?;
        Some(self.clone().with_bool(name, value))
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_strips_namespace() {
        assert_eq!(BlockId::new("minecraft:gravel").path(), "gravel");
        assert_eq!(BlockId::new("gravel").path(), "gravel");
    }

    #[test]
    fn int_properties_are_clamped() {
        let bush = BlockState::passable("minecraft:sweet_berry_bush").with_int(AGE, 9, 0, 3);
        assert_eq!(bush.int_property(AGE).map(|p| p.value), Some(3));
        let picked = bush.with_int_value(AGE, -4);
        assert_eq!(picked.and_then(|s| s.int_property(AGE)).map(|p| p.value), Some(0));
    }

    #[test]
    fn property_kinds_do_not_cross() {
        let vines = BlockState::passable("minecraft:cave_vines").with_bool(BERRIES, true);
        assert_eq!(vines.int_property(BERRIES), None);
        assert_eq!(vines.bool_property(BERRIES), Some(true));
        assert!(vines.with_int_value(BERRIES, 1).is_none());
        assert_eq!(
            vines.with_bool_value(BERRIES, false).and_then(|s| s.bool_property(BERRIES)),
            Some(false)
        );
    }

    #[test]
    fn water_is_not_air_and_has_no_collision() {
        let w = BlockState::water();
        assert!(w.water);
        assert!(!w.is_air());
        assert!(!w.collision);
        assert!(BlockState::default().is_air());
    }
}
