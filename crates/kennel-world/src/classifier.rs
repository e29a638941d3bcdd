//! Work-location classification.
//!
//! A work location's role is whatever structure (or station block) sits on
//! it. The mapping is recomputed on every call and never cached, so moving
//! or breaking a structure changes the role on the very next tick.

use kennel_types::{BlockPos, BlockTag, StructureKind, WorkRole};

use crate::world::World;

/// Stateless classifier. Exists so callers can hold it as a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkRoleClassifier;

impl WorkRoleClassifier {
    /// Role for the work location at `pos`.
    pub fn classify(self, world: &dyn World, pos: BlockPos) -> WorkRole {
        classify(world, pos)
    }

    /// Whether `pos` is still occupied by a valid work-location type.
    pub fn is_work_location(self, world: &dyn World, pos: BlockPos) -> bool {
        classify(world, pos) != WorkRole::None
    }
}

/// Map the structure occupying `pos` to a [`WorkRole`].
///
/// The unset sentinel and unrecognized positions map to [`WorkRole::None`].
/// Vegetation stations are ordinary blocks matched by tag.
pub fn classify(world: &dyn World, pos: BlockPos) -> WorkRole {
    if pos.is_unset() {
        return WorkRole::None;
    }
    match world.structure_at(pos) {
        Some(StructureKind::Trough) => WorkRole::Herding,
        Some(StructureKind::ScavengeStation) => WorkRole::ScavengeLand,
        Some(StructureKind::Dredger) => WorkRole::ScavengeWater,
        Some(StructureKind::TrainerHut) => WorkRole::None,
        None if world.block_has_tag(pos, BlockTag::VegetationStation) => {
            WorkRole::ScavengeVegetation
        }
        None => WorkRole::None,
    }
}
