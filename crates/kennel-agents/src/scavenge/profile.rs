//! The terrain strategy contract.

use kennel_types::{BlockPos, BlockState, WorkRole};
use kennel_world::{LootKey, World};
use rand::{Rng, RngCore};

use crate::behavior::BehaviorContext;

/// Terrain-specific half of a scavenging run.
///
/// A profile decides where to look, where to stand, what counts as
/// harvestable, which loot key a harvest rolls, and what the world looks
/// like afterwards. It holds no per-agent state, so one instance is shared
/// by every agent of its role.
pub trait TerrainProfile: Send + Sync {
    /// Short name, also used as the engine's behavior name.
    fn name(&self) -> &'static str;

    /// Role an agent must hold for this profile to run.
    fn required_role(&self) -> WorkRole;

    /// Look for a harvest target within `radius` of the search origin.
    fn find_target(&self, cx: &mut BehaviorContext<'_>, radius: i32) -> Option<BlockPos>;

    /// Cell the agent should navigate to in order to work `target`.
    fn navigation_anchor(&self, cx: &BehaviorContext<'_>, target: BlockPos) -> BlockPos;

    /// Vertical offset added to the anchor when re-issuing moves.
    fn navigation_y_offset(&self) -> f64;

    /// Whether `state` at `pos` may be harvested right now.
    fn is_harvestable(&self, world: &dyn World, pos: BlockPos, state: &BlockState) -> bool;

    /// Loot key rolled for a harvest at `pos`, `None` if nothing drops.
    fn loot_key(&self, world: &dyn World, pos: BlockPos, state: &BlockState) -> Option<LootKey>;

    /// World changes and cosmetics after a successful harvest.
    fn on_harvest_success(&self, cx: &mut BehaviorContext<'_>, pos: BlockPos);
}

/// Symmetric offset in `-radius..radius`, the way every profile samples.
pub(crate) fn sample_offset(rng: &mut dyn RngCore, radius: i32) -> i32 {
    let radius = radius.max(1);
    rng.random_range(0..radius.saturating_mul(2))
        .saturating_sub(radius)
}
