//! The animate body a work context drives.
//!
//! [`AgentBody`] is what behaviors see of the agent: where it is, whether
//! it may act, its health, its navigator, and its random source.
//! [`PetBody`] is the concrete body used by the simulation binary and the
//! tests; the host moves it one path node per tick with [`PetBody::advance`].

use kennel_types::{AgentId, BlockPos, DimensionId, Locomotion, Vec3};
use kennel_world::{GridNavigator, Navigator, World};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Agent state behaviors may read and steer.
pub trait AgentBody {
    /// Stable identity.
    fn id(&self) -> AgentId;

    /// Numeric entity id, used to jitter periodic gates.
    fn entity_id(&self) -> u32;

    /// Feet position.
    fn position(&self) -> Vec3;

    /// Block the feet are in.
    fn block_position(&self) -> BlockPos {
        self.position().block_pos()
    }

    /// Dimension the body is loaded in, `None` while unloaded.
    fn dimension(&self) -> Option<&DimensionId>;

    /// Whether the body is alive.
    fn is_alive(&self) -> bool;

    /// Whether the body rides something.
    fn is_passenger(&self) -> bool;

    /// Whether the body is leashed or otherwise held in place.
    fn is_restrained(&self) -> bool;

    /// Whether the host switched off its AI.
    fn is_ai_disabled(&self) -> bool;

    /// Whether the body moved during the last host step.
    fn is_moving(&self) -> bool;

    /// Whether the body is fighting something.
    fn has_attack_target(&self) -> bool;

    /// Whether the feet are in water.
    fn is_in_water(&self) -> bool;

    /// Current health.
    fn health(&self) -> f32;

    /// Maximum health.
    fn max_health(&self) -> f32;

    /// Restore up to `amount` health.
    fn heal(&mut self, amount: f32);

    /// Request a jump on the next host step.
    fn jump(&mut self);

    /// Path follower.
    fn navigator(&self) -> &dyn Navigator;

    /// Mutable path follower.
    fn navigator_mut(&mut self) -> &mut dyn Navigator;

    /// Per-agent random source.
    fn rng(&mut self) -> &mut dyn RngCore;

    /// How the body moves.
    fn locomotion(&self) -> Locomotion {
        self.navigator().locomotion()
    }

    /// Whether the body may act on its own at all.
    fn is_free_to_act(&self) -> bool {
        self.is_alive() && !self.is_passenger() && !self.is_restrained()
    }
}

/// In-memory body driven by a [`GridNavigator`].
#[derive(Debug, Clone)]
pub struct PetBody {
    id: AgentId,
    entity_id: u32,
    position: Vec3,
    dimension: Option<DimensionId>,
    alive: bool,
    passenger: bool,
    restrained: bool,
    ai_disabled: bool,
    attack_target: bool,
    health: f32,
    max_health: f32,
    moving: bool,
    in_water: bool,
    jump_requested: bool,
    navigator: GridNavigator,
    rng: StdRng,
}

impl PetBody {
    /// Spawn a healthy body standing at `at`.
    pub fn new(
        id: AgentId,
        entity_id: u32,
        at: BlockPos,
        dimension: DimensionId,
        locomotion: Locomotion,
        seed: u64,
    ) -> Self {
        Self {
            id,
            entity_id,
            position: at.bottom_center(),
            dimension: Some(dimension),
            alive: true,
            passenger: false,
            restrained: false,
            ai_disabled: false,
            attack_target: false,
            health: 10.0,
            max_health: 10.0,
            moving: false,
            in_water: false,
            jump_requested: false,
            navigator: GridNavigator::new(locomotion),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Move to `at` without pathing.
    pub fn teleport(&mut self, at: BlockPos) {
        self.position = at.bottom_center();
    }

    /// Set health, clamped to the maximum.
    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
        self.alive = self.health > 0.0;
    }

    /// Detach from (or attach to) a world.
    pub fn set_dimension(&mut self, dimension: Option<DimensionId>) {
        self.dimension = dimension;
    }

    /// Hold the body in place, or release it.
    pub const fn set_restrained(&mut self, restrained: bool) {
        self.restrained = restrained;
    }

    /// Switch the host AI off or on.
    pub const fn set_ai_disabled(&mut self, disabled: bool) {
        self.ai_disabled = disabled;
    }

    /// Mark the body as killed.
    pub const fn kill(&mut self) {
        self.alive = false;
    }

    /// One host movement step.
    ///
    /// Applies a pending jump, then moves into the next path node unless
    /// that node currently collides (a closed door), in which case the body
    /// waits in place.
    pub fn advance(&mut self, world: &dyn World) {
        self.moving = false;
        let here = self.block_position();
        if std::mem::take(&mut self.jump_requested)
            && self.in_water
            && !world.block(here.above()).collision
        {
            self.position = self.position.offset(0.0, 1.0, 0.0);
            self.moving = true;
        }
        if let Some(next) = self.navigator.peek_step() {
            if !world.block(next).collision && !world.block(next.above()).collision {
                self.navigator.next_step();
                self.position = next.bottom_center();
                self.moving = true;
            }
        }
        self.in_water = world.block(self.block_position()).water;
    }
}

impl AgentBody for PetBody {
    fn id(&self) -> AgentId {
        self.id
    }

    fn entity_id(&self) -> u32 {
        self.entity_id
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn dimension(&self) -> Option<&DimensionId> {
        self.dimension.as_ref()
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn is_passenger(&self) -> bool {
        self.passenger
    }

    fn is_restrained(&self) -> bool {
        self.restrained
    }

    fn is_ai_disabled(&self) -> bool {
        self.ai_disabled
    }

    fn is_moving(&self) -> bool {
        self.moving
    }

    fn has_attack_target(&self) -> bool {
        self.attack_target
    }

    fn is_in_water(&self) -> bool {
        self.in_water
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn heal(&mut self, amount: f32) {
        if self.alive {
            self.health = (self.health + amount.max(0.0)).min(self.max_health);
        }
    }

    fn jump(&mut self) {
        self.jump_requested = true;
    }

    fn navigator(&self) -> &dyn Navigator {
        &self.navigator
    }

    fn navigator_mut(&mut self) -> &mut dyn Navigator {
        &mut self.navigator
    }

    fn rng(&mut self) -> &mut dyn RngCore {
        &mut self.rng
    }
}
