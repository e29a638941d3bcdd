//! Keep the head above water.

use kennel_types::ControlFlag;
use rand::Rng;

use super::{Behavior, BehaviorContext, ControlFlags};

/// Chance per tick of kicking upward while submerged.
const JUMP_CHANCE: f32 = 0.8;

/// Swims upward while the body is in water.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatBehavior;

impl Behavior for FloatBehavior {
    fn name(&self) -> &'static str {
        "float"
    }

    fn flags(&self) -> ControlFlags {
        ControlFlags::of(ControlFlag::Jump)
    }

    fn can_start(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        cx.body.is_in_water()
    }

    fn tick(&mut self, cx: &mut BehaviorContext<'_>) {
        if cx.body.rng().random::<f32>() < JUMP_CHANCE {
            cx.body.jump();
        }
    }
}
