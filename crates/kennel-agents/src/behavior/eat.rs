//! Heal by eating carried food.

use kennel_types::{ControlFlag, ItemId};
use tracing::debug;

use super::{Behavior, BehaviorContext, ControlFlags};
use crate::config::BaselineConfig;

/// Eats one food item from the store while injured.
///
/// A meal lands `windup` ticks after the run starts and heals at most the
/// configured amount, never more than the missing health.
#[derive(Debug, Clone)]
pub struct EatFromInventoryBehavior {
    food: Vec<ItemId>,
    heal: f32,
    cooldown: u64,
    windup: u64,
    last_meal: Option<u64>,
    eat_at: Option<u64>,
}

impl EatFromInventoryBehavior {
    /// Build from baseline tunables.
    pub fn new(config: &BaselineConfig) -> Self {
        Self {
            food: config.food_items.iter().map(ItemId::new).collect(),
            heal: config.heal_per_meal,
            cooldown: config.eat_cooldown_ticks,
            windup: config.eat_windup_ticks,
            last_meal: None,
            eat_at: None,
        }
    }

    fn is_food(&self, item: &ItemId) -> bool {
        self.food.contains(item)
    }
}

impl Behavior for EatFromInventoryBehavior {
    fn name(&self) -> &'static str {
        "eat_from_inventory"
    }

    fn flags(&self) -> ControlFlags {
        ControlFlags::of(ControlFlag::Look)
    }

    fn can_start(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        if !cx.body.is_alive() || cx.body.health() >= cx.body.max_health() {
            return false;
        }
        let now = cx.now();
        if self
            .last_meal
            .is_some_and(|t| now.saturating_sub(t) < self.cooldown)
        {
            return false;
        }
        cx.work.store.stacks().any(|s| self.is_food(&s.item))
    }

    fn can_continue(&mut self, cx: &mut BehaviorContext<'_>) -> bool {
        self.eat_at.is_some() && cx.body.is_alive()
    }

    fn start(&mut self, cx: &mut BehaviorContext<'_>) {
        self.eat_at = Some(cx.now().saturating_add(self.windup));
    }

    fn tick(&mut self, cx: &mut BehaviorContext<'_>) {
        let now = cx.now();
        if self.eat_at.is_none_or(|t| now < t) {
            return;
        }
        self.eat_at = None;
        let missing = (cx.body.max_health() - cx.body.health()).max(0.0);
        if missing <= 0.0 {
            return;
        }
        let food = &self.food;
        if let Some(meal) = cx.work.store.take_one(|item| food.contains(item)) {
            let amount = self.heal.min(missing);
            cx.body.heal(amount);
            self.last_meal = Some(now);
            debug!(agent = %cx.body.id(), item = %meal.item, amount, "ate from store");
        }
    }

    fn stop(&mut self, _cx: &mut BehaviorContext<'_>) {
        self.eat_at = None;
    }
}
