//! Stall detection for an agent whose behaviors have all gone quiet.
//!
//! The watchdog only counts and decides. [`Watchdog::tick`] returns the
//! escalation step to take, and the work context carries it out. Each step
//! fires once, on the evaluation where the stall count reaches its
//! threshold:
//!
//! | Stalled evaluations | Action |
//! |---|---|
//! | `enable_flags_at` | force movement, look and target flags back on |
//! | `stop_navigation_at` | drop whatever path is stuck |
//! | `reregister_at` | tear down and rebuild every behavior |
//!
//! A re-registration restarts the grace period, during which nothing is
//! evaluated.

use tracing::{debug, warn};

use crate::config::WatchdogConfig;

/// What the agent looked like at one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivitySignals {
    /// Some registered behavior is running.
    pub behavior_running: bool,
    /// A path is being followed.
    pub navigating: bool,
    /// The body moved during the last step.
    pub moving: bool,
    /// The body is fighting something.
    pub attacking: bool,
    /// Alive, not riding, not restrained, and AI switched on.
    pub free_to_act: bool,
}

impl ActivitySignals {
    /// Whether anything at all is happening.
    pub const fn is_active(&self) -> bool {
        self.behavior_running || self.navigating || self.moving || self.attacking
    }
}

/// Escalation step requested by the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogAction {
    /// Re-enable the movement, look and target control flags.
    EnableControlFlags,
    /// Stop the navigator.
    StopNavigation,
    /// Rebuild the behavior set from scratch.
    Reregister,
}

/// Per-agent stall counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchdog {
    config: WatchdogConfig,
    stall: u32,
    grace: u64,
    cooldown: u64,
}

impl Watchdog {
    /// Idle watchdog with no grace period pending.
    pub const fn new(config: WatchdogConfig) -> Self {
        Self {
            config,
            stall: 0,
            grace: 0,
            cooldown: 0,
        }
    }

    /// Consecutive stalled evaluations.
    pub const fn stall_count(&self) -> u32 {
        self.stall
    }

    /// Ticks of grace left.
    pub const fn grace_remaining(&self) -> u64 {
        self.grace
    }

    /// Start the post-registration grace period and forget past stalls.
    pub const fn start_grace(&mut self) {
        self.grace = self.config.grace_ticks;
        self.stall = 0;
    }

    /// Advance one tick. `probe` is only called on evaluation ticks.
    pub fn tick(&mut self, probe: impl FnOnce() -> ActivitySignals) -> Option<WatchdogAction> {
        if self.grace > 0 {
            self.grace = self.grace.saturating_sub(1);
            return None;
        }
        if self.cooldown > 0 {
            self.cooldown = self.cooldown.saturating_sub(1);
            return None;
        }
        self.cooldown = self.config.interval_ticks.saturating_sub(1);

        let signals = probe();
        if signals.is_active() || !signals.free_to_act {
            if self.stall >= self.config.enable_flags_at {
                debug!(stalled = self.stall, ?signals, "agent recovered");
            }
            self.stall = 0;
            return None;
        }

        self.stall = self.stall.saturating_add(1);
        let action = if self.stall == self.config.reregister_at {
            Some(WatchdogAction::Reregister)
        } else if self.stall == self.config.stop_navigation_at {
            Some(WatchdogAction::StopNavigation)
        } else if self.stall == self.config.enable_flags_at {
            Some(WatchdogAction::EnableControlFlags)
        } else {
            None
        };
        if let Some(action) = action {
            warn!(stalled = self.stall, ?action, "agent stalled");
        }
        action
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const IDLE: ActivitySignals = ActivitySignals {
        behavior_running: false,
        navigating: false,
        moving: false,
        attacking: false,
        free_to_act: true,
    };

    fn run(dog: &mut Watchdog, ticks: u64, signals: ActivitySignals) -> Vec<(u64, WatchdogAction)> {
        (0..ticks)
            .filter_map(|t| dog.tick(|| signals).map(|a| (t, a)))
            .collect()
    }

    #[test]
    fn idle_agent_escalates_once_per_step_within_a_thousand_ticks() {
        let mut dog = Watchdog::new(WatchdogConfig::default());
        let actions = run(&mut dog, 1000, IDLE);
        assert_eq!(
            actions,
            vec![
                (180, WatchdogAction::EnableControlFlags),
                (380, WatchdogAction::StopNavigation),
                (980, WatchdogAction::Reregister),
            ]
        );
    }

    #[test]
    fn grace_delays_the_next_cycle() {
        let mut dog = Watchdog::new(WatchdogConfig::default());
        run(&mut dog, 981, IDLE);
        dog.start_grace();
        let actions = run(&mut dog, 1000, IDLE);
        assert!(actions.iter().all(|(_, a)| *a != WatchdogAction::Reregister));
        assert_eq!(dog.stall_count(), 47);
    }

    #[test]
    fn activity_resets_the_count() {
        let mut dog = Watchdog::new(WatchdogConfig::default());
        run(&mut dog, 400, IDLE);
        assert_eq!(dog.stall_count(), 20);
        let busy = ActivitySignals {
            navigating: true,
            ..IDLE
        };
        run(&mut dog, 20, busy);
        assert_eq!(dog.stall_count(), 0);
    }

    #[test]
    fn restrained_agent_is_never_counted() {
        let mut dog = Watchdog::new(WatchdogConfig::default());
        let leashed = ActivitySignals {
            free_to_act: false,
            ..IDLE
        };
        assert!(run(&mut dog, 2000, leashed).is_empty());
    }

    #[test]
    fn probe_runs_only_on_evaluation_ticks() {
        let mut dog = Watchdog::new(WatchdogConfig::default());
        let mut probes = 0u32;
        for _ in 0..100 {
            dog.tick(|| {
                probes = probes.saturating_add(1);
                IDLE
            });
        }
        assert_eq!(probes, 5);
    }
}
