//! Per-slot ability cooldowns
//!
//! Each hotbar slot runs `Idle -> Active -> Idle`. Activation stores the
//! duration in whole seconds and arms a one-second recurring timer; every
//! firing takes one second off, and at zero the timer is cancelled and the
//! slot is idle again.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::timer::{Scheduler, TimerEvent, TimerHandle};

/// Countdown state for one slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    pub active: bool,
    /// Whole seconds left while active, 0 when idle
    pub remaining_secs: u32,
    #[serde(skip)]
    timer: Option<TimerHandle>,
}

impl Cooldown {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Cooldowns for every hotbar slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownTracker {
    slots: Vec<Cooldown>,
}

impl CooldownTracker {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![Cooldown::default(); slot_count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Cooldown> {
        self.slots.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cooldown> {
        self.slots.iter()
    }

    /// Gating predicate for abilities. Unknown slots read as idle.
    pub fn is_active(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(Cooldown::is_active)
    }

    /// Start a countdown of `secs` seconds
    ///
    /// Callers check [`CooldownTracker::is_active`] first; activating an
    /// already active slot, an unknown slot, or a zero duration does nothing.
    pub fn activate(&mut self, slot: usize, secs: u32, scheduler: &mut Scheduler) {
        let Some(cooldown) = self.slots.get_mut(slot) else {
            return;
        };
        if cooldown.active || secs == 0 {
            return;
        }

        cooldown.active = true;
        cooldown.remaining_secs = secs;
        cooldown.timer = Some(
            scheduler.schedule_every(Duration::from_secs(1), TimerEvent::CooldownTick { slot }),
        );
    }

    /// Handle one countdown firing for `slot`
    pub fn on_second(&mut self, slot: usize, scheduler: &mut Scheduler) {
        let Some(cooldown) = self.slots.get_mut(slot) else {
            return;
        };
        if !cooldown.active {
            return;
        }

        cooldown.remaining_secs = cooldown.remaining_secs.saturating_sub(1);
        if cooldown.remaining_secs == 0 {
            if let Some(handle) = cooldown.timer.take() {
                scheduler.cancel(handle);
            }
            cooldown.active = false;
        }
    }

    /// Force every slot back to idle and cancel its countdown
    pub fn clear(&mut self, scheduler: &mut Scheduler) {
        for cooldown in &mut self.slots {
            if let Some(handle) = cooldown.timer.take() {
                scheduler.cancel(handle);
            }
            *cooldown = Cooldown::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Advance the clock by `by`, routing countdown ticks to the tracker
    fn advance(tracker: &mut CooldownTracker, scheduler: &mut Scheduler, by: Duration) {
        let until = scheduler.now() + by;
        while let Some((_, event)) = scheduler.pop_due(until) {
            if let TimerEvent::CooldownTick { slot } = event {
                tracker.on_second(slot, scheduler);
            }
        }
        scheduler.advance_to(until);
    }

    #[test]
    fn test_activate_and_expire() {
        let mut scheduler = Scheduler::new();
        let mut tracker = CooldownTracker::new(3);

        tracker.activate(0, 10, &mut scheduler);
        assert!(tracker.is_active(0));
        assert_eq!(tracker.get(0).map(|c| c.remaining_secs), Some(10));

        advance(&mut tracker, &mut scheduler, Duration::from_secs(3));
        assert_eq!(tracker.get(0).map(|c| c.remaining_secs), Some(7));

        advance(&mut tracker, &mut scheduler, Duration::from_secs(7));
        assert!(!tracker.is_active(0));
        assert_eq!(tracker.get(0).map(|c| c.remaining_secs), Some(0));
        // Countdown timer is gone once idle
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_activate_while_active_is_noop() {
        let mut scheduler = Scheduler::new();
        let mut tracker = CooldownTracker::new(3);

        tracker.activate(1, 30, &mut scheduler);
        advance(&mut tracker, &mut scheduler, Duration::from_secs(5));
        tracker.activate(1, 30, &mut scheduler);

        assert_eq!(tracker.get(1).map(|c| c.remaining_secs), Some(25));
        assert_eq!(scheduler.pending_count(), 1);
    }

    #[test]
    fn test_unknown_slot_is_idle_noop() {
        let mut scheduler = Scheduler::new();
        let mut tracker = CooldownTracker::new(3);
        tracker.activate(9, 10, &mut scheduler);
        assert!(!tracker.is_active(9));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut scheduler = Scheduler::new();
        let mut tracker = CooldownTracker::new(3);
        tracker.activate(0, 10, &mut scheduler);
        tracker.activate(2, 50, &mut scheduler);

        advance(&mut tracker, &mut scheduler, Duration::from_secs(10));
        assert!(!tracker.is_active(0));
        assert!(!tracker.is_active(1));
        assert!(tracker.is_active(2));
        assert_eq!(tracker.get(2).map(|c| c.remaining_secs), Some(40));
    }

    #[test]
    fn test_clear_cancels_countdowns() {
        let mut scheduler = Scheduler::new();
        let mut tracker = CooldownTracker::new(3);
        tracker.activate(0, 10, &mut scheduler);
        tracker.activate(1, 30, &mut scheduler);

        tracker.clear(&mut scheduler);
        assert!(tracker.iter().all(|c| !c.active && c.remaining_secs == 0));
        assert_eq!(scheduler.pending_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_cooldown_round_trip(secs in 1u32..120) {
            let mut scheduler = Scheduler::new();
            let mut tracker = CooldownTracker::new(3);
            tracker.activate(0, secs, &mut scheduler);

            advance(&mut tracker, &mut scheduler, Duration::from_secs(u64::from(secs - 1)));
            prop_assert!(tracker.is_active(0));

            advance(&mut tracker, &mut scheduler, Duration::from_secs(1));
            prop_assert!(!tracker.is_active(0));
            prop_assert_eq!(tracker.get(0).map(|c| c.remaining_secs), Some(0));
        }
    }
}
