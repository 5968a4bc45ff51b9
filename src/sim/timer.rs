//! Cancellable scheduled events
//!
//! Real-time timers (cooldown countdowns, spawn delays, effect expiry) are
//! entries in a queue owned by the simulation rather than ambient callbacks.
//! The tick driver advances the clock and drains whatever came due, so a
//! reset can drop every pending entry and nothing stale fires afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ability::EffectKind;

/// Opaque handle used to cancel a scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One-second countdown step for a hotbar slot
    CooldownTick { slot: usize },
    /// Spawner delay elapsed
    Spawn,
    /// An area effect ran out
    EffectExpired(EffectKind),
}

#[derive(Debug, Clone)]
struct Entry {
    handle: TimerHandle,
    fire_at: Duration,
    /// Re-arm interval for recurring timers
    period: Option<Duration>,
    event: TimerEvent,
}

/// Simulation clock plus its pending timers
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire `event` once after `delay`
    pub fn schedule_once(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        self.push(delay, None, event)
    }

    /// Fire `event` every `period` until cancelled
    pub fn schedule_every(&mut self, period: Duration, event: TimerEvent) -> TimerHandle {
        debug_assert!(!period.is_zero(), "recurring timer needs a non-zero period");
        self.push(period, Some(period), event)
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            fire_at: self.now + delay,
            period,
            event,
        });
        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Pop the earliest event due at or before `until`
    ///
    /// The clock jumps to that event's fire time so handlers that schedule
    /// new timers measure from the right instant. Recurring entries are
    /// re-armed one period later. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, TimerEvent)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.fire_at <= until)
            .min_by_key(|(_, e)| (e.fire_at, e.handle.0))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[idx];
        self.now = self.now.max(entry.fire_at);
        let fired = (entry.handle, entry.event);
        let period = entry.period;

        match period {
            Some(period) => entry.fire_at += period,
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(fired)
    }

    /// Move the clock forward without firing anything
    ///
    /// Callers drain [`Scheduler::pop_due`] up to `until` first.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
