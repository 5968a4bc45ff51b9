//! Adversary spawning and difficulty ramp
//!
//! Spawning is a self-rescheduling timer. Each firing adds at most one
//! adversary, shortens the base delay by a fixed step down to a floor, and
//! re-arms only while the player is alive. Death therefore halts spawning
//! without an explicit stop; a run reset restarts it from the initial delay.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use super::state::{Adversary, Arena, SimulationState};
use super::timer::{Scheduler, TimerEvent, TimerHandle};
use crate::tuning::Tuning;

/// Spawn timer state
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Base delay before the next firing (ms), before jitter
    delay_ms: u64,
    pending: Option<TimerHandle>,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            delay_ms: tuning.spawn_delay_initial_ms,
            pending: None,
        }
    }

    /// Current base delay in milliseconds
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Whether a firing is pending
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Arm the next firing after a delay drawn from `[delay, delay + jitter)`
    pub fn schedule_next(
        &mut self,
        tuning: &Tuning,
        scheduler: &mut Scheduler,
        rng: &mut impl Rng,
    ) -> TimerHandle {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        let jitter = if tuning.spawn_delay_jitter_ms > 0 {
            rng.random_range(0..tuning.spawn_delay_jitter_ms)
        } else {
            0
        };
        let delay = Duration::from_millis(self.delay_ms + jitter);
        let handle = scheduler.schedule_once(delay, TimerEvent::Spawn);
        self.pending = Some(handle);
        handle
    }

    /// Cancel any pending firing, restore the initial delay and re-arm
    pub fn restart(&mut self, tuning: &Tuning, scheduler: &mut Scheduler, rng: &mut impl Rng) {
        self.stop(scheduler);
        self.delay_ms = tuning.spawn_delay_initial_ms;
        self.schedule_next(tuning, scheduler, rng);
    }

    /// Cancel any pending firing
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }

    /// Handle a spawn timer firing. Returns the new adversary's ID, if any.
    pub fn on_fire(
        &mut self,
        state: &mut SimulationState,
        tuning: &Tuning,
        scheduler: &mut Scheduler,
        rng: &mut impl Rng,
    ) -> Option<u32> {
        self.pending = None;

        let spawned = if state.is_alive() {
            spawn_one(state, tuning, rng)
        } else {
            None
        };

        self.delay_ms = self
            .delay_ms
            .saturating_sub(tuning.spawn_delay_step_ms)
            .max(tuning.spawn_delay_floor_ms);

        if state.is_alive() {
            self.schedule_next(tuning, scheduler, rng);
        }
        spawned
    }
}

/// Add one adversary away from the player, unless the population is capped
///
/// Speed ramps with the population at spawn time:
/// `base + count * increment`.
pub fn spawn_one(state: &mut SimulationState, tuning: &Tuning, rng: &mut impl Rng) -> Option<u32> {
    let count = state.adversaries.len();
    if count >= tuning.max_adversaries {
        return None;
    }

    let pos = pick_spawn_point(
        state.arena,
        state.player.pos,
        tuning.spawn_exclusion,
        tuning.spawn_max_attempts,
        rng,
    );
    let speed = tuning.adversary_base_speed + count as f32 * tuning.adversary_speed_increment;
    let id = state.next_entity_id();
    state.adversaries.push(Adversary {
        id,
        pos,
        size: tuning.adversary_size,
        speed,
        rotation: 0.0,
    });
    state.stats.adversaries_spawned += 1;

    log::debug!(
        "Spawned adversary {} at ({:.0}, {:.0}) speed {:.2} ({} alive)",
        id,
        pos.x,
        pos.y,
        speed,
        count + 1
    );
    Some(id)
}

/// Uniform point in the arena outside the square exclusion zone around `player`
///
/// A candidate is rejected while it is within `exclusion` of the player on
/// both axes. After `max_attempts` rejections the candidate farthest from the
/// player (Chebyshev distance) is used.
pub fn pick_spawn_point(
    arena: Arena,
    player: Vec2,
    exclusion: f32,
    max_attempts: u32,
    rng: &mut impl Rng,
) -> Vec2 {
    let mut best = None::<(f32, Vec2)>;

    for _ in 0..max_attempts.max(1) {
        let candidate = Vec2::new(
            rng.random_range(0.0..arena.width),
            rng.random_range(0.0..arena.height),
        );
        let offset = (candidate - player).abs();
        if offset.x >= exclusion || offset.y >= exclusion {
            return candidate;
        }

        let reach = offset.max_element();
        if best.is_none_or(|(best_reach, _)| reach > best_reach) {
            best = Some((reach, candidate));
        }
    }

    log::warn!(
        "Spawn placement gave up after {} attempts; using best candidate",
        max_attempts
    );
    best.map(|(_, pos)| pos).unwrap_or(player)
}
