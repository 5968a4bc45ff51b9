//! Run controller
//!
//! [`Simulation`] owns one run: its state, clock, spawner and RNG. Hosts
//! call [`Simulation::tick`] once per frame with the elapsed wall time and
//! the current intents, read [`Simulation::snapshot`] to draw, and drain
//! [`RunEvent`]s to show or hide end-of-run controls.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::snapshot::Snapshot;
use super::spawner::Spawner;
use super::state::{RunStats, SimulationState};
use super::tick::{TickInput, step};
use super::timer::{Scheduler, TimerEvent};
use crate::tuning::{Tuning, TuningError};

/// Run lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEvent {
    /// A fresh run began
    Started,
    /// The player was caught
    Ended { stats: RunStats },
    /// The previous run was discarded
    Reset,
}

/// A single simulation instance
#[derive(Debug, Clone)]
pub struct Simulation {
    tuning: Tuning,
    state: SimulationState,
    scheduler: Scheduler,
    spawner: Spawner,
    rng: Pcg32,
    events: Vec<RunEvent>,
}

impl Simulation {
    /// Start a run with the given RNG seed
    ///
    /// Fails if `tuning` does not pass [`Tuning::validate`].
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut scheduler = Scheduler::new();
        let mut spawner = Spawner::new(&tuning);
        spawner.schedule_next(&tuning, &mut scheduler, &mut rng);

        log::info!(
            "Run started (arena {}x{}, seed {})",
            tuning.arena_width,
            tuning.arena_height,
            seed
        );

        Ok(Self {
            state: SimulationState::new(&tuning),
            tuning,
            scheduler,
            spawner,
            rng,
            events: vec![RunEvent::Started],
        })
    }

    /// Start a run with a random seed
    pub fn with_random_seed(tuning: Tuning) -> Result<Self, TuningError> {
        Self::new(tuning, rand::random())
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Simulation clock
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Current base spawn delay in milliseconds
    pub fn spawn_delay_ms(&self) -> u64 {
        self.spawner.delay_ms()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    /// Take pending lifecycle events
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the clock by `dt`, then run one simulation step
    pub fn tick(&mut self, input: &mut TickInput, dt: Duration) {
        self.advance_clock(dt);
        self.step(input);
    }

    /// Advance the clock by `dt`, firing every timer that comes due
    pub fn advance_clock(&mut self, dt: Duration) {
        let until = self.scheduler.now() + dt;
        while let Some((_, event)) = self.scheduler.pop_due(until) {
            self.handle_timer(event);
        }
        self.scheduler.advance_to(until);

        if self.state.is_alive() {
            self.state.stats.elapsed += dt;
        }
    }

    /// Run one simulation step without moving the clock
    pub fn step(&mut self, input: &mut TickInput) {
        let was_alive = self.state.is_alive();
        step(&mut self.state, input, &self.tuning, &mut self.scheduler);

        if was_alive && !self.state.is_alive() {
            let stats = self.state.stats;
            log::info!(
                "Run ended after {:.1}s: {} adversaries destroyed, {} spawned",
                stats.elapsed.as_secs_f32(),
                stats.adversaries_destroyed,
                stats.adversaries_spawned
            );
            self.events.push(RunEvent::Ended { stats });
        }
    }

    /// Discard the current run and start a fresh one
    ///
    /// Every pending timer from the old run is cancelled before the new run
    /// re-arms spawning from the initial delay.
    pub fn reset(&mut self) {
        self.state.cooldowns.clear(&mut self.scheduler);
        self.state.effects.clear(&mut self.scheduler);
        self.spawner.stop(&mut self.scheduler);
        self.scheduler.cancel_all();

        self.state = SimulationState::new(&self.tuning);
        self.spawner
            .restart(&self.tuning, &mut self.scheduler, &mut self.rng);

        log::info!("Run reset");
        self.events.push(RunEvent::Reset);
        self.events.push(RunEvent::Started);
    }

    fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::CooldownTick { slot } => {
                self.state.cooldowns.on_second(slot, &mut self.scheduler);
            }
            TimerEvent::Spawn => {
                self.spawner.on_fire(
                    &mut self.state,
                    &self.tuning,
                    &mut self.scheduler,
                    &mut self.rng,
                );
            }
            TimerEvent::EffectExpired(kind) => {
                self.state.effects.expire(kind);
            }
        }
    }
}
