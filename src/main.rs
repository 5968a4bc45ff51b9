//! Arena Survival headless runner
//!
//! Drives the simulation at a fixed 60 Hz frame cadence with a simple
//! autopilot standing in for the input layer, then reports how the run went.
//!
//! Usage: `arena-survival [TUNING.json] [--seed N] [--max-ticks N] [--snapshot]`

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use arena_survival::Tuning;
use arena_survival::normalize_angle;
use arena_survival::sim::{Ability, RunEvent, Simulation, SimulationState, TickInput};
use clap::Parser;

/// Host frame interval
const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(name = "arena-survival")]
#[command(about = "Headless arena survival run driven by a simple autopilot")]
struct Options {
    /// Tuning JSON file; defaults are used when omitted or unreadable
    tuning: Option<PathBuf>,
    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Tick limit (default: ten simulated minutes)
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,
    /// Print the final snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

/// Rule-based stand-in for a human player
struct Autopilot;

impl Autopilot {
    fn intents(&self, state: &SimulationState, tuning: &Tuning) -> TickInput {
        let mut input = TickInput::default();
        let player = state.player.pos;

        let Some(nearest) = state
            .adversaries
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance(player)
                    .partial_cmp(&b.pos.distance(player))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        else {
            return input;
        };

        // Turn the aim toward the nearest threat
        let to_target = nearest.pos - player;
        let target_angle = to_target.y.atan2(to_target.x);
        let diff = normalize_angle(target_angle - state.aim.angle);
        input.rotate_left = diff < -tuning.aim_turn_step / 2.0;
        input.rotate_right = diff > tuning.aim_turn_step / 2.0;

        // Back away when it gets close
        if to_target.length() < 150.0 {
            input.move_left = to_target.x > 0.0;
            input.move_right = to_target.x < 0.0;
            input.move_up = to_target.y > 0.0;
            input.move_down = to_target.y < 0.0;
        }

        let crowded = state
            .adversaries
            .iter()
            .filter(|a| a.pos.distance(player) < tuning.burst_radius * 0.9)
            .count()
            >= 3;

        let ready = |ability: Ability| !state.cooldowns.is_active(ability.slot());

        if crowded && ready(Ability::AreaBurst) {
            input.select_slot = Some(Ability::AreaBurst.slot());
            input.fire = true;
        } else if ready(Ability::AreaTrap) {
            input.select_slot = Some(Ability::AreaTrap.slot());
            input.trap_target = Some(player.lerp(nearest.pos, 0.5));
        } else if ready(Ability::RangedShot) && diff.abs() < 0.1 {
            input.select_slot = Some(Ability::RangedShot.slot());
            input.fire = true;
        }
        input
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse();

    let tuning = match &options.tuning {
        Some(path) => Tuning::load(path).unwrap_or_else(|e| {
            log::warn!("{} - using default tuning", e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let mut sim = match options.seed {
        Some(seed) => Simulation::new(tuning, seed),
        None => Simulation::with_random_seed(tuning),
    }
    .context("failed to start run")?;
    let autopilot = Autopilot;

    let mut ended = None;
    for _ in 0..options.max_ticks {
        let mut input = autopilot.intents(sim.state(), sim.tuning());
        sim.tick(&mut input, FRAME);

        for event in sim.drain_events() {
            if let RunEvent::Ended { stats } = event {
                ended = Some(stats);
            }
        }
        if ended.is_some() {
            break;
        }
    }

    let stats = ended.unwrap_or(sim.state().stats);
    println!(
        "{} after {:.1}s ({} ticks): {} destroyed / {} spawned, {} shots fired",
        if ended.is_some() { "Caught" } else { "Survived" },
        stats.elapsed.as_secs_f32(),
        stats.ticks,
        stats.adversaries_destroyed,
        stats.adversaries_spawned,
        stats.projectiles_fired
    );

    if options.snapshot {
        let json =
            serde_json::to_string_pretty(&sim.snapshot()).context("failed to serialize snapshot")?;
        println!("{}", json);
    }
    Ok(())
}
