//! Simulation engine
//!
//! All gameplay logic lives here:
//! - Per-tick movement, collisions and pruning (`tick`)
//! - Real-time timers as cancellable queue entries (`timer`)
//! - No rendering, input-device or platform dependencies

pub mod ability;
pub mod collision;
pub mod cooldown;
pub mod run;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use ability::{Ability, AreaEffect, AreaEffects, EffectKind};
pub use collision::{Body, circles_overlap, separate_overlap, within_radius};
pub use cooldown::{Cooldown, CooldownTracker};
pub use run::{RunEvent, Simulation};
pub use snapshot::Snapshot;
pub use spawner::{Spawner, pick_spawn_point, spawn_one};
pub use state::{Adversary, Aim, Arena, Player, Projectile, RunStats, SimulationState};
pub use tick::{TickInput, step};
pub use timer::{Scheduler, TimerEvent, TimerHandle};
