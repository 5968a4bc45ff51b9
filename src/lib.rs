//! Arena Survival - a real-time arena survival simulation
//!
//! Core modules:
//! - `sim`: Simulation engine (movement, collisions, spawning, abilities, run lifecycle)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Default gameplay constants (overridable through [`Tuning`])
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Aim indicator length (renderer only)
    pub const AIM_LENGTH: f32 = 40.0;
    /// Aim rotation per tick while a rotate intent is held (radians)
    pub const AIM_TURN_STEP: f32 = 0.1;

    /// Adversary defaults
    pub const ADVERSARY_SIZE: f32 = 20.0;
    pub const ADVERSARY_BASE_SPEED: f32 = 2.0;
    /// Extra speed per adversary already alive at spawn time
    pub const ADVERSARY_SPEED_INCREMENT: f32 = 0.1;
    pub const MAX_ADVERSARIES: usize = 20;

    /// Half-width of the square around the player where nothing spawns
    pub const SPAWN_EXCLUSION: f32 = 200.0;
    pub const SPAWN_DELAY_INITIAL_MS: u64 = 15_000;
    pub const SPAWN_DELAY_JITTER_MS: u64 = 5_000;
    pub const SPAWN_DELAY_STEP_MS: u64 = 500;
    pub const SPAWN_DELAY_FLOOR_MS: u64 = 2_000;
    /// Placement redraws before falling back to the best candidate seen
    pub const SPAWN_MAX_ATTEMPTS: u32 = 256;

    /// Projectile defaults
    pub const PROJECTILE_SIZE: f32 = 10.0;
    pub const PROJECTILE_SPEED: f32 = 5.0;
    pub const PROJECTILE_SPIN: f32 = 0.1;
    /// Gap between player edge and a freshly fired projectile
    pub const PROJECTILE_MUZZLE_GAP: f32 = 20.0;

    /// Area effects
    pub const BURST_RADIUS: f32 = 125.0;
    pub const BURST_DURATION_MS: u64 = 2_000;
    pub const TRAP_RADIUS: f32 = 75.0;
    pub const TRAP_DURATION_MS: u64 = 8_000;

    /// Hotbar
    pub const HOTBAR_SLOTS: usize = 6;
    /// Cooldown seconds for slots 0 (shot), 1 (burst), 2 (trap)
    pub const COOLDOWN_SECS: [u32; 3] = [10, 30, 50];
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
