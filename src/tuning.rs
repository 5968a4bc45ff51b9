//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads comes from a [`Tuning`].
//! Defaults mirror [`crate::consts`]; a JSON file may override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance and arena configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    pub player_size: f32,
    /// Units moved per tick per held direction
    pub player_speed: f32,
    /// Visual aim length (renderer only)
    pub aim_length: f32,
    /// Radians per tick while rotating
    pub aim_turn_step: f32,

    // === Adversaries ===
    pub adversary_size: f32,
    pub adversary_base_speed: f32,
    pub adversary_speed_increment: f32,
    pub max_adversaries: usize,

    // === Spawning ===
    pub spawn_exclusion: f32,
    pub spawn_delay_initial_ms: u64,
    pub spawn_delay_jitter_ms: u64,
    pub spawn_delay_step_ms: u64,
    pub spawn_delay_floor_ms: u64,
    pub spawn_max_attempts: u32,

    // === Projectiles ===
    pub projectile_size: f32,
    /// Units per tick
    pub projectile_speed: f32,
    pub projectile_spin: f32,
    pub projectile_muzzle_gap: f32,

    // === Area effects ===
    pub burst_radius: f32,
    pub burst_duration_ms: u64,
    pub trap_radius: f32,
    pub trap_duration_ms: u64,

    // === Cooldowns (seconds) ===
    pub shot_cooldown_secs: u32,
    pub burst_cooldown_secs: u32,
    pub trap_cooldown_secs: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            aim_length: AIM_LENGTH,
            aim_turn_step: AIM_TURN_STEP,

            adversary_size: ADVERSARY_SIZE,
            adversary_base_speed: ADVERSARY_BASE_SPEED,
            adversary_speed_increment: ADVERSARY_SPEED_INCREMENT,
            max_adversaries: MAX_ADVERSARIES,

            spawn_exclusion: SPAWN_EXCLUSION,
            spawn_delay_initial_ms: SPAWN_DELAY_INITIAL_MS,
            spawn_delay_jitter_ms: SPAWN_DELAY_JITTER_MS,
            spawn_delay_step_ms: SPAWN_DELAY_STEP_MS,
            spawn_delay_floor_ms: SPAWN_DELAY_FLOOR_MS,
            spawn_max_attempts: SPAWN_MAX_ATTEMPTS,

            projectile_size: PROJECTILE_SIZE,
            projectile_speed: PROJECTILE_SPEED,
            projectile_spin: PROJECTILE_SPIN,
            projectile_muzzle_gap: PROJECTILE_MUZZLE_GAP,

            burst_radius: BURST_RADIUS,
            burst_duration_ms: BURST_DURATION_MS,
            trap_radius: TRAP_RADIUS,
            trap_duration_ms: TRAP_DURATION_MS,

            shot_cooldown_secs: COOLDOWN_SECS[0],
            burst_cooldown_secs: COOLDOWN_SECS[1],
            trap_cooldown_secs: COOLDOWN_SECS[2],
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning from JSON text
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!(
            "Loaded tuning (arena {}x{})",
            tuning.arena_width,
            tuning.arena_height
        );
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("player_size", self.player_size)?;
        positive("player_speed", self.player_speed)?;
        positive("adversary_size", self.adversary_size)?;
        positive("adversary_base_speed", self.adversary_base_speed)?;
        positive("projectile_size", self.projectile_size)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("burst_radius", self.burst_radius)?;
        positive("trap_radius", self.trap_radius)?;

        if self.max_adversaries == 0 {
            return Err(TuningError::Invalid {
                field: "max_adversaries",
                reason: "must be at least 1",
            });
        }
        if self.spawn_max_attempts == 0 {
            return Err(TuningError::Invalid {
                field: "spawn_max_attempts",
                reason: "must be at least 1",
            });
        }
        if self.spawn_delay_floor_ms == 0 {
            return Err(TuningError::Invalid {
                field: "spawn_delay_floor_ms",
                reason: "must be at least 1",
            });
        }
        if self.spawn_delay_floor_ms > self.spawn_delay_initial_ms {
            return Err(TuningError::Invalid {
                field: "spawn_delay_floor_ms",
                reason: "must not exceed spawn_delay_initial_ms",
            });
        }
        Ok(())
    }

    /// Cooldown duration for an ability slot, `None` for slots without an ability
    pub fn cooldown_secs(&self, slot: usize) -> Option<u32> {
        match slot {
            0 => Some(self.shot_cooldown_secs),
            1 => Some(self.burst_cooldown_secs),
            2 => Some(self.trap_cooldown_secs),
            _ => None,
        }
    }

    /// Arena center, where every run starts
    pub fn arena_center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }
}
