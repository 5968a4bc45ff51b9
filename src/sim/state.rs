//! Simulation state and entity types
//!
//! Everything a run mutates lives in [`SimulationState`], owned by the
//! [`Simulation`](super::Simulation) controller.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ability::AreaEffects;
use super::collision::Body;
use super::cooldown::CooldownTracker;
use crate::consts::HOTBAR_SLOTS;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// The bounded play rectangle `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inclusive containment test for a point
    pub fn contains(&self, pos: Vec2) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y)
    }
}

/// The controllable entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    /// Units per tick per held direction
    pub speed: f32,
    pub alive: bool,
    /// Facing (radians), follows the aim
    pub facing: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.arena_center(),
            size: tuning.player_size,
            speed: tuning.player_speed,
            alive: true,
            facing: 0.0,
        }
    }
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
}

/// Aim indicator around the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Radians, relative to the player
    pub angle: f32,
    /// Visual length (renderer only)
    pub length: f32,
}

impl Aim {
    pub fn new(length: f32) -> Self {
        Self { angle: 0.0, length }
    }

    /// Unit vector along the aim
    pub fn direction(&self) -> Vec2 {
        polar_to_cartesian(1.0, self.angle)
    }
}

/// A hostile entity homing toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adversary {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    /// Units per tick, fixed at spawn
    pub speed: f32,
    /// Cosmetic only
    pub rotation: f32,
}

impl Body for Adversary {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
}

/// A ranged-shot projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub size: f32,
    /// Cosmetic only
    pub spin: f32,
}

impl Body for Projectile {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn size(&self) -> f32 {
        self.size
    }
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Simulated time since the run started
    pub elapsed: Duration,
    pub ticks: u64,
    pub adversaries_spawned: u32,
    pub adversaries_destroyed: u32,
    pub projectiles_fired: u32,
}

/// Complete simulation state for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub arena: Arena,
    pub player: Player,
    pub aim: Aim,
    /// Unordered; identity is `Adversary::id`
    pub adversaries: Vec<Adversary>,
    /// Iterated in insertion order within a tick
    pub projectiles: Vec<Projectile>,
    pub effects: AreaEffects,
    pub cooldowns: CooldownTracker,
    /// Currently selected hotbar slot
    pub selected_slot: usize,
    pub stats: RunStats,
    /// Next entity ID
    next_id: u32,
}

impl SimulationState {
    /// Fresh run: player alive at the arena center, nothing else in play
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            arena: Arena::new(tuning.arena_width, tuning.arena_height),
            player: Player::new(tuning),
            aim: Aim::new(tuning.aim_length),
            adversaries: Vec::new(),
            projectiles: Vec::new(),
            effects: AreaEffects::new(tuning),
            cooldowns: CooldownTracker::new(HOTBAR_SLOTS),
            selected_slot: 0,
            stats: RunStats::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_alive(&self) -> bool {
        self.player.alive
    }

    /// Select a hotbar slot; out-of-range indices are ignored
    pub fn select_slot(&mut self, slot: usize) {
        if slot < self.cooldowns.len() {
            self.selected_slot = slot;
        }
    }
}
