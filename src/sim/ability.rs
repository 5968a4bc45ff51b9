//! Abilities and area effects
//!
//! Three hotbar abilities, each gated by its slot's cooldown:
//! - slot 0, ranged shot: one projectile along the aim
//! - slot 1, area burst: instantly clears adversaries around the player
//! - slot 2, area trap: a standing zone that clears anything entering it

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::within_radius;
use super::state::{Projectile, SimulationState};
use super::timer::{Scheduler, TimerEvent, TimerHandle};
use crate::tuning::Tuning;

/// Hotbar abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    RangedShot,
    AreaBurst,
    AreaTrap,
}

impl Ability {
    /// Ability bound to a hotbar slot, if any
    pub fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Ability::RangedShot),
            1 => Some(Ability::AreaBurst),
            2 => Some(Ability::AreaTrap),
            _ => None,
        }
    }

    pub fn slot(&self) -> usize {
        match self {
            Ability::RangedShot => 0,
            Ability::AreaBurst => 1,
            Ability::AreaTrap => 2,
        }
    }
}

/// Area effect kinds; at most one of each is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Burst,
    Trap,
}

/// A time-limited circular zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEffect {
    pub kind: EffectKind,
    pub active: bool,
    pub radius: f32,
    pub origin: Vec2,
    #[serde(skip)]
    expiry: Option<TimerHandle>,
}

impl AreaEffect {
    fn new(kind: EffectKind, radius: f32) -> Self {
        Self {
            kind,
            active: false,
            radius,
            origin: Vec2::ZERO,
            expiry: None,
        }
    }

    /// Switch on at `origin` and arm the expiry timer
    fn start(&mut self, origin: Vec2, duration: Duration, scheduler: &mut Scheduler) {
        if let Some(handle) = self.expiry.take() {
            scheduler.cancel(handle);
        }
        self.active = true;
        self.origin = origin;
        self.expiry = Some(scheduler.schedule_once(duration, TimerEvent::EffectExpired(self.kind)));
    }

    fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.expiry.take() {
            scheduler.cancel(handle);
        }
        self.active = false;
    }
}

/// The burst and trap effect records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEffects {
    pub burst: AreaEffect,
    pub trap: AreaEffect,
}

impl AreaEffects {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            burst: AreaEffect::new(EffectKind::Burst, tuning.burst_radius),
            trap: AreaEffect::new(EffectKind::Trap, tuning.trap_radius),
        }
    }

    pub fn get(&self, kind: EffectKind) -> &AreaEffect {
        match kind {
            EffectKind::Burst => &self.burst,
            EffectKind::Trap => &self.trap,
        }
    }

    fn get_mut(&mut self, kind: EffectKind) -> &mut AreaEffect {
        match kind {
            EffectKind::Burst => &mut self.burst,
            EffectKind::Trap => &mut self.trap,
        }
    }

    /// Currently active effects
    pub fn active(&self) -> impl Iterator<Item = &AreaEffect> {
        [&self.burst, &self.trap].into_iter().filter(|e| e.active)
    }

    /// Expiry timer fired
    pub fn expire(&mut self, kind: EffectKind) {
        let effect = self.get_mut(kind);
        effect.active = false;
        effect.expiry = None;
    }

    /// Deactivate everything and cancel pending expiries
    pub fn clear(&mut self, scheduler: &mut Scheduler) {
        self.burst.stop(scheduler);
        self.trap.stop(scheduler);
    }
}

/// Fire a projectile along the aim (slot 0)
///
/// Returns false without side effects while the slot is cooling down.
pub fn fire_ranged_shot(
    state: &mut SimulationState,
    tuning: &Tuning,
    scheduler: &mut Scheduler,
) -> bool {
    let slot = Ability::RangedShot.slot();
    if state.cooldowns.is_active(slot) {
        return false;
    }

    let dir = state.aim.direction();
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos: state.player.pos + dir * (state.player.size + tuning.projectile_muzzle_gap),
        vel: dir * tuning.projectile_speed,
        size: tuning.projectile_size,
        spin: 0.0,
    });
    state.stats.projectiles_fired += 1;

    start_cooldown(state, tuning, slot, scheduler);
    log::debug!("Ranged shot {} fired at angle {:.2}", id, state.aim.angle);
    true
}

/// Destroy every adversary around the player's current position (slot 1)
///
/// The kill is instantaneous; the effect record only stays active for the
/// burst duration so renderers can show it.
pub fn activate_burst(
    state: &mut SimulationState,
    tuning: &Tuning,
    scheduler: &mut Scheduler,
) -> bool {
    let slot = Ability::AreaBurst.slot();
    if state.cooldowns.is_active(slot) {
        return false;
    }

    let origin = state.player.pos;
    let radius = state.effects.burst.radius;
    let removed = clear_radius(state, origin, radius);

    state.effects.burst.start(
        origin,
        Duration::from_millis(tuning.burst_duration_ms),
        scheduler,
    );
    start_cooldown(state, tuning, slot, scheduler);
    log::debug!("Area burst at {:?} destroyed {} adversaries", origin, removed);
    true
}

/// Place a standing trap at `target` (slot 2)
pub fn place_trap(
    state: &mut SimulationState,
    tuning: &Tuning,
    scheduler: &mut Scheduler,
    target: Vec2,
) -> bool {
    let slot = Ability::AreaTrap.slot();
    if state.cooldowns.is_active(slot) {
        return false;
    }

    state.effects.trap.start(
        target,
        Duration::from_millis(tuning.trap_duration_ms),
        scheduler,
    );
    start_cooldown(state, tuning, slot, scheduler);
    log::debug!("Area trap placed at {:?}", target);
    true
}

fn start_cooldown(
    state: &mut SimulationState,
    tuning: &Tuning,
    slot: usize,
    scheduler: &mut Scheduler,
) {
    if let Some(secs) = tuning.cooldown_secs(slot) {
        state.cooldowns.activate(slot, secs, scheduler);
    }
}

/// Remove every adversary whose center is inside the circle. Returns the count.
pub fn clear_radius(state: &mut SimulationState, center: Vec2, radius: f32) -> usize {
    let before = state.adversaries.len();
    state
        .adversaries
        .retain(|adversary| !within_radius(adversary, center, radius));
    let removed = before - state.adversaries.len();
    state.stats.adversaries_destroyed += removed as u32;
    removed
}
