//! Per-tick simulation step
//!
//! One call per host frame. Movement is per tick, not time-scaled; timers
//! are driven separately by the [`Simulation`](super::Simulation) clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ability::{Ability, activate_burst, clear_radius, fire_ranged_shot, place_trap};
use super::collision::{Body, circles_overlap, direction_to, separate_overlap};
use super::state::SimulationState;
use super::timer::Scheduler;
use crate::normalize_angle;
use crate::tuning::Tuning;

/// Intents for a single tick
///
/// Movement and rotation are held flags. `fire` is an edge the step clears
/// when it triggers an ability, so a held signal cannot fire twice.
/// `trap_target` is a one-shot click, consumed by every live step whether
/// or not a trap could be placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Use the selected slot's ability (ranged shot or burst)
    pub fire: bool,
    /// Hotbar slot to select before resolving abilities
    pub select_slot: Option<usize>,
    /// Trap placement point (used when slot 2 is selected)
    pub trap_target: Option<Vec2>,
}

/// Advance the simulation by one tick
///
/// Order: player movement, aim, abilities, adversaries, projectiles, trap.
/// Nothing is mutated once the player is dead.
pub fn step(
    state: &mut SimulationState,
    input: &mut TickInput,
    tuning: &Tuning,
    scheduler: &mut Scheduler,
) {
    if !state.is_alive() {
        return;
    }
    state.stats.ticks += 1;

    move_player(state, input);
    rotate_aim(state, input, tuning);
    resolve_abilities(state, input, tuning, scheduler);
    update_adversaries(state);
    update_projectiles(state, tuning);

    if state.effects.trap.active {
        let trap = &state.effects.trap;
        let (origin, radius) = (trap.origin, trap.radius);
        clear_radius(state, origin, radius);
    }
}

/// Each held direction moves by `speed` unless the result would leave the arena
fn move_player(state: &mut SimulationState, input: &TickInput) {
    let arena = state.arena;
    let player = &mut state.player;
    let (speed, size) = (player.speed, player.size);

    if input.move_up && player.pos.y - speed - size >= 0.0 {
        player.pos.y -= speed;
    }
    if input.move_down && player.pos.y + speed + size <= arena.height {
        player.pos.y += speed;
    }
    if input.move_left && player.pos.x - speed - size >= 0.0 {
        player.pos.x -= speed;
    }
    if input.move_right && player.pos.x + speed + size <= arena.width {
        player.pos.x += speed;
    }
}

fn rotate_aim(state: &mut SimulationState, input: &TickInput, tuning: &Tuning) {
    if input.rotate_left {
        state.aim.angle -= tuning.aim_turn_step;
    }
    if input.rotate_right {
        state.aim.angle += tuning.aim_turn_step;
    }
    state.aim.angle = normalize_angle(state.aim.angle);
    state.player.facing = state.aim.angle;
}

/// Slot selection, then at most one ability per intent edge
fn resolve_abilities(
    state: &mut SimulationState,
    input: &mut TickInput,
    tuning: &Tuning,
    scheduler: &mut Scheduler,
) {
    if let Some(slot) = input.select_slot.take() {
        state.select_slot(slot);
    }
    let trap_target = input.trap_target.take();

    match Ability::from_slot(state.selected_slot) {
        Some(Ability::RangedShot) if input.fire => {
            if fire_ranged_shot(state, tuning, scheduler) {
                input.fire = false;
            }
        }
        Some(Ability::AreaBurst) if input.fire => {
            if activate_burst(state, tuning, scheduler) {
                input.fire = false;
            }
        }
        Some(Ability::AreaTrap) => {
            if let Some(target) = trap_target {
                place_trap(state, tuning, scheduler, target);
            }
        }
        _ => {}
    }
}

/// Homing, pairwise separation, then contact with the player
fn update_adversaries(state: &mut SimulationState) {
    let count = state.adversaries.len();

    for i in 0..count {
        let target = state.player.pos;
        let adversary = &mut state.adversaries[i];
        // Coincident with the player: no direction, hold position
        if let Some(dir) = direction_to(adversary.pos, target) {
            adversary.pos += dir * adversary.speed;
        }

        let min_dist = adversary.size;
        for j in 0..count {
            if j == i {
                continue;
            }
            let (a, b) = pair_mut(&mut state.adversaries, i, j);
            separate_overlap(&mut a.pos, &mut b.pos, min_dist);
        }

        if circles_overlap(&state.adversaries[i], &state.player) {
            state.player.alive = false;
        }
    }
}

/// Mutable references to two distinct elements
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Advance projectiles and resolve hits
///
/// Hits are marked first and removed in one pass afterwards. Each projectile
/// destroys at most the first live adversary it overlaps; an adversary
/// already hit this tick is skipped by later projectiles.
fn update_projectiles(state: &mut SimulationState, tuning: &Tuning) {
    let mut adversary_hit = vec![false; state.adversaries.len()];
    let mut projectile_gone = vec![false; state.projectiles.len()];

    for (p_idx, projectile) in state.projectiles.iter_mut().enumerate() {
        projectile.pos += projectile.vel;
        projectile.spin = normalize_angle(projectile.spin + tuning.projectile_spin);

        let hit = state
            .adversaries
            .iter()
            .enumerate()
            .find(|(a_idx, adversary)| {
                !adversary_hit[*a_idx] && circles_overlap(&*projectile, *adversary)
            })
            .map(|(a_idx, _)| a_idx);

        if let Some(a_idx) = hit {
            adversary_hit[a_idx] = true;
            projectile_gone[p_idx] = true;
        } else if !state.arena.contains(projectile.pos()) {
            projectile_gone[p_idx] = true;
        }
    }

    let destroyed = adversary_hit.iter().filter(|hit| **hit).count();
    state.stats.adversaries_destroyed += destroyed as u32;

    let mut hits = adversary_hit.into_iter();
    state.adversaries.retain(|_| !hits.next().unwrap_or(false));
    let mut gone = projectile_gone.into_iter();
    state.projectiles.retain(|_| !gone.next().unwrap_or(false));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Adversary, Projectile};
    use crate::sim::timer::TimerEvent;
    use proptest::prelude::*;
    use std::time::Duration;

    fn setup() -> (SimulationState, Tuning, Scheduler) {
        let tuning = Tuning::default();
        (SimulationState::new(&tuning), tuning, Scheduler::new())
    }

    fn add_adversary(state: &mut SimulationState, pos: Vec2, speed: f32) -> u32 {
        let id = state.next_entity_id();
        state.adversaries.push(Adversary {
            id,
            pos,
            size: 20.0,
            speed,
            rotation: 0.0,
        });
        id
    }

    fn add_projectile(state: &mut SimulationState, pos: Vec2, vel: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel,
            size: 10.0,
            spin: 0.0,
        });
        id
    }

    #[test]
    fn test_movement_intents() {
        let (mut state, tuning, mut scheduler) = setup();
        let mut input = TickInput {
            move_up: true,
            move_right: true,
            ..Default::default()
        };
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert_eq!(state.player.pos, Vec2::new(405.0, 295.0));
    }

    #[test]
    fn test_movement_stops_at_wall() {
        let (mut state, tuning, mut scheduler) = setup();
        state.player.pos = Vec2::new(23.0, 300.0);
        let mut input = TickInput {
            move_left: true,
            ..Default::default()
        };
        step(&mut state, &mut input, &tuning, &mut scheduler);
        // 23 - 5 - 20 < 0: move skipped
        assert_eq!(state.player.pos.x, 23.0);
    }

    #[test]
    fn test_dead_player_freezes_state() {
        let (mut state, tuning, mut scheduler) = setup();
        add_adversary(&mut state, Vec2::new(100.0, 100.0), 2.0);
        state.player.alive = false;
        let mut input = TickInput {
            move_up: true,
            fire: true,
            ..Default::default()
        };
        step(&mut state, &mut input, &tuning, &mut scheduler);

        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.adversaries[0].pos, Vec2::new(100.0, 100.0));
        assert!(state.projectiles.is_empty());
        assert!(input.fire);
    }

    #[test]
    fn test_aim_rotation() {
        let (mut state, tuning, mut scheduler) = setup();
        let mut input = TickInput {
            rotate_right: true,
            ..Default::default()
        };
        for _ in 0..3 {
            step(&mut state, &mut input, &tuning, &mut scheduler);
        }
        assert!((state.aim.angle - 0.3).abs() < 1e-5);

        input = TickInput {
            rotate_left: true,
            ..Default::default()
        };
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert!((state.aim.angle - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_fire_consumed_only_on_use() {
        let (mut state, tuning, mut scheduler) = setup();
        let mut input = TickInput {
            fire: true,
            ..Default::default()
        };
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert!(!input.fire);
        assert_eq!(state.projectiles.len(), 1);

        // On cooldown: the intent stays asserted, nothing fires
        input.fire = true;
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert!(input.fire);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_unused_slot_fire_is_noop() {
        let (mut state, tuning, mut scheduler) = setup();
        let mut input = TickInput {
            select_slot: Some(4),
            fire: true,
            ..Default::default()
        };
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert_eq!(state.selected_slot, 4);
        assert!(state.projectiles.is_empty());
        assert!(state.cooldowns.iter().all(|c| !c.active));
    }

    #[test]
    fn test_trap_click_needs_trap_slot() {
        let (mut state, tuning, mut scheduler) = setup();
        let mut input = TickInput {
            trap_target: Some(Vec2::new(100.0, 100.0)),
            ..Default::default()
        };
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert!(!state.effects.trap.active);
        // The click is spent even though nothing was placed
        assert!(input.trap_target.is_none());

        input.select_slot = Some(2);
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert!(!state.effects.trap.active);

        input.trap_target = Some(Vec2::new(100.0, 100.0));
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert!(state.effects.trap.active);
        assert!(input.trap_target.is_none());
    }

    #[test]
    fn test_trap_click_during_cooldown_is_dropped() {
        let (mut state, tuning, mut scheduler) = setup();
        let mut input = TickInput {
            select_slot: Some(2),
            trap_target: Some(Vec2::new(100.0, 100.0)),
            ..Default::default()
        };
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert!(state.effects.trap.active);

        // Clicked while cooling down, never re-sent
        input.trap_target = Some(Vec2::new(700.0, 500.0));
        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert!(input.trap_target.is_none());

        // Let the trap expire and the cooldown run out
        while let Some((_, event)) = scheduler.pop_due(Duration::from_secs(60)) {
            match event {
                TimerEvent::CooldownTick { slot } => state.cooldowns.on_second(slot, &mut scheduler),
                TimerEvent::EffectExpired(kind) => state.effects.expire(kind),
                TimerEvent::Spawn => {}
            }
        }
        assert!(!state.cooldowns.is_active(2));
        assert!(!state.effects.trap.active);

        step(&mut state, &mut input, &tuning, &mut scheduler);
        assert!(!state.effects.trap.active);
        assert_eq!(state.effects.trap.origin, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_adversary_homes_toward_player() {
        let (mut state, tuning, mut scheduler) = setup();
        add_adversary(&mut state, Vec2::new(400.0, 100.0), 2.0);
        step(&mut state, &mut TickInput::default(), &tuning, &mut scheduler);
        assert!((state.adversaries[0].pos - Vec2::new(400.0, 102.0)).length() < 1e-4);
    }

    #[test]
    fn test_adversary_on_player_does_not_nan() {
        let (mut state, tuning, mut scheduler) = setup();
        let pos = state.player.pos;
        add_adversary(&mut state, pos, 2.0);
        step(&mut state, &mut TickInput::default(), &tuning, &mut scheduler);
        assert!(state.adversaries[0].pos.is_finite());
        assert!(!state.player.alive);
    }

    #[test]
    fn test_adversaries_separate() {
        let (mut state, tuning, mut scheduler) = setup();
        add_adversary(&mut state, Vec2::new(100.0, 100.0), 0.0);
        add_adversary(&mut state, Vec2::new(100.0, 100.0), 0.0);
        step(&mut state, &mut TickInput::default(), &tuning, &mut scheduler);

        let a = state.adversaries[0].pos;
        let b = state.adversaries[1].pos;
        assert!(a.is_finite() && b.is_finite());
        assert!(a.distance(b) >= 20.0 - 1e-4);
    }

    #[test]
    fn test_contact_kills_player() {
        let (mut state, tuning, mut scheduler) = setup();
        add_adversary(&mut state, Vec2::new(440.0, 300.0), 2.0);
        step(&mut state, &mut TickInput::default(), &tuning, &mut scheduler);
        assert!(!state.player.alive);
    }

    #[test]
    fn test_projectile_hit_removes_one_pair() {
        let (mut state, tuning, mut scheduler) = setup();
        // Two adversaries stacked on the projectile's path, both overlapping
        add_adversary(&mut state, Vec2::new(100.0, 100.0), 0.0);
        add_adversary(&mut state, Vec2::new(100.0, 125.0), 0.0);
        add_projectile(&mut state, Vec2::new(95.0, 110.0), Vec2::new(5.0, 0.0));

        step(&mut state, &mut TickInput::default(), &tuning, &mut scheduler);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.adversaries.len(), 1);
        assert_eq!(state.stats.adversaries_destroyed, 1);
    }

    #[test]
    fn test_two_projectiles_one_adversary() {
        let (mut state, tuning, mut scheduler) = setup();
        let target = add_adversary(&mut state, Vec2::new(100.0, 100.0), 0.0);
        let other = add_adversary(&mut state, Vec2::new(200.0, 100.0), 0.0);
        let first = add_projectile(&mut state, Vec2::new(100.0, 95.0), Vec2::ZERO);
        let second = add_projectile(&mut state, Vec2::new(100.0, 105.0), Vec2::ZERO);

        step(&mut state, &mut TickInput::default(), &tuning, &mut scheduler);

        // The first projectile takes the adversary; the second finds nothing left
        let adversaries: Vec<u32> = state.adversaries.iter().map(|a| a.id).collect();
        let projectiles: Vec<u32> = state.projectiles.iter().map(|p| p.id).collect();
        assert_eq!(adversaries, vec![other]);
        assert_eq!(projectiles, vec![second]);
        assert!(!adversaries.contains(&target));
        assert!(!projectiles.contains(&first));
    }

    #[test]
    fn test_projectile_leaves_arena() {
        let (mut state, tuning, mut scheduler) = setup();
        add_projectile(&mut state, Vec2::new(798.0, 50.0), Vec2::new(5.0, 0.0));
        add_projectile(&mut state, Vec2::new(400.0, 50.0), Vec2::new(5.0, 0.0));
        step(&mut state, &mut TickInput::default(), &tuning, &mut scheduler);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos, Vec2::new(405.0, 50.0));
    }

    #[test]
    fn test_trap_is_continuous() {
        let (mut state, tuning, mut scheduler) = setup();
        let mut input = TickInput {
            select_slot: Some(2),
            trap_target: Some(Vec2::new(100.0, 100.0)),
            ..Default::default()
        };
        step(&mut state, &mut input, &tuning, &mut scheduler);

        // Wanders in after placement
        add_adversary(&mut state, Vec2::new(100.0, 170.0), 0.0);
        add_adversary(&mut state, Vec2::new(100.0, 200.0), 0.0);
        step(&mut state, &mut input, &tuning, &mut scheduler);

        assert_eq!(state.adversaries.len(), 1);
        assert_eq!(state.adversaries[0].pos, Vec2::new(100.0, 200.0));
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_arena(
            moves in proptest::collection::vec(0u8..4, 1..400),
        ) {
            let (mut state, tuning, mut scheduler) = setup();
            for m in moves {
                let mut input = TickInput {
                    move_up: m == 0,
                    move_down: m == 1,
                    move_left: m == 2,
                    move_right: m == 3,
                    ..Default::default()
                };
                step(&mut state, &mut input, &tuning, &mut scheduler);
                let p = state.player.pos;
                let r = state.player.size;
                prop_assert!(p.x - r >= 0.0 && p.x + r <= state.arena.width);
                prop_assert!(p.y - r >= 0.0 && p.y + r <= state.arena.height);
            }
        }
    }
}
