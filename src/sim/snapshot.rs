//! Read-only view of a run for renderers and UI

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ability::EffectKind;
use super::state::{Aim, RunStats, SimulationState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: f32,
    pub facing: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdversaryView {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub spin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub origin: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownView {
    pub active: bool,
    pub remaining_secs: u32,
}

/// Everything a frame needs to draw, detached from the live state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerView,
    pub aim: Aim,
    pub adversaries: Vec<AdversaryView>,
    pub projectiles: Vec<ProjectileView>,
    /// Active effects only
    pub effects: Vec<EffectView>,
    /// One entry per hotbar slot
    pub cooldowns: Vec<CooldownView>,
    pub selected_slot: usize,
    pub alive: bool,
    pub stats: RunStats,
}

impl From<&SimulationState> for Snapshot {
    fn from(state: &SimulationState) -> Self {
        Self {
            player: PlayerView {
                pos: state.player.pos,
                size: state.player.size,
                facing: state.player.facing,
                alive: state.player.alive,
            },
            aim: state.aim,
            adversaries: state
                .adversaries
                .iter()
                .map(|a| AdversaryView {
                    id: a.id,
                    pos: a.pos,
                    size: a.size,
                    rotation: a.rotation,
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    pos: p.pos,
                    size: p.size,
                    spin: p.spin,
                })
                .collect(),
            effects: state
                .effects
                .active()
                .map(|e| EffectView {
                    kind: e.kind,
                    origin: e.origin,
                    radius: e.radius,
                })
                .collect(),
            cooldowns: state
                .cooldowns
                .iter()
                .map(|c| CooldownView {
                    active: c.active,
                    remaining_secs: c.remaining_secs,
                })
                .collect(),
            selected_slot: state.selected_slot,
            alive: state.player.alive,
            stats: state.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::ability::place_trap;
    use crate::sim::timer::Scheduler;

    #[test]
    fn test_snapshot_reflects_state() {
        let tuning = Tuning::default();
        let mut state = SimulationState::new(&tuning);
        let mut scheduler = Scheduler::new();
        place_trap(&mut state, &tuning, &mut scheduler, Vec2::new(50.0, 60.0));

        let snapshot = Snapshot::from(&state);
        assert!(snapshot.alive);
        assert_eq!(snapshot.player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(snapshot.cooldowns.len(), 6);
        assert_eq!(
            snapshot.cooldowns[2],
            CooldownView {
                active: true,
                remaining_secs: 50
            }
        );
        assert_eq!(
            snapshot.effects,
            vec![EffectView {
                kind: EffectKind::Trap,
                origin: Vec2::new(50.0, 60.0),
                radius: 75.0,
            }]
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = SimulationState::new(&Tuning::default());
        let json = serde_json::to_string(&Snapshot::from(&state)).expect("serializable");
        assert!(json.contains("\"selected_slot\":0"));
    }
}
