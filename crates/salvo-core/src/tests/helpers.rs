//! Test helper functions for setting up and stepping simulations.

use crate::config::GameConfig;
use crate::entity::BodyId;
use crate::event::SimEvent;
use crate::simulation::Simulation;
use crate::turn::TurnState;

/// Frame time used by every test.
pub const DT: f32 = 1.0 / 60.0;

/// Upper bound on frames spent waiting for a condition.
pub const MAX_FRAMES: usize = 6000;

// =============================================================================
// Configurations
// =============================================================================

/// A 256x128 round with a human primary team.
///
/// Units stand close enough that every enemy is in range of the AI solver.
pub fn small_config() -> GameConfig {
    GameConfig {
        map_width: 256,
        map_height: 128,
        noise_octaves: 6,
        ..GameConfig::default()
    }
}

/// [`small_config`] with every team computer-controlled.
pub fn computer_config() -> GameConfig {
    GameConfig {
        primary_is_human: false,
        ..small_config()
    }
}

// =============================================================================
// Stepping
// =============================================================================

/// Advances until `done` holds, collecting every event on the way.
///
/// Returns `None` if `done` never held within [`MAX_FRAMES`].
pub fn advance_until(
    sim: &mut Simulation,
    mut done: impl FnMut(&Simulation, &[SimEvent]) -> bool,
) -> Option<Vec<SimEvent>> {
    let mut events = Vec::new();
    for _ in 0..MAX_FRAMES {
        sim.advance(DT);
        events.extend(sim.drain_events());
        if done(sim, &events) {
            return Some(events);
        }
    }
    None
}

/// Advances until the turn machine is in `state`.
pub fn advance_to_state(sim: &mut Simulation, state: TurnState) -> Option<Vec<SimEvent>> {
    advance_until(sim, |sim, _| sim.turn_state() == state)
}

/// Builds a round and plays it up to the first turn.
pub fn first_turn(config: GameConfig, seed: u64) -> Simulation {
    let mut sim = Simulation::new(config, seed).unwrap();
    advance_to_state(&mut sim, TurnState::StartPlay).expect("first turn never started");
    sim
}

// =============================================================================
// State Manipulation Functions
// =============================================================================

/// Members of `team`.
pub fn team_members(sim: &Simulation, team: usize) -> Vec<BodyId> {
    sim.roster().team(team).unwrap().members().to_vec()
}

/// Sets the health of every member of `team`.
pub fn set_team_health(sim: &mut Simulation, team: usize, health: f32) {
    for id in team_members(sim, team) {
        if let Some(unit) = sim.bodies_mut().get_mut(id).and_then(|b| b.as_unit_mut()) {
            unit.health = health;
        }
    }
}

/// Health of one unit, zero if it is gone.
pub fn health(sim: &Simulation, id: BodyId) -> f32 {
    sim.bodies()
        .get(id)
        .and_then(|b| b.as_unit())
        .map_or(0.0, |u| u.health)
}

/// Every `TurnStarted` event as `(team, unit, computer)`.
pub fn turns_started(events: &[SimEvent]) -> Vec<(usize, BodyId, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            SimEvent::TurnStarted {
                team,
                unit,
                computer,
            } => Some((*team, *unit, *computer)),
            _ => None,
        })
        .collect()
}
