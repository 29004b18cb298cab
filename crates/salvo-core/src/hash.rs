//! State hashing for determinism verification.
//!
//! Two simulations built from the same config and seed, fed the same inputs,
//! must produce identical hashes after every frame.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec2;
use rubble::hash::write_terrain;

use crate::entity::Body;
use crate::simulation::Simulation;

/// Compute a deterministic hash of simulation state.
///
/// This hash includes:
/// - Frame counter and seed
/// - Terrain bitmap
/// - Every body in id order
/// - Turn and AI state, countdown, charge and the controlled unit
#[must_use]
pub fn hash_simulation(sim: &Simulation) -> u64 {
    let mut hasher = DefaultHasher::new();

    sim.frame().hash(&mut hasher);
    sim.seed().hash(&mut hasher);

    write_terrain(sim.terrain(), &mut hasher);

    sim.bodies().len().hash(&mut hasher);
    for body in sim.bodies().bodies_sorted() {
        hash_body(body, &mut hasher);
    }

    let turn = sim.turn();
    turn.state.hash(&mut hasher);
    turn.countdown.to_bits().hash(&mut hasher);
    turn.player_control.hash(&mut hasher);
    turn.computer_control.hash(&mut hasher);
    turn.outcome.hash(&mut hasher);
    sim.ai().state.hash(&mut hasher);
    sim.controlled().hash(&mut hasher);
    sim.charge_level().to_bits().hash(&mut hasher);

    hasher.finish()
}

fn hash_body<H: Hasher>(body: &Body, hasher: &mut H) {
    body.id().hash(hasher);
    body.kind().hash(hasher);
    hash_vec2(body.physics.position, hasher);
    hash_vec2(body.physics.velocity, hasher);
    body.physics.stable.hash(hasher);
    body.physics.dead.hash(hasher);

    if let Some(unit) = body.as_unit() {
        unit.health.to_bits().hash(hasher);
        unit.aim_angle.to_bits().hash(hasher);
        unit.team.hash(hasher);
        unit.facing.sign().to_bits().hash(hasher);
        unit.playable.hash(hasher);
    }
}

fn hash_vec2<H: Hasher>(v: Vec2, hasher: &mut H) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}
