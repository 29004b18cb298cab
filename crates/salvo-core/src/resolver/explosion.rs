//! Explosions: crater, radial impulse, damage and debris.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rubble::stamp::Crater;
use serde::{Deserialize, Serialize};

use crate::entity::{BodyId, BodyInner};
use crate::event::SimEvent;
use crate::world::World;

/// Health lost at the centre of a blast.
pub const BLAST_DAMAGE_SCALE: f32 = 0.8;

/// Distances are floored to this before dividing.
pub const MIN_BLAST_DISTANCE: f32 = 0.001;

/// Launch speed of crater debris.
pub const DEBRIS_SPEED: f32 = 10.0;

/// An explosion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blast {
    /// World-space centre
    pub center: Vec2,
    /// Radius of crater and effect
    pub radius: f32,
}

impl Blast {
    /// Creates a blast description.
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Crater carved by this blast. Coordinates truncate toward zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn crater(&self) -> Crater {
        Crater::new(
            self.center.x as i32,
            self.center.y as i32,
            self.radius as i32,
        )
    }
}

/// What an explosion did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlastReport {
    /// Terrain cells turned to sky
    pub cleared: usize,
    /// Bodies inside the radius, in id order
    pub affected: Vec<BodyId>,
    /// Debris spawned, in id order
    pub debris: Vec<BodyId>,
}

/// Health removed from a damageable body `distance` away from a blast.
///
/// Falls linearly from [`BLAST_DAMAGE_SCALE`] at the centre to zero at the
/// edge and is zero beyond it.
#[must_use]
pub fn blast_damage(radius: f32, distance: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    let distance = distance.max(MIN_BLAST_DISTANCE);
    ((radius - distance) / radius) * BLAST_DAMAGE_SCALE
}

/// Detonates `blast` in the world.
///
/// 1. Carves the crater
/// 2. Every body strictly inside the radius is flung outward at speed
///    `radius`, made unstable and damaged by [`blast_damage`]
/// 3. Spawns `floor(radius)` debris at the centre flying in random directions
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn explode(world: &mut World, blast: Blast) -> BlastReport {
    let Blast { center, radius } = blast;
    let cleared = world.terrain.stamp(blast.crater());

    let mut affected = Vec::new();
    for body in world.bodies.bodies_sorted_mut() {
        let offset = body.physics.position - center;
        let distance = offset.length().max(MIN_BLAST_DISTANCE);
        if distance < radius {
            body.physics.velocity = (offset / distance) * radius;
            body.physics.stable = false;
            body.damage(blast_damage(radius, distance));
            affected.push(body.id());
        }
    }

    let count = if radius > 0.0 { radius.floor() as usize } else { 0 };
    let mut debris = Vec::with_capacity(count);
    for _ in 0..count {
        let angle = world.rng.gen::<f32>() * TAU;
        let velocity = DEBRIS_SPEED * Vec2::new(angle.cos(), angle.sin());
        debris.push(world.bodies.spawn(center, velocity, BodyInner::Debris));
    }

    tracing::debug!(
        x = center.x,
        y = center.y,
        radius,
        cleared,
        affected = affected.len(),
        debris = debris.len(),
        "explosion"
    );
    world.emit(SimEvent::Explosion {
        center,
        radius,
        cleared,
        affected: affected.len(),
    });

    BlastReport {
        cleared,
        affected,
        debris,
    }
}
