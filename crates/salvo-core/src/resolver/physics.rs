//! Integrator and terrain collision resolver.
//!
//! One physics sub-step, per body in id order:
//!
//! 1. Add gravity to the acceleration, integrate velocity, compute a
//!    *potential* position, reset the acceleration and clear `stable`
//! 2. Probe the terrain at `radius` from the potential position along the
//!    half circle facing the direction of travel (9 probes, 22.5° apart)
//! 3. Sum `potential - probe` over every probe that lands on ground; the
//!    sum is the surface normal of the contact
//! 4. On contact: mark stable, reflect the velocity about the normal scaled
//!    by friction, and spend one bounce. The potential position is discarded
//! 5. Without contact: commit the potential position
//! 6. Bodies slower than [`REST_SPEED`] are stable regardless
//!
//! Death blasts are queued while bodies move and detonated once the pass is
//! over; dead bodies are removed at the very end of the sub-step.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

use glam::Vec2;
use rubble::TerrainField;

use crate::config::GameConfig;
use crate::entity::{Body, BodyId, BounceBudget};
use crate::event::SimEvent;
use crate::world::World;

use super::explosion::{explode, Blast};

/// Number of terrain probes on the leading half circle.
pub const PROBE_COUNT: u32 = 9;

/// Angle between neighbouring probes.
pub const PROBE_STEP: f32 = FRAC_PI_8;

/// Speed below which a body counts as resting.
pub const REST_SPEED: f32 = 0.4;

/// Smallest response vector length used as a divisor.
pub const RESPONSE_EPSILON: f32 = 1e-6;

/// What happened to one body during a sub-step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyStep {
    /// No contact; the body moved
    Free,
    /// Contact with an infinite bounce budget
    Collided,
    /// Contact that spent a bounce without exhausting the budget
    Bounced {
        /// Bounces left
        remaining: u32,
    },
    /// Contact that spent the last bounce
    Died {
        /// Death blast radius, if the kind explodes
        blast: Option<f32>,
    },
}

/// Result of one sub-step over every body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstepOutcome {
    /// Death blasts detonated
    pub detonations: usize,
    /// Bodies removed, in id order
    pub removed: Vec<BodyId>,
}

/// Gravity integrator with arc-sampled terrain collision.
///
/// # Example
///
/// ```
/// use glam::Vec2;
/// use rubble::TerrainField;
/// use salvo_core::entity::BodyInner;
/// use salvo_core::resolver::PhysicsResolver;
/// use salvo_core::world::World;
///
/// let mut world = World::new(TerrainField::new(64, 64).unwrap(), 0);
/// let id = world.bodies.spawn(Vec2::new(32.0, 10.0), Vec2::ZERO, BodyInner::Projectile);
///
/// PhysicsResolver::new(2.0).substep(&mut world, 0.1);
/// assert!(world.bodies.get(id).unwrap().physics.velocity.y > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsResolver {
    gravity: f32,
}

impl PhysicsResolver {
    /// Creates a resolver pulling bodies down with `gravity`.
    #[must_use]
    pub const fn new(gravity: f32) -> Self {
        Self { gravity }
    }

    /// Creates a resolver from the round configuration.
    #[must_use]
    pub const fn from_config(config: &GameConfig) -> Self {
        Self::new(config.gravity)
    }

    /// Gravity applied every sub-step.
    #[must_use]
    pub const fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Advances every body by one sub-step of `dt` seconds.
    pub fn substep(&self, world: &mut World, dt: f32) -> SubstepOutcome {
        let mut blasts = Vec::new();

        for body in world.bodies.bodies_sorted_mut() {
            match self.step_body(&world.terrain, body, dt) {
                BodyStep::Free | BodyStep::Collided => {}
                BodyStep::Bounced { remaining } => {
                    world.events.push(SimEvent::Bounce {
                        body: body.id(),
                        remaining,
                    });
                }
                BodyStep::Died { blast } => {
                    world.events.push(SimEvent::BodyExpired {
                        body: body.id(),
                        kind: body.kind(),
                    });
                    if let Some(radius) = blast {
                        blasts.push(Blast::new(body.physics.position, radius));
                    }
                }
            }
        }

        for blast in &blasts {
            explode(world, *blast);
        }

        let removed = world.bodies.remove_dead();
        if !removed.is_empty() {
            tracing::trace!(count = removed.len(), "removed dead bodies");
        }

        SubstepOutcome {
            detonations: blasts.len(),
            removed,
        }
    }

    /// Integrates one body and resolves its terrain contact.
    ///
    /// Bodies already flagged dead are skipped.
    pub fn step_body(&self, terrain: &TerrainField, body: &mut Body, dt: f32) -> BodyStep {
        let blast_radius = body.kind().profile().death_blast();
        let p = &mut body.physics;
        if p.dead {
            return BodyStep::Free;
        }

        p.acceleration.y += self.gravity;
        p.velocity += p.acceleration * dt;
        let potential = p.position + p.velocity * dt;
        p.acceleration = Vec2::ZERO;
        p.stable = false;

        let response = probe_response(terrain, potential, p.radius, p.heading());
        let speed = p.velocity.length();

        let step = if let Some(response) = response {
            p.stable = true;
            let normal = response / response.length().max(RESPONSE_EPSILON);
            p.velocity = p.friction * (p.velocity - 2.0 * p.velocity.dot(normal) * normal);

            let exhausted = p.bounce_budget.spend();
            match p.bounce_budget {
                BounceBudget::Infinite => BodyStep::Collided,
                BounceBudget::Remaining(_) if exhausted => {
                    p.dead = true;
                    BodyStep::Died { blast: blast_radius }
                }
                BounceBudget::Remaining(remaining) => BodyStep::Bounced { remaining },
            }
        } else {
            p.position = potential;
            BodyStep::Free
        };

        if speed < REST_SPEED {
            p.stable = true;
        }
        step
    }
}

/// Probes the leading half circle around `center`.
///
/// Returns the accumulated response vector if any probe hit ground, `None`
/// otherwise. Probe coordinates are clamped into the field before use.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn probe_response(terrain: &TerrainField, center: Vec2, radius: f32, heading: f32) -> Option<Vec2> {
    let max = Vec2::new((terrain.width() - 1) as f32, (terrain.height() - 1) as f32);
    let mut response = Vec2::ZERO;
    let mut hit = false;

    for k in 0..PROBE_COUNT {
        let angle = heading - FRAC_PI_2 + k as f32 * PROBE_STEP;
        let probe = (center + radius * Vec2::new(angle.cos(), angle.sin())).clamp(Vec2::ZERO, max);
        if terrain.sample(probe).is_ground() {
            response += center - probe;
            hit = true;
        }
    }

    hit.then_some(response)
}
