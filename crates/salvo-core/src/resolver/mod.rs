//! Resolvers that move bodies and apply their consequences.
//!
//! Resolvers are the only code that mutates bodies and terrain outside of
//! control intents:
//!
//! - [`PhysicsResolver`]: gravity, integration, arc-sampled terrain collision,
//!   bounce budgets and dead-body removal
//! - [`explode`]: craters, radial impulse, blast damage and debris
//!
//! # Invariants
//!
//! - Bodies are visited in ascending [`BodyId`](crate::entity::BodyId) order
//! - Explosions triggered during a sub-step take effect after every body has
//!   moved in that sub-step
//! - A body flagged dead is gone from the arena when the sub-step returns

mod explosion;
mod physics;

pub use explosion::{
    blast_damage, explode, Blast, BlastReport, BLAST_DAMAGE_SCALE, DEBRIS_SPEED,
    MIN_BLAST_DISTANCE,
};
pub use physics::{
    probe_response, BodyStep, PhysicsResolver, SubstepOutcome, PROBE_COUNT, PROBE_STEP,
    RESPONSE_EPSILON, REST_SPEED,
};
