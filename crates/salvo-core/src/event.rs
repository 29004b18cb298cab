//! Events recorded while a frame advances.
//!
//! Events never feed back into the simulation. They exist for callers that
//! want to react to what happened (sound, telemetry, headless summaries)
//! without diffing state between frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{BodyId, BodyKind};
use crate::turn::{Outcome, TurnState};

/// Something notable that happened during [`Simulation::advance`](crate::Simulation::advance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The turn machine committed a new state.
    TurnStateChanged {
        /// State left
        from: TurnState,
        /// State entered
        to: TurnState,
    },
    /// A team's turn began.
    TurnStarted {
        /// Team now playing
        team: usize,
        /// Unit under control
        unit: BodyId,
        /// Whether the AI drives this turn
        computer: bool,
    },
    /// A body with a finite bounce budget collided and survived.
    Bounce {
        /// Body that bounced
        body: BodyId,
        /// Bounces left
        remaining: u32,
    },
    /// A body spent its last bounce and was removed.
    BodyExpired {
        /// Removed body
        body: BodyId,
        /// Its kind
        kind: BodyKind,
    },
    /// An explosion carved a crater.
    Explosion {
        /// Blast centre
        center: Vec2,
        /// Blast radius
        radius: f32,
        /// Terrain cells turned to sky
        cleared: usize,
        /// Bodies pushed by the blast
        affected: usize,
    },
    /// A unit released its weapon.
    WeaponFired {
        /// Firing unit
        unit: BodyId,
        /// Spawned projectile
        projectile: BodyId,
        /// Charge level at release
        charge: f32,
    },
    /// The round is decided.
    GameOver {
        /// Result for the primary team
        outcome: Outcome,
    },
}
