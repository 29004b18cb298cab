//! Mutable simulation state shared by the resolvers.
//!
//! [`World`] bundles what the physics and explosion resolvers write: the
//! terrain, the bodies, the random stream and the event log. The turn and AI
//! machines live beside it in [`Simulation`](crate::Simulation) and only hold
//! [`BodyId`](crate::entity::BodyId) handles into it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rubble::TerrainField;

use crate::arena::BodyArena;
use crate::event::SimEvent;

/// Terrain, bodies, randomness and events of one round.
#[derive(Debug, Clone)]
pub struct World {
    /// Destructible terrain
    pub terrain: TerrainField,
    /// Every live body
    pub bodies: BodyArena,
    /// The round's single random stream
    pub rng: ChaCha8Rng,
    /// Events recorded since the last drain
    pub events: Vec<SimEvent>,
}

impl World {
    /// Wraps an existing terrain with an empty body set and a seeded stream.
    #[must_use]
    pub fn new(terrain: TerrainField, seed: u64) -> Self {
        Self {
            terrain,
            bodies: BodyArena::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Records an event.
    pub fn emit(&mut self, event: SimEvent) {
        tracing::trace!(?event, "event");
        self.events.push(event);
    }

    /// Removes and returns every recorded event.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::TurnState;

    #[test]
    fn drain_empties_log() {
        let mut world = World::new(TerrainField::new(8, 8).unwrap(), 1);
        world.emit(SimEvent::TurnStateChanged {
            from: TurnState::Reset,
            to: TurnState::GenerateTerrain,
        });
        assert_eq!(world.drain_events().len(), 1);
        assert!(world.drain_events().is_empty());
    }
}
