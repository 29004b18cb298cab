//! Body storage for the simulation.
//!
//! The [`BodyArena`] is the single owner of every body. It provides:
//! - Storage with deterministic iteration order (`BTreeMap`)
//! - Monotonically increasing [`BodyId`] handles that are never reused
//! - Removal of dead bodies at the end of a physics pass
//!
//! Anything outside the arena that refers to a body (the controlled unit, the
//! camera target, the AI target, team rosters) holds a [`BodyId`] and
//! resolves it on every use. A removed body's id resolves to `None`.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use salvo_core::arena::BodyArena;
//! use salvo_core::entity::BodyInner;
//!
//! let mut arena = BodyArena::new();
//! let a = arena.spawn(Vec2::new(10.0, 0.0), Vec2::ZERO, BodyInner::Projectile);
//! let b = arena.spawn(Vec2::new(20.0, 0.0), Vec2::ZERO, BodyInner::Debris);
//!
//! let ids: Vec<_> = arena.ids_sorted().collect();
//! assert_eq!(ids, vec![a, b]);
//!
//! arena.get_mut(a).unwrap().physics.dead = true;
//! assert_eq!(arena.remove_dead(), vec![a]);
//! assert!(arena.get(a).is_none());
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Body, BodyId, BodyInner};

/// Owner of all simulated bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyArena {
    /// Next id to hand out.
    next_id: u64,
    /// Bodies in id order.
    bodies: BTreeMap<BodyId, Body>,
}

impl BodyArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            bodies: BTreeMap::new(),
        }
    }

    /// Spawns a body and returns its handle.
    pub fn spawn(&mut self, position: Vec2, velocity: Vec2, inner: BodyInner) -> BodyId {
        let id = BodyId::new(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, Body::new(id, position, velocity, inner));
        id
    }

    /// Removes a body, returning it if it existed.
    pub fn despawn(&mut self, id: BodyId) -> Option<Body> {
        self.bodies.remove(&id)
    }

    /// Resolves a handle.
    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Resolves a handle mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    /// Returns true if the handle still resolves.
    #[must_use]
    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Body ids in ascending order.
    pub fn ids_sorted(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.keys().copied()
    }

    /// Bodies in id order.
    pub fn bodies_sorted(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.values()
    }

    /// Mutable bodies in id order.
    pub fn bodies_sorted_mut(&mut self) -> impl Iterator<Item = &mut Body> + '_ {
        self.bodies.values_mut()
    }

    /// Number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the arena holds no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Logical AND of every body's `stable` flag. True for an empty arena.
    #[must_use]
    pub fn all_stable(&self) -> bool {
        self.bodies.values().all(|b| b.physics.stable)
    }

    /// Removes every body flagged dead and returns their ids in order.
    pub fn remove_dead(&mut self) -> Vec<BodyId> {
        let dead: Vec<BodyId> = self
            .bodies
            .values()
            .filter(|b| b.physics.dead)
            .map(Body::id)
            .collect();
        for id in &dead {
            self.bodies.remove(id);
        }
        dead
    }
}
