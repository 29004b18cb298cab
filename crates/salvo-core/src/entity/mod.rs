//! Simulated bodies.
//!
//! Every body shares one record layout: an id, a [`PhysicsState`] and a
//! [`BodyInner`] variant holding kind-specific state. Behaviour that differs
//! per kind (radius, friction, bounce budget, death blast, whether damage
//! applies) is looked up from the kind's [`BodyProfile`] rather than
//! dispatched through trait objects.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use salvo_core::entity::{Body, BodyId, BodyInner, BodyKind, UnitState};
//!
//! let mut unit = Body::new(
//!     BodyId::new(3),
//!     Vec2::new(100.0, 0.0),
//!     Vec2::ZERO,
//!     BodyInner::Unit(UnitState::new(0)),
//! );
//!
//! assert_eq!(unit.kind(), BodyKind::Unit);
//! assert!(unit.damage(0.25));
//! assert!((unit.as_unit().unwrap().health - 0.75).abs() < 1e-6);
//! ```

pub mod components;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use components::{
    BodyProfile, BounceBudget, Capabilities, Facing, PhysicsState, UnitState, DEBRIS_PROFILE,
    PROJECTILE_PROFILE, UNIT_PROFILE,
};

/// Stable handle to a body in the [`BodyArena`](crate::arena::BodyArena).
///
/// Ids are never reused, so a handle to a removed body resolves to `None`
/// instead of aliasing a newer body.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(u64);

impl BodyId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({})", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<BodyId> for u64 {
    fn from(id: BodyId) -> Self {
        id.0
    }
}

/// Body kind discriminant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// Decorative crater fragment
    Debris,
    /// Fired shell that explodes on impact
    Projectile,
    /// Team member
    Unit,
}

impl BodyKind {
    /// Constants and capabilities of this kind.
    #[must_use]
    pub const fn profile(self) -> BodyProfile {
        match self {
            Self::Debris => DEBRIS_PROFILE,
            Self::Projectile => PROJECTILE_PROFILE,
            Self::Unit => UNIT_PROFILE,
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debris => write!(f, "Debris"),
            Self::Projectile => write!(f, "Projectile"),
            Self::Unit => write!(f, "Unit"),
        }
    }
}

/// Kind-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyInner {
    /// Debris carries no extra state
    Debris,
    /// Projectiles carry no extra state
    Projectile,
    /// Unit health, team and aim
    Unit(UnitState),
}

impl BodyInner {
    /// Kind of this variant.
    #[must_use]
    pub const fn kind(&self) -> BodyKind {
        match self {
            Self::Debris => BodyKind::Debris,
            Self::Projectile => BodyKind::Projectile,
            Self::Unit(_) => BodyKind::Unit,
        }
    }
}

/// A simulated body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    id: BodyId,
    /// Kinematic state
    pub physics: PhysicsState,
    inner: BodyInner,
}

impl Body {
    /// Creates a body with its kind's profile applied.
    #[must_use]
    pub fn new(id: BodyId, position: Vec2, velocity: Vec2, inner: BodyInner) -> Self {
        let profile = inner.kind().profile();
        Self {
            id,
            physics: PhysicsState {
                position,
                velocity,
                acceleration: Vec2::ZERO,
                radius: profile.radius,
                friction: profile.friction,
                bounce_budget: profile.bounce_budget,
                stable: false,
                dead: false,
            },
            inner,
        }
    }

    /// Handle of this body.
    #[must_use]
    pub const fn id(&self) -> BodyId {
        self.id
    }

    /// Kind of this body.
    #[must_use]
    pub const fn kind(&self) -> BodyKind {
        self.inner.kind()
    }

    /// Kind-specific state.
    #[must_use]
    pub const fn inner(&self) -> &BodyInner {
        &self.inner
    }

    /// Capabilities of this body's kind.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.kind().profile().capabilities
    }

    /// Unit state, if this is a unit.
    #[must_use]
    pub const fn as_unit(&self) -> Option<&UnitState> {
        match &self.inner {
            BodyInner::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    /// Mutable unit state, if this is a unit.
    #[must_use]
    pub fn as_unit_mut(&mut self) -> Option<&mut UnitState> {
        match &mut self.inner {
            BodyInner::Unit(unit) => Some(unit),
            _ => None,
        }
    }

    /// Physics and unit state borrowed together, if this is a unit.
    #[must_use]
    pub fn unit_parts_mut(&mut self) -> Option<(&mut PhysicsState, &mut UnitState)> {
        match &mut self.inner {
            BodyInner::Unit(unit) => Some((&mut self.physics, unit)),
            _ => None,
        }
    }

    /// Returns true for units.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self.inner, BodyInner::Unit(_))
    }

    /// Reduces health by `amount`.
    ///
    /// Health that falls to zero or below is clamped to zero and the unit
    /// stops being playable. Bodies without [`Capabilities::DAMAGEABLE`]
    /// ignore the call.
    ///
    /// Returns `true` while the body is still alive.
    pub fn damage(&mut self, amount: f32) -> bool {
        if !self.capabilities().contains(Capabilities::DAMAGEABLE) {
            return true;
        }
        match self.as_unit_mut() {
            Some(unit) => {
                unit.health -= amount;
                if unit.health <= 0.0 {
                    unit.health = 0.0;
                    unit.playable = false;
                }
                unit.health > 0.0
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(team: usize) -> Body {
        Body::new(
            BodyId::new(0),
            Vec2::ZERO,
            Vec2::ZERO,
            BodyInner::Unit(UnitState::new(team)),
        )
    }

    mod body_id_tests {
        use super::*;

        #[test]
        fn ordering_and_conversion() {
            let a = BodyId::new(1);
            let b: BodyId = 2.into();
            assert!(a < b);
            assert_eq!(u64::from(b), 2);
            assert_eq!(format!("{a:?}"), "BodyId(1)");
            assert_eq!(a.to_string(), "1");
        }
    }

    mod profile_tests {
        use super::*;

        #[test]
        fn new_body_takes_profile() {
            let shell = Body::new(BodyId::new(1), Vec2::ZERO, Vec2::X, BodyInner::Projectile);
            assert!((shell.physics.radius - 5.0).abs() < f32::EPSILON);
            assert!((shell.physics.friction - 0.5).abs() < f32::EPSILON);
            assert_eq!(shell.physics.bounce_budget, BounceBudget::Remaining(1));
            assert!(!shell.physics.stable);
            assert!(!shell.physics.dead);

            let soldier = unit(0);
            assert!((soldier.physics.radius - 16.0).abs() < f32::EPSILON);
            assert_eq!(soldier.physics.bounce_budget, BounceBudget::Infinite);
        }

        #[test]
        fn kind_display() {
            assert_eq!(BodyKind::Debris.to_string(), "Debris");
            assert_eq!(BodyInner::Projectile.kind(), BodyKind::Projectile);
        }
    }

    mod damage_tests {
        use super::*;

        #[test]
        fn lethal_damage_clamps_and_disables() {
            let mut soldier = unit(1);
            assert!(!soldier.damage(1.5));
            let state = soldier.as_unit().unwrap();
            assert_eq!(state.health, 0.0);
            assert!(!state.playable);
            assert!(!state.is_alive());
        }

        #[test]
        fn partial_damage_keeps_unit_playable() {
            let mut soldier = unit(0);
            assert!(soldier.damage(0.4));
            let state = soldier.as_unit().unwrap();
            assert!((state.health - 0.6).abs() < 1e-6);
            assert!(state.playable);
        }

        #[test]
        fn non_damageable_accepts_damage_as_noop() {
            let mut debris = Body::new(BodyId::new(2), Vec2::ZERO, Vec2::ZERO, BodyInner::Debris);
            let before = debris.clone();
            assert!(debris.damage(10.0));
            assert_eq!(debris, before);
        }
    }
}
