//! Component structs shared by every body, plus the per-kind profile table.

use std::f32::consts::PI;

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

bitflags! {
    /// What a body kind is able to do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Loses health when caught in a blast
        const DAMAGEABLE = 1;
        /// Triggers an explosion when its bounce budget runs out
        const EXPLODES_ON_DEATH = 1 << 1;
        /// Accepts control intents
        const CONTROLLABLE = 1 << 2;
    }
}

/// Collisions a body survives before it dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BounceBudget {
    /// Never dies from collisions
    Infinite,
    /// Dies on the collision that takes this to zero
    Remaining(u32),
}

impl BounceBudget {
    /// Spends one bounce. Returns `true` if this bounce exhausted the budget.
    ///
    /// An already-empty budget is left alone and reports `false`.
    pub fn spend(&mut self) -> bool {
        match self {
            Self::Infinite | Self::Remaining(0) => false,
            Self::Remaining(n) => {
                *n -= 1;
                *n == 0
            }
        }
    }
}

/// Kinematic state integrated by the physics resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsState {
    /// World position, y down
    pub position: Vec2,
    /// Velocity in cells per second
    pub velocity: Vec2,
    /// Accumulated acceleration, reset every sub-step
    pub acceleration: Vec2,
    /// Collision radius
    pub radius: f32,
    /// Fraction of speed kept after a bounce
    pub friction: f32,
    /// Remaining bounces
    pub bounce_budget: BounceBudget,
    /// Collided this sub-step or nearly at rest
    pub stable: bool,
    /// Scheduled for removal at the end of the sub-step
    pub dead: bool,
}

impl PhysicsState {
    /// Direction of travel in radians.
    #[must_use]
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }
}

/// Direction a unit's sprite faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Toward negative x
    #[default]
    Left,
    /// Toward positive x
    Right,
}

impl Facing {
    /// `-1.0` for left, `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing toward `target_x` as seen from `from_x`.
    #[must_use]
    pub fn toward(from_x: f32, target_x: f32) -> Self {
        if target_x < from_x {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// State carried only by units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitState {
    /// Remaining health in `[0, 1]`
    pub health: f32,
    /// Index of the owning team
    pub team: usize,
    /// Weapon aim in radians, y down
    pub aim_angle: f32,
    /// Sprite facing, also selects the aim wrap range
    pub facing: Facing,
    /// Cleared once health reaches zero; the unit stays as a grave
    pub playable: bool,
}

impl UnitState {
    /// Full-health unit belonging to `team`.
    #[must_use]
    pub fn new(team: usize) -> Self {
        Self {
            health: 1.0,
            team,
            aim_angle: -PI,
            facing: Facing::Left,
            playable: true,
        }
    }

    /// Whether the unit still has health.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

/// Physical constants and capabilities of a body kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProfile {
    /// Collision radius
    pub radius: f32,
    /// Fraction of speed kept after a bounce
    pub friction: f32,
    /// Initial bounce budget
    pub bounce_budget: BounceBudget,
    /// Capability set
    pub capabilities: Capabilities,
    /// Radius of the explosion triggered on death
    pub blast_radius: f32,
}

impl BodyProfile {
    /// Radius of the explosion this kind sets off when it dies, if it has
    /// [`Capabilities::EXPLODES_ON_DEATH`].
    #[must_use]
    pub const fn death_blast(&self) -> Option<f32> {
        if self.capabilities.contains(Capabilities::EXPLODES_ON_DEATH) {
            Some(self.blast_radius)
        } else {
            None
        }
    }
}

/// Crater debris.
pub const DEBRIS_PROFILE: BodyProfile = BodyProfile {
    radius: 1.0,
    friction: 0.8,
    bounce_budget: BounceBudget::Remaining(5),
    capabilities: Capabilities::empty(),
    blast_radius: 0.0,
};

/// Fired shell.
pub const PROJECTILE_PROFILE: BodyProfile = BodyProfile {
    radius: 5.0,
    friction: 0.5,
    bounce_budget: BounceBudget::Remaining(1),
    capabilities: Capabilities::EXPLODES_ON_DEATH,
    blast_radius: 30.0,
};

/// Playable soldier.
pub const UNIT_PROFILE: BodyProfile = BodyProfile {
    radius: 16.0,
    friction: 0.2,
    bounce_budget: BounceBudget::Infinite,
    capabilities: Capabilities::DAMAGEABLE.union(Capabilities::CONTROLLABLE),
    blast_radius: 0.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_budget_dies_on_last_bounce() {
        let mut budget = BounceBudget::Remaining(3);
        assert!(!budget.spend());
        assert!(!budget.spend());
        assert!(budget.spend());
        assert_eq!(budget, BounceBudget::Remaining(0));
        assert!(!budget.spend());
    }

    #[test]
    fn infinite_budget_never_dies() {
        let mut budget = BounceBudget::Infinite;
        for _ in 0..1000 {
            assert!(!budget.spend());
        }
    }

    #[test]
    fn facing_toward() {
        assert_eq!(Facing::toward(10.0, 5.0), Facing::Left);
        assert_eq!(Facing::toward(10.0, 15.0), Facing::Right);
        assert!((Facing::Left.sign() + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn profiles_match_kinds() {
        assert!(UNIT_PROFILE.capabilities.contains(Capabilities::DAMAGEABLE));
        assert!(UNIT_PROFILE.capabilities.contains(Capabilities::CONTROLLABLE));
        assert!(PROJECTILE_PROFILE
            .capabilities
            .contains(Capabilities::EXPLODES_ON_DEATH));
        assert!(DEBRIS_PROFILE.capabilities.is_empty());
        assert_eq!(PROJECTILE_PROFILE.death_blast(), Some(30.0));
        assert_eq!(UNIT_PROFILE.death_blast(), None);
        assert_eq!(DEBRIS_PROFILE.death_blast(), None);
    }

    #[test]
    fn blast_needs_the_capability() {
        let mut profile = PROJECTILE_PROFILE;
        profile.capabilities.remove(Capabilities::EXPLODES_ON_DEATH);
        assert_eq!(profile.death_blast(), None);

        let mut profile = DEBRIS_PROFILE;
        profile.blast_radius = 12.0;
        assert_eq!(profile.death_blast(), None);
        profile.capabilities.insert(Capabilities::EXPLODES_ON_DEATH);
        assert_eq!(profile.death_blast(), Some(12.0));
    }

    #[test]
    fn unit_state_serializes() {
        let unit = UnitState::new(1);
        let json = serde_json::to_string(&unit).unwrap();
        let back: UnitState = serde_json::from_str(&json).unwrap();
        assert_eq!(unit, back);
    }
}
