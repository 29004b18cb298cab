//! Control intents and the weapon charge meter.
//!
//! Human input and the AI both steer the controlled unit by emitting
//! [`ControlIntent`]s, and both go through [`apply_intent`]. The charge meter
//! is shared by the round rather than owned by a unit: it fills while the
//! charge intent repeats and fires once it has been left alone for
//! [`RELEASE_DELAY`] seconds.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Body, Capabilities, Facing};

/// Velocity given by a walk step, before the facing sign is applied to x.
pub const WALK_VELOCITY: Vec2 = Vec2::new(5.0, -5.0);

/// Velocity given by a jump, before the facing sign is applied to x.
pub const JUMP_VELOCITY: Vec2 = Vec2::new(3.0, -15.0);

/// Aim rotation speed in radians per second.
pub const AIM_RATE: f32 = 1.0;

/// Charge gained per second while charging.
pub const CHARGE_RATE: f32 = 0.75;

/// Seconds the charge must stay unchanged before the weapon fires.
pub const RELEASE_DELAY: f32 = 1.0;

/// A primitive command for the controlled unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlIntent {
    /// Hop one step left
    WalkLeft,
    /// Hop one step right
    WalkRight,
    /// Jump toward the facing direction
    Jump,
    /// Rotate the aim counter-clockwise on screen
    AimLeft,
    /// Rotate the aim clockwise on screen
    AimRight,
    /// Add charge to the weapon
    Charge,
    /// Turn to face a direction
    Face(Facing),
}

/// Weapon charge level and release timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeMeter {
    level: f32,
    last_level: f32,
    unchanged_for: f32,
}

impl ChargeMeter {
    /// An empty meter.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: 0.0,
            last_level: 0.0,
            unchanged_for: 0.0,
        }
    }

    /// Current charge in `[0, 1]`.
    #[must_use]
    pub const fn level(&self) -> f32 {
        self.level
    }

    /// Adds `CHARGE_RATE * dt`, capped at 1.
    pub fn charge(&mut self, dt: f32) {
        self.level = (self.level + CHARGE_RATE * dt).min(1.0);
    }

    /// Empties the meter and its release timer.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Runs the release timer for one frame.
    ///
    /// Returns the charge level when the weapon fires; the meter is emptied
    /// at the same time.
    #[allow(clippy::float_cmp)]
    pub fn update(&mut self, dt: f32) -> Option<f32> {
        if self.level <= 0.0 {
            self.unchanged_for = 0.0;
            return None;
        }
        if self.level != self.last_level {
            self.last_level = self.level;
            self.unchanged_for = 0.0;
            return None;
        }
        self.unchanged_for += dt;
        if self.unchanged_for > RELEASE_DELAY {
            let fired = self.level;
            self.reset();
            return Some(fired);
        }
        None
    }
}

/// Rotates an aim angle, wrapping within the range allowed by `facing`.
///
/// Facing right the aim stays in `[-π/2, π/2]`. Facing left it stays in the
/// complementary half through `±π`; crossing into the right half jumps to the
/// far end of the left one.
#[must_use]
pub fn rotate_aim(angle: f32, facing: Facing, delta: f32) -> f32 {
    let angle = angle + delta;
    match facing {
        Facing::Right => {
            if delta < 0.0 && angle < -FRAC_PI_2 {
                FRAC_PI_2
            } else if delta > 0.0 && angle > FRAC_PI_2 {
                -FRAC_PI_2
            } else {
                angle
            }
        }
        Facing::Left => {
            if delta < 0.0 {
                if angle < -PI {
                    PI
                } else if angle > 0.0 && angle < FRAC_PI_2 {
                    -FRAC_PI_2
                } else {
                    angle
                }
            } else if delta > 0.0 {
                if angle > PI {
                    -PI
                } else if angle > -FRAC_PI_2 && angle < 0.0 {
                    FRAC_PI_2
                } else {
                    angle
                }
            } else {
                angle
            }
        }
    }
}

/// Whether `body` currently accepts intents.
#[must_use]
pub fn accepts_intents(body: &Body) -> bool {
    body.physics.stable
        && !body.physics.dead
        && body.capabilities().contains(Capabilities::CONTROLLABLE)
        && body.as_unit().is_some_and(|u| u.playable)
}

/// Applies one intent to the controlled unit.
///
/// Intents only take effect on a stable, controllable, playable unit.
/// Returns whether the intent was applied.
pub fn apply_intent(
    body: &mut Body,
    meter: &mut ChargeMeter,
    intent: ControlIntent,
    dt: f32,
) -> bool {
    if !accepts_intents(body) {
        return false;
    }
    let Some((physics, unit)) = body.unit_parts_mut() else {
        return false;
    };

    match intent {
        ControlIntent::WalkLeft | ControlIntent::WalkRight => {
            let facing = if intent == ControlIntent::WalkLeft {
                Facing::Left
            } else {
                Facing::Right
            };
            unit.facing = facing;
            unit.aim_angle = FRAC_PI_2;
            physics.velocity = Vec2::new(facing.sign() * WALK_VELOCITY.x, WALK_VELOCITY.y);
            physics.stable = false;
        }
        ControlIntent::Jump => {
            let sign = unit.facing.sign();
            physics.velocity = Vec2::new(sign * JUMP_VELOCITY.x, JUMP_VELOCITY.y);
        }
        ControlIntent::AimLeft => {
            unit.aim_angle = rotate_aim(unit.aim_angle, unit.facing, -AIM_RATE * dt);
        }
        ControlIntent::AimRight => {
            unit.aim_angle = rotate_aim(unit.aim_angle, unit.facing, AIM_RATE * dt);
        }
        ControlIntent::Charge => meter.charge(dt),
        ControlIntent::Face(facing) => unit.facing = facing,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BodyId, BodyInner, UnitState};

    fn resting_unit() -> Body {
        let mut body = Body::new(
            BodyId::new(0),
            Vec2::new(100.0, 50.0),
            Vec2::ZERO,
            BodyInner::Unit(UnitState::new(0)),
        );
        body.physics.stable = true;
        body
    }

    mod meter_tests {
        use super::*;

        #[test]
        fn charge_caps_at_one() {
            let mut meter = ChargeMeter::new();
            meter.charge(0.5);
            assert!((meter.level() - 0.375).abs() < 1e-6);
            meter.charge(10.0);
            assert_eq!(meter.level(), 1.0);
        }

        #[test]
        fn fires_after_charge_left_alone() {
            let mut meter = ChargeMeter::new();
            meter.charge(1.0);
            // First update notices the new level
            assert_eq!(meter.update(0.25), None);
            for _ in 0..4 {
                assert_eq!(meter.update(0.25), None);
            }
            assert_eq!(meter.update(0.25), Some(0.75));
            assert_eq!(meter.level(), 0.0);
            assert_eq!(meter.update(0.25), None);
        }

        #[test]
        fn charging_restarts_release_timer() {
            let mut meter = ChargeMeter::new();
            for _ in 0..20 {
                meter.charge(0.05);
                assert_eq!(meter.update(0.1), None);
            }
            assert!(meter.level() > 0.0);
        }

        #[test]
        fn empty_meter_never_fires() {
            let mut meter = ChargeMeter::new();
            for _ in 0..100 {
                assert_eq!(meter.update(0.1), None);
            }
        }
    }

    mod aim_tests {
        use super::*;

        #[test]
        fn facing_right_wraps_end_to_end() {
            assert!((rotate_aim(-1.5, Facing::Right, -0.1) - FRAC_PI_2).abs() < 1e-6);
            assert!((rotate_aim(1.5, Facing::Right, 0.1) + FRAC_PI_2).abs() < 1e-6);
            assert!((rotate_aim(0.0, Facing::Right, 0.1) - 0.1).abs() < 1e-6);
        }

        #[test]
        fn facing_left_skips_right_half() {
            // Leaving the left half jumps across the right one
            assert!((rotate_aim(FRAC_PI_2, Facing::Left, -0.1) + FRAC_PI_2).abs() < 1e-6);
            assert!((rotate_aim(-3.1, Facing::Left, -0.1) - PI).abs() < 1e-6);
            assert!((rotate_aim(3.1, Facing::Left, 0.1) + PI).abs() < 1e-6);
            assert!((rotate_aim(-FRAC_PI_2, Facing::Left, 0.1) - FRAC_PI_2).abs() < 1e-6);
            assert!((rotate_aim(-2.0, Facing::Left, 0.1) + 1.9).abs() < 1e-6);
        }
    }

    mod apply_tests {
        use super::*;

        #[test]
        fn walk_sets_velocity_and_facing() {
            let mut body = resting_unit();
            let mut meter = ChargeMeter::new();
            assert!(apply_intent(&mut body, &mut meter, ControlIntent::WalkRight, 0.1));
            assert_eq!(body.physics.velocity, Vec2::new(5.0, -5.0));
            assert!(!body.physics.stable);
            let unit = body.as_unit().unwrap();
            assert_eq!(unit.facing, Facing::Right);
            assert!((unit.aim_angle - FRAC_PI_2).abs() < 1e-6);
        }

        #[test]
        fn unstable_unit_ignores_intents() {
            let mut body = resting_unit();
            let mut meter = ChargeMeter::new();
            apply_intent(&mut body, &mut meter, ControlIntent::WalkLeft, 0.1);
            assert!(!apply_intent(&mut body, &mut meter, ControlIntent::Jump, 0.1));
            assert_eq!(body.physics.velocity, Vec2::new(-5.0, -5.0));
        }

        #[test]
        fn jump_follows_facing() {
            let mut body = resting_unit();
            let mut meter = ChargeMeter::new();
            apply_intent(&mut body, &mut meter, ControlIntent::Face(Facing::Right), 0.1);
            apply_intent(&mut body, &mut meter, ControlIntent::Jump, 0.1);
            assert_eq!(body.physics.velocity, Vec2::new(3.0, -15.0));
        }

        #[test]
        fn charge_fills_shared_meter() {
            let mut body = resting_unit();
            let mut meter = ChargeMeter::new();
            assert!(apply_intent(&mut body, &mut meter, ControlIntent::Charge, 0.4));
            assert!((meter.level() - 0.3).abs() < 1e-6);
        }

        #[test]
        fn grave_ignores_intents() {
            let mut body = resting_unit();
            body.damage(2.0);
            let mut meter = ChargeMeter::new();
            assert!(!apply_intent(&mut body, &mut meter, ControlIntent::Charge, 0.4));
            assert_eq!(meter.level(), 0.0);
        }

        #[test]
        fn non_units_ignore_intents() {
            let mut body = Body::new(BodyId::new(1), Vec2::ZERO, Vec2::ZERO, BodyInner::Projectile);
            body.physics.stable = true;
            let mut meter = ChargeMeter::new();
            assert!(!apply_intent(&mut body, &mut meter, ControlIntent::Jump, 0.1));
        }
    }
}
