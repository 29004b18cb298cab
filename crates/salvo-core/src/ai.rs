//! Computer opponent.
//!
//! [`AiContext::think`] runs once per frame while the AI controls the turn.
//! It never mutates the world: every decision comes back as an [`AiDecision`]
//! holding the same [`ControlIntent`]s a human would produce, and the
//! simulation applies them through the shared intent path.
//!
//! A turn walks through the states in order:
//!
//! 1. `AssessEnvironment`: pick a spot to stand (retreat, advance or hold)
//! 2. `Move`: walk there while the clock allows, jump if stuck
//! 3. `ChooseTarget`: pick an enemy team and its healthiest unit
//! 4. `PositionForTarget`: solve the launch angle, closing in if out of reach
//! 5. `Aim`: turn the aim toward the solved angle
//! 6. `Fire`: charge to the solved level and let go

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arena::BodyArena;
use crate::entity::{BodyId, Facing};
use crate::intent::ControlIntent;
use crate::team::{Roster, Team};

/// Allies closer than this make the AI retreat.
pub const CROWDED_DISTANCE: f32 = 50.0;

/// Distance covered by a retreat.
pub const RETREAT_DISTANCE: f32 = 80.0;

/// Distance covered by an advance toward the map centre.
pub const ADVANCE_DISTANCE: f32 = 200.0;

/// Chosen positions stay this far from the map edges.
pub const SAFE_MARGIN: f32 = 20.0;

/// A walk ends once this close to the chosen position.
pub const ARRIVAL_TOLERANCE: f32 = 1.0;

/// Walking stops when the countdown drops below this.
pub const MOVE_DEADLINE: f32 = 10.0;

/// Jumping out of a stuck walk stops below this.
pub const JUMP_DEADLINE: f32 = 9.0;

/// Closing in on an unreachable target stops below this.
pub const APPROACH_DEADLINE: f32 = 7.0;

/// Jumping toward an unreachable target stops below this.
pub const APPROACH_JUMP_DEADLINE: f32 = 6.0;

/// Aim counts as on target within this many radians.
pub const AIM_TOLERANCE: f32 = 0.075;

/// Random attempts at picking an enemy team before scanning.
pub const TARGET_RETRIES: usize = 6;

// =============================================================================
// Trajectory solver
// =============================================================================

/// Discriminant of the launch equation for an offset `(dx, dy)`.
///
/// `dx` and `dy` are origin minus target, in screen space (y down). A
/// negative value means the target cannot be reached at `speed`.
#[must_use]
pub fn launch_discriminant(dx: f32, dy: f32, speed: f32, gravity: f32) -> f32 {
    let s2 = speed * speed;
    s2 * s2 - gravity * (gravity * dx * dx + 2.0 * dy * s2)
}

/// Screen-space launch angle that lands a shell fired at `speed` on a target
/// offset by `(dx, dy)` (origin minus target).
///
/// Takes the high arc, which clears terrain between the two more often.
/// Returns `None` if the target is out of reach. A target straight above or
/// below gets a vertical shot.
#[must_use]
pub fn solve_launch(dx: f32, dy: f32, speed: f32, gravity: f32) -> Option<f32> {
    let a = launch_discriminant(dx, dy, speed, gravity);
    if a < 0.0 {
        return None;
    }
    if dx.abs() < f32::EPSILON {
        return Some(-FRAC_PI_2);
    }
    let high = speed * speed + a.sqrt();
    let theta = (high / (gravity * dx)).atan();
    Some(if dx > 0.0 { theta - PI } else { theta })
}

/// Angle used when the target is out of reach and time is running out.
#[must_use]
pub fn fallback_angle(facing: Facing) -> f32 {
    match facing {
        Facing::Right => -FRAC_PI_2 + FRAC_PI_4,
        Facing::Left => -FRAC_PI_2 - FRAC_PI_4,
    }
}

// =============================================================================
// State machine
// =============================================================================

/// Phase of a computer turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiState {
    /// Choose where to stand
    #[default]
    AssessEnvironment,
    /// Walk to the chosen spot
    Move,
    /// Pick the enemy to shoot at
    ChooseTarget,
    /// Solve the shot, closing in if needed
    PositionForTarget,
    /// Turn the aim
    Aim,
    /// Charge and release
    Fire,
}

/// What the AI can see this frame.
#[derive(Debug, Clone, Copy)]
pub struct AiView<'a> {
    /// Every body
    pub bodies: &'a BodyArena,
    /// Every team
    pub roster: &'a Roster,
    /// Unit under AI control
    pub controlled: BodyId,
    /// Seconds left in the turn
    pub countdown: f32,
    /// Whether every body is at rest
    pub world_stable: bool,
    /// Current charge level
    pub charge: f32,
    /// Map width in world units
    pub map_width: f32,
    /// Gravity of the round
    pub gravity: f32,
    /// Launch speed the solver assumes
    pub launch_speed: f32,
    /// Projectile speed at full charge
    pub max_fire_speed: f32,
}

impl AiView<'_> {
    /// Charge level that fires at the solver's launch speed.
    #[must_use]
    pub fn solver_charge(&self) -> f32 {
        (self.launch_speed / self.max_fire_speed).clamp(0.0, 1.0)
    }
}

/// Result of one AI frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiDecision {
    /// Intents for the controlled unit, in order
    pub intents: Vec<ControlIntent>,
    /// Empty the charge meter before applying intents
    pub reset_charge: bool,
    /// The AI is done with this turn
    pub release: bool,
    /// No enemy is left: the round must end
    pub force_game_over: bool,
}

/// AI state carried across frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiContext {
    /// State of the current frame
    pub state: AiState,
    /// State committed at the end of the frame
    pub next_state: AiState,
    /// Unit being shot at
    pub target: Option<BodyId>,
    /// Solved aim angle
    pub target_angle: f32,
    /// Solved charge level
    pub target_charge: f32,
    /// Spot chosen while assessing
    pub safe_x: f32,
    /// Direction the AI wants the unit to face
    pub facing: Option<Facing>,
}

impl AiContext {
    /// A context waiting at the start of a turn.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares for a new computer turn.
    pub fn start_turn(&mut self) {
        *self = Self::new();
    }

    /// Clears the target handle if it points at `id`.
    pub fn forget(&mut self, id: BodyId) {
        if self.target == Some(id) {
            self.target = None;
        }
    }

    /// Commits the state chosen this frame.
    pub fn commit(&mut self) {
        self.state = self.next_state;
    }

    /// Runs one frame of the current state.
    pub fn think<R: Rng + ?Sized>(&mut self, view: &AiView<'_>, rng: &mut R) -> AiDecision {
        let mut decision = AiDecision::default();
        let Some(origin) = view.bodies.get(view.controlled) else {
            decision.release = true;
            return decision;
        };
        let position = origin.physics.position;
        let mut action = None;

        match self.state {
            AiState::AssessEnvironment => {
                self.safe_x = Self::assess(view, position.x, rng);
                tracing::debug!(safe_x = self.safe_x, "ai chose position");
                self.next_state = AiState::Move;
            }
            AiState::Move => {
                let far = (self.safe_x - position.x).abs() > ARRIVAL_TOLERANCE;
                if view.countdown >= MOVE_DEADLINE && far {
                    if view.world_stable {
                        let facing = Facing::toward(position.x, self.safe_x);
                        self.facing = Some(facing);
                        action = Some(walk(facing));
                    }
                    self.next_state = AiState::Move;
                } else if view.countdown >= JUMP_DEADLINE && far {
                    action = Some(ControlIntent::Jump);
                    self.next_state = AiState::Move;
                } else {
                    self.next_state = AiState::ChooseTarget;
                }
            }
            AiState::ChooseTarget => {
                let team = origin.as_unit().map_or(0, |u| u.team);
                let Some(enemy) = choose_enemy_team(view.roster, view.bodies, team, rng) else {
                    tracing::warn!(team, "ai found no enemy team alive");
                    decision.force_game_over = true;
                    decision.release = true;
                    return decision;
                };
                self.target = view
                    .roster
                    .team(enemy)
                    .and_then(|t| t.healthiest(view.bodies));
                match self.target.and_then(|id| view.bodies.get(id)) {
                    Some(target) => {
                        let target_x = target.physics.position.x;
                        self.facing = Some(Facing::toward(position.x, target_x));
                        tracing::debug!(enemy, target = ?self.target, "ai chose target");
                        self.next_state = AiState::PositionForTarget;
                    }
                    None => self.next_state = AiState::ChooseTarget,
                }
            }
            AiState::PositionForTarget => {
                let Some(target) = self.target.and_then(|id| view.bodies.get(id)) else {
                    self.next_state = AiState::ChooseTarget;
                    return self.finish(decision, action);
                };
                let target = target.physics.position;
                if view.world_stable {
                    let dx = position.x - target.x;
                    let dy = position.y - target.y;
                    match solve_launch(dx, dy, view.launch_speed, view.gravity) {
                        Some(angle) => {
                            self.target_angle = angle;
                            self.target_charge = view.solver_charge();
                            self.next_state = AiState::Aim;
                        }
                        None if view.countdown > APPROACH_DEADLINE => {
                            let facing = Facing::toward(position.x, target.x);
                            self.facing = Some(facing);
                            action = Some(walk(facing));
                        }
                        None if view.countdown > APPROACH_JUMP_DEADLINE => {
                            action = Some(ControlIntent::Jump);
                        }
                        None => {
                            let facing = self.facing.unwrap_or_default();
                            self.target_angle = fallback_angle(facing);
                            self.target_charge = view.solver_charge();
                            self.next_state = AiState::Aim;
                        }
                    }
                }
            }
            AiState::Aim => {
                let aim = origin.as_unit().map_or(0.0, |u| u.aim_angle);
                if (aim - self.target_angle).abs() < AIM_TOLERANCE {
                    decision.reset_charge = true;
                    self.next_state = AiState::Fire;
                } else {
                    action = Some(if aim < self.target_angle {
                        ControlIntent::AimRight
                    } else {
                        ControlIntent::AimLeft
                    });
                    self.next_state = AiState::Aim;
                }
            }
            AiState::Fire => {
                if view.charge >= self.target_charge {
                    decision.release = true;
                    self.next_state = AiState::AssessEnvironment;
                } else {
                    action = Some(ControlIntent::Charge);
                }
            }
        }

        self.finish(decision, action)
    }

    fn finish(&self, mut decision: AiDecision, action: Option<ControlIntent>) -> AiDecision {
        if let Some(facing) = self.facing {
            decision.intents.push(ControlIntent::Face(facing));
        }
        decision.intents.extend(action);
        decision
    }

    fn assess<R: Rng + ?Sized>(view: &AiView<'_>, x: f32, rng: &mut R) -> f32 {
        let safe = match rng.gen_range(0..3) {
            0 => match nearest_ally(view, x) {
                Some(ally_x) if (ally_x - x).abs() < CROWDED_DISTANCE => {
                    let away = if ally_x < x { 1.0 } else { -1.0 };
                    x + away * RETREAT_DISTANCE
                }
                _ => x,
            },
            1 => {
                let toward = if view.map_width / 2.0 < x { -1.0 } else { 1.0 };
                x + toward * ADVANCE_DISTANCE
            }
            _ => x,
        };
        let high = (view.map_width - SAFE_MARGIN).max(SAFE_MARGIN);
        safe.clamp(SAFE_MARGIN, high)
    }
}

const fn walk(facing: Facing) -> ControlIntent {
    match facing {
        Facing::Left => ControlIntent::WalkLeft,
        Facing::Right => ControlIntent::WalkRight,
    }
}

/// X of the closest living teammate of the controlled unit.
fn nearest_ally(view: &AiView<'_>, x: f32) -> Option<f32> {
    let team = view.bodies.get(view.controlled)?.as_unit()?.team;
    view.roster
        .team(team)?
        .members()
        .iter()
        .filter(|id| **id != view.controlled && Team::member_health(view.bodies, **id) > 0.0)
        .filter_map(|id| view.bodies.get(*id))
        .map(|b| b.physics.position.x)
        .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()))
}

/// Picks a living enemy team: a few random draws, then an ordered scan.
fn choose_enemy_team<R: Rng + ?Sized>(
    roster: &Roster,
    bodies: &BodyArena,
    own: usize,
    rng: &mut R,
) -> Option<usize> {
    let count = roster.len();
    if count == 0 {
        return None;
    }
    let is_enemy = |t: usize| t != own && roster.team(t).is_some_and(|team| team.is_alive(bodies));

    for _ in 0..TARGET_RETRIES {
        let candidate = rng.gen_range(0..count);
        if is_enemy(candidate) {
            return Some(candidate);
        }
    }
    let found = (1..count).map(|step| (own + step) % count).find(|t| is_enemy(*t));
    if found.is_some() {
        tracing::warn!(team = own, "ai target draw failed, scanning teams");
    }
    found
}
