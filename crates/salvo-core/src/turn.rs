//! Turn flow state, outcome and the round's scripted setup and finale.
//!
//! The transition logic itself runs inside
//! [`Simulation::advance`](crate::Simulation::advance); this module holds the
//! state it works on and the pieces that only need the world:
//!
//! - [`allocate_units`] spreads every team's units across the map
//! - [`clamp_units`] keeps units off the map edges during play
//! - [`drop_nuke`] runs the finale after a lost round

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arena::BodyArena;
use crate::config::GameConfig;
use crate::entity::{BodyInner, UnitState};
use crate::team::{Roster, Team};
use crate::world::World;

/// Team driven by input when the primary side is human.
pub const PRIMARY_TEAM: usize = 0;

/// Units are kept this far from either map edge.
pub const EDGE_MARGIN: f32 = 5.0;

/// Shells dropped by the finale.
pub const NUKE_SHELLS: usize = 100;

/// Initial velocity of finale shells.
pub const NUKE_VELOCITY: Vec2 = Vec2::new(0.0, 0.5);

/// Horizontal distance the finale aircraft covers per frame.
pub const PLANE_STEP: f32 = 10.0;

// =============================================================================
// States
// =============================================================================

/// Top-level phase of a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnState {
    /// Fresh round
    #[default]
    Reset,
    /// Build the terrain
    GenerateTerrain,
    /// Terrain built, one frame before allocation
    GeneratingTerrain,
    /// Spawn every team's units
    AllocateUnits,
    /// Wait for the spawned units to settle
    AllocatingUnits,
    /// A turn is running
    StartPlay,
    /// Wait for the world to settle, then pass the turn on
    CameraMode,
    /// The round is decided
    GameOver,
    /// Finale after a lost round
    Nuke,
    /// Terminal state after the finale
    GameOver2,
}

impl TurnState {
    /// Returns true for the state after the finale, which is never left.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver2)
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => write!(f, "Reset"),
            Self::GenerateTerrain => write!(f, "GenerateTerrain"),
            Self::GeneratingTerrain => write!(f, "GeneratingTerrain"),
            Self::AllocateUnits => write!(f, "AllocateUnits"),
            Self::AllocatingUnits => write!(f, "AllocatingUnits"),
            Self::StartPlay => write!(f, "StartPlay"),
            Self::CameraMode => write!(f, "CameraMode"),
            Self::GameOver => write!(f, "GameOver"),
            Self::Nuke => write!(f, "Nuke"),
            Self::GameOver2 => write!(f, "GameOver2"),
        }
    }
}

/// How a round ended, from the primary team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The primary team is the last one standing
    Victory {
        /// Winning team
        team: usize,
    },
    /// Another team is the last one standing
    Defeat {
        /// Winning team
        winner: usize,
    },
    /// Nobody is left standing
    Draw,
}

impl Outcome {
    /// Outcome of a round won by `winner`.
    #[must_use]
    pub const fn for_winner(winner: usize) -> Self {
        if winner == PRIMARY_TEAM {
            Self::Victory { team: winner }
        } else {
            Self::Defeat { winner }
        }
    }

    /// Outcome decided by which teams are still alive.
    ///
    /// Returns `None` while more than one team stands.
    #[must_use]
    pub fn from_living(living: &[usize]) -> Option<Self> {
        match living {
            [] => Some(Self::Draw),
            [winner] => Some(Self::for_winner(*winner)),
            _ => None,
        }
    }

    /// Winning team, if any.
    #[must_use]
    pub const fn winner(self) -> Option<usize> {
        match self {
            Self::Victory { team } => Some(team),
            Self::Defeat { winner } => Some(winner),
            Self::Draw => None,
        }
    }

    /// Whether the finale follows this outcome.
    #[must_use]
    pub const fn triggers_nuke(self) -> bool {
        matches!(self, Self::Defeat { .. })
    }

    /// Message shown on the game-over screen.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Victory { .. } => "Good job soldier, you saved us a nuke bomb!",
            Self::Defeat { .. } => "The battle is lost. Executing Plan B (nuke) ...",
            Self::Draw => "Nobody is left standing. The battle is a draw.",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory { team } => write!(f, "victory for team {team}"),
            Self::Defeat { winner } => write!(f, "defeat, team {winner} wins"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

// =============================================================================
// Turn context
// =============================================================================

/// Progress of the finale aircraft across the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Finale {
    /// Screen x of the aircraft
    pub plane_x: f32,
    /// Whether the aircraft is on screen
    pub flying: bool,
}

impl Finale {
    /// Puts the aircraft at the left edge of the screen.
    pub fn start(&mut self) {
        self.plane_x = 0.0;
        self.flying = true;
    }

    /// Moves the aircraft one frame along; it lands once past the right edge.
    pub fn advance(&mut self, viewport_width: f32) {
        if !self.flying {
            return;
        }
        self.plane_x += PLANE_STEP;
        if self.plane_x > viewport_width - PLANE_STEP {
            self.flying = false;
        }
    }
}

/// Turn machine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnContext {
    /// State of the current frame
    pub state: TurnState,
    /// State committed at the end of the frame
    pub next_state: TurnState,
    /// Seconds left in the current turn
    pub countdown: f32,
    /// The controlled unit has fired this turn
    pub action_complete: bool,
    /// Whether the countdown is on screen
    pub show_countdown: bool,
    /// Input drives the controlled unit
    pub player_control: bool,
    /// The AI drives the controlled unit
    pub computer_control: bool,
    /// Result once the round is decided
    pub outcome: Option<Outcome>,
    /// Finale animation
    pub finale: Finale,
}

impl TurnContext {
    /// Context of a fresh round.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TurnState::Reset,
            next_state: TurnState::Reset,
            countdown: 0.0,
            action_complete: false,
            show_countdown: false,
            player_control: false,
            computer_control: false,
            outcome: None,
            finale: Finale::default(),
        }
    }

    /// Drops control from both input and the AI.
    pub fn release_control(&mut self) {
        self.player_control = false;
        self.computer_control = false;
    }

    /// Hands the turn to `team` with a fresh countdown.
    pub fn begin_turn(&mut self, team: usize, config: &GameConfig) {
        let computer = is_computer_team(team, config);
        self.player_control = !computer;
        self.computer_control = computer;
        self.countdown = config.turn_seconds;
        self.action_complete = false;
    }

    /// Whether the round has reached a state it never leaves.
    ///
    /// A decided round stops at [`TurnState::GameOver`] unless its outcome
    /// launches the finale, which ends in the terminal state instead.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match self.state {
            TurnState::GameOver => !self.outcome.is_some_and(Outcome::triggers_nuke),
            state => state.is_terminal(),
        }
    }
}

impl Default for TurnContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the AI plays `team`.
#[must_use]
pub const fn is_computer_team(team: usize, config: &GameConfig) -> bool {
    team != PRIMARY_TEAM || !config.primary_is_human
}

// =============================================================================
// Setup and finale
// =============================================================================

/// Spawn x coordinates of every unit, per team.
///
/// The map is split evenly between teams. Inside a team's share, members
/// stand `share / (2 * members)` apart, centred on the share's middle.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn unit_slots(config: &GameConfig) -> Vec<Vec<f32>> {
    let teams = config.team_count as f32;
    let members = config.units_per_team as f32;
    let space_per_team = config.world_width() / teams;
    let space_per_member = space_per_team / (members * 2.0);

    (0..config.team_count)
        .map(|t| {
            let middle = space_per_team / 2.0 + t as f32 * space_per_team;
            let first = middle - space_per_member * members / 2.0;
            (0..config.units_per_team)
                .map(|w| first + w as f32 * space_per_member)
                .collect()
        })
        .collect()
}

/// Spawns every team's units at the top of the map and builds the roster.
pub fn allocate_units(world: &mut World, config: &GameConfig) -> Roster {
    let teams = unit_slots(config)
        .into_iter()
        .enumerate()
        .map(|(team, slots)| {
            let members = slots
                .into_iter()
                .map(|x| {
                    world.bodies.spawn(
                        Vec2::new(x, 0.0),
                        Vec2::ZERO,
                        BodyInner::Unit(UnitState::new(team)),
                    )
                })
                .collect();
            Team::new(members)
        })
        .collect();
    let roster = Roster::new(teams);
    tracing::debug!(
        teams = roster.len(),
        units = config.units_per_team,
        "units allocated"
    );
    roster
}

/// Keeps every unit at least [`EDGE_MARGIN`] away from the side edges.
pub fn clamp_units(bodies: &mut BodyArena, map_width: f32) {
    let high = (map_width - EDGE_MARGIN).max(EDGE_MARGIN);
    for body in bodies.bodies_sorted_mut() {
        if body.is_unit() {
            body.physics.position.x = body.physics.position.x.clamp(EDGE_MARGIN, high);
        }
    }
}

/// Drops the finale's shells over the upper half of the map and zeroes the
/// health of `team`.
pub fn drop_nuke(world: &mut World, config: &GameConfig, team: Option<&Team>) {
    let half_height = (config.map_height / 2).max(1);
    for _ in 0..NUKE_SHELLS {
        let x = world.rng.gen_range(0..config.map_width);
        let y = world.rng.gen_range(0..half_height);
        #[allow(clippy::cast_precision_loss)]
        let position = Vec2::new(x as f32, y as f32);
        world
            .bodies
            .spawn(position, NUKE_VELOCITY, BodyInner::Projectile);
    }

    if let Some(team) = team {
        for id in team.members() {
            if let Some(unit) = world.bodies.get_mut(*id).and_then(|b| b.as_unit_mut()) {
                unit.health = 0.0;
                unit.playable = false;
            }
        }
    }
    tracing::info!(shells = NUKE_SHELLS, "finale launched");
}
