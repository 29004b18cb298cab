//! The round orchestrator.
//!
//! [`Simulation::advance`] runs one frame in a fixed order:
//!
//! 1. **TURN**: the turn machine acts on the current [`TurnState`]
//! 2. **AI**: while the computer controls the turn, the AI emits intents
//! 3. **CLOCK**: the turn countdown loses the frame time
//! 4. **PHYSICS**: [`SUBSTEPS_PER_FRAME`] resolver sub-steps; handles to
//!    removed bodies are cleared after each one
//! 5. **CAMERA**: ease toward the tracked body
//! 6. **WEAPON**: fire once the charge has been left alone long enough
//! 7. **COMMIT**: recompute world stability and commit the next turn state
//!
//! Presentation is a separate read-only pass, see [`present`](crate::present).
//!
//! # Determinism
//!
//! Every random draw comes from the world's `ChaCha8Rng`, seeded from the
//! master seed, and bodies are visited in id order. Two simulations built
//! from the same config and seed, fed the same inputs, stay bit-identical.
//!
//! # Example
//!
//! ```
//! use salvo_core::{GameConfig, Simulation, TurnState};
//!
//! let config = GameConfig {
//!     map_width: 256,
//!     map_height: 128,
//!     noise_octaves: 6,
//!     ..GameConfig::all_computer()
//! };
//! let mut sim = Simulation::new(config, 42).unwrap();
//!
//! for _ in 0..4 {
//!     sim.advance(1.0 / 60.0);
//! }
//!
//! assert_eq!(sim.frame(), 4);
//! assert_eq!(sim.turn_state(), TurnState::AllocatingUnits);
//! assert_eq!(sim.bodies().len(), 4);
//! ```

use glam::Vec2;
use rubble::noise::random_seed;
use rubble::TerrainField;

use crate::ai::{AiContext, AiView};
use crate::arena::BodyArena;
use crate::camera::Camera;
use crate::config::{GameConfig, SUBSTEPS_PER_FRAME};
use crate::entity::{BodyId, BodyInner};
use crate::error::SimError;
use crate::event::SimEvent;
use crate::input::{InputBus, InputEvent};
use crate::intent::{apply_intent, ChargeMeter};
use crate::resolver::PhysicsResolver;
use crate::team::{Roster, Rotation};
use crate::turn::{
    allocate_units, clamp_units, drop_nuke, is_computer_team, Outcome, TurnContext, TurnState,
    PRIMARY_TEAM,
};
use crate::world::World;

// =============================================================================
// Simulation
// =============================================================================

/// One round of the game.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: GameConfig,
    world: World,
    roster: Roster,
    turn: TurnContext,
    ai: AiContext,
    physics: PhysicsResolver,
    camera: Camera,
    charge: ChargeMeter,
    /// Unit receiving intents
    controlled: Option<BodyId>,
    /// Every body was stable at the end of the last frame
    world_stable: bool,
    frame: u64,
    seed: u64,
}

impl Simulation {
    /// Creates a round in the [`TurnState::Reset`] state.
    ///
    /// The terrain is allocated here and generated on the first frames.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if `config` fails validation and
    /// [`SimError::Terrain`] if the terrain cannot be allocated or its noise
    /// parameters cannot generate it.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let terrain = TerrainField::new(config.map_width, config.map_height)?;
        config.noise().validate(terrain.width())?;
        let camera = Camera::new(Vec2::new(config.viewport_width, config.viewport_height));
        tracing::debug!(
            seed,
            width = config.map_width,
            height = config.map_height,
            teams = config.team_count,
            "simulation created"
        );

        Ok(Self {
            physics: PhysicsResolver::from_config(&config),
            world: World::new(terrain, seed),
            roster: Roster::default(),
            turn: TurnContext::new(),
            ai: AiContext::new(),
            camera,
            charge: ChargeMeter::new(),
            controlled: None,
            world_stable: false,
            frame: 0,
            seed,
            config,
        })
    }

    /// Advances the round by one frame lasting `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.frame += 1;

        self.update_turn();
        if self.turn.computer_control {
            self.run_ai(dt);
        }
        self.turn.countdown -= dt;
        self.run_physics(dt);
        self.camera.update(
            &self.world.bodies,
            Vec2::new(self.config.world_width(), self.config.world_height()),
            dt,
        );
        self.update_weapon(dt);
        self.turn.finale.advance(self.config.viewport_width);

        self.world_stable = self.world.bodies.all_stable();
        self.commit_turn_state();
    }

    /// Dispatches an input event and applies the resulting intents to the
    /// controlled unit.
    ///
    /// Handlers always see the event; their intents are dropped unless the
    /// player controls the turn. Returns how many intents took effect.
    pub fn handle_input(&mut self, bus: &mut InputBus, event: &InputEvent, dt: f32) -> usize {
        let intents = bus.dispatch(event, dt);
        if !self.turn.player_control {
            return 0;
        }
        let Some(body) = self.controlled.and_then(|id| self.world.bodies.get_mut(id)) else {
            return 0;
        };
        let mut applied = 0;
        for intent in intents {
            if apply_intent(body, &mut self.charge, intent, dt) {
                applied += 1;
            }
        }
        applied
    }

    /// Ends the current turn's clock, as if the countdown had run out.
    pub fn expire_turn(&mut self) {
        self.turn.countdown = 0.0;
    }

    /// Removes and returns the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.drain_events()
    }

    // =========================================================================
    // Turn machine
    // =========================================================================

    fn update_turn(&mut self) {
        match self.turn.state {
            TurnState::Reset => {
                self.turn.player_control = false;
                self.turn.next_state = TurnState::GenerateTerrain;
            }
            TurnState::GenerateTerrain => {
                self.turn.player_control = false;
                if self.generate_terrain() {
                    self.turn.next_state = TurnState::GeneratingTerrain;
                } else {
                    self.finish_round(Outcome::Draw);
                }
            }
            TurnState::GeneratingTerrain => {
                self.turn.player_control = false;
                self.turn.next_state = TurnState::AllocateUnits;
            }
            TurnState::AllocateUnits => {
                self.turn.release_control();
                self.roster = allocate_units(&mut self.world, &self.config);
                self.controlled = self
                    .roster
                    .team(PRIMARY_TEAM)
                    .and_then(|t| t.members().first().copied());
                if let Some(id) = self.controlled {
                    self.camera.follow(id);
                }
                self.turn.show_countdown = false;
                self.turn.next_state = TurnState::AllocatingUnits;
            }
            TurnState::AllocatingUnits => {
                self.turn.player_control = false;
                if self.world_stable {
                    self.turn.action_complete = false;
                    self.begin_first_turn();
                    self.turn.next_state = TurnState::StartPlay;
                }
            }
            TurnState::StartPlay => {
                self.turn.show_countdown = true;
                clamp_units(&mut self.world.bodies, self.config.world_width());
                if self.turn.action_complete || self.turn.countdown <= 0.0 {
                    self.turn.next_state = TurnState::CameraMode;
                }
            }
            TurnState::CameraMode => {
                self.turn.release_control();
                self.turn.action_complete = false;
                self.turn.show_countdown = false;
                self.charge.reset();
                if self.world_stable {
                    self.pass_turn();
                }
            }
            TurnState::GameOver => {
                self.turn.release_control();
                self.turn.show_countdown = false;
                if self.turn.outcome.is_some_and(Outcome::triggers_nuke) {
                    self.turn.next_state = TurnState::Nuke;
                }
            }
            TurnState::Nuke => {
                self.turn.release_control();
                self.turn.show_countdown = false;
                self.turn.finale.start();
                let winner = self
                    .turn
                    .outcome
                    .and_then(Outcome::winner)
                    .and_then(|t| self.roster.team(t));
                drop_nuke(&mut self.world, &self.config, winner);
                self.turn.next_state = TurnState::GameOver2;
            }
            TurnState::GameOver2 => {}
        }
    }

    /// Regenerates the landscape. `new` has already checked the noise
    /// parameters against this terrain, so failure means the config was
    /// changed afterwards and the round cannot be played.
    fn generate_terrain(&mut self) -> bool {
        let seed = random_seed(self.world.terrain.width(), &mut self.world.rng);
        match self.world.terrain.generate(&seed, &self.config.noise()) {
            Ok(()) => {
                tracing::debug!("terrain generated");
                true
            }
            Err(err) => {
                tracing::error!(%err, "terrain generation failed, abandoning round");
                false
            }
        }
    }

    fn begin_first_turn(&mut self) {
        let first = self
            .roster
            .team_mut(PRIMARY_TEAM)
            .and_then(|t| t.next_member(&self.world.bodies));
        match first {
            Some(unit) => self.start_turn(PRIMARY_TEAM, unit),
            None => self.pass_turn(),
        }
    }

    fn pass_turn(&mut self) {
        match self.roster.rotate(&self.world.bodies) {
            Rotation::Next { team, unit } => {
                self.start_turn(team, unit);
                self.turn.next_state = TurnState::StartPlay;
            }
            Rotation::Winner { team } => self.finish_round(Outcome::for_winner(team)),
            Rotation::NoneAlive => self.finish_round(Outcome::Draw),
        }
    }

    fn start_turn(&mut self, team: usize, unit: BodyId) {
        self.turn.begin_turn(team, &self.config);
        self.controlled = Some(unit);
        self.camera.follow(unit);
        let computer = is_computer_team(team, &self.config);
        if computer {
            self.ai.start_turn();
        }
        tracing::info!(team, %unit, computer, "turn started");
        self.world.emit(SimEvent::TurnStarted {
            team,
            unit,
            computer,
        });
    }

    fn finish_round(&mut self, outcome: Outcome) {
        self.turn.release_control();
        self.turn.outcome = Some(outcome);
        self.turn.next_state = TurnState::GameOver;
        tracing::info!(%outcome, "round decided");
        self.world.emit(SimEvent::GameOver { outcome });
    }

    fn commit_turn_state(&mut self) {
        let (from, to) = (self.turn.state, self.turn.next_state);
        if from != to {
            tracing::info!(%from, %to, frame = self.frame, "turn state changed");
            self.world.emit(SimEvent::TurnStateChanged { from, to });
        }
        self.turn.state = to;
    }

    // =========================================================================
    // AI
    // =========================================================================

    fn run_ai(&mut self, dt: f32) {
        let Some(controlled) = self.controlled else {
            self.turn.computer_control = false;
            return;
        };
        let view = AiView {
            bodies: &self.world.bodies,
            roster: &self.roster,
            controlled,
            countdown: self.turn.countdown,
            world_stable: self.world_stable,
            charge: self.charge.level(),
            map_width: self.config.world_width(),
            gravity: self.config.gravity,
            launch_speed: self.config.launch_speed,
            max_fire_speed: self.config.max_fire_speed,
        };
        let decision = self.ai.think(&view, &mut self.world.rng);
        self.ai.commit();

        if decision.reset_charge {
            self.charge.reset();
        }
        if let Some(body) = self.world.bodies.get_mut(controlled) {
            for intent in decision.intents {
                apply_intent(body, &mut self.charge, intent, dt);
            }
        }
        if decision.release {
            self.turn.computer_control = false;
        }
        if decision.force_game_over {
            let living = self.roster.living_teams(&self.world.bodies);
            self.finish_round(Outcome::from_living(&living).unwrap_or(Outcome::Draw));
        }
    }

    // =========================================================================
    // Physics and weapon
    // =========================================================================

    fn run_physics(&mut self, dt: f32) {
        let dt = self.config.substep_dt(dt);
        for _ in 0..SUBSTEPS_PER_FRAME {
            let outcome = self.physics.substep(&mut self.world, dt);
            if outcome.detonations > 0 {
                self.camera.clear();
            }
            for id in outcome.removed {
                self.forget(id);
            }
        }
    }

    /// Clears every handle pointing at a removed body.
    fn forget(&mut self, id: BodyId) {
        if self.controlled == Some(id) {
            self.controlled = None;
        }
        self.camera.forget(id);
        self.ai.forget(id);
    }

    fn update_weapon(&mut self, dt: f32) {
        let Some(id) = self.controlled else {
            return;
        };
        let Some((position, aim)) = self
            .world
            .bodies
            .get(id)
            .and_then(|b| b.as_unit().map(|u| (b.physics.position, u.aim_angle)))
        else {
            return;
        };
        let Some(level) = self.charge.update(dt) else {
            return;
        };

        let velocity = self.config.max_fire_speed * level * Vec2::from_angle(aim);
        let projectile = self
            .world
            .bodies
            .spawn(position, velocity, BodyInner::Projectile);
        self.camera.follow(projectile);
        self.turn.action_complete = true;
        tracing::debug!(unit = %id, %projectile, charge = level, "weapon fired");
        self.world.emit(SimEvent::WeaponFired {
            unit: id,
            projectile,
            charge: level,
        });
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Configuration of the round.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Master seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Frames advanced so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Terrain, bodies, random stream and pending events.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The destructible terrain.
    #[must_use]
    pub const fn terrain(&self) -> &TerrainField {
        &self.world.terrain
    }

    /// The destructible terrain, mutably.
    #[must_use]
    pub fn terrain_mut(&mut self) -> &mut TerrainField {
        &mut self.world.terrain
    }

    /// Every live body.
    #[must_use]
    pub const fn bodies(&self) -> &BodyArena {
        &self.world.bodies
    }

    /// Every live body, mutably.
    #[must_use]
    pub fn bodies_mut(&mut self) -> &mut BodyArena {
        &mut self.world.bodies
    }

    /// Teams of the round. Empty until units are allocated.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Turn machine state.
    #[must_use]
    pub const fn turn(&self) -> &TurnContext {
        &self.turn
    }

    /// Current turn state.
    #[must_use]
    pub const fn turn_state(&self) -> TurnState {
        self.turn.state
    }

    /// AI state.
    #[must_use]
    pub const fn ai(&self) -> &AiContext {
        &self.ai
    }

    /// The tracking camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Unit receiving intents, if any.
    #[must_use]
    pub const fn controlled(&self) -> Option<BodyId> {
        self.controlled
    }

    /// Current weapon charge in `[0, 1]`.
    #[must_use]
    pub const fn charge_level(&self) -> f32 {
        self.charge.level()
    }

    /// Seconds left in the current turn.
    #[must_use]
    pub const fn countdown(&self) -> f32 {
        self.turn.countdown
    }

    /// Result of the round once decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.turn.outcome
    }

    /// Whether every body was at rest at the end of the last frame.
    #[must_use]
    pub const fn world_stable(&self) -> bool {
        self.world_stable
    }

    /// Whether the round has reached a state it never leaves.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.turn.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn small_config() -> GameConfig {
        GameConfig {
            map_width: 256,
            map_height: 128,
            noise_octaves: 6,
            ..GameConfig::default()
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GameConfig {
            team_count: 1,
            ..small_config()
        };
        assert!(matches!(
            Simulation::new(config, 1),
            Err(SimError::Config(ConfigError::TooFewTeams(1)))
        ));
    }

    #[test]
    fn rejects_zero_octaves() {
        let config = GameConfig {
            noise_octaves: 0,
            ..small_config()
        };
        assert_eq!(
            Simulation::new(config, 1).unwrap_err(),
            SimError::Config(ConfigError::Noise(rubble::TerrainError::NoOctaves))
        );
    }

    #[test]
    fn failed_generation_ends_the_round() {
        let mut sim = Simulation::new(small_config(), 3).unwrap();
        sim.config.noise_octaves = 0;
        sim.advance(1.0 / 60.0);
        sim.advance(1.0 / 60.0);

        assert_eq!(sim.turn_state(), TurnState::GameOver);
        assert_eq!(sim.outcome(), Some(Outcome::Draw));
        assert!(sim.is_over());
        assert_eq!(sim.terrain().count(rubble::Cell::Ground), 0);
        assert!(sim.bodies().is_empty());
    }

    #[test]
    fn setup_walks_through_states() {
        let mut sim = Simulation::new(small_config(), 3).unwrap();
        assert_eq!(sim.turn_state(), TurnState::Reset);

        let expected = [
            TurnState::GenerateTerrain,
            TurnState::GeneratingTerrain,
            TurnState::AllocateUnits,
            TurnState::AllocatingUnits,
        ];
        for state in expected {
            sim.advance(1.0 / 60.0);
            assert_eq!(sim.turn_state(), state);
            assert!(!sim.turn().player_control);
            assert!(!sim.turn().computer_control);
        }
        assert!(sim.terrain().count(rubble::Cell::Ground) > 0);
        assert_eq!(sim.roster().len(), 2);
        assert_eq!(sim.controlled(), Some(sim.roster().teams()[0].members()[0]));
    }

    #[test]
    fn state_changes_are_logged_as_events() {
        let mut sim = Simulation::new(small_config(), 3).unwrap();
        sim.advance(1.0 / 60.0);
        let events = sim.drain_events();
        assert_eq!(
            events,
            vec![SimEvent::TurnStateChanged {
                from: TurnState::Reset,
                to: TurnState::GenerateTerrain
            }]
        );
    }

    #[test]
    fn frame_counter_and_seed() {
        let mut sim = Simulation::new(small_config(), 77).unwrap();
        assert_eq!(sim.seed(), 77);
        sim.advance(0.01);
        sim.advance(0.01);
        assert_eq!(sim.frame(), 2);
    }
}
