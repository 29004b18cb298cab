//! # Salvo Core
//!
//! Deterministic simulation core of a side-on, turn-based artillery game.
//!
//! Teams of soldiers stand on destructible terrain and take turns lobbing
//! missiles at each other. Each turn the controlled unit may walk, jump, aim
//! and charge a shot before a countdown runs out; computer teams are driven by
//! a state-machine AI with an analytic trajectory solver.
//!
//! ## Architecture
//!
//! - **Bodies**: units, projectiles and debris share one record layout in a
//!   [`BodyArena`](arena::BodyArena), keyed by monotonically assigned ids
//! - **Resolvers**: [`PhysicsResolver`] integrates motion against the
//!   [`rubble`] terrain and [`resolver::explode`] carves craters and damages
//!   bodies
//! - **Turn machine**: [`TurnState`] sequences terrain generation, unit
//!   allocation, turns, rotation and the end of the round
//! - **AI**: [`ai::AiContext`] moves, aims and fires for computer teams
//! - **Input**: [`input::InputBus`] maps platform events to control intents
//! - **Presentation**: [`present::present`] draws a frame through a
//!   [`present::Renderer`] without touching simulation state
//!
//! ## Usage
//!
//! ```
//! use salvo_core::{hash_simulation, GameConfig, Simulation};
//!
//! let config = GameConfig {
//!     map_width: 128,
//!     map_height: 64,
//!     noise_octaves: 5,
//!     ..GameConfig::all_computer()
//! };
//! let mut a = Simulation::new(config.clone(), 9).unwrap();
//! let mut b = Simulation::new(config, 9).unwrap();
//!
//! for _ in 0..60 {
//!     a.advance(1.0 / 60.0);
//!     b.advance(1.0 / 60.0);
//! }
//! assert_eq!(hash_simulation(&a), hash_simulation(&b));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export rubble for terrain access
pub use rubble;

pub mod ai;
pub mod arena;
pub mod camera;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod hash;
pub mod input;
pub mod intent;
pub mod present;
pub mod resolver;
pub mod simulation;
pub mod team;
pub mod turn;
pub mod world;

#[cfg(test)]
mod tests;

pub use config::{GameConfig, SubstepTime};
pub use error::{ConfigError, SimError};
pub use event::SimEvent;
pub use hash::hash_simulation;
pub use resolver::PhysicsResolver;
pub use simulation::Simulation;
pub use turn::{Outcome, TurnState};
