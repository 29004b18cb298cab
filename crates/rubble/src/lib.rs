//! # Rubble
//!
//! Destructible terrain substrate for side-on artillery simulations.
//!
//! Rubble represents the world as a fixed-size bitmap of [`Cell`]s, each either
//! open sky or solid ground. The bitmap is generated once per round from a
//! multi-octave 1D value-noise surface and then mutated in place by crater
//! stamps.
//!
//! - **Generation**: [`noise::surface_profile`] turns a per-column seed array
//!   into a smooth surface height; [`TerrainField::generate`] fills the bitmap
//!   below that surface with ground
//! - **Queries**: [`TerrainField::get`] and [`TerrainField::sample`] never
//!   fault; out-of-range coordinates clamp to the nearest edge cell
//! - **Destruction**: [`TerrainField::carve_circle`] clears a filled disc
//! - **Determinism**: [`hash_terrain`] fingerprints the bitmap
//!
//! ## Quick Start
//!
//! ```
//! use rubble::{noise, NoiseConfig, TerrainField, Cell};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut terrain = TerrainField::new(256, 128).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let seed = noise::random_seed(terrain.width(), &mut rng);
//! terrain.generate(&seed, &NoiseConfig::default()).unwrap();
//!
//! // Blow a hole in the floor
//! terrain.carve_circle(10, 127, 8);
//! assert_eq!(terrain.get(10, 127), Cell::Sky);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod field;
pub mod hash;
pub mod noise;
pub mod stamp;

// Re-exports for convenience
pub use error::TerrainError;
pub use field::{Cell, TerrainField};
pub use hash::hash_terrain;
pub use noise::NoiseConfig;
