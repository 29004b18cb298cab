//! Test module for determinism and integration tests.
//!
//! These tests drive whole rounds through [`Simulation`](crate::Simulation):
//! - **Determinism tests**: same config and seed produce identical rounds
//! - **Integration tests**: turn flow, input gating, AI turns, round endings
//! - **Helper functions**: configs and stepping utilities
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end tests of the round
//! - `helpers.rs`: Test setup utilities

mod helpers;

// Re-export for convenience
pub use helpers::*;
