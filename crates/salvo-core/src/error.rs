//! Error types for simulation startup.
//!
//! Only [`Simulation::new`](crate::Simulation::new) can fail. Once a
//! simulation exists, every frame update keeps it in a well-defined state
//! without reporting errors.

use rubble::TerrainError;
use thiserror::Error;

/// A [`GameConfig`](crate::GameConfig) parameter outside its usable range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Map too small to hold the margins units are clamped to.
    #[error("map {width}x{height} is smaller than the minimum {min_width}x{min_height}")]
    MapTooSmall {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Minimum width
        min_width: usize,
        /// Minimum height
        min_height: usize,
    },

    /// A round needs at least two teams.
    #[error("team count {0} is below 2")]
    TooFewTeams(usize),

    /// Every team needs at least one unit.
    #[error("units per team must be at least 1")]
    NoUnits,

    /// A float parameter that must be strictly positive and finite.
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// The noise parameters do not fit the map width.
    #[error("invalid noise parameters: {0}")]
    Noise(#[from] TerrainError),
}

/// Fatal error creating a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Rejected configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Terrain allocation or generation failed
    #[error("terrain error: {0}")]
    Terrain(#[from] TerrainError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_parameter() {
        let err = ConfigError::NotPositive {
            name: "gravity",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "gravity must be positive and finite, got -1");
    }

    #[test]
    fn sim_error_wraps_both_sources() {
        let config: SimError = ConfigError::NoUnits.into();
        assert!(matches!(config, SimError::Config(ConfigError::NoUnits)));

        let terrain: SimError = TerrainError::ZeroSize {
            width: 0,
            height: 4,
        }
        .into();
        assert!(matches!(terrain, SimError::Terrain(_)));
    }
}
