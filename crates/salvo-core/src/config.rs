//! Game configuration.
//!
//! Every tunable of a round is an explicit field of [`GameConfig`]. The
//! defaults reproduce the reference round: a 1024x512 map, two teams of two,
//! 15 second turns.

use rubble::NoiseConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest accepted map width.
pub const MIN_MAP_WIDTH: usize = 64;

/// Smallest accepted map height.
pub const MIN_MAP_HEIGHT: usize = 32;

/// Number of physics sub-steps run per frame.
pub const SUBSTEPS_PER_FRAME: u32 = 10;

/// How much time each physics sub-step integrates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstepTime {
    /// Every sub-step integrates the whole frame time. This is how the
    /// movement constants were tuned: in-frame displacement is tenfold.
    #[default]
    FullFrame,
    /// Each sub-step integrates `dt / SUBSTEPS_PER_FRAME`.
    Split,
}

/// Parameters of a round.
///
/// Missing fields deserialize to their defaults, so a config file only needs
/// to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Terrain width in cells
    pub map_width: usize,
    /// Terrain height in cells
    pub map_height: usize,
    /// Number of teams
    pub team_count: usize,
    /// Units allocated to each team
    pub units_per_team: usize,
    /// Length of a turn in seconds
    pub turn_seconds: f32,
    /// Downward acceleration added every sub-step
    pub gravity: f32,
    /// Launch speed the AI solves trajectories for
    pub launch_speed: f32,
    /// Octaves of terrain noise
    pub noise_octaves: u32,
    /// Per-octave weight divisor of terrain noise
    pub noise_bias: f32,
    /// Projectile speed at full charge
    pub max_fire_speed: f32,
    /// Viewport width used by the camera
    pub viewport_width: f32,
    /// Viewport height used by the camera
    pub viewport_height: f32,
    /// Whether team 0 is driven by input instead of the AI
    pub primary_is_human: bool,
    /// Sub-step time policy
    pub substep_time: SubstepTime,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: 1024,
            map_height: 512,
            team_count: 2,
            units_per_team: 2,
            turn_seconds: 15.0,
            gravity: 2.0,
            launch_speed: 30.0,
            noise_octaves: 8,
            noise_bias: 2.0,
            max_fire_speed: 40.0,
            viewport_width: 800.0,
            viewport_height: 450.0,
            primary_is_human: true,
            substep_time: SubstepTime::FullFrame,
        }
    }
}

impl GameConfig {
    /// Default configuration with every team computer-controlled.
    #[must_use]
    pub fn all_computer() -> Self {
        Self {
            primary_is_human: false,
            ..Self::default()
        }
    }

    /// Checks that the configuration can run a round.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width < MIN_MAP_WIDTH || self.map_height < MIN_MAP_HEIGHT {
            return Err(ConfigError::MapTooSmall {
                width: self.map_width,
                height: self.map_height,
                min_width: MIN_MAP_WIDTH,
                min_height: MIN_MAP_HEIGHT,
            });
        }
        if self.team_count < 2 {
            return Err(ConfigError::TooFewTeams(self.team_count));
        }
        if self.units_per_team == 0 {
            return Err(ConfigError::NoUnits);
        }

        for (name, value) in [
            ("turn_seconds", self.turn_seconds),
            ("gravity", self.gravity),
            ("launch_speed", self.launch_speed),
            ("max_fire_speed", self.max_fire_speed),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        self.noise().validate(self.map_width)?;
        Ok(())
    }

    /// Terrain noise parameters.
    #[must_use]
    pub fn noise(&self) -> NoiseConfig {
        NoiseConfig {
            octaves: self.noise_octaves,
            bias: self.noise_bias,
        }
    }

    /// Time integrated by one physics sub-step of a frame lasting `dt`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn substep_dt(&self, dt: f32) -> f32 {
        match self.substep_time {
            SubstepTime::FullFrame => dt,
            SubstepTime::Split => dt / SUBSTEPS_PER_FRAME as f32,
        }
    }

    /// Map width as a float, for world-space arithmetic.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_width(&self) -> f32 {
        self.map_width as f32
    }

    /// Map height as a float, for world-space arithmetic.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_height(&self) -> f32 {
        self.map_height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubble::TerrainError;

    #[test]
    fn default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(GameConfig::all_computer().validate().is_ok());
    }

    #[test]
    fn rejects_small_map() {
        let config = GameConfig {
            map_width: 32,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MapTooSmall { width: 32, .. })
        ));
    }

    #[test]
    fn rejects_single_team() {
        let config = GameConfig {
            team_count: 1,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::TooFewTeams(1)));
    }

    #[test]
    fn rejects_empty_teams() {
        let config = GameConfig {
            units_per_team: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoUnits));
    }

    #[test]
    fn rejects_non_positive_floats() {
        let config = GameConfig {
            gravity: 0.0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "gravity",
                value: 0.0
            })
        );

        let config = GameConfig {
            turn_seconds: f32::NAN,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "turn_seconds",
                ..
            })
        ));
    }

    #[test]
    fn rejects_too_many_octaves() {
        let config = GameConfig {
            map_width: 64,
            noise_octaves: 8,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Noise(TerrainError::TooManyOctaves {
                octaves: 8,
                width: 64
            }))
        );
    }

    #[test]
    fn rejects_zero_octaves() {
        let config = GameConfig {
            map_width: 256,
            map_height: 128,
            noise_octaves: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Noise(TerrainError::NoOctaves))
        );
    }

    #[test]
    fn substep_policy() {
        let mut config = GameConfig::default();
        assert!((config.substep_dt(0.5) - 0.5).abs() < f32::EPSILON);
        config.substep_time = SubstepTime::Split;
        assert!((config.substep_dt(0.5) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn json_round_trip() {
        let config = GameConfig {
            team_count: 3,
            substep_time: SubstepTime::Split,
            ..GameConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"team_count": 4}"#).unwrap();
        assert_eq!(config.team_count, 4);
        assert_eq!(config.map_width, 1024);
        assert_eq!(config.substep_time, SubstepTime::FullFrame);
    }
}
