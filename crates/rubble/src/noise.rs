//! Multi-octave 1D value noise for terrain surfaces.
//!
//! Each column's height is a weighted blend of octaves. Octave `o` samples the
//! seed array every `width >> o` columns and linearly interpolates between the
//! two samples bracketing the column. Octave weights start at 1 and are divided
//! by `bias` per octave, so a larger bias gives a smoother surface.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// Seed value pinned at column 0 so every surface starts at mid height.
pub const ANCHOR_VALUE: f32 = 0.5;

/// Parameters of the value-noise surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Number of octaves to accumulate
    pub octaves: u32,
    /// Divisor applied to the octave weight after each octave
    pub bias: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 8,
            bias: 2.0,
        }
    }
}

impl NoiseConfig {
    /// Checks the configuration against a surface width.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidBias`] for a non-positive or non-finite
    /// bias, [`TerrainError::NoOctaves`] for zero octaves, and
    /// [`TerrainError::TooManyOctaves`] when the finest octave's
    /// pitch (`width >> (octaves - 1)`) would be zero.
    pub fn validate(&self, width: usize) -> Result<(), TerrainError> {
        if !(self.bias.is_finite() && self.bias > 0.0) {
            return Err(TerrainError::InvalidBias(self.bias));
        }
        if self.octaves == 0 {
            return Err(TerrainError::NoOctaves);
        }
        let finest = self.octaves.saturating_sub(1);
        if finest >= usize::BITS || (width >> finest) == 0 {
            return Err(TerrainError::TooManyOctaves {
                octaves: self.octaves,
                width,
            });
        }
        Ok(())
    }
}

/// Draws a uniform `[0, 1)` seed array with column 0 pinned to [`ANCHOR_VALUE`].
pub fn random_seed<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<f32> {
    let mut seed: Vec<f32> = (0..len).map(|_| rng.gen::<f32>()).collect();
    if let Some(first) = seed.first_mut() {
        *first = ANCHOR_VALUE;
    }
    seed
}

/// Computes the normalized surface height of every column.
///
/// The output has one value per seed entry, each a weighted average of seed
/// values and therefore inside the seed's value range.
///
/// # Errors
///
/// Returns any error from [`NoiseConfig::validate`].
#[allow(clippy::cast_precision_loss)]
pub fn surface_profile(seed: &[f32], config: &NoiseConfig) -> Result<Vec<f32>, TerrainError> {
    let count = seed.len();
    config.validate(count)?;

    let surface = (0..count)
        .map(|x| {
            let mut noise = 0.0_f32;
            let mut scale_acc = 0.0_f32;
            let mut scale = 1.0_f32;

            for octave in 0..config.octaves {
                let pitch = count >> octave;
                let sample1 = (x / pitch) * pitch;
                let sample2 = (sample1 + pitch) % count;
                let blend = (x - sample1) as f32 / pitch as f32;
                let sample = (1.0 - blend) * seed[sample1] + blend * seed[sample2];

                scale_acc += scale;
                noise += sample * scale;
                scale /= config.bias;
            }

            noise / scale_acc
        })
        .collect();

    Ok(surface)
}
