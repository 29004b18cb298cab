//! The terrain bitmap.
//!
//! A [`TerrainField`] is a row-major grid of [`Cell`]s with `y = 0` at the top.
//! Every accessor clamps its coordinates into `[0, width) x [0, height)`, so
//! callers may probe positions outside the map without bounds checks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::noise::{surface_profile, NoiseConfig};

/// Contents of a single terrain cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    /// Open air
    #[default]
    Sky = 0,
    /// Solid, destructible ground
    Ground = 1,
}

impl Cell {
    /// Returns `true` for [`Cell::Ground`].
    #[must_use]
    pub const fn is_ground(self) -> bool {
        matches!(self, Cell::Ground)
    }
}

/// Destructible terrain bitmap.
///
/// The field is allocated once and never resized. Generation overwrites every
/// cell; crater stamps only ever turn ground into sky.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainField {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TerrainField {
    /// Allocates an all-sky field.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ZeroSize`] if either dimension is zero, or
    /// [`TerrainError::TooLarge`] if the cell count overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 {
            return Err(TerrainError::ZeroSize { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(TerrainError::TooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Sky; len],
        })
    }

    /// Width in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major cell storage.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells holding `cell`.
    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Clamps a signed coordinate pair to a valid storage index.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn index(&self, x: i32, y: i32) -> usize {
        let max_x = (self.width - 1).min(i32::MAX as usize) as i32;
        let max_y = (self.height - 1).min(i32::MAX as usize) as i32;
        let cx = x.clamp(0, max_x) as usize;
        let cy = y.clamp(0, max_y) as usize;
        cy * self.width + cx
    }

    /// Reads a cell, clamping the coordinates into bounds.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Writes a cell, clamping the coordinates into bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) {
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    /// Reads the cell under a world-space point.
    ///
    /// The point is rounded to the nearest cell centre and then clamped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample(&self, point: Vec2) -> Cell {
        // `as` saturates for out-of-range floats, and NaN maps to 0.
        self.get(point.x.round() as i32, point.y.round() as i32)
    }

    /// Overwrites every cell with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Rebuilds the bitmap from a per-column surface height.
    ///
    /// `surface[x]` is a fraction of the field height. Every cell strictly
    /// below `surface[x] * height` becomes ground, the rest sky. Columns
    /// without a surface entry are left untouched.
    #[allow(clippy::cast_precision_loss)]
    pub fn apply_surface(&mut self, surface: &[f32]) {
        let height = self.height as f32;
        for y in 0..self.height {
            let row = y * self.width;
            for (x, level) in surface.iter().take(self.width).enumerate() {
                self.cells[row + x] = if y as f32 > level * height {
                    Cell::Ground
                } else {
                    Cell::Sky
                };
            }
        }
    }

    /// Generates the terrain from a per-column seed array.
    ///
    /// This is a pure function of `seed` and `config`: equal inputs always
    /// produce an equal bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::SeedLengthMismatch`] if `seed` does not have
    /// exactly one entry per column, or any error from
    /// [`surface_profile`].
    pub fn generate(&mut self, seed: &[f32], config: &NoiseConfig) -> Result<(), TerrainError> {
        if seed.len() != self.width {
            return Err(TerrainError::SeedLengthMismatch {
                expected: self.width,
                got: seed.len(),
            });
        }
        let surface = surface_profile(seed, config)?;
        self.apply_surface(&surface);
        tracing::debug!(
            width = self.width,
            height = self.height,
            ground = self.count(Cell::Ground),
            "generated terrain"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction_tests {
        use super::*;

        #[test]
        fn new_is_all_sky() {
            let field = TerrainField::new(8, 4).unwrap();
            assert_eq!(field.width(), 8);
            assert_eq!(field.height(), 4);
            assert_eq!(field.count(Cell::Sky), 32);
        }

        #[test]
        fn zero_dimensions_rejected() {
            assert_eq!(
                TerrainField::new(0, 4),
                Err(TerrainError::ZeroSize { width: 0, height: 4 })
            );
            assert!(TerrainField::new(4, 0).is_err());
        }

        #[test]
        fn overflowing_dimensions_rejected() {
            assert!(matches!(
                TerrainField::new(usize::MAX, 2),
                Err(TerrainError::TooLarge { .. })
            ));
        }
    }

    mod clamping_tests {
        use super::*;

        #[test]
        fn reads_clamp_to_edges() {
            let mut field = TerrainField::new(4, 4).unwrap();
            field.set(0, 0, Cell::Ground);
            field.set(3, 3, Cell::Ground);

            assert_eq!(field.get(-10, -10), Cell::Ground);
            assert_eq!(field.get(100, 100), Cell::Ground);
            assert_eq!(field.get(100, -1), Cell::Sky);
        }

        #[test]
        fn writes_clamp_to_edges() {
            let mut field = TerrainField::new(4, 4).unwrap();
            field.set(-5, 2, Cell::Ground);
            assert_eq!(field.get(0, 2), Cell::Ground);
            assert_eq!(field.count(Cell::Ground), 1);
        }

        #[test]
        fn sample_rounds_then_clamps() {
            let mut field = TerrainField::new(4, 4).unwrap();
            field.set(2, 1, Cell::Ground);
            assert_eq!(field.sample(Vec2::new(1.6, 0.7)), Cell::Ground);
            assert_eq!(field.sample(Vec2::new(1.4, 0.7)), Cell::Sky);
            assert_eq!(field.sample(Vec2::new(f32::NAN, f32::INFINITY)), Cell::Sky);
        }
    }

    mod surface_tests {
        use super::*;

        #[test]
        fn flat_surface_splits_rows() {
            let mut field = TerrainField::new(10, 10).unwrap();
            field.apply_surface(&[0.5; 10]);

            // y > 5.0 is ground
            for x in 0..10 {
                assert_eq!(field.get(x, 5), Cell::Sky);
                assert_eq!(field.get(x, 6), Cell::Ground);
            }
            assert_eq!(field.count(Cell::Ground), 40);
        }

        #[test]
        fn generate_rejects_short_seed() {
            let mut field = TerrainField::new(16, 8).unwrap();
            let err = field.generate(&[0.5; 4], &NoiseConfig::default()).unwrap_err();
            assert_eq!(
                err,
                TerrainError::SeedLengthMismatch {
                    expected: 16,
                    got: 4
                }
            );
        }

        #[test]
        fn serialization_roundtrip() {
            let mut field = TerrainField::new(6, 3).unwrap();
            field.set(1, 2, Cell::Ground);
            let json = serde_json::to_string(&field).unwrap();
            let back: TerrainField = serde_json::from_str(&json).unwrap();
            assert_eq!(field, back);
        }
    }
}
