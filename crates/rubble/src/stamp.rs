//! Craters: the mutation primitive for terrain.
//!
//! A crater clears a filled disc of cells to sky. The disc is rasterised with
//! the integer midpoint circle algorithm, but instead of plotting the eight
//! symmetric outline points per step, each step fills the four horizontal
//! scan-lines that join them. Scan-lines are inclusive at both ends, which
//! guarantees every cell within `radius` of the centre is covered.

use serde::{Deserialize, Serialize};

use crate::field::{Cell, TerrainField};

/// A disc-shaped hole to punch into the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crater {
    /// Centre column
    pub x: i32,
    /// Centre row
    pub y: i32,
    /// Radius in cells
    pub radius: i32,
}

impl Crater {
    /// Create a crater description.
    #[must_use]
    pub const fn new(x: i32, y: i32, radius: i32) -> Self {
        Self { x, y, radius }
    }
}

impl TerrainField {
    /// Applies a [`Crater`]. See [`TerrainField::carve_circle`].
    pub fn stamp(&mut self, crater: Crater) -> usize {
        self.carve_circle(crater.x, crater.y, crater.radius)
    }

    /// Clears every cell of the filled disc centred on `(cx, cy)` to sky.
    ///
    /// Cells outside the field are silently clipped; unlike point queries,
    /// carving never clamps onto the edge. A radius of zero or less is a
    /// no-op.
    ///
    /// Returns the number of cells that changed from ground to sky.
    pub fn carve_circle(&mut self, cx: i32, cy: i32, radius: i32) -> usize {
        if radius <= 0 {
            return 0;
        }

        let mut cleared = 0;
        let mut x = 0_i32;
        let mut y = radius;
        let mut p = 3 - 2 * radius;

        while y >= x {
            cleared += self.clear_span(cx - x, cx + x, cy.saturating_sub(y));
            cleared += self.clear_span(cx - y, cx + y, cy.saturating_sub(x));
            cleared += self.clear_span(cx - x, cx + x, cy.saturating_add(y));
            cleared += self.clear_span(cx - y, cx + y, cy.saturating_add(x));

            if p < 0 {
                p += 4 * x + 6;
            } else {
                p += 4 * (x - y) + 10;
                y -= 1;
            }
            x += 1;
        }

        cleared
    }

    /// Clears the inclusive span `[x0, x1]` on row `row`, clipped to the field.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn clear_span(&mut self, x0: i32, x1: i32, row: i32) -> usize {
        let width = self.width();
        if row < 0 || row as usize >= self.height() || x1 < 0 || x0 >= width.min(i32::MAX as usize) as i32 {
            return 0;
        }
        let start = x0.max(0) as usize;
        let end = (x1 as usize).min(width - 1);

        let mut cleared = 0;
        for column in start..=end {
            let (cx, cy) = (column as i32, row);
            if self.get(cx, cy).is_ground() {
                self.set(cx, cy, Cell::Sky);
                cleared += 1;
            }
        }
        cleared
    }
}
