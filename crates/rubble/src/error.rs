//! Terrain construction errors.
//!
//! Only terrain construction and generation can fail. Queries and crater
//! stamps clamp or clip instead of returning errors.

use thiserror::Error;

/// Errors raised while building or generating a [`TerrainField`](crate::TerrainField).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// Width or height was zero.
    #[error("terrain dimensions must be non-zero, got {width}x{height}")]
    ZeroSize {
        /// Requested width in cells
        width: usize,
        /// Requested height in cells
        height: usize,
    },

    /// The cell buffer would not fit in memory.
    #[error("terrain of {width}x{height} cells overflows the address space")]
    TooLarge {
        /// Requested width in cells
        width: usize,
        /// Requested height in cells
        height: usize,
    },

    /// The noise seed array does not have one entry per column.
    #[error("noise seed has {got} entries, terrain has {expected} columns")]
    SeedLengthMismatch {
        /// Number of columns in the field
        expected: usize,
        /// Length of the seed array supplied
        got: usize,
    },

    /// At least one octave is needed to shape a surface.
    #[error("terrain noise needs at least one octave")]
    NoOctaves,

    /// The finest octave would have a pitch of zero columns.
    #[error("{octaves} noise octaves is too many for a surface {width} columns wide")]
    TooManyOctaves {
        /// Requested octave count
        octaves: u32,
        /// Surface width in columns
        width: usize,
    },

    /// The per-octave scale divisor must be strictly positive.
    #[error("noise bias must be positive and finite, got {0}")]
    InvalidBias(f32),
}
