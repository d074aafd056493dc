//! Error types for the cdi-resample crate.

/// Error type for all fallible operations in the cdi-resample crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResampleError {
    /// Returned when a spacing is not a positive finite number.
    #[error("{field} spacing must be positive and finite, got {value}")]
    InvalidSpacing {
        /// Which spacing was rejected ("source" or "target").
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when the source spacing is not twice the target spacing.
    #[error("source spacing {source_spacing} must be exactly twice the target spacing {target_spacing}")]
    SpacingRatio {
        /// Source cell spacing in degrees.
        source_spacing: f64,
        /// Target cell spacing in degrees.
        target_spacing: f64,
    },

    /// Returned when a source subset does not cover the bounding box.
    #[error("source subset is {got:?}, expected {expected:?} for the bounding box")]
    SourceShape {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        got: (usize, usize),
    },

    /// Returned when the source longitude axis runs east to west.
    #[error("source longitudes must be ascending")]
    DescendingLongitude,

    /// Grid error.
    #[error(transparent)]
    Grid(#[from] cdi_grid::GridError),
}
