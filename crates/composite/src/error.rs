//! Error types for the cdi-composite crate.

/// Error type for all fallible operations in the cdi-composite crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompositeError {
    /// Returned when a weight is negative or not finite.
    #[error("invalid weight for indicator '{name}': {weight} (must be finite and >= 0)")]
    InvalidWeight {
        /// Indicator name.
        name: String,
        /// The rejected weight.
        weight: f64,
    },

    /// Returned when the weights do not sum to 1.
    #[error("indicator weights sum to {total}, expected 1.0")]
    WeightSum {
        /// Sum of all weights.
        total: f64,
    },

    /// Returned when every weight is zero or no weights are given.
    #[error("no indicator has a positive weight")]
    NoActiveIndicator,

    /// Returned when an indicator with a positive weight has no series.
    #[error("no series supplied for weighted indicator '{name}'")]
    MissingIndicator {
        /// Indicator name.
        name: String,
    },

    /// Returned when indicator grids differ in shape.
    #[error("indicator '{name}' has grid shape {got:?}, expected {expected:?}")]
    ShapeMismatch {
        /// Indicator name.
        name: String,
        /// Shape of the first active indicator.
        expected: (usize, usize),
        /// Shape of the offending indicator.
        got: (usize, usize),
    },

    /// Grid error.
    #[error(transparent)]
    Grid(#[from] cdi_grid::GridError),
}
