//! Error types for the cdi-stats crate.

/// Error type for all fallible operations in the cdi-stats crate.
///
/// Statistical degeneracy (too few years, zero spread) is never an error:
/// it produces sentinel cells. Errors are reserved for malformed input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when the grids of a month slice differ in shape.
    #[error("grid {index} of the slice has shape {got:?}, expected {expected:?}")]
    SliceShape {
        /// Position of the offending grid in the slice.
        index: usize,
        /// Shape of the first grid.
        expected: (usize, usize),
        /// Shape of the offending grid.
        got: (usize, usize),
    },

    /// Grid error.
    #[error(transparent)]
    Grid(#[from] cdi_grid::GridError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_slice_shape() {
        let e = StatsError::SliceShape {
            index: 3,
            expected: (2, 2),
            got: (2, 3),
        };
        assert_eq!(
            e.to_string(),
            "grid 3 of the slice has shape (2, 3), expected (2, 2)"
        );
    }

    #[test]
    fn from_grid_error() {
        let ge = cdi_grid::GridError::NonFinite { index: 0 };
        let se: StatsError = ge.into();
        assert!(matches!(se, StatsError::Grid(_)));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<StatsError>();
    }
}
