//! Error types for the cdi-spi crate.

use cdi_calendar::CalendarKey;

/// Error type for all fallible operations in the cdi-spi crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpiError {
    /// Returned when a totaling period of zero months is requested.
    #[error("invalid totaling period: {period} (must be at least 1 month)")]
    InvalidPeriod {
        /// The requested period in months.
        period: usize,
    },

    /// Returned when period totals are requested over a series with a gap.
    #[error("series is not monthly contiguous: {next} follows {previous}")]
    NonContiguousSeries {
        /// Last key before the gap.
        previous: CalendarKey,
        /// First key after the gap.
        next: CalendarKey,
    },

    /// Returned when a reference distribution cannot be constructed.
    ///
    /// The `message` field is a `String` because statrs errors do not
    /// implement `Clone`.
    #[error("distribution construction failed: {message}")]
    Distribution {
        /// Description of the failure.
        message: String,
    },

    /// Grid error.
    #[error(transparent)]
    Grid(#[from] cdi_grid::GridError),
}
