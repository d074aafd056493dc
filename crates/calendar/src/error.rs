//! Error types for the cdi-calendar crate.

use crate::key::CalendarKey;

/// Error type for all fallible operations in the cdi-calendar crate.
///
/// Covers month validation, day-offset conversion, and ordering checks on
/// key sequences used to partition monthly series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day offset cannot be represented as a date.
    #[error("day offset {days} is out of range for the 1900-01-01 epoch")]
    OffsetOutOfRange {
        /// The offending day offset.
        days: i64,
    },

    /// Returned when a year lies outside the supported date range.
    #[error("year {year} is outside the supported date range")]
    YearOutOfRange {
        /// The offending year.
        year: i32,
    },

    /// Returned when a key sequence is not strictly increasing.
    #[error("calendar keys must be strictly increasing: {next} follows {previous}")]
    NotIncreasing {
        /// The key preceding the offending one.
        previous: CalendarKey,
        /// The key that is not after `previous`.
        next: CalendarKey,
    },

    /// Returned when per-month results do not match the slice they came from.
    #[error("month {month} slice has {expected} entries but {got} results were supplied")]
    SliceLengthMismatch {
        /// Month of the slice (1..=12).
        month: u8,
        /// Number of positions in the slice.
        expected: usize,
        /// Number of results supplied.
        got: usize,
    },

    /// Returned when an item sequence does not match the partitioned keys.
    #[error("{items} items supplied for {keys} calendar keys")]
    LengthMismatch {
        /// Number of partitioned keys.
        keys: usize,
        /// Number of items supplied.
        items: usize,
    },
}
