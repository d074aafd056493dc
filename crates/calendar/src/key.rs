//! Monthly calendar key with day-offset conversion.

use std::fmt;

use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::error::CalendarError;

/// Reference date for all time axes: offsets count days since 1900-01-01.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(d) => d,
    None => panic!("1900-01-01 is a valid date"),
};

/// CF-style units string matching [`EPOCH`].
pub const TIME_UNITS: &str = "days since 1900-01-01 00:00:00.0 UTC";

/// A calendar month identified by `(year, month)`.
///
/// Keys order chronologically and convert to and from whole-day offsets since
/// [`EPOCH`]. The offset of a key is the offset of the first day of its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarKey {
    year: i32,
    month: u8,
}

impl CalendarKey {
    /// Creates a key for `year` and `month`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn new(year: i32, month: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        Ok(Self { year, month })
    }

    /// Returns the key of the month containing `days` days after [`EPOCH`].
    ///
    /// Offsets need not fall on the first of a month; a mid-month stamp maps
    /// to the month it lies in.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OffsetOutOfRange`] if the offset overflows the
    /// supported date range.
    pub fn from_day_offset(days: i64) -> Result<Self, CalendarError> {
        let date = TimeDelta::try_days(days)
            .and_then(|delta| EPOCH.checked_add_signed(delta))
            .ok_or(CalendarError::OffsetOutOfRange { days })?;
        Ok(Self {
            year: date.year(),
            month: date.month() as u8,
        })
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the 0-based month-of-year index (January = 0).
    pub fn month_index(self) -> usize {
        (self.month - 1) as usize
    }

    /// Returns the first day of the month.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::YearOutOfRange`] for years chrono cannot
    /// represent.
    pub fn first_day(self) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), 1)
            .ok_or(CalendarError::YearOutOfRange { year: self.year })
    }

    /// Returns the number of days between [`EPOCH`] and the first of the month.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::YearOutOfRange`] for years chrono cannot
    /// represent.
    pub fn day_offset(self) -> Result<i64, CalendarError> {
        Ok((self.first_day()? - EPOCH).num_days())
    }

    /// Returns the following month.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Returns the signed number of months from `earlier` to `self`.
    pub fn months_since(self, earlier: Self) -> i64 {
        let a = i64::from(self.year) * 12 + i64::from(self.month);
        let b = i64::from(earlier.year) * 12 + i64::from(earlier.month);
        a - b
    }
}

impl fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
