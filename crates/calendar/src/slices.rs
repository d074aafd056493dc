//! Month-of-year partitioning of chronological key sequences.

use crate::error::CalendarError;
use crate::key::CalendarKey;

/// Positions of a chronological key sequence grouped by month of year.
///
/// Each slice lists, in ascending year order, the positions in the original
/// sequence whose key falls in that month. For a contiguous monthly series
/// starting at position `p` for a given month, the slice is `p, p+12, p+24, ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSlices {
    slices: [Vec<usize>; 12],
    len: usize,
}

impl MonthSlices {
    /// Partitions `keys` into 12 month-of-year slices.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NotIncreasing`] if `keys` contains a duplicate
    /// or out-of-order key.
    pub fn partition(keys: &[CalendarKey]) -> Result<Self, CalendarError> {
        for pair in keys.windows(2) {
            if pair[1] <= pair[0] {
                return Err(CalendarError::NotIncreasing {
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }

        let mut slices: [Vec<usize>; 12] = Default::default();
        for (pos, key) in keys.iter().enumerate() {
            slices[key.month_index()].push(pos);
        }
        Ok(Self {
            slices,
            len: keys.len(),
        })
    }

    /// Total number of positions across all slices.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the partitioned sequence was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Positions belonging to `month` (1..=12).
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is outside 1..=12.
    pub fn slice(&self, month: u8) -> Result<&[usize], CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        Ok(&self.slices[(month - 1) as usize])
    }

    /// Iterates over the non-empty slices as `(month, positions)`.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[usize])> {
        self.slices
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .map(|(i, s)| (i as u8 + 1, s.as_slice()))
    }

    /// Scatters per-month results back into full-sequence order.
    ///
    /// `results` holds one entry per non-empty month, each with exactly as
    /// many values as that month's slice; value `k` of month `m` lands at
    /// position `slice(m)[k]`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::SliceLengthMismatch`] if a month's results do
    /// not match its slice length, including a non-empty month that is absent
    /// from `results`. Returns [`CalendarError::InvalidMonth`] for a month
    /// outside 1..=12.
    pub fn interleave<T>(&self, results: Vec<(u8, Vec<T>)>) -> Result<Vec<T>, CalendarError> {
        let mut out: Vec<Option<T>> = std::iter::repeat_with(|| None).take(self.len).collect();
        let mut supplied = [false; 12];

        for (month, values) in results {
            let positions = self.slice(month)?;
            if values.len() != positions.len() {
                return Err(CalendarError::SliceLengthMismatch {
                    month,
                    expected: positions.len(),
                    got: values.len(),
                });
            }
            for (&pos, value) in positions.iter().zip(values) {
                out[pos] = Some(value);
            }
            supplied[(month - 1) as usize] = true;
        }

        for (month, positions) in self.iter() {
            if !supplied[(month - 1) as usize] {
                return Err(CalendarError::SliceLengthMismatch {
                    month,
                    expected: positions.len(),
                    got: 0,
                });
            }
        }

        Ok(out.into_iter().flatten().collect())
    }
}
