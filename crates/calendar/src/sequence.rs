//! Monthly key sequence generation.

use crate::key::CalendarKey;

/// Generates `n_months` consecutive calendar keys starting at `start`.
///
/// Year boundaries are handled by [`CalendarKey::next`] (December wraps to
/// January of the following year).
pub fn monthly_sequence(start: CalendarKey, n_months: usize) -> Vec<CalendarKey> {
    let mut keys = Vec::with_capacity(n_months);
    if n_months == 0 {
        return keys;
    }
    keys.push(start);
    let mut current = start;
    for _ in 1..n_months {
        current = current.next();
        keys.push(current);
    }
    keys
}

/// Returns `true` if every key is exactly one month after its predecessor.
///
/// Empty and single-key sequences are contiguous.
pub fn is_contiguous(keys: &[CalendarKey]) -> bool {
    keys.windows(2).all(|w| w[1].months_since(w[0]) == 1)
}
