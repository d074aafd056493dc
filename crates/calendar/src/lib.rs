//! # cdi-calendar
//!
//! Monthly calendar keys for gridded climate series.
//!
//! Every time axis in the pipeline is a count of days since 1900-01-01
//! (proleptic Gregorian). A [`CalendarKey`] is the `(year, month)` a time
//! step belongs to; statistics are computed per month of year, so a
//! chronological series is split into 12 slices with [`MonthSlices`] and the
//! per-slice results are interleaved back into full-history order.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["day offset"] -->|"CalendarKey::from_day_offset()"| B["CalendarKey"]
//!     B -->|".day_offset()"| A
//!     B -->|"monthly_sequence()"| C["Vec of CalendarKey"]
//!     C -->|"MonthSlices::partition()"| D["12 month slices"]
//!     D -->|".interleave()"| E["full-history order"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use cdi_calendar::{CalendarKey, MonthSlices, monthly_sequence};
//!
//! let start = CalendarKey::new(1981, 1).unwrap();
//! let keys = monthly_sequence(start, 480);
//! let slices = MonthSlices::partition(&keys).unwrap();
//! assert_eq!(slices.slice(1).unwrap()[1], 12);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `key` | `(year, month)` key and epoch day offsets |
//! | `sequence` | Monthly key sequences and contiguity checks |
//! | `slices` | Month-of-year partitioning and re-interleaving |
//! | `error` | Error types |

mod error;
mod key;
mod sequence;
mod slices;

pub use error::CalendarError;
pub use key::{CalendarKey, EPOCH, TIME_UNITS};
pub use sequence::{is_contiguous, monthly_sequence};
pub use slices::MonthSlices;
