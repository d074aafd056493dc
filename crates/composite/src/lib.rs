//! # cdi-composite
//!
//! Weighted composite of ranked drought indicators.
//!
//! Indicator histories rarely line up: vegetation and temperature records
//! start in 2000, precipitation in 1981, and any source may have gaps. The
//! composite is therefore computed only on the dates every active indicator
//! has (a sorted intersection of day offsets), and a date where one
//! indicator has no data at all is written as entirely missing rather than
//! as a sum over the remaining indicators.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cdi_composite::{Weights, weighted_sum};
//!
//! let weights = Weights::new([("lst", 0.4), ("ndvi", 0.3), ("spi", 0.2), ("sm", 0.1)])?;
//! let cdi = weighted_sum(&ranked, &weights)?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `weights` | Validated indicator weights |
//! | `composite` | Date alignment and weighted sum |
//! | `error` | Error types |

mod composite;
mod error;
mod weights;

pub use composite::{common_dates, weighted_sum};
pub use error::CompositeError;
pub use weights::{WEIGHT_TOLERANCE, Weights};
