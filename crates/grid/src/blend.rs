//! Depth-weighted blending of layer grids.

use crate::axis::round_to;
use crate::error::GridError;
use crate::grid::{Grid, MISSING, is_missing};

/// Decimal places kept in blended values.
pub const BLEND_DECIMALS: i32 = 6;

/// Weighted sum of same-shape layers, cell by cell.
///
/// A cell is sentinel if any layer is sentinel there. Results are rounded to
/// [`BLEND_DECIMALS`]. Typical use is soil-moisture root-zone layers, e.g.
/// `0.2 * (0-10 cm) + 0.8 * (10-40 cm)`.
///
/// # Errors
///
/// Returns [`GridError::BlendMismatch`] if `layers` is empty or its length
/// differs from `weights`, or [`GridError::ShapeMismatch`] if the layers
/// disagree in shape.
pub fn blend(layers: &[&Grid], weights: &[f64]) -> Result<Grid, GridError> {
    if layers.is_empty() || layers.len() != weights.len() {
        return Err(GridError::BlendMismatch {
            layers: layers.len(),
            weights: weights.len(),
        });
    }
    let first = layers[0];
    for layer in &layers[1..] {
        first.check_same_shape(layer)?;
    }

    let data = (0..first.len())
        .map(|i| {
            let mut total = 0.0;
            for (layer, &w) in layers.iter().zip(weights) {
                let v = layer.values()[i];
                if is_missing(v) {
                    return MISSING;
                }
                total += w * v;
            }
            round_to(total, BLEND_DECIMALS)
        })
        .collect();
    Grid::from_lossy(first.rows(), first.cols(), data)
}
