//! Missing-aware 2x bilinear upsampling.

use cdi_grid::{Grid, MISSING, is_missing};

/// Sentinel border, in target cells, appended below and right of the
/// interpolated area.
pub const PADDING: usize = 4;

/// Weight kernels in sixteenths over a source block `[[a, b], [c, d]]`,
/// where `a` is at `(jj, ii)`, `b` at `(jj, ii+1)`, `c` at `(jj+1, ii)` and
/// `d` at `(jj+1, ii+1)`. Order: target cells `(2jj, 2ii)`, `(2jj, 2ii+1)`,
/// `(2jj+1, 2ii)`, `(2jj+1, 2ii+1)`.
pub const KERNELS: [[f64; 4]; 4] = [
    [0.5625, 0.1875, 0.1875, 0.0625],
    [0.1875, 0.5625, 0.0625, 0.1875],
    [0.1875, 0.0625, 0.5625, 0.1875],
    [0.0625, 0.1875, 0.1875, 0.5625],
];

/// Interpolates one target cell from a source block.
///
/// Missing source cells get zero weight and the remaining weights are
/// rescaled to sum to one. Returns `None` when every cell is missing.
pub fn interpolate_cell(block: &[f64; 4], kernel: &[f64; 4]) -> Option<f64> {
    let weight_sum: f64 = block
        .iter()
        .zip(kernel)
        .filter(|(v, _)| !is_missing(**v))
        .map(|(_, w)| w)
        .sum();
    if weight_sum == 0.0 {
        return None;
    }
    let scale = 1.0 / weight_sum;
    let value = block
        .iter()
        .zip(kernel)
        .filter(|(v, _)| !is_missing(**v))
        .map(|(v, w)| v * w * scale)
        .sum();
    Some(value)
}

/// Upsamples `source` by two in each direction.
///
/// Every interior 2x2 block `(jj, ii)` of the source fills the four target
/// cells `(2jj..2jj+2, 2ii..2ii+2)`. The output has
/// `2 * (rows - 1) + PADDING` rows and `2 * (cols - 1) + PADDING` columns;
/// the padding border and blocks with no valid source cell hold [`MISSING`].
/// Row order is preserved (a south-up source gives a south-up result).
pub fn bilinear_upsample(source: &Grid) -> Grid {
    let blocks_r = source.rows().saturating_sub(1);
    let blocks_c = source.cols().saturating_sub(1);
    let out_rows = 2 * blocks_r + PADDING;
    let out_cols = 2 * blocks_c + PADDING;
    let mut out = vec![MISSING; out_rows * out_cols];
    let src = source.values();
    let sc = source.cols();

    for jj in 0..blocks_r {
        for ii in 0..blocks_c {
            let block = [
                src[jj * sc + ii],
                src[jj * sc + ii + 1],
                src[(jj + 1) * sc + ii],
                src[(jj + 1) * sc + ii + 1],
            ];
            if block.iter().all(|&v| is_missing(v)) {
                continue;
            }
            for (k, kernel) in KERNELS.iter().enumerate() {
                if let Some(v) = interpolate_cell(&block, kernel) {
                    let r = 2 * jj + k / 2;
                    let c = 2 * ii + k % 2;
                    out[r * out_cols + c] = v;
                }
            }
        }
    }

    Grid::from_lossy(out_rows, out_cols, out).unwrap_or_else(|_| Grid::missing(out_rows, out_cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kernels_are_sixteenths_summing_to_one() {
        for kernel in &KERNELS {
            let sum: f64 = kernel.iter().sum();
            assert_eq!(sum, 1.0);
            let mut sixteenths: Vec<f64> = kernel.iter().map(|w| w * 16.0).collect();
            sixteenths.sort_by(|a, b| b.partial_cmp(a).unwrap());
            assert_eq!(sixteenths, vec![9.0, 3.0, 3.0, 1.0]);
        }
    }

    #[test]
    fn full_block_reproduces_kernels() {
        let (a, b, c, d) = (16.0, 32.0, 48.0, 64.0);
        let src = Grid::new(2, 2, vec![a, b, c, d]).unwrap();
        let out = bilinear_upsample(&src);
        assert_eq!(out.shape(), (2 + PADDING, 2 + PADDING));
        assert_eq!(out.get(0, 0), Some((9.0 * a + 3.0 * b + 3.0 * c + d) / 16.0));
        assert_eq!(out.get(0, 1), Some((3.0 * a + 9.0 * b + c + 3.0 * d) / 16.0));
        assert_eq!(out.get(1, 0), Some((3.0 * a + b + 9.0 * c + 3.0 * d) / 16.0));
        assert_eq!(out.get(1, 1), Some((a + 3.0 * b + 3.0 * c + 9.0 * d) / 16.0));
        // Padding stays missing.
        assert!(out.is_missing_at(2, 0));
        assert!(out.is_missing_at(0, 2));
    }

    #[test]
    fn one_missing_cell_renormalizes() {
        let (a, b, c) = (1.0, 2.0, 4.0);
        let src = Grid::new(2, 2, vec![a, b, c, MISSING]).unwrap();
        let out = bilinear_upsample(&src);
        // Top-left kernel loses its 1/16, remaining weights 9, 3, 3 over 15.
        assert_relative_eq!(
            out.get(0, 0).unwrap(),
            (9.0 * a + 3.0 * b + 3.0 * c) / 15.0,
            epsilon = 1e-12
        );
        // Bottom-right kernel loses 9/16, remaining 1, 3, 3 over 7.
        assert_relative_eq!(
            out.get(1, 1).unwrap(),
            (a + 3.0 * b + 3.0 * c) / 7.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn constant_field_with_holes_stays_constant() {
        let src = Grid::new(2, 2, vec![5.0, MISSING, MISSING, 5.0]).unwrap();
        let out = bilinear_upsample(&src);
        for r in 0..2 {
            for c in 0..2 {
                assert_relative_eq!(out.get(r, c).unwrap(), 5.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn all_missing_block_leaves_sentinel() {
        let src = Grid::new(2, 3, vec![MISSING, MISSING, 1.0, MISSING, MISSING, 1.0]).unwrap();
        let out = bilinear_upsample(&src);
        assert_eq!(out.shape(), (2 + PADDING, 4 + PADDING));
        assert!(out.is_missing_at(0, 0));
        assert!(out.is_missing_at(1, 1));
        // Second block has valid right column.
        assert_relative_eq!(out.get(0, 3).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_source_is_all_padding() {
        let src = Grid::new(1, 3, vec![1.0, 2.0, 3.0]).unwrap();
        let out = bilinear_upsample(&src);
        assert_eq!(out.shape(), (PADDING, 4 + PADDING));
        assert!(out.is_all_missing());
    }
}
