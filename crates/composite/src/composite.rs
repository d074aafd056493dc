//! Date alignment and the weighted sum.

use std::collections::{BTreeMap, BTreeSet};

use cdi_calendar::CalendarKey;
use cdi_grid::{Grid, GridError, IndicatorSeries, MISSING, is_missing};
use tracing::{debug, info, warn};

use crate::error::CompositeError;
use crate::weights::Weights;

/// Day offsets present in every series, ascending.
///
/// # Errors
///
/// Returns a grid error if a key cannot be converted to a day offset.
pub fn common_dates<'a, I>(series: I) -> Result<BTreeSet<i64>, CompositeError>
where
    I: IntoIterator<Item = &'a IndicatorSeries>,
{
    let mut common: Option<BTreeSet<i64>> = None;
    for s in series {
        let offsets: BTreeSet<i64> = s.day_offsets()?.into_iter().collect();
        common = Some(match common {
            None => offsets,
            Some(acc) => acc.intersection(&offsets).copied().collect(),
        });
    }
    Ok(common.unwrap_or_default())
}

/// Combines ranked indicator series into the weighted composite.
///
/// Only indicators with a positive weight take part. The output holds one
/// grid per date common to all of them. At a date where any of them is
/// entirely missing the output grid is entirely missing; otherwise each
/// cell is the sum of `weight * rank` over the indicators valid at that cell,
/// or missing when none is.
///
/// # Errors
///
/// Returns [`CompositeError::MissingIndicator`] if an active indicator has
/// no series and [`CompositeError::ShapeMismatch`] if their grids differ in
/// shape.
pub fn weighted_sum(
    inputs: &BTreeMap<String, IndicatorSeries>,
    weights: &Weights,
) -> Result<IndicatorSeries, CompositeError> {
    let mut active: Vec<(&str, f64, &IndicatorSeries)> = Vec::new();
    for (name, weight) in weights.active() {
        let series = inputs
            .get(name)
            .ok_or_else(|| CompositeError::MissingIndicator {
                name: name.to_string(),
            })?;
        active.push((name, weight, series));
    }

    let mut expected: Option<(usize, usize)> = None;
    for &(name, _, series) in &active {
        let Some(shape) = series.shape() else {
            continue;
        };
        match expected {
            None => expected = Some(shape),
            Some(e) if e != shape => {
                return Err(CompositeError::ShapeMismatch {
                    name: name.to_string(),
                    expected: e,
                    got: shape,
                });
            }
            Some(_) => {}
        }
    }

    let dates = common_dates(active.iter().map(|&(_, _, s)| s))?;
    if dates.is_empty() {
        warn!(indicators = active.len(), "indicators share no dates");
        return Ok(IndicatorSeries::from_parts(Vec::new(), Vec::new())?);
    }
    let Some((rows, cols)) = expected else {
        return Ok(IndicatorSeries::from_parts(Vec::new(), Vec::new())?);
    };
    info!(
        dates = dates.len(),
        indicators = active.len(),
        "computing weighted sum"
    );

    let mut entries = Vec::with_capacity(dates.len());
    let mut skipped = 0usize;
    for &offset in &dates {
        let key = CalendarKey::from_day_offset(offset).map_err(GridError::from)?;
        let mut layers = Vec::with_capacity(active.len());
        for &(name, weight, series) in &active {
            let grid = series
                .get(key)
                .ok_or_else(|| CompositeError::MissingIndicator {
                    name: name.to_string(),
                })?;
            layers.push((weight, grid));
        }

        if layers.iter().any(|(_, g)| g.is_all_missing()) {
            skipped += 1;
            entries.push((key, Grid::missing(rows, cols)));
            continue;
        }
        entries.push((key, sum_layers(&layers, rows, cols)?));
    }
    if skipped > 0 {
        debug!(skipped, "dates with an empty indicator left missing");
    }

    Ok(IndicatorSeries::new(entries)?)
}

fn sum_layers(layers: &[(f64, &Grid)], rows: usize, cols: usize) -> Result<Grid, CompositeError> {
    let data = (0..rows * cols)
        .map(|cell| {
            let mut total = 0.0;
            let mut any = false;
            for &(weight, grid) in layers {
                let v = grid.values()[cell];
                if !is_missing(v) {
                    total += weight * v;
                    any = true;
                }
            }
            if any { total } else { MISSING }
        })
        .collect();
    Ok(Grid::new(rows, cols, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn key(y: i32, m: u8) -> CalendarKey {
        CalendarKey::new(y, m).unwrap()
    }

    fn constant(keys: &[CalendarKey], value: f64) -> IndicatorSeries {
        IndicatorSeries::new(keys.iter().map(|&k| (k, Grid::filled(2, 2, value))).collect()).unwrap()
    }

    #[test]
    fn common_dates_intersect() {
        let a = constant(&[key(2001, 1), key(2001, 2), key(2001, 3)], 0.1);
        let b = constant(&[key(2001, 2), key(2001, 3), key(2001, 4)], 0.1);
        let dates = common_dates([&a, &b]).unwrap();
        let expected: BTreeSet<i64> = [key(2001, 2), key(2001, 3)]
            .iter()
            .map(|k| k.day_offset().unwrap())
            .collect();
        assert_eq!(dates, expected);
        assert!(common_dates(std::iter::empty::<&IndicatorSeries>()).unwrap().is_empty());
    }

    #[test]
    fn four_indicator_example() {
        let keys = [key(2010, 6)];
        let inputs: BTreeMap<String, IndicatorSeries> = [
            ("lst", 0.8),
            ("ndvi", 0.5),
            ("spi", 0.9),
            ("sm", 0.2),
        ]
        .into_iter()
        .map(|(n, v)| (n.to_string(), constant(&keys, v)))
        .collect();
        let weights =
            Weights::new([("lst", 0.4), ("ndvi", 0.3), ("spi", 0.2), ("sm", 0.1)]).unwrap();
        let out = weighted_sum(&inputs, &weights).unwrap();
        assert_eq!(out.len(), 1);
        for &v in out.grids()[0].values() {
            assert_relative_eq!(v, 0.67, epsilon = 1e-12);
        }
    }

    #[test]
    fn whole_missing_indicator_blanks_the_date() {
        let keys = [key(2010, 6), key(2010, 7)];
        let lst = constant(&keys, 0.8);
        let spi = IndicatorSeries::new(vec![
            (keys[0], Grid::missing(2, 2)),
            (keys[1], Grid::filled(2, 2, 0.4)),
        ])
        .unwrap();
        let inputs = BTreeMap::from([("lst".to_string(), lst), ("spi".to_string(), spi)]);
        let weights = Weights::new([("lst", 0.5), ("spi", 0.5)]).unwrap();
        let out = weighted_sum(&inputs, &weights).unwrap();
        assert!(out.grids()[0].is_all_missing());
        assert_relative_eq!(out.grids()[1].values()[0], 0.6, epsilon = 1e-12);
    }

    #[test]
    fn partially_missing_cells_sum_valid_terms() {
        let k = key(2012, 1);
        let lst = IndicatorSeries::new(vec![(k, Grid::new(1, 2, vec![0.6, MISSING]).unwrap())]).unwrap();
        let sm = IndicatorSeries::new(vec![(k, Grid::new(1, 2, vec![0.2, MISSING]).unwrap())]).unwrap();
        let ndvi = IndicatorSeries::new(vec![(k, Grid::new(1, 2, vec![MISSING, 1.0]).unwrap())]).unwrap();
        let inputs = BTreeMap::from([
            ("lst".to_string(), lst),
            ("sm".to_string(), sm),
            ("ndvi".to_string(), ndvi),
        ]);
        let weights = Weights::new([("lst", 0.5), ("sm", 0.25), ("ndvi", 0.25)]).unwrap();
        let out = weighted_sum(&inputs, &weights).unwrap();
        assert_relative_eq!(out.grids()[0].values()[0], 0.35, epsilon = 1e-12);
        assert_relative_eq!(out.grids()[0].values()[1], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn inactive_indicators_do_not_restrict_dates() {
        let lst = constant(&[key(2001, 1), key(2001, 2)], 0.5);
        let ndvi = constant(&[key(2001, 2)], 0.5);
        let inputs = BTreeMap::from([("lst".to_string(), lst), ("ndvi".to_string(), ndvi)]);
        let weights = Weights::new([("lst", 1.0), ("ndvi", 0.0)]).unwrap();
        let out = weighted_sum(&inputs, &weights).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn missing_active_series() {
        let inputs = BTreeMap::from([("lst".to_string(), constant(&[key(2001, 1)], 0.5))]);
        let weights = Weights::new([("lst", 0.5), ("spi", 0.5)]).unwrap();
        assert_eq!(
            weighted_sum(&inputs, &weights).unwrap_err(),
            CompositeError::MissingIndicator { name: "spi".into() }
        );
    }

    #[test]
    fn shape_mismatch() {
        let k = [key(2001, 1)];
        let lst = constant(&k, 0.5);
        let sm = IndicatorSeries::new(vec![(k[0], Grid::filled(3, 2, 0.5))]).unwrap();
        let inputs = BTreeMap::from([("lst".to_string(), lst), ("sm".to_string(), sm)]);
        let weights = Weights::new([("lst", 0.5), ("sm", 0.5)]).unwrap();
        assert!(matches!(
            weighted_sum(&inputs, &weights),
            Err(CompositeError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn disjoint_dates_give_empty_output() {
        let lst = constant(&[key(2001, 1)], 0.5);
        let spi = constant(&[key(2002, 1)], 0.5);
        let inputs = BTreeMap::from([("lst".to_string(), lst), ("spi".to_string(), spi)]);
        let weights = Weights::new([("lst", 0.5), ("spi", 0.5)]).unwrap();
        assert!(weighted_sum(&inputs, &weights).unwrap().is_empty());
    }
}
