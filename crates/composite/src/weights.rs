//! Validated indicator weights.

use std::collections::BTreeMap;

use crate::error::CompositeError;

/// Allowed distance of the weight total from 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Indicator name to weight, validated to be non-negative and sum to 1.
///
/// Indicators with a zero weight are kept but inactive: they take no part in
/// date alignment or the weighted sum.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    weights: BTreeMap<String, f64>,
}

impl Weights {
    /// Validates `weights`.
    ///
    /// # Errors
    ///
    /// Returns [`CompositeError::InvalidWeight`] for a negative or
    /// non-finite weight, [`CompositeError::WeightSum`] if the total is not
    /// within [`WEIGHT_TOLERANCE`] of 1, or
    /// [`CompositeError::NoActiveIndicator`] if no weight is positive.
    pub fn new<I, S>(weights: I) -> Result<Self, CompositeError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let weights: BTreeMap<String, f64> =
            weights.into_iter().map(|(k, v)| (k.into(), v)).collect();
        for (name, &weight) in &weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CompositeError::InvalidWeight {
                    name: name.clone(),
                    weight,
                });
            }
        }
        if !weights.values().any(|&w| w > 0.0) {
            return Err(CompositeError::NoActiveIndicator);
        }
        let total: f64 = weights.values().sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(CompositeError::WeightSum { total });
        }
        Ok(Self { weights })
    }

    /// Weight of `name`, if configured.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    /// All configured indicators in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Indicators with a positive weight, in name order.
    pub fn active(&self) -> impl Iterator<Item = (&str, f64)> {
        self.iter().filter(|&(_, w)| w > 0.0)
    }

    /// Number of configured indicators.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`; at least one weight is positive.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_float_sums() {
        let w = Weights::new([("lst", 0.4), ("ndvi", 0.3), ("spi", 0.2), ("sm", 0.1)]).unwrap();
        assert_eq!(w.len(), 4);
        assert_eq!(w.get("spi"), Some(0.2));
        let names: Vec<&str> = w.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["lst", "ndvi", "sm", "spi"]);
    }

    #[test]
    fn zero_weights_are_inactive() {
        let w = Weights::new([("lst", 0.5), ("ndvi", 0.0), ("spi", 0.5)]).unwrap();
        let active: Vec<&str> = w.active().map(|(n, _)| n).collect();
        assert_eq!(active, vec!["lst", "spi"]);
    }

    #[test]
    fn rejects_bad_sum() {
        let err = Weights::new([("lst", 0.5), ("spi", 0.4)]).unwrap_err();
        assert!(matches!(err, CompositeError::WeightSum { .. }));
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert!(matches!(
            Weights::new([("lst", 1.2), ("spi", -0.2)]),
            Err(CompositeError::InvalidWeight { .. })
        ));
        assert!(matches!(
            Weights::new([("lst", f64::NAN)]),
            Err(CompositeError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn rejects_no_active() {
        assert_eq!(
            Weights::new([("lst", 0.0)]).unwrap_err(),
            CompositeError::NoActiveIndicator
        );
        assert_eq!(
            Weights::new(Vec::<(String, f64)>::new()).unwrap_err(),
            CompositeError::NoActiveIndicator
        );
    }
}
