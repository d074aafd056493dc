//! Zero-inflated gamma fit (Thom estimator) and statrs bridge.

use statrs::distribution::{ContinuousCDF, Gamma};

/// Lower bound on `ln(mean) - mean(ln x)`.
pub const MIN_A: f64 = 0.01;

/// Lower bound on the scale parameter.
pub const MIN_BETA: f64 = 0.0001;

/// Mixed distribution of precipitation totals for one cell and month slice.
///
/// A probability mass `q` sits at exactly zero; non-zero totals follow a
/// gamma distribution with shape `alpha` and scale `beta`. The cumulative
/// probability of a total `x` is `H(x) = q + (1 - q) * G(x)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaFit {
    alpha: f64,
    beta: f64,
    q: f64,
    dist: Gamma,
}

impl GammaFit {
    /// Fits the distribution to valid (non-negative) totals.
    ///
    /// Exact zeros are counted towards `q` and left out of the estimator;
    /// any positive total, however small, enters it. With
    /// `A = max(ln(mean) - mean(ln x), MIN_A)` over the non-zero totals:
    ///
    /// - `alpha = (1 + sqrt(1 + 4A/3)) / 4A`
    /// - `beta = max(mean / alpha, MIN_BETA)`
    ///
    /// Returns `None` if there is no positive total or the estimates are not
    /// usable. Negative and non-finite values are ignored.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let mut zeros = 0usize;
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut log_sum = 0.0;
        for &v in values {
            if !v.is_finite() || v < 0.0 {
                continue;
            }
            if v == 0.0 {
                zeros += 1;
                continue;
            }
            n += 1;
            sum += v;
            log_sum += v.ln();
        }
        if n == 0 {
            return None;
        }

        let mean = sum / n as f64;
        let log_mean = log_sum / n as f64;
        let a = (mean.ln() - log_mean).max(MIN_A);
        let alpha = (1.0 + (1.0 + 4.0 * a / 3.0).sqrt()) / (4.0 * a);
        let beta = (mean / alpha).max(MIN_BETA);
        let q = (zeros as f64 / (zeros + n) as f64).clamp(0.0, 1.0);

        // statrs parameterises Gamma by (shape, rate).
        let dist = Gamma::new(alpha, 1.0 / beta).ok()?;
        Some(Self {
            alpha,
            beta,
            q,
            dist,
        })
    }

    /// Shape parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Scale parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Probability of a zero total.
    pub fn q(&self) -> f64 {
        self.q
    }

    /// Gamma CDF `G(x)` of the non-zero part.
    pub fn cdf(&self, x: f64) -> f64 {
        self.dist.cdf(x)
    }

    /// Mixed cumulative probability `H(x)`; `H(0) = q`.
    pub fn cumulative(&self, x: f64) -> f64 {
        if x == 0.0 {
            return self.q;
        }
        self.q + (1.0 - self.q) * self.cdf(x)
    }
}
