//! Composite quadrature on uniform grids.
//!
//! The radiation transforms integrate the same grid against many different
//! oscillating factors, so rules are expressed as weight vectors that are
//! computed once and reused for every time (or frequency) sample.

use serde::{Deserialize, Serialize};

/// Composite quadrature rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadratureRule {
    /// Composite trapezoidal rule, O(h²).
    #[default]
    Trapezoidal,

    /// Composite Simpson 1/3 rule, O(h⁴).
    ///
    /// With an odd number of intervals the last interval is closed with a
    /// trapezoid panel.
    Simpson,
}

/// Quadrature weights for `n` uniformly spaced samples with step `h`.
///
/// `Σ weights[i] * y[i]` approximates the integral over the grid.
pub fn uniform_weights(rule: QuadratureRule, n: usize, h: f64) -> Vec<f64> {
    if n < 2 {
        return vec![0.0; n];
    }

    let mut w = vec![0.0; n];
    match rule {
        QuadratureRule::Trapezoidal => {
            w.iter_mut().for_each(|wi| *wi = h);
            w[0] = 0.5 * h;
            w[n - 1] = 0.5 * h;
        }
        QuadratureRule::Simpson if n == 2 => {
            w[0] = 0.5 * h;
            w[1] = 0.5 * h;
        }
        QuadratureRule::Simpson => {
            let intervals = n - 1;
            // Panels of two intervals cover [0, simpson_end]
            let simpson_end = if intervals % 2 == 0 { n - 1 } else { n - 2 };

            for i in (0..simpson_end).step_by(2) {
                w[i] += h / 3.0;
                w[i + 1] += 4.0 * h / 3.0;
                w[i + 2] += h / 3.0;
            }

            if simpson_end != n - 1 {
                w[n - 2] += 0.5 * h;
                w[n - 1] += 0.5 * h;
            }
        }
    }
    w
}

/// Integrate uniformly spaced samples.
pub fn integrate_uniform(rule: QuadratureRule, y: &[f64], h: f64) -> f64 {
    uniform_weights(rule, y.len(), h)
        .iter()
        .zip(y)
        .map(|(w, v)| w * v)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: usize, f: impl Fn(f64) -> f64) -> (Vec<f64>, f64) {
        let h = 1.0 / (n - 1) as f64;
        ((0..n).map(|i| f(i as f64 * h)).collect(), h)
    }

    #[test]
    fn test_trapezoid_linear_exact() {
        let (y, h) = samples(11, |x| 3.0 * x + 1.0);
        let result = integrate_uniform(QuadratureRule::Trapezoidal, &y, h);
        assert!((result - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_trapezoid_second_order() {
        let (y, h) = samples(101, |x| x * x);
        let result = integrate_uniform(QuadratureRule::Trapezoidal, &y, h);
        // Error is h²/6 for x² on [0, 1]
        assert!((result - 1.0 / 3.0).abs() < 2e-5);
    }

    #[test]
    fn test_simpson_cubic_exact() {
        let (y, h) = samples(21, |x| x * x * x);
        let result = integrate_uniform(QuadratureRule::Simpson, &y, h);
        assert!((result - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_odd_intervals() {
        // 10 points = 9 intervals: Simpson on 8, trapezoid on the last
        let (y, h) = samples(10, |x| x);
        let result = integrate_uniform(QuadratureRule::Simpson, &y, h);
        assert!((result - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_weights_sum_to_length() {
        for rule in [QuadratureRule::Trapezoidal, QuadratureRule::Simpson] {
            for n in [2, 3, 4, 7, 10] {
                let total: f64 = uniform_weights(rule, n, 0.5).iter().sum();
                assert!(
                    (total - 0.5 * (n - 1) as f64).abs() < 1e-12,
                    "{:?} with {} points sums to {}",
                    rule,
                    n,
                    total
                );
            }
        }
    }
}
