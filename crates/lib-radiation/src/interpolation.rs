//! Frequency-domain resampling of radiation coefficients.

use crate::error::{DspError, DspResult};
use lib_hydro::units::RadPerSec;

/// Prepend a synthetic ω = 0 sample when the data does not start at zero.
///
/// The injected value repeats the lowest-frequency sample, which keeps the
/// cosine transform well defined near the origin without inventing a trend.
/// Returns the (possibly extended) frequency and value arrays.
pub fn inject_zero_frequency(freqs: &[RadPerSec], values: &[f64]) -> (Vec<RadPerSec>, Vec<f64>) {
    match (freqs.first(), values.first()) {
        (Some(&w0), Some(&v0)) if w0.0 > 0.0 => {
            let mut f = Vec::with_capacity(freqs.len() + 1);
            f.push(RadPerSec::ZERO);
            f.extend_from_slice(freqs);

            let mut v = Vec::with_capacity(values.len() + 1);
            v.push(v0);
            v.extend_from_slice(values);
            (f, v)
        }
        _ => (freqs.to_vec(), values.to_vec()),
    }
}

/// Piecewise-linear interpolation onto `target_freqs`.
///
/// Targets outside the sampled range take the nearest boundary value (flat
/// extrapolation). This is exact inside the data but biases the transform
/// whenever the true coefficient keeps changing beyond the sampled band,
/// and that bias shows up in the kernel at long times.
pub fn interpolate_linear(
    freqs: &[RadPerSec],
    values: &[f64],
    target_freqs: &[RadPerSec],
) -> DspResult<Vec<f64>> {
    if freqs.len() != values.len() {
        return Err(DspError::LengthMismatch {
            expected: freqs.len(),
            actual: values.len(),
        });
    }
    if freqs.len() < 2 {
        return Err(DspError::InvalidFrequencyRange(format!(
            "need at least 2 frequency samples, got {}",
            freqs.len()
        )));
    }

    Ok(target_freqs
        .iter()
        .map(|target| interpolate_single(freqs, values, target.0))
        .collect())
}

/// Interpolate a single frequency point.
fn interpolate_single(freqs: &[RadPerSec], values: &[f64], target: f64) -> f64 {
    let last = freqs.len() - 1;
    if target <= freqs[0].0 {
        return values[0];
    }
    if target >= freqs[last].0 {
        return values[last];
    }

    // Find bracketing indices
    let mut lower = 0;
    let mut upper = last;

    while upper - lower > 1 {
        let mid = (lower + upper) / 2;
        if freqs[mid].0 <= target {
            lower = mid;
        } else {
            upper = mid;
        }
    }

    let f0 = freqs[lower].0;
    let f1 = freqs[upper].0;
    let frac = (target - f0) / (f1 - f0);

    values[lower] + frac * (values[upper] - values[lower])
}

/// Generate a uniform frequency grid of `num_points` on `[w_min, w_max]`.
///
/// The last point is pinned to `w_max` exactly.
pub fn uniform_frequency_grid(w_min: RadPerSec, w_max: RadPerSec, num_points: usize) -> Vec<RadPerSec> {
    match num_points {
        0 => Vec::new(),
        1 => vec![w_min],
        n => {
            let dw = (w_max.0 - w_min.0) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        w_max
                    } else {
                        RadPerSec(w_min.0 + i as f64 * dw)
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rad(values: &[f64]) -> Vec<RadPerSec> {
        values.iter().map(|&w| RadPerSec(w)).collect()
    }

    #[test]
    fn test_linear_interpolation() {
        let freqs = rad(&[1.0, 2.0, 3.0]);
        let values = vec![1.0, 0.5, 0.0];

        let result = interpolate_linear(&freqs, &values, &rad(&[1.5, 2.75])).unwrap();

        assert!((result[0] - 0.75).abs() < 1e-12);
        assert!((result[1] - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_flat_extrapolation() {
        let freqs = rad(&[0.5, 1.0]);
        let values = vec![10.0, 20.0];

        let result = interpolate_linear(&freqs, &values, &rad(&[0.0, 0.25, 4.0])).unwrap();
        assert_eq!(result, vec![10.0, 10.0, 20.0]);
    }

    #[test]
    fn test_nonuniform_input() {
        let freqs = rad(&[0.1, 0.2, 1.0, 3.0]);
        let values = vec![0.0, 1.0, 5.0, 1.0];

        let result = interpolate_linear(&freqs, &values, &rad(&[0.6, 2.0])).unwrap();
        assert!((result[0] - 3.0).abs() < 1e-12);
        assert!((result[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_rejected() {
        let result = interpolate_linear(&rad(&[1.0]), &[1.0], &rad(&[1.0]));
        assert!(matches!(result, Err(DspError::InvalidFrequencyRange(_))));
    }

    #[test]
    fn test_zero_injection() {
        let (f, v) = inject_zero_frequency(&rad(&[0.2, 0.4]), &[7.0, 8.0]);
        assert_eq!(f, rad(&[0.0, 0.2, 0.4]));
        assert_eq!(v, vec![7.0, 7.0, 8.0]);

        // Already starts at zero: unchanged
        let (f, v) = inject_zero_frequency(&rad(&[0.0, 0.4]), &[1.0, 8.0]);
        assert_eq!(f.len(), 2);
        assert_eq!(v, vec![1.0, 8.0]);
    }

    #[test]
    fn test_uniform_grid_endpoints() {
        let grid = uniform_frequency_grid(RadPerSec(0.0), RadPerSec(3.0), 201);
        assert_eq!(grid.len(), 201);
        assert_eq!(grid[0], RadPerSec(0.0));
        assert_eq!(grid[200], RadPerSec(3.0));
        assert!((grid[1].0 - 0.015).abs() < 1e-15);
    }
}
