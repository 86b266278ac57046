//! Time-domain radiation impulse response kernel.
//!
//! # Sample Semantics
//!
//! A kernel with `N` samples is defined on the uniform grid
//!
//! ```text
//! t[k] = k * dt,  for k = 0, 1, ..., N-1
//! ```
//!
//! so `values[0]` is K(0) and `values[N-1]` is K(t_end) with
//! `t_end = (N-1) * dt`. Unlike a general waveform a radiation kernel is
//! causal, so the grid always starts at zero.

use crate::units::Seconds;
use serde::{Deserialize, Serialize};

/// Radiation impulse response K(t) of one DOF pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiationKernel {
    /// Kernel values K(t_k).
    pub values: Vec<f64>,

    /// Time step between consecutive samples.
    pub dt: Seconds,

    /// Infinite-frequency added mass estimated alongside the kernel.
    pub added_mass_inf: f64,

    /// Number of frequency points the transform was evaluated on.
    pub num_freq_points: usize,
}

impl RadiationKernel {
    /// Create a kernel from uniformly spaced samples starting at t = 0.
    pub fn new(values: Vec<f64>, dt: Seconds) -> Self {
        Self {
            values,
            dt,
            added_mass_inf: 0.0,
            num_freq_points: 0,
        }
    }

    /// Build a kernel from explicit (time, value) arrays.
    ///
    /// The time array must start at zero and be uniformly spaced
    /// (relative spacing error below 1e-6).
    pub fn try_from_samples(times: &[f64], values: &[f64]) -> Result<Self, &'static str> {
        if times.len() != values.len() {
            return Err("Time and value arrays differ in length");
        }
        if times.len() < 2 {
            return Err("Kernel needs at least 2 samples");
        }
        if times[0] != 0.0 {
            return Err("Kernel time grid must start at t = 0");
        }

        let dt = times[1] - times[0];
        if !(dt > 0.0) || !dt.is_finite() {
            return Err("Kernel time grid must be increasing");
        }
        for (k, &t) in times.iter().enumerate() {
            if (t - k as f64 * dt).abs() > 1e-6 * dt.max(t.abs()) {
                return Err("Kernel time grid must be uniform");
            }
        }

        Ok(Self::new(values.to_vec(), Seconds(dt)))
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the kernel is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Time of the last sample.
    #[inline]
    pub fn t_end(&self) -> Seconds {
        Seconds(self.values.len().saturating_sub(1) as f64 * self.dt.0)
    }

    /// Time of sample `index`.
    #[inline]
    pub fn time_at(&self, index: usize) -> Seconds {
        Seconds(index as f64 * self.dt.0)
    }

    /// Sample times as raw seconds.
    pub fn times(&self) -> Vec<f64> {
        (0..self.values.len()).map(|k| self.time_at(k).0).collect()
    }

    /// Kernel is identically zero.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// Peak absolute value.
    pub fn max_abs(&self) -> f64 {
        self.values.iter().map(|v| v.abs()).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_grid() {
        let kernel = RadiationKernel::new(vec![1.0, 0.5, 0.25, 0.125, 0.0], Seconds(0.5));

        assert_eq!(kernel.len(), 5);
        assert!((kernel.t_end().0 - 2.0).abs() < 1e-12);

        let times = kernel.times();
        assert_eq!(times[0], 0.0);
        assert!((times[3] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_from_samples_accepts_uniform_grid() {
        let times: Vec<f64> = (0..11).map(|k| k as f64 * 0.1).collect();
        let values: Vec<f64> = times.iter().map(|t| (-t).exp()).collect();

        let kernel = RadiationKernel::try_from_samples(&times, &values).unwrap();
        assert!((kernel.dt.0 - 0.1).abs() < 1e-12);
        assert_eq!(kernel.values, values);
    }

    #[test]
    fn test_from_samples_rejects_bad_grids() {
        let values = [1.0, 2.0, 3.0];

        assert!(RadiationKernel::try_from_samples(&[0.1, 0.2, 0.3], &values).is_err());
        assert!(RadiationKernel::try_from_samples(&[0.0, 0.1, 0.5], &values).is_err());
        assert!(RadiationKernel::try_from_samples(&[0.0, 0.0, 0.0], &values).is_err());
        assert!(RadiationKernel::try_from_samples(&[0.0, 0.1], &values).is_err());
    }

    #[test]
    fn test_zero_detection() {
        let kernel = RadiationKernel::new(vec![0.0; 8], Seconds(1.0));
        assert!(kernel.is_zero());
        assert_eq!(kernel.max_abs(), 0.0);

        let kernel = RadiationKernel::new(vec![0.5, -2.0, 1.0], Seconds(1.0));
        assert!(!kernel.is_zero());
        assert_eq!(kernel.max_abs(), 2.0);
    }
}
