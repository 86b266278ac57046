//! Radiation impulse response functions from frequency-domain damping.
//!
//! The kernel follows from the radiation damping by the inverse cosine
//! transform (Ogilvie, 1964):
//!
//! ```text
//! K(t) = (2/π) ∫₀^∞ B(ω) cos(ωt) dω
//! ```
//!
//! evaluated by composite quadrature over a uniform resampling of the BEM
//! frequencies. The same relation links the added mass to its
//! infinite-frequency limit,
//!
//! ```text
//! A(ω) = A∞ − (1/ω) ∫₀^∞ K(t) sin(ωt) dt
//! ```
//!
//! which is used to estimate A∞ once the kernel is known.
//!
//! # Truncation error
//!
//! BEM data covers a finite band. Outside it the damping is held at the
//! boundary value, and the integral stops at the top of the grid. Both
//! errors grow with `t_end` relative to the resolution of the data: a kernel
//! requested over a long horizon from a coarse or narrow band will ring
//! rather than decay.

use crate::error::{DspError, DspResult};
use crate::interpolation::{inject_zero_frequency, interpolate_linear, uniform_frequency_grid};
use crate::quadrature::{integrate_uniform, uniform_weights, QuadratureRule};
use crate::window::{WindowConfig, WindowType};
use lib_hydro::coefficients::FrequencyCoefficients;
use lib_hydro::kernel::RadiationKernel;
use lib_hydro::units::{RadPerSec, Seconds};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Configuration for the frequency-to-time transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrfConfig {
    /// End of the kernel time window.
    #[serde(default = "default_t_end")]
    pub t_end: Seconds,

    /// Number of kernel samples on `[0, t_end]`.
    #[serde(default = "default_num_points")]
    pub num_time_points: usize,

    /// Number of uniformly spaced frequencies used by the transform.
    #[serde(default = "default_num_points")]
    pub num_freq_points: usize,

    /// Transform range. Defaults to `[0, ω_max]` of the data.
    #[serde(default)]
    pub freq_range: Option<(RadPerSec, RadPerSec)>,

    /// Quadrature rule for the cosine transform.
    #[serde(default)]
    pub quadrature: QuadratureRule,

    /// High-frequency taper applied to the resampled damping.
    #[serde(default)]
    pub window: WindowConfig,
}

fn default_t_end() -> Seconds {
    Seconds(100.0)
}

fn default_num_points() -> usize {
    1001
}

impl Default for IrfConfig {
    fn default() -> Self {
        Self {
            t_end: default_t_end(),
            num_time_points: default_num_points(),
            num_freq_points: default_num_points(),
            freq_range: None,
            quadrature: QuadratureRule::default(),
            window: WindowConfig::default(),
        }
    }
}

impl IrfConfig {
    /// Check the scalar parameters.
    pub fn validate(&self) -> DspResult<()> {
        if !(self.t_end.0 > 0.0) || !self.t_end.0.is_finite() {
            return Err(DspError::InvalidParameter(format!(
                "t_end must be positive and finite, got {}",
                self.t_end.0
            )));
        }
        if self.num_time_points < 2 {
            return Err(DspError::InvalidParameter(format!(
                "need at least 2 time points, got {}",
                self.num_time_points
            )));
        }
        if self.num_freq_points < 2 {
            return Err(DspError::InvalidParameter(format!(
                "need at least 2 frequency points, got {}",
                self.num_freq_points
            )));
        }
        if let Some(range) = self.freq_range {
            check_range(range)?;
        }
        if let WindowType::Kaiser { beta } = self.window.window_type {
            if !beta.is_finite() {
                return Err(DspError::InvalidParameter(format!(
                    "Kaiser beta must be finite, got {}",
                    beta
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.window.taper_fraction) {
            return Err(DspError::InvalidParameter(format!(
                "taper fraction must be in [0, 1], got {}",
                self.window.taper_fraction
            )));
        }
        Ok(())
    }
}

fn check_range((lo, hi): (RadPerSec, RadPerSec)) -> DspResult<()> {
    if !(lo.0 >= 0.0) || !hi.0.is_finite() || !(hi.0 > lo.0) {
        return Err(DspError::InvalidFrequencyRange(format!(
            "transform range must satisfy 0 <= lo < hi, got [{}, {}]",
            lo.0, hi.0
        )));
    }
    Ok(())
}

/// Check the invariants of a coefficient set.
pub fn validate_coefficients(coeffs: &FrequencyCoefficients) -> DspResult<()> {
    let n = coeffs.frequencies.len();
    if coeffs.added_mass.len() != n {
        return Err(DspError::LengthMismatch {
            expected: n,
            actual: coeffs.added_mass.len(),
        });
    }
    if coeffs.damping.len() != n {
        return Err(DspError::LengthMismatch {
            expected: n,
            actual: coeffs.damping.len(),
        });
    }
    if n < 2 {
        return Err(DspError::InvalidFrequencyRange(format!(
            "need at least 2 distinct frequencies, got {}",
            n
        )));
    }
    if coeffs
        .frequencies
        .iter()
        .any(|w| !w.0.is_finite() || w.0 < 0.0)
    {
        return Err(DspError::InvalidFrequencyRange(
            "frequencies must be finite and non-negative".to_string(),
        ));
    }
    if !coeffs.is_strictly_increasing() {
        return Err(DspError::InvalidFrequencyRange(
            "frequencies must be strictly increasing".to_string(),
        ));
    }
    if coeffs
        .added_mass
        .iter()
        .chain(&coeffs.damping)
        .any(|v| !v.is_finite())
    {
        return Err(DspError::InvalidFrequencyRange(
            "coefficients contain non-finite values".to_string(),
        ));
    }
    Ok(())
}

/// Compute the radiation kernel on `n_t` samples over `[0, t_end]`, using
/// `n_w` transform frequencies and default settings otherwise.
pub fn compute_irf(
    coeffs: &FrequencyCoefficients,
    t_end: Seconds,
    n_t: usize,
    n_w: usize,
) -> DspResult<RadiationKernel> {
    let config = IrfConfig {
        t_end,
        num_time_points: n_t,
        num_freq_points: n_w,
        ..Default::default()
    };
    compute_irf_with(coeffs, &config)
}

/// Compute the radiation kernel of one DOF pair.
pub fn compute_irf_with(
    coeffs: &FrequencyCoefficients,
    config: &IrfConfig,
) -> DspResult<RadiationKernel> {
    config.validate()?;
    validate_coefficients(coeffs)?;

    let (freqs, damping) = inject_zero_frequency(&coeffs.frequencies, &coeffs.damping);

    let (w_lo, w_hi) = match config.freq_range {
        Some(range) => range,
        // Zero injection guarantees the data starts at 0
        None => (RadPerSec::ZERO, freqs[freqs.len() - 1]),
    };
    check_range((w_lo, w_hi))?;

    let n_w = config.num_freq_points;
    let grid = uniform_frequency_grid(w_lo, w_hi, n_w);
    let mut b = interpolate_linear(&freqs, &damping, &grid)?;
    config.window.apply(&mut b);

    let dw = (w_hi.0 - w_lo.0) / (n_w - 1) as f64;
    let weights = uniform_weights(config.quadrature, n_w, dw);

    // The quadrature sum is periodic in t with period 2π/Δω and mirrors
    // about π/Δω; samples past that point are aliases.
    let alias_limit = PI / dw;
    if config.t_end.0 > alias_limit {
        tracing::warn!(
            t_end = config.t_end.0,
            alias_limit,
            n_w,
            "Kernel window exceeds pi/dw of the transform grid; increase num_freq_points"
        );
    }

    let weighted: Vec<(f64, f64)> = grid
        .iter()
        .zip(weights.iter().zip(&b))
        .map(|(w, (q, b))| (w.0, q * b))
        .collect();

    let n_t = config.num_time_points;
    let dt = config.t_end.0 / (n_t - 1) as f64;
    let values: Vec<f64> = (0..n_t)
        .map(|k| {
            let t = k as f64 * dt;
            let sum: f64 = weighted.iter().map(|&(w, qb)| qb * (w * t).cos()).sum();
            2.0 / PI * sum
        })
        .collect();

    let mut kernel = RadiationKernel::new(values, Seconds(dt));
    kernel.num_freq_points = n_w;
    kernel.added_mass_inf = added_mass_infinity(coeffs, &kernel, config.quadrature);

    tracing::debug!(
        n_t,
        n_w,
        dt,
        w_max = w_hi.0,
        k0 = kernel.values[0],
        k_max = kernel.max_abs(),
        a_inf = kernel.added_mass_inf,
        "Computed radiation kernel"
    );

    Ok(kernel)
}

/// Per-frequency estimates of the infinite-frequency added mass.
///
/// One estimate `A(ω) + (1/ω) ∫ K(t) sin(ωt) dt` per input sample with
/// ω > 0, the time integral running over the kernel window.
pub fn added_mass_inf_estimates(
    coeffs: &FrequencyCoefficients,
    kernel: &RadiationKernel,
    rule: QuadratureRule,
) -> Vec<f64> {
    let dt = kernel.dt.0;
    let mut integrand = vec![0.0; kernel.len()];

    coeffs
        .frequencies
        .iter()
        .zip(&coeffs.added_mass)
        .filter(|(w, _)| w.0 > 0.0)
        .map(|(w, &a)| {
            for (k, (slot, &value)) in integrand.iter_mut().zip(&kernel.values).enumerate() {
                *slot = value * (w.0 * k as f64 * dt).sin();
            }
            a + integrate_uniform(rule, &integrand, dt) / w.0
        })
        .collect()
}

/// Mean of [`added_mass_inf_estimates`], or 0 if no sample has ω > 0.
pub fn added_mass_infinity(
    coeffs: &FrequencyCoefficients,
    kernel: &RadiationKernel,
    rule: QuadratureRule,
) -> f64 {
    let estimates = added_mass_inf_estimates(coeffs, kernel, rule);
    if estimates.is_empty() {
        return 0.0;
    }
    estimates.iter().sum::<f64>() / estimates.len() as f64
}
