//! Time and frequency responses of state-space radiation models.
//!
//! These close the loop back to the inputs: the impulse response is compared
//! against the kernel when fitting, and the frequency response gives the
//! damping and added mass the model implies, for comparison against the BEM
//! coefficients.

use crate::error::{DspError, DspResult};
use lib_hydro::state_space::StateSpaceModel;
use lib_hydro::units::{RadPerSec, Seconds};
use nalgebra::DMatrix;
use num_complex::Complex64;

/// Impulse response `C·exp(A t_k)·B` on `t_k = k·dt`, `k < num_samples`.
///
/// The transition matrix `exp(A dt)` is formed once and applied repeatedly.
#[allow(non_snake_case)]
pub fn sampled_response(
    A: &DMatrix<f64>,
    B: &DMatrix<f64>,
    C: &DMatrix<f64>,
    dt: Seconds,
    num_samples: usize,
) -> Vec<f64> {
    if A.nrows() == 0 {
        return vec![0.0; num_samples];
    }

    let transition = (A * dt.0).exp();
    let mut state = B.clone();
    let mut response = Vec::with_capacity(num_samples);

    for _ in 0..num_samples {
        response.push((C * &state)[(0, 0)]);
        state = &transition * state;
    }

    response
}

/// Impulse response of a model on a uniform grid starting at t = 0.
pub fn impulse_response(model: &StateSpaceModel, dt: Seconds, num_samples: usize) -> Vec<f64> {
    sampled_response(&model.A, &model.B, &model.C, dt, num_samples)
}

/// Relative mean-square error `Σ(K − Ĉ)² / ΣK²`.
///
/// Returns `f64::INFINITY` if the reference has no energy.
pub fn relative_mse(reference: &[f64], approximation: &[f64]) -> f64 {
    let energy: f64 = reference.iter().map(|v| v * v).sum();
    if energy == 0.0 {
        return f64::INFINITY;
    }
    let residual: f64 = reference
        .iter()
        .zip(approximation)
        .map(|(r, a)| (r - a) * (r - a))
        .sum();
    residual / energy
}

/// Radiation coefficients implied by a state-space model at one frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoefficientResponse {
    /// Angular frequency.
    pub frequency: RadPerSec,

    /// Radiation damping B(ω).
    pub damping: f64,

    /// Added mass relative to its infinite-frequency limit, A(ω) − A∞.
    pub added_mass_offset: f64,
}

/// Evaluate `K̂(ω) = C (iωI − A)⁻¹ B` at each frequency.
///
/// With `K̂(ω) = ∫ K(t) e^{-iωt} dt`, the damping is `Re K̂` and
/// `A(ω) − A∞ = Im K̂ / ω`. At ω = 0 the added-mass offset is the limit
/// `−C A⁻² B`.
pub fn frequency_response(
    model: &StateSpaceModel,
    frequencies: &[RadPerSec],
) -> DspResult<Vec<CoefficientResponse>> {
    let n = model.order;
    if frequencies.iter().any(|w| !w.0.is_finite() || w.0 < 0.0) {
        return Err(DspError::InvalidFrequencyRange(
            "response frequencies must be finite and non-negative".to_string(),
        ));
    }
    if n == 0 {
        return Ok(frequencies
            .iter()
            .map(|&frequency| CoefficientResponse {
                frequency,
                damping: 0.0,
                added_mass_offset: 0.0,
            })
            .collect());
    }

    let a = model.A.map(|v| Complex64::new(v, 0.0));
    let b = model.B.map(|v| Complex64::new(v, 0.0));
    let c = model.C.map(|v| Complex64::new(v, 0.0));

    frequencies
        .iter()
        .map(|&frequency| {
            let w = frequency.0;
            let resolvent = DMatrix::from_diagonal_element(n, n, Complex64::new(0.0, w)) - &a;
            let x = resolvent.lu().solve(&b).ok_or_else(|| {
                DspError::NumericalInstability(format!("model has a pole at {} rad/s", w))
            })?;
            let k = (&c * x)[(0, 0)];

            let added_mass_offset = if w > 0.0 {
                k.im / w
            } else {
                static_added_mass_offset(model)?
            };

            Ok(CoefficientResponse {
                frequency,
                damping: k.re,
                added_mass_offset,
            })
        })
        .collect()
}

/// `−C A⁻² B`, the ω → 0 limit of `Im K̂(ω) / ω`.
fn static_added_mass_offset(model: &StateSpaceModel) -> DspResult<f64> {
    let lu = model.A.clone().lu();
    let singular = || DspError::NumericalInstability("state matrix is singular".to_string());
    let x = lu.solve(&model.B).ok_or_else(singular)?;
    let y = lu.solve(&x).ok_or_else(singular)?;
    Ok(-(&model.C * y)[(0, 0)])
}
