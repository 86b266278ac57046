//! State-space realization of radiation kernels.
//!
//! The sampled kernel is treated as the Markov parameter sequence
//! `Y_k = K(k·Δt)` of a discrete system. The Eigensystem Realization
//! Algorithm (Juang & Pappa, 1985) factors the Hankel matrix
//!
//! ```text
//!      ┌ Y₀   Y₁   … ┐          ┌ Y₁   Y₂   … ┐
//! H₀ = │ Y₁   Y₂   … │     H₁ = │ Y₂   Y₃   … │
//!      └ ⋮    ⋮      ┘          └ ⋮    ⋮      ┘
//! ```
//!
//! by SVD, `H₀ = U Σ Vᵀ`, and for each truncation order r gives the discrete
//! state matrix `A_d = Σᵣ^{-1/2} Uᵣᵀ H₁ Vᵣ Σᵣ^{-1/2}`. Its eigenvalues λ map to
//! continuous poles `s = ln(λ)/Δt`. The continuous model is assembled in real
//! modal form (1×1 blocks for real poles, 2×2 rotation blocks for complex
//! pairs) and its output weights are fitted to the whole kernel by linear
//! least squares.
//!
//! Orders are tried from 1 upward and the first one whose relative
//! mean-square error meets the tolerance is kept. An unstable selection is
//! stepped down one order once; if that does not help, the model is returned
//! flagged `stable = false`.

use crate::error::{DspError, DspResult};
use crate::response::{relative_mse, sampled_response};
use lib_hydro::kernel::RadiationKernel;
use lib_hydro::state_space::StateSpaceModel;
use lib_hydro::units::Seconds;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Singular values below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-12;

/// Discrete eigenvalues smaller than this are clamped before taking the log.
const MIN_EIGENVALUE_MAGNITUDE: f64 = 1e-12;

/// Configuration for state-space realization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealizationConfig {
    /// Largest Hankel truncation order to try.
    #[serde(default = "default_max_order")]
    pub max_order: usize,

    /// Target relative mean-square error.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Cap on the Hankel matrix rows and columns.
    ///
    /// Long kernels only use their first `2 * max_hankel_dim` samples for
    /// pole identification; the least-squares fit always uses all samples.
    #[serde(default = "default_max_hankel_dim")]
    pub max_hankel_dim: usize,
}

fn default_max_order() -> usize {
    10
}

fn default_tolerance() -> f64 {
    1e-2
}

fn default_max_hankel_dim() -> usize {
    200
}

impl Default for RealizationConfig {
    fn default() -> Self {
        Self {
            max_order: default_max_order(),
            tolerance: default_tolerance(),
            max_hankel_dim: default_max_hankel_dim(),
        }
    }
}

impl RealizationConfig {
    /// Check the scalar parameters.
    pub fn validate(&self) -> DspResult<()> {
        if self.max_order < 1 {
            return Err(DspError::InvalidParameter(
                "max_order must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(DspError::InvalidParameter(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_hankel_dim < self.max_order {
            return Err(DspError::InvalidParameter(format!(
                "max_hankel_dim ({}) must be at least max_order ({})",
                self.max_hankel_dim, self.max_order
            )));
        }
        Ok(())
    }
}

/// Realize a kernel with up to `max_order` states and the given tolerance.
pub fn realize(
    kernel: &RadiationKernel,
    max_order: usize,
    tolerance: f64,
) -> DspResult<StateSpaceModel> {
    let config = RealizationConfig {
        max_order,
        tolerance,
        ..Default::default()
    };
    realize_with(kernel, &config)
}

/// Realize a kernel given as explicit (time, value) arrays.
pub fn realize_samples(
    times: &[f64],
    values: &[f64],
    max_order: usize,
    tolerance: f64,
) -> DspResult<StateSpaceModel> {
    if times.len() != values.len() {
        return Err(DspError::LengthMismatch {
            expected: times.len(),
            actual: values.len(),
        });
    }
    let kernel = RadiationKernel::try_from_samples(times, values)
        .map_err(|e| DspError::InvalidParameter(e.to_string()))?;
    realize(&kernel, max_order, tolerance)
}

/// Realize a kernel.
pub fn realize_with(
    kernel: &RadiationKernel,
    config: &RealizationConfig,
) -> DspResult<StateSpaceModel> {
    config.validate()?;
    check_kernel(kernel)?;

    let n = kernel.len();
    let rows = (n / 2).min(config.max_hankel_dim);
    let cols = (n - rows).min(config.max_hankel_dim);
    if rows < config.max_order || cols < config.max_order {
        return Err(DspError::DegenerateKernel(format!(
            "{} samples cannot fill a Hankel matrix of order {} (need at least {})",
            n,
            config.max_order,
            2 * config.max_order
        )));
    }

    let values = &kernel.values;
    let h0 = DMatrix::from_fn(rows, cols, |i, j| values[i + j]);
    let h1 = DMatrix::from_fn(rows, cols, |i, j| values[i + j + 1]);

    let basis = HankelBasis::new(h0)?;
    let sigma_max = basis.singular_values.first().copied().unwrap_or(0.0);
    let rank = basis
        .singular_values
        .iter()
        .take_while(|&&s| s > RANK_TOLERANCE * sigma_max)
        .count();
    if rank == 0 {
        return Err(DspError::DegenerateKernel(
            "Hankel matrix of the kernel is zero".to_string(),
        ));
    }

    let max_r = config.max_order.min(rank);
    tracing::debug!(n, rows, cols, rank, max_r, "Realizing radiation kernel");

    let mut candidates: Vec<Candidate> = Vec::with_capacity(max_r);
    let mut selected = None;
    for r in 1..=max_r {
        let Some(candidate) = basis.candidate(r, &h1, kernel)? else {
            continue;
        };
        tracing::trace!(
            r,
            order = candidate.order(),
            fit_error = candidate.fit_error,
            stable = candidate.stable,
            "Realization candidate"
        );
        let meets = candidate.fit_error <= config.tolerance;
        candidates.push(candidate);
        if meets {
            selected = Some(candidates.len() - 1);
            break;
        }
    }

    if candidates.is_empty() {
        return Err(DspError::NumericalInstability(
            "no realization candidate could be formed".to_string(),
        ));
    }
    let mut index = selected.unwrap_or(candidates.len() - 1);

    if !candidates[index].stable && index > 0 && candidates[index - 1].stable {
        tracing::debug!(
            from = candidates[index].truncation,
            to = candidates[index - 1].truncation,
            "Stepping down one order for stability"
        );
        index -= 1;
    }

    let chosen = candidates.swap_remove(index);
    let model = chosen.into_model(config.tolerance, basis.singular_values);

    if !model.converged {
        tracing::warn!(
            order = model.order,
            fit_error = model.fit_error,
            tolerance = config.tolerance,
            "State-space fit below tolerance"
        );
    }
    if !model.stable {
        tracing::warn!(
            order = model.order,
            max_real_part = model.max_pole_real_part(),
            "State-space model is unstable"
        );
    }

    Ok(model)
}

fn check_kernel(kernel: &RadiationKernel) -> DspResult<()> {
    if kernel.len() < 2 {
        return Err(DspError::DegenerateKernel(format!(
            "need at least 2 samples, got {}",
            kernel.len()
        )));
    }
    if !(kernel.dt.0 > 0.0) || !kernel.dt.0.is_finite() {
        return Err(DspError::DegenerateKernel(format!(
            "time step must be positive, got {}",
            kernel.dt.0
        )));
    }
    if kernel.values.iter().any(|v| !v.is_finite()) {
        return Err(DspError::DegenerateKernel(
            "kernel contains non-finite values".to_string(),
        ));
    }
    if kernel.is_zero() {
        return Err(DspError::DegenerateKernel("kernel is identically zero".to_string()));
    }
    Ok(())
}

/// SVD of H₀ with singular values in descending order.
struct HankelBasis {
    u: DMatrix<f64>,
    v: DMatrix<f64>,
    singular_values: Vec<f64>,
}

impl HankelBasis {
    fn new(h0: DMatrix<f64>) -> DspResult<Self> {
        let (rows, cols) = h0.shape();
        let svd = h0
            .try_svd(true, true, f64::EPSILON, 0)
            .ok_or_else(|| DspError::NumericalInstability("Hankel SVD did not converge".to_string()))?;
        let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
            return Err(DspError::NumericalInstability(
                "Hankel SVD returned no singular vectors".to_string(),
            ));
        };

        let k = svd.singular_values.len();
        let mut order: Vec<usize> = (0..k).collect();
        order.sort_by(|&a, &b| svd.singular_values[b].total_cmp(&svd.singular_values[a]));

        Ok(Self {
            u: DMatrix::from_fn(rows, k, |i, j| u[(i, order[j])]),
            v: DMatrix::from_fn(cols, k, |i, j| v_t[(order[j], i)]),
            singular_values: order.iter().map(|&i| svd.singular_values[i]).collect(),
        })
    }

    /// Build the order-`r` candidate, or `None` if every identified pole was discarded.
    fn candidate(
        &self,
        r: usize,
        h1: &DMatrix<f64>,
        kernel: &RadiationKernel,
    ) -> DspResult<Option<Candidate>> {
        let scale = DMatrix::from_diagonal(&DVector::from_iterator(
            r,
            self.singular_values[..r].iter().map(|s| 1.0 / s.sqrt()),
        ));
        let u_r = self.u.columns(0, r).into_owned();
        let v_r = self.v.columns(0, r).into_owned();
        let a_d = &scale * u_r.transpose() * h1 * v_r * &scale;

        let poles = continuous_poles(&a_d, kernel.dt);
        if poles.is_empty() {
            return Ok(None);
        }

        let mut candidate = fit_modal_model(&poles, kernel)?;
        candidate.truncation = r;
        Ok(Some(candidate))
    }
}

/// Continuous-time pole of the modal form.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ModalPole {
    /// Real pole `σ`.
    Real(f64),
    /// Complex pair `σ ± iω`, ω > 0.
    Pair(f64, f64),
}

impl ModalPole {
    fn states(&self) -> usize {
        match self {
            Self::Real(_) => 1,
            Self::Pair(..) => 2,
        }
    }
}

/// Map eigenvalues of the discrete state matrix to continuous poles.
///
/// Negative real eigenvalues correspond to oscillation at exactly the
/// Nyquist frequency and have no real continuous counterpart; they are dropped.
fn continuous_poles(a_d: &DMatrix<f64>, dt: Seconds) -> Vec<ModalPole> {
    let mut poles = Vec::new();

    for lambda in a_d.complex_eigenvalues().iter() {
        let magnitude = lambda.norm().max(MIN_EIGENVALUE_MAGNITUDE);
        let sigma = magnitude.ln() / dt.0;
        let is_real = lambda.im.abs() <= 1e-10 * magnitude;

        if is_real {
            if lambda.re > 0.0 || lambda.norm() < MIN_EIGENVALUE_MAGNITUDE {
                poles.push(ModalPole::Real(sigma));
            } else {
                tracing::trace!(re = lambda.re, "Dropping Nyquist-aliased eigenvalue");
            }
        } else if lambda.im > 0.0 {
            let omega = lambda.im.atan2(lambda.re) / dt.0;
            poles.push(ModalPole::Pair(sigma, omega));
        }
    }

    poles
}

/// A realized model before metadata is attached.
struct Candidate {
    truncation: usize,
    a: DMatrix<f64>,
    b: DMatrix<f64>,
    c: DMatrix<f64>,
    fit_error: f64,
    stable: bool,
}

impl Candidate {
    fn order(&self) -> usize {
        self.a.nrows()
    }

    fn into_model(self, tolerance: f64, hankel_singular_values: Vec<f64>) -> StateSpaceModel {
        StateSpaceModel {
            order: self.a.nrows(),
            A: self.a,
            B: self.b,
            C: self.c,
            D: 0.0,
            fit_error: self.fit_error,
            tolerance,
            converged: self.fit_error <= tolerance,
            stable: self.stable,
            hankel_singular_values,
        }
    }
}

/// Assemble the modal model for the given poles and fit its output weights.
fn fit_modal_model(poles: &[ModalPole], kernel: &RadiationKernel) -> DspResult<Candidate> {
    let dim: usize = poles.iter().map(ModalPole::states).sum();
    let n = kernel.len();
    let dt = kernel.dt.0;

    let mut a = DMatrix::zeros(dim, dim);
    let mut b = DMatrix::zeros(dim, 1);
    let mut basis = DMatrix::zeros(n, dim);

    let mut col = 0;
    for pole in poles {
        match *pole {
            ModalPole::Real(sigma) => {
                a[(col, col)] = sigma;
                b[(col, 0)] = 1.0;
                for k in 0..n {
                    basis[(k, col)] = (sigma * k as f64 * dt).exp();
                }
            }
            ModalPole::Pair(sigma, omega) => {
                // exp(A t)·B = e^{σt} [sin ωt, cos ωt]ᵀ
                a[(col, col)] = sigma;
                a[(col, col + 1)] = omega;
                a[(col + 1, col)] = -omega;
                a[(col + 1, col + 1)] = sigma;
                b[(col + 1, 0)] = 1.0;
                for k in 0..n {
                    let t = k as f64 * dt;
                    let envelope = (sigma * t).exp();
                    basis[(k, col)] = envelope * (omega * t).sin();
                    basis[(k, col + 1)] = envelope * (omega * t).cos();
                }
            }
        }
        col += pole.states();
    }

    let target = DVector::from_column_slice(&kernel.values);
    let svd = basis
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or_else(|| DspError::NumericalInstability("modal basis SVD did not converge".to_string()))?;
    let threshold = svd.singular_values.max() * RANK_TOLERANCE;
    let weights = svd
        .solve(&target, threshold)
        .map_err(|e| DspError::NumericalInstability(format!("least-squares fit failed: {}", e)))?;
    let c = DMatrix::from_row_slice(1, dim, weights.as_slice());

    let response = sampled_response(&a, &b, &c, kernel.dt, n);
    let fit_error = relative_mse(&kernel.values, &response);
    let stable = max_real_part(&a) <= 0.0;

    Ok(Candidate {
        truncation: 0,
        a,
        b,
        c,
        fit_error,
        stable,
    })
}

/// Largest real part among the eigenvalues of `a`.
fn max_real_part(a: &DMatrix<f64>) -> f64 {
    a.complex_eigenvalues()
        .iter()
        .map(|lambda| lambda.re)
        .fold(f64::NEG_INFINITY, f64::max)
}
