//! State-space approximation of the radiation convolution.
//!
//! The convolution ∫ K(t - τ) ẋ(τ) dτ is replaced by the linear system
//!
//! ```text
//! ż = A z + B ẋ
//! F = C z + D ẋ
//! ```
//!
//! whose impulse response C·exp(At)·B approximates K(t).

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Fitted state-space model of one DOF pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)] // A, B, C, D are standard control theory notation
pub struct StateSpaceModel {
    /// State matrix, `order × order`.
    pub A: DMatrix<f64>,

    /// Input matrix, `order × 1`.
    pub B: DMatrix<f64>,

    /// Output matrix, `1 × order`.
    pub C: DMatrix<f64>,

    /// Direct feedthrough.
    pub D: f64,

    /// State dimension.
    pub order: usize,

    /// Relative mean-square error of the impulse response against the kernel.
    pub fit_error: f64,

    /// Target fit error the model was realized for.
    pub tolerance: f64,

    /// `fit_error <= tolerance`.
    pub converged: bool,

    /// All eigenvalues of `A` have non-positive real part.
    ///
    /// Models with `stable == false` must not be time-stepped.
    pub stable: bool,

    /// Hankel singular values of the sampled kernel, descending.
    pub hankel_singular_values: Vec<f64>,
}

impl StateSpaceModel {
    /// Eigenvalues of `A`.
    pub fn poles(&self) -> Vec<Complex64> {
        if self.order == 0 {
            return Vec::new();
        }
        self.A
            .complex_eigenvalues()
            .iter()
            .map(|c| Complex64::new(c.re, c.im))
            .collect()
    }

    /// Largest real part among the poles, `-inf` for an empty model.
    pub fn max_pole_real_part(&self) -> f64 {
        self.poles()
            .iter()
            .map(|p| p.re)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Safe to hand to a time-stepping simulator without further review.
    pub fn is_usable(&self) -> bool {
        self.converged && self.stable
    }
}
