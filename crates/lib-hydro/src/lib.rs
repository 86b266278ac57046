//! # lib-hydro
//!
//! Core data model for radiation post-processing of BEM hydrodynamic results.
//!
//! This crate provides the types shared by the numerical stages:
//! - Physical units with compile-time safety
//! - Frequency-domain added mass and radiation damping per DOF pair
//! - Time-domain radiation impulse response kernels
//! - State-space radiation models
//! - Per-body-pair records aggregating inputs and derived results

pub mod units;
pub mod coefficients;
pub mod kernel;
pub mod state_space;
pub mod body;

mod entries;

pub use units::*;
pub use coefficients::*;
pub use kernel::*;
pub use state_space::*;
pub use body::*;

/// Re-export num_complex for convenience
pub use num_complex::Complex64;
