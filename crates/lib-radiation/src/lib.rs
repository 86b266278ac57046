//! # lib-radiation
//!
//! Radiation post-processing engine for BEM hydrodynamic coefficients.
//!
//! This crate turns frequency-domain radiation data into the time-domain
//! forms a body-motion simulator consumes:
//!
//! - **IRF Engine**: radiation impulse response kernels from damping, with
//!   the infinite-frequency added mass estimated alongside
//! - **State-Space Realization**: Hankel-SVD fit of a low-order LTI model
//!   approximating the radiation convolution
//! - **Frequency Response**: coefficients implied by a realized model
//! - **Pipeline**: parallel processing of every DOF pair of a record or system

pub mod error;
pub mod interpolation;
pub mod quadrature;
pub mod window;
pub mod irf;
pub mod realization;
pub mod response;
pub mod config;
pub mod pipeline;

pub use error::{DspError, DspResult};
pub use irf::{compute_irf, compute_irf_with, IrfConfig};
pub use realization::{realize, realize_samples, realize_with, RealizationConfig};
pub use response::{frequency_response, impulse_response, CoefficientResponse};
pub use config::PipelineConfig;
pub use pipeline::{process_record, process_system, PipelineReport};
