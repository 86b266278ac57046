//! Error types for radiation post-processing.

use thiserror::Error;

/// Errors that can occur while computing kernels or realizing models.
#[derive(Debug, Error)]
pub enum DspError {
    /// Caller-supplied scalar configuration is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Frequency samples are insufficient or malformed.
    #[error("Invalid frequency range: {0}")]
    InvalidFrequencyRange(String),

    /// Kernel cannot be used for realization.
    #[error("Degenerate kernel: {0}")]
    DegenerateKernel(String),

    /// Input length mismatch.
    #[error("Input length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Numerical breakdown in a decomposition or solve.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error reading a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for radiation operations.
pub type DspResult<T> = Result<T, DspError>;
