//! Spectral tapers for the frequency-to-time transform.
//!
//! BEM damping is only available up to the solver's highest frequency.
//! Cutting it off abruptly rings in the kernel (Gibbs phenomenon) with a
//! period of 2π/ω_max. Tapering the last fraction of the band trades a
//! little high-frequency content for a cleaner kernel.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types for spectral tapering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WindowType {
    /// No windowing (rectangular window).
    Rectangular,

    /// Hann (raised cosine) window.
    Hann,

    /// Hamming window; does not reach zero at the edge.
    Hamming,

    /// Blackman window.
    Blackman,

    /// Kaiser-Bessel window with configurable beta parameter.
    Kaiser { beta: f64 },
}

impl Default for WindowType {
    fn default() -> Self {
        Self::Hann
    }
}

/// Zeroth-order modified Bessel function of the first kind, I_0(x).
///
/// Polynomial approximation (Abramowitz & Stegun 9.8.1/9.8.2).
fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();

    if ax < 3.75 {
        let t = (x / 3.75).powi(2);
        1.0 + t * (3.5156229
            + t * (3.0899424
                + t * (1.2067492
                    + t * (0.2659732
                        + t * (0.0360768 + t * 0.0045813)))))
    } else {
        let t = 3.75 / ax;
        (ax.exp() / ax.sqrt())
            * (0.39894228
                + t * (0.01328592
                    + t * (0.00225319
                        + t * (-0.00157565
                            + t * (0.00916281
                                + t * (-0.02057706
                                    + t * (0.02635537
                                        + t * (-0.01647633 + t * 0.00392377))))))))
    }
}

/// Generate symmetric window coefficients of the given length.
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    if length == 1 {
        return vec![1.0];
    }

    let n = length as f64;
    let position = |i: usize| i as f64 / (n - 1.0);

    match window_type {
        WindowType::Rectangular => vec![1.0; length],
        WindowType::Hann => (0..length)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * position(i)).cos()))
            .collect(),
        WindowType::Hamming => (0..length)
            .map(|i| 0.54 - 0.46 * (2.0 * PI * position(i)).cos())
            .collect(),
        WindowType::Blackman => (0..length)
            .map(|i| {
                let x = position(i);
                0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
            })
            .collect(),
        WindowType::Kaiser { beta } => {
            let denom = bessel_i0(beta);
            (0..length)
                .map(|i| {
                    let x = 2.0 * position(i) - 1.0;
                    bessel_i0(beta * (1.0 - x * x).max(0.0).sqrt()) / denom
                })
                .collect()
        }
    }
}

/// Taper the high-frequency end of a real spectrum in place.
///
/// The last `ceil(len * taper_fraction)` samples are multiplied by the
/// descending half of the chosen window; everything below is untouched.
pub fn apply_edge_taper(spectrum: &mut [f64], window_type: WindowType, taper_fraction: f64) {
    if spectrum.is_empty() || taper_fraction <= 0.0 {
        return;
    }

    let len = spectrum.len();
    let taper_len = ((len as f64 * taper_fraction.min(1.0)).ceil() as usize).clamp(1, len);

    // Descending half of a window twice the taper length
    let full_window = generate_window(window_type, taper_len * 2);
    let start = len - taper_len;

    for (value, &w) in spectrum[start..].iter_mut().zip(&full_window[taper_len..]) {
        *value *= w;
    }
}

/// Windowing applied to the resampled damping before the transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Type of window function to use.
    #[serde(default)]
    pub window_type: WindowType,

    /// Fraction of the band to taper at high frequencies (0.0 to 1.0).
    #[serde(default = "default_taper_fraction")]
    pub taper_fraction: f64,

    /// Whether to apply windowing at all.
    #[serde(default)]
    pub enabled: bool,
}

fn default_taper_fraction() -> f64 {
    0.1
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_type: WindowType::Hann,
            taper_fraction: default_taper_fraction(),
            enabled: false,
        }
    }
}

impl WindowConfig {
    /// Apply the configured taper, if enabled.
    pub fn apply(&self, spectrum: &mut [f64]) {
        if self.enabled {
            apply_edge_taper(spectrum, self.window_type, self.taper_fraction);
        }
    }
}
