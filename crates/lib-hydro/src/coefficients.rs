//! Frequency-domain radiation coefficients.
//!
//! A BEM solver reports, for every pair of degrees of freedom, the added mass
//! A(ω) and radiation damping B(ω) at a set of wave frequencies. This module
//! stores one such pair of curves per DOF pair.

use crate::units::RadPerSec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a coefficient-matrix entry: force direction `row`, motion direction `col`.
///
/// For multi-body problems the indices run over the coupled DOF space of the
/// owning [`BodyPair`](crate::body::BodyPair) (6 per body for rigid bodies).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DofPair {
    pub row: usize,
    pub col: usize,
}

impl DofPair {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

}

impl fmt::Display for DofPair {
    /// 1-based, the way coefficient tables are usually labelled.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row + 1, self.col + 1)
    }
}

/// Added mass and radiation damping of one DOF pair, sampled in frequency.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyCoefficients {
    /// Angular wave frequencies, strictly increasing.
    pub frequencies: Vec<RadPerSec>,

    /// Added mass A(ω), one value per frequency.
    pub added_mass: Vec<f64>,

    /// Radiation damping B(ω), one value per frequency.
    pub damping: Vec<f64>,
}

impl FrequencyCoefficients {
    /// Create an empty coefficient set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parallel arrays as handed over by a coefficient loader.
    ///
    /// Only the array lengths are checked here; ordering and finiteness are
    /// checked by the numerical stages that depend on them.
    pub fn try_from_slices(
        frequencies: &[f64],
        added_mass: &[f64],
        damping: &[f64],
    ) -> Result<Self, &'static str> {
        if added_mass.len() != frequencies.len() {
            return Err("Added mass length doesn't match frequency count");
        }
        if damping.len() != frequencies.len() {
            return Err("Damping length doesn't match frequency count");
        }
        Ok(Self {
            frequencies: frequencies.iter().map(|&w| RadPerSec(w)).collect(),
            added_mass: added_mass.to_vec(),
            damping: damping.to_vec(),
        })
    }

    /// Append a frequency sample.
    pub fn add_point(&mut self, omega: RadPerSec, added_mass: f64, damping: f64) {
        self.frequencies.push(omega);
        self.added_mass.push(added_mass);
        self.damping.push(damping);
    }

    /// Number of frequency samples.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Check if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Strictly increasing frequencies.
    pub fn is_strictly_increasing(&self) -> bool {
        self.frequencies.windows(2).all(|w| w[1].0 > w[0].0)
    }
}
