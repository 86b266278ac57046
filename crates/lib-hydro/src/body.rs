//! Per-body hydrodynamic records.
//!
//! A [`HydroRecord`] is the aggregation point for one ordered body pair: it
//! owns the input coefficients of every DOF pair and collects the kernels and
//! state-space models derived from them. Self terms use `BodyPair { row: i, col: i }`,
//! cross-body radiation coupling uses `row != col`. A [`HydroSystem`] holds the
//! bodies and the set of body pairs that carry coefficients.

use crate::coefficients::{DofPair, FrequencyCoefficients};
use crate::kernel::RadiationKernel;
use crate::state_space::StateSpaceModel;
use crate::units::RadPerSec;
use ndarray::{Array2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered pair of body indices (force on `row`, motion of `col`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyPair {
    pub row: usize,
    pub col: usize,
}

impl BodyPair {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Self-radiation terms of a single body.
    #[inline]
    pub const fn diagonal(body: usize) -> Self {
        Self::new(body, body)
    }

    /// Cross-body coupling terms.
    #[inline]
    pub fn is_coupling(&self) -> bool {
        self.row != self.col
    }
}

impl fmt::Display for BodyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body{}<-body{}", self.row, self.col)
    }
}

/// Static body data passed through from the hydrostatics loader.
///
/// Nothing in the radiation pipeline reads these values; they travel with the
/// record so the serialization layer finds them next to the derived data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyInfo {
    /// Body name as given by the solver.
    pub name: String,

    /// Rigid-body mass matrix.
    pub mass: Option<Array2<f64>>,

    /// Hydrostatic restoring stiffness matrix.
    pub stiffness: Option<Array2<f64>>,
}

impl BodyInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Coefficients and derived radiation data of one body pair, keyed by DOF pair.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HydroRecord {
    /// Body pair this record belongs to.
    pub bodies: BodyPair,

    /// Input coefficients, immutable once loaded.
    #[serde(with = "crate::entries")]
    coefficients: BTreeMap<DofPair, FrequencyCoefficients>,

    /// Radiation kernels, overwritten on recomputation.
    #[serde(with = "crate::entries")]
    pub kernels: BTreeMap<DofPair, RadiationKernel>,

    /// State-space models, overwritten on recomputation.
    #[serde(with = "crate::entries")]
    pub models: BTreeMap<DofPair, StateSpaceModel>,
}

impl HydroRecord {
    /// Create an empty record for a body pair.
    pub fn new(bodies: BodyPair) -> Self {
        Self {
            bodies,
            ..Default::default()
        }
    }

    /// Build a record from bulk solver arrays shaped `[dof, dof, n_freq]`.
    ///
    /// Every (row, col) slice becomes one [`FrequencyCoefficients`] entry.
    pub fn from_arrays(
        bodies: BodyPair,
        frequencies: &[f64],
        added_mass: ArrayView3<f64>,
        damping: ArrayView3<f64>,
    ) -> Result<Self, &'static str> {
        if added_mass.shape() != damping.shape() {
            return Err("Added mass and damping arrays differ in shape");
        }
        let (rows, cols, n_freq) = added_mass.dim();
        if n_freq != frequencies.len() {
            return Err("Coefficient arrays don't match frequency count");
        }

        let omegas: Vec<RadPerSec> = frequencies.iter().map(|&w| RadPerSec(w)).collect();
        let mut record = Self::new(bodies);

        for row in 0..rows {
            let a_row = added_mass.index_axis(Axis(0), row);
            let b_row = damping.index_axis(Axis(0), row);
            for col in 0..cols {
                let coeffs = FrequencyCoefficients {
                    frequencies: omegas.clone(),
                    added_mass: a_row.index_axis(Axis(0), col).to_vec(),
                    damping: b_row.index_axis(Axis(0), col).to_vec(),
                };
                record.coefficients.insert(DofPair::new(row, col), coeffs);
            }
        }

        Ok(record)
    }

    /// Add the coefficients of one DOF pair.
    ///
    /// Coefficients are write-once: loading a pair twice is rejected.
    pub fn try_insert_coefficients(
        &mut self,
        pair: DofPair,
        coeffs: FrequencyCoefficients,
    ) -> Result<(), &'static str> {
        if self.coefficients.contains_key(&pair) {
            return Err("Coefficients for this DOF pair are already loaded");
        }
        self.coefficients.insert(pair, coeffs);
        Ok(())
    }

    /// Input coefficients, by DOF pair.
    pub fn coefficients(&self) -> &BTreeMap<DofPair, FrequencyCoefficients> {
        &self.coefficients
    }

    /// Coefficients of a single DOF pair.
    pub fn get_coefficients(&self, pair: DofPair) -> Option<&FrequencyCoefficients> {
        self.coefficients.get(&pair)
    }

    /// DOF pairs with loaded coefficients, in order.
    pub fn dof_pairs(&self) -> Vec<DofPair> {
        self.coefficients.keys().copied().collect()
    }

    /// Store a kernel, replacing any previous one for this pair.
    pub fn set_kernel(&mut self, pair: DofPair, kernel: RadiationKernel) {
        self.kernels.insert(pair, kernel);
    }

    /// Store a model, replacing any previous one for this pair.
    pub fn set_model(&mut self, pair: DofPair, model: StateSpaceModel) {
        self.models.insert(pair, model);
    }

    /// Drop all derived data, keeping the input coefficients.
    pub fn clear_derived(&mut self) {
        self.kernels.clear();
        self.models.clear();
    }

    /// Number of stored models that are unstable.
    pub fn unstable_count(&self) -> usize {
        self.models.values().filter(|m| !m.stable).count()
    }
}

/// All bodies of a hydrodynamic problem and their radiation records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HydroSystem {
    /// Bodies, indexed by position.
    pub bodies: Vec<BodyInfo>,

    /// One record per body pair that carries coefficients.
    #[serde(with = "crate::entries")]
    pub records: BTreeMap<BodyPair, HydroRecord>,
}

impl HydroSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body and return its index.
    pub fn add_body(&mut self, body: BodyInfo) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Insert a record, returning the one it replaces.
    ///
    /// Both bodies of the record's pair must already be registered.
    pub fn try_insert_record(
        &mut self,
        record: HydroRecord,
    ) -> Result<Option<HydroRecord>, &'static str> {
        let pair = record.bodies;
        if pair.row >= self.bodies.len() || pair.col >= self.bodies.len() {
            return Err("Record refers to an unknown body");
        }
        Ok(self.records.insert(pair, record))
    }

    /// Record of a body pair.
    pub fn record(&self, pair: BodyPair) -> Option<&HydroRecord> {
        self.records.get(&pair)
    }

    /// Mutable record of a body pair.
    pub fn record_mut(&mut self, pair: BodyPair) -> Option<&mut HydroRecord> {
        self.records.get_mut(&pair)
    }

    /// Body pairs carrying cross-body coupling terms.
    pub fn coupling_pairs(&self) -> Vec<BodyPair> {
        self.records
            .keys()
            .filter(|p| p.is_coupling())
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn sample_arrays() -> (Vec<f64>, Array3<f64>, Array3<f64>) {
        let freqs = vec![0.5, 1.0, 1.5];
        let added_mass = Array3::from_shape_fn((2, 2, 3), |(i, j, k)| {
            100.0 * (i + 1) as f64 + 10.0 * (j + 1) as f64 + k as f64
        });
        let damping = added_mass.mapv(|v| v * 0.5);
        (freqs, added_mass, damping)
    }

    #[test]
    fn test_from_arrays_splits_pairs() {
        let (freqs, a, b) = sample_arrays();
        let record =
            HydroRecord::from_arrays(BodyPair::diagonal(0), &freqs, a.view(), b.view()).unwrap();

        assert_eq!(record.dof_pairs().len(), 4);

        let c = record.get_coefficients(DofPair::new(1, 0)).unwrap();
        assert_eq!(c.added_mass, vec![210.0, 211.0, 212.0]);
        assert_eq!(c.damping, vec![105.0, 105.5, 106.0]);
        assert_eq!(c.frequencies[2], RadPerSec(1.5));
    }

    #[test]
    fn test_from_arrays_shape_mismatch() {
        let (_, a, b) = sample_arrays();
        let result = HydroRecord::from_arrays(BodyPair::diagonal(0), &[0.5, 1.0], a.view(), b.view());
        assert!(result.is_err());
    }

    #[test]
    fn test_coefficients_are_write_once() {
        let mut record = HydroRecord::new(BodyPair::diagonal(0));
        let pair = DofPair::new(2, 2);

        assert!(record
            .try_insert_coefficients(pair, FrequencyCoefficients::new())
            .is_ok());
        assert!(record
            .try_insert_coefficients(pair, FrequencyCoefficients::new())
            .is_err());
    }

    #[test]
    fn test_derived_data_overwritten() {
        use crate::units::Seconds;

        let mut record = HydroRecord::new(BodyPair::diagonal(0));
        let pair = DofPair::new(0, 0);

        record.set_kernel(pair, RadiationKernel::new(vec![1.0, 0.0], Seconds(1.0)));
        record.set_kernel(pair, RadiationKernel::new(vec![2.0, 0.0], Seconds(0.5)));

        assert_eq!(record.kernels.len(), 1);
        assert_eq!(record.kernels[&pair].values[0], 2.0);

        record.clear_derived();
        assert!(record.kernels.is_empty());
    }

    #[test]
    fn test_unstable_count() {
        use nalgebra::DMatrix;

        let model = |sigma: f64| StateSpaceModel {
            A: DMatrix::from_element(1, 1, sigma),
            B: DMatrix::from_element(1, 1, 1.0),
            C: DMatrix::from_element(1, 1, 1.0),
            D: 0.0,
            order: 1,
            fit_error: 0.0,
            tolerance: 1e-2,
            converged: true,
            stable: sigma <= 0.0,
            hankel_singular_values: Vec::new(),
        };

        let mut record = HydroRecord::new(BodyPair::diagonal(0));
        record.set_model(DofPair::new(0, 0), model(-0.5));
        record.set_model(DofPair::new(1, 1), model(0.2));
        record.set_model(DofPair::new(2, 2), model(0.1));
        assert_eq!(record.unstable_count(), 2);

        record.set_model(DofPair::new(1, 1), model(-0.2));
        assert_eq!(record.unstable_count(), 1);
    }

    #[test]
    fn test_system_coupling_pairs() {
        let mut system = HydroSystem::new();
        let float = system.add_body(BodyInfo::new("float"));
        let spar = system.add_body(BodyInfo::new("spar"));

        for pair in [
            BodyPair::diagonal(float),
            BodyPair::diagonal(spar),
            BodyPair::new(float, spar),
            BodyPair::new(spar, float),
        ] {
            system.try_insert_record(HydroRecord::new(pair)).unwrap();
        }

        assert_eq!(
            system.coupling_pairs(),
            vec![BodyPair::new(0, 1), BodyPair::new(1, 0)]
        );
        assert!(system
            .try_insert_record(HydroRecord::new(BodyPair::new(0, 5)))
            .is_err());
    }

    #[test]
    fn test_record_serializes() {
        let (freqs, a, b) = sample_arrays();
        let record =
            HydroRecord::from_arrays(BodyPair::diagonal(0), &freqs, a.view(), b.view()).unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let back: HydroRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
