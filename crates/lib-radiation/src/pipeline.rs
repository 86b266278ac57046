//! Kernel and state-space computation over whole records.
//!
//! Each DOF pair is independent, so pairs are computed on the rayon pool and
//! the results written back in one pass. Nothing is written until every pair
//! of the record (or system) has succeeded; the first failure in DOF-pair
//! order is returned and the stored data is left as it was.

use crate::config::PipelineConfig;
use crate::error::DspResult;
use crate::irf::compute_irf_with;
use crate::realization::realize_with;
use lib_hydro::body::{BodyPair, HydroRecord, HydroSystem};
use lib_hydro::coefficients::{DofPair, FrequencyCoefficients};
use lib_hydro::kernel::RadiationKernel;
use lib_hydro::state_space::StateSpaceModel;
use rayon::prelude::*;
use serde::Serialize;

/// Counts of what one record run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub bodies: BodyPair,

    /// Kernels computed.
    pub kernels: usize,

    /// Models realized.
    pub models: usize,

    /// Pairs with an identically zero kernel, left without a model.
    pub skipped: usize,

    /// Models whose fit error exceeds the tolerance.
    pub below_tolerance: usize,

    /// Models with a pole in the right half plane.
    pub unstable: usize,
}

struct PairOutput {
    pair: DofPair,
    kernel: RadiationKernel,
    model: Option<StateSpaceModel>,
}

fn process_pair(
    pair: DofPair,
    coeffs: &FrequencyCoefficients,
    config: &PipelineConfig,
) -> DspResult<PairOutput> {
    let kernel = compute_irf_with(coeffs, &config.irf)?;

    let model = if !config.realize {
        None
    } else if kernel.is_zero() {
        tracing::debug!(%pair, "Zero kernel, no model");
        None
    } else {
        let model = realize_with(&kernel, &config.realization)?;
        tracing::debug!(
            %pair,
            order = model.order,
            fit_error = model.fit_error,
            "Realized radiation model"
        );
        Some(model)
    };

    Ok(PairOutput {
        pair,
        kernel,
        model,
    })
}

fn compute_record(record: &HydroRecord, config: &PipelineConfig) -> DspResult<Vec<PairOutput>> {
    let inputs: Vec<(DofPair, &FrequencyCoefficients)> = record
        .coefficients()
        .iter()
        .map(|(pair, coeffs)| (*pair, coeffs))
        .collect();

    let results: Vec<DspResult<PairOutput>> = if config.parallel {
        inputs
            .into_par_iter()
            .map(|(pair, coeffs)| process_pair(pair, coeffs, config))
            .collect()
    } else {
        inputs
            .into_iter()
            .map(|(pair, coeffs)| process_pair(pair, coeffs, config))
            .collect()
    };

    // Sequential collect keeps the first error in DOF order
    results.into_iter().collect()
}

fn apply_outputs(record: &mut HydroRecord, outputs: Vec<PairOutput>) -> PipelineReport {
    let mut report = PipelineReport {
        bodies: record.bodies,
        ..Default::default()
    };

    record.clear_derived();
    for output in outputs {
        report.kernels += 1;
        match output.model {
            Some(model) => {
                report.models += 1;
                if !model.converged {
                    report.below_tolerance += 1;
                }
                record.set_model(output.pair, model);
            }
            None if output.kernel.is_zero() => report.skipped += 1,
            None => {}
        }
        record.set_kernel(output.pair, output.kernel);
    }
    report.unstable = record.unstable_count();

    log_report(&report);
    report
}

fn log_report(report: &PipelineReport) {
    tracing::info!(
        bodies = %report.bodies,
        kernels = report.kernels,
        models = report.models,
        skipped = report.skipped,
        "Processed radiation record"
    );
    if report.below_tolerance > 0 || report.unstable > 0 {
        tracing::warn!(
            bodies = %report.bodies,
            below_tolerance = report.below_tolerance,
            unstable = report.unstable,
            "Record has models that need attention"
        );
    }
}

/// Compute kernels (and models, if enabled) for every DOF pair of a record.
///
/// Previously derived kernels and models are replaced.
pub fn process_record(record: &mut HydroRecord, config: &PipelineConfig) -> DspResult<PipelineReport> {
    config.validate()?;
    let outputs = compute_record(record, config)?;
    Ok(apply_outputs(record, outputs))
}

/// Process every record of a system.
///
/// Records are computed in parallel; all of them must succeed before any is
/// updated.
pub fn process_system(
    system: &mut HydroSystem,
    config: &PipelineConfig,
) -> DspResult<Vec<PipelineReport>> {
    config.validate()?;
    tracing::info!(
        bodies = system.bodies.len(),
        records = system.records.len(),
        "Processing hydrodynamic system"
    );

    let results: Vec<(BodyPair, DspResult<Vec<PairOutput>>)> = if config.parallel {
        system
            .records
            .par_iter()
            .map(|(pair, record)| (*pair, compute_record(record, config)))
            .collect()
    } else {
        system
            .records
            .iter()
            .map(|(pair, record)| (*pair, compute_record(record, config)))
            .collect()
    };

    let mut computed = Vec::with_capacity(results.len());
    for (pair, result) in results {
        computed.push((pair, result?));
    }

    let reports = computed
        .into_iter()
        .filter_map(|(pair, outputs)| {
            system
                .record_mut(pair)
                .map(|record| apply_outputs(record, outputs))
        })
        .collect();

    Ok(reports)
}
