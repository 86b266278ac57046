//! Single floating body example.
//!
//! This example demonstrates:
//! 1. Building a record from bulk `[dof, dof, n_freq]` coefficient arrays
//! 2. Computing radiation kernels and state-space models for every DOF pair
//! 3. Comparing a realized model against the input damping
//!
//! Set `RUST_LOG=debug` for per-pair details.

use lib_hydro::body::{BodyInfo, BodyPair, HydroRecord, HydroSystem};
use lib_hydro::coefficients::DofPair;
use lib_radiation::config::PipelineConfig;
use lib_radiation::pipeline::process_system;
use lib_radiation::response::frequency_response;
use ndarray::Array3;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Radiation Single Body Example ===\n");

    let (freqs, added_mass, damping) = synthetic_heave_pitch();

    let mut system = HydroSystem::new();
    let body = system.add_body(BodyInfo::new("buoy"));
    let record = HydroRecord::from_arrays(
        BodyPair::diagonal(body),
        &freqs,
        added_mass.view(),
        damping.view(),
    )
    .map_err(anyhow::Error::msg)?;
    system
        .try_insert_record(record)
        .map_err(anyhow::Error::msg)?;

    let config = PipelineConfig::from_json(
        r#"{
            "irf": { "t_end": 40.0, "num_time_points": 401, "num_freq_points": 2001 },
            "realization": { "max_order": 10, "tolerance": 0.01 }
        }"#,
    )?;

    let reports = process_system(&mut system, &config)?;
    for report in &reports {
        println!(
            "{}: {} kernels, {} models, {} skipped",
            report.bodies, report.kernels, report.models, report.skipped
        );
    }

    let record = system
        .record(BodyPair::diagonal(body))
        .ok_or_else(|| anyhow::anyhow!("record missing after processing"))?;

    for (pair, model) in &record.models {
        let kernel = &record.kernels[pair];
        println!(
            "  {} K(0) = {:.2}, A_inf = {:.2}, order {}, fit error {:.2e}, stable: {}",
            pair,
            kernel.values[0],
            kernel.added_mass_inf,
            model.order,
            model.fit_error,
            model.stable
        );
    }

    // Heave damping reconstructed from the model
    let heave = DofPair::new(0, 0);
    if let (Some(model), Some(coeffs)) = (record.models.get(&heave), record.get_coefficients(heave)) {
        println!("\nHeave damping, input vs model:");
        let response = frequency_response(model, &coeffs.frequencies)?;
        for (r, b) in response.iter().zip(&coeffs.damping).step_by(8) {
            println!("  w = {:5.2} rad/s  B = {:8.2}  model = {:8.2}", r.frequency.0, b, r.damping);
        }
    }

    Ok(())
}

/// Heave/pitch coefficients of a small buoy with weak coupling.
fn synthetic_heave_pitch() -> (Vec<f64>, Array3<f64>, Array3<f64>) {
    let freqs: Vec<f64> = (1..=60).map(|k| 0.05 * k as f64).collect();
    let n = freqs.len();

    let resonance = |peak: f64, center: f64, width: f64, w: f64| {
        peak * w * w / ((w * w - center * center).powi(2) / (width * width) + w * w)
    };

    let damping = Array3::from_shape_fn((2, 2, n), |(i, j, k)| {
        let w = freqs[k];
        match (i, j) {
            (0, 0) => resonance(1.2e4, 1.1, 0.8, w),
            (1, 1) => resonance(3.0e4, 0.9, 0.6, w),
            _ => 0.0,
        }
    });
    let added_mass = Array3::from_shape_fn((2, 2, n), |(i, j, k)| {
        let w = freqs[k];
        match (i, j) {
            (0, 0) => 8.0e3 + 2.0e3 / (1.0 + w * w),
            (1, 1) => 4.5e4 + 6.0e3 / (1.0 + w * w),
            _ => 0.0,
        }
    });

    (freqs, added_mass, damping)
}
