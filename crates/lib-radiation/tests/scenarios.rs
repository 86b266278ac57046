//! End-to-end radiation scenarios: coefficients in, kernels and models out.

use lib_hydro::coefficients::FrequencyCoefficients;
use lib_hydro::units::{RadPerSec, Seconds};
use lib_radiation::error::DspError;
use lib_radiation::{compute_irf, frequency_response, realize, realize_samples};
use std::f64::consts::PI;

/// Constant damping `b` on `n` evenly spaced frequencies in `[w_lo, w_hi]`.
fn constant_damping(n: usize, w_lo: f64, w_hi: f64, b: f64) -> FrequencyCoefficients {
    let mut coeffs = FrequencyCoefficients::new();
    for i in 0..n {
        let w = w_lo + (w_hi - w_lo) * i as f64 / (n - 1) as f64;
        coeffs.add_point(RadPerSec(w), 2000.0, b);
    }
    coeffs
}

/// Single-resonance coefficients of `K(t) = g e^{-a t}`.
fn lorentzian(g: f64, a: f64, a_inf: f64) -> FrequencyCoefficients {
    let mut coeffs = FrequencyCoefficients::new();
    for i in 1..=800 {
        let w = i as f64 * 0.05;
        let denom = a * a + w * w;
        coeffs.add_point(RadPerSec(w), a_inf - g / denom, g * a / denom);
    }
    coeffs
}

#[test]
fn constant_damping_kernel_and_model() {
    let coeffs = constant_damping(20, 0.1, 3.0, 500.0);
    let kernel = compute_irf(&coeffs, Seconds(50.0), 101, 201).unwrap();

    assert_eq!(kernel.len(), 101);
    assert!((kernel.t_end().0 - 50.0).abs() < 1e-9);

    let k0 = kernel.values[0];
    assert!(k0.is_finite());
    assert!((k0 - 2.0 / PI * 500.0 * 3.0).abs() < 1e-6 * k0);

    let tail_max = kernel.values[90..]
        .iter()
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    assert!(tail_max < 0.02 * k0, "tail {} vs K(0) {}", tail_max, k0);

    let model = realize(&kernel, 10, 0.05).unwrap();
    assert!(model.order <= 10);
    assert!(model.fit_error <= 0.05, "fit error {}", model.fit_error);
    assert!(model.stable);
    assert!(model.converged);
}

#[test]
fn lorentzian_round_trip() {
    let coeffs = lorentzian(1.0, 0.5, 100.0);
    let kernel = compute_irf(&coeffs, Seconds(30.0), 301, 4001).unwrap();

    let model = realize(&kernel, 6, 1e-2).unwrap();
    assert!(model.converged, "fit error {}", model.fit_error);
    assert!(model.stable);
    assert!(model.max_pole_real_part() < 0.0);

    let freqs = [RadPerSec(0.25), RadPerSec(0.5), RadPerSec(1.0)];
    let response = frequency_response(&model, &freqs).unwrap();
    for r in &response {
        let w = r.frequency.0;
        let denom = 0.25 + w * w;
        let damping = 0.5 / denom;
        let offset = -1.0 / denom;
        assert!(
            (r.damping - damping).abs() < 0.05 * damping,
            "B({}) = {}, expected {}",
            w,
            r.damping,
            damping
        );
        assert!(
            (r.added_mass_offset - offset).abs() < 0.05 * offset.abs(),
            "A({}) - A_inf = {}, expected {}",
            w,
            r.added_mass_offset,
            offset
        );
    }

    assert!((kernel.added_mass_inf - 100.0).abs() < 0.1);
}

#[test]
fn array_level_entry_points() {
    let freqs = [0.2, 0.4, 0.8, 1.2, 1.6, 2.0, 2.5, 3.0];
    let added_mass: Vec<f64> = freqs.iter().map(|w| 800.0 + 50.0 / (1.0 + w)).collect();
    let damping: Vec<f64> = freqs.iter().map(|w| 300.0 * w * (-w).exp()).collect();

    let coeffs = FrequencyCoefficients::try_from_slices(&freqs, &added_mass, &damping).unwrap();
    let kernel = compute_irf(&coeffs, Seconds(40.0), 161, 401).unwrap();
    let times = kernel.times();

    let from_arrays = realize_samples(&times, &kernel.values, 8, 0.05).unwrap();
    let from_kernel = realize(&kernel, 8, 0.05).unwrap();

    assert_eq!(from_arrays.order, from_kernel.order);
    assert!((from_arrays.fit_error - from_kernel.fit_error).abs() < 1e-9);
    assert_eq!(from_arrays.D, 0.0);
}

#[test]
fn single_frequency_fails() {
    let coeffs = FrequencyCoefficients::try_from_slices(&[1.0], &[100.0], &[5.0]).unwrap();
    let result = compute_irf(&coeffs, Seconds(10.0), 11, 11);
    assert!(matches!(result, Err(DspError::InvalidFrequencyRange(_))));
}

#[test]
fn invalid_scalars_fail() {
    let coeffs = constant_damping(20, 0.1, 3.0, 500.0);

    for (t_end, n_t, n_w) in [(0.0, 101, 201), (-5.0, 101, 201), (50.0, 1, 201), (50.0, 101, 1)] {
        assert!(
            matches!(
                compute_irf(&coeffs, Seconds(t_end), n_t, n_w),
                Err(DspError::InvalidParameter(_))
            ),
            "accepted t_end={} n_t={} n_w={}",
            t_end,
            n_t,
            n_w
        );
    }

    let kernel = compute_irf(&coeffs, Seconds(50.0), 101, 201).unwrap();
    assert!(matches!(realize(&kernel, 0, 0.05), Err(DspError::InvalidParameter(_))));
    assert!(matches!(realize(&kernel, 10, 0.0), Err(DspError::InvalidParameter(_))));
    assert!(matches!(realize(&kernel, 60, 0.05), Err(DspError::DegenerateKernel(_))));
}

#[test]
fn repeated_runs_are_identical() {
    let coeffs = constant_damping(20, 0.1, 3.0, 500.0);

    let first = compute_irf(&coeffs, Seconds(50.0), 101, 201).unwrap();
    let second = compute_irf(&coeffs, Seconds(50.0), 101, 201).unwrap();
    assert_eq!(first, second);

    assert_eq!(realize(&first, 6, 0.05).unwrap(), realize(&second, 6, 0.05).unwrap());
}

#[test]
fn two_point_transform_grid() {
    let coeffs =
        FrequencyCoefficients::try_from_slices(&[0.05, 40.0], &[10.0, 10.0], &[2.0, 0.5]).unwrap();
    let kernel = compute_irf(&coeffs, Seconds(5.0), 51, 2).unwrap();

    assert_eq!(kernel.len(), 51);
    assert!(kernel.values.iter().all(|v| v.is_finite()));
}

#[test]
fn zero_damping_gives_zero_kernel() {
    let coeffs = constant_damping(10, 0.5, 2.0, 0.0);
    let kernel = compute_irf(&coeffs, Seconds(20.0), 41, 101).unwrap();

    assert!(kernel.is_zero());
    assert!(matches!(realize(&kernel, 4, 0.05), Err(DspError::DegenerateKernel(_))));
}
