use super::*;
use crate::simulate::{simulate_stray_sweep, simulate_transmission, BvdCrystal, SweepPlan};
use crate::sweep::SampleSeries;

fn assert_close(actual: f64, expected: f64, rel: f64) {
    let err = ((actual - expected) / expected).abs();
    assert!(
        err <= rel,
        "expected {} within {} relative, got {} (error {})",
        expected,
        rel,
        actual,
        err
    );
}

/// Seven samples with a clean peak at 1030 Hz
fn hand_series() -> SampleSeries {
    SampleSeries::new(
        vec![1000.0, 1010.0, 1020.0, 1030.0, 1040.0, 1050.0, 1060.0],
        vec![-10.0, -8.0, -5.0, -2.0, -5.0, -8.0, -10.0],
        vec![80.0, 60.0, 30.0, 0.0, -30.0, -60.0, -80.0],
    )
    .unwrap()
}

fn reference_crystal() -> BvdCrystal {
    BvdCrystal::new(20.0, 7.5e-3, 5.0e-15, 2.0e-12)
}

fn reference_plan() -> SweepPlan {
    SweepPlan::new(25_980_000.0, 26_030_000.0, 5001)
}

fn reference_sweep() -> SampleSeries {
    simulate_transmission(&reference_crystal(), 12.5, &reference_plan()).unwrap()
}

fn golden_inputs() -> FormulaInputs {
    FormulaInputs {
        fs: 26e6,
        fp: 26.05e6,
        loss_min: -20.0,
        bandwidth: Some(500.0),
        source_resistance: 12.5,
        load_capacitance: 0.0,
        stray_capacitance: 600e-15,
        nominal_c0: 0.0,
    }
}

// ============================================================================
// Resonance location
// ============================================================================

#[test]
fn test_locate_sign_convention() {
    let point = locate(&hand_series()).unwrap();
    assert_eq!(point.fs, 1030.0);
    assert_eq!(point.fs_index, 3);
    assert_eq!(point.loss_min, -2.0);
    // Lowest stored loss: the first of the two -10 dB ends
    assert_eq!(point.fp, 1000.0);
    assert_eq!(point.fp_index, 0);
}

#[test]
fn test_locate_ties_pick_first() {
    let series = SampleSeries::new(
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
        vec![-3.0, -1.0, -1.0, -5.0, -5.0],
        vec![0.0; 5],
    )
    .unwrap();
    let point = locate(&series).unwrap();
    assert_eq!(point.fs, 2.0);
    assert_eq!(point.fp, 4.0);
}

#[test]
fn test_locate_insufficient_data() {
    let series = SampleSeries::new(vec![1.0], vec![-1.0], vec![0.0]).unwrap();
    let err = locate(&series).unwrap_err();
    assert_eq!(
        err,
        ExtractionError::InsufficientData {
            required: 2,
            actual: 1
        }
    );
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn test_zero_phase_point() {
    let point = resonance::zero_phase_point(&hand_series()).unwrap();
    assert_eq!(point.frequency, 1030.0);
    assert_eq!(point.loss, -2.0);
}

// ============================================================================
// Bandwidth
// ============================================================================

#[test]
fn test_phase_crossing_midpoints() {
    let series = hand_series();
    let resonance = locate(&series).unwrap();
    let bw = BandwidthEstimator::PhaseCrossing
        .measure(&series, &resonance)
        .unwrap();
    assert_eq!(bw.lower_hz, 1015.0);
    assert_eq!(bw.upper_hz, 1045.0);
    assert_eq!(bw.bandwidth_hz, 30.0);
}

#[test]
fn test_three_db_crossings() {
    let series = hand_series();
    let resonance = locate(&series).unwrap();
    let bw = BandwidthEstimator::ThreeDb.measure(&series, &resonance).unwrap();
    // Threshold -5 dB: rise recorded at 1010 Hz, fall at 1030 Hz
    assert_eq!(bw.lower_hz, 1010.0);
    assert_eq!(bw.upper_hz, 1030.0);
    assert_eq!(
        BandwidthEstimator::ThreeDb
            .estimate(&series, &resonance)
            .unwrap(),
        20.0
    );
}

#[test]
fn test_missing_minus_45_crossing() {
    let series = SampleSeries::new(
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        vec![-9.0, -5.0, -1.0, -5.0, -9.0, -12.0],
        vec![80.0, 30.0, 0.0, -30.0, -40.0, -44.0],
    )
    .unwrap();
    let resonance = locate(&series).unwrap();
    let err = BandwidthEstimator::PhaseCrossing
        .measure(&series, &resonance)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BandwidthNotFound);
}

#[test]
fn test_missing_plus_45_crossing() {
    let series = SampleSeries::new(
        vec![1.0, 2.0, 3.0, 4.0],
        vec![-5.0, -1.0, -5.0, -9.0],
        vec![30.0, 0.0, -30.0, -60.0],
    )
    .unwrap();
    let resonance = locate(&series).unwrap();
    let err = BandwidthEstimator::PhaseCrossing
        .measure(&series, &resonance)
        .unwrap_err();
    assert!(matches!(err, ExtractionError::BandwidthNotFound(_)));
}

#[test]
fn test_minus_45_before_plus_45_is_not_a_bandwidth() {
    // -45deg descent at 1.5 Hz, +45deg descent only later at 3.5 Hz
    let series = SampleSeries::new(
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        vec![-9.0, -5.0, -1.0, -5.0, -9.0, -12.0],
        vec![-30.0, -60.0, 60.0, 30.0, 0.0, -10.0],
    )
    .unwrap();
    let resonance = locate(&series).unwrap();
    let err = BandwidthEstimator::PhaseCrossing
        .measure(&series, &resonance)
        .unwrap_err();
    match err {
        ExtractionError::BandwidthNotFound(msg) => assert!(msg.contains("+45")),
        other => panic!("expected BandwidthNotFound, got {:?}", other),
    }
}

#[test]
fn test_missing_three_db_skirt() {
    // Loss never drops 3 dB below the peak on the upper side
    let series = SampleSeries::new(
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
        vec![-9.0, -4.0, -1.0, -2.0, -3.0],
        vec![0.0; 5],
    )
    .unwrap();
    let resonance = locate(&series).unwrap();
    let err = BandwidthEstimator::ThreeDb
        .measure(&series, &resonance)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BandwidthNotFound);
}

#[test]
fn test_bandwidth_needs_three_samples() {
    let series = SampleSeries::new(vec![1.0, 2.0], vec![-1.0, -2.0], vec![50.0, -50.0]).unwrap();
    let resonance = locate(&series).unwrap();
    let err = BandwidthEstimator::PhaseCrossing
        .measure(&series, &resonance)
        .unwrap_err();
    assert_eq!(
        err,
        ExtractionError::InsufficientData {
            required: 3,
            actual: 2
        }
    );
}

// ============================================================================
// Formula sets
// ============================================================================

#[test]
fn test_phase_shift_golden() {
    let model = FormulaSet::PhaseShift.compute(&golden_inputs()).unwrap();
    assert_close(model.r1, 225.0, 1e-12);
    assert_close(model.c1, 4.708726126979152e-16, 1e-12);
    assert_close(model.l1, 0.07957747154594767, 1e-12);
    assert_close(model.q, 57777.77777777778, 1e-12);
    assert_close(model.c0, 1.2230927423008286e-13, 1e-12);
    assert_eq!(model.esr, None);
    assert_eq!(model.method, Method::PhaseShift);
}

#[test]
fn test_three_db_golden() {
    let model = FormulaSet::ThreeDb.compute(&golden_inputs()).unwrap();
    assert_close(model.q, 52000.0, 1e-12);
    assert_close(model.l1, 0.07957747154594767, 1e-12);
    assert_close(model.c1, 4.708726126979152e-16, 1e-12);
    assert_close(model.c0, 1.2230927423008286e-13, 1e-12);
    assert_eq!(model.esr, None);

    let with_load = FormulaInputs {
        load_capacitance: 18e-12,
        ..golden_inputs()
    };
    let model = FormulaSet::ThreeDb.compute(&with_load).unwrap();
    assert_close(model.esr.unwrap(), 228.06812043808728, 1e-12);
}

#[test]
fn test_g3uur_golden() {
    let inputs = FormulaInputs {
        bandwidth: None,
        ..golden_inputs()
    };
    let model = FormulaSet::G3uur.compute(&inputs).unwrap();
    assert_close(model.c1, 2.3076923076922993e-15, 1e-12);
    assert_close(model.l1, 0.016237369173451626, 1e-12);
    assert_close(model.c0, 5.994236311239171e-13, 1e-12);
    assert_close(model.q, 10610.329539459728, 1e-12);
}

#[test]
fn test_loss_sign_is_ignored_for_r1() {
    let positive = FormulaInputs {
        loss_min: 20.0,
        ..golden_inputs()
    };
    let a = FormulaSet::PhaseShift.compute(&positive).unwrap();
    let b = FormulaSet::PhaseShift.compute(&golden_inputs()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_zero_bandwidth_rejected() {
    let inputs = FormulaInputs {
        bandwidth: Some(0.0),
        ..golden_inputs()
    };
    let err = FormulaSet::ThreeDb.compute(&inputs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ZeroBandwidth);
}

#[test]
fn test_missing_bandwidth_rejected() {
    let inputs = FormulaInputs {
        bandwidth: None,
        ..golden_inputs()
    };
    let err = FormulaSet::PhaseShift.compute(&inputs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
}

#[test]
fn test_coincident_resonances_rejected() {
    let inputs = FormulaInputs {
        fp: 26e6,
        ..golden_inputs()
    };
    for set in [FormulaSet::PhaseShift, FormulaSet::ThreeDb, FormulaSet::G3uur] {
        let err = set.compute(&inputs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateResonance);
    }
}

#[test]
fn test_non_positive_source_resistance() {
    let inputs = FormulaInputs {
        source_resistance: 0.0,
        ..golden_inputs()
    };
    let err = FormulaSet::PhaseShift.compute(&inputs).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
}

// ============================================================================
// End-to-end extraction
// ============================================================================

#[test]
fn test_extract_phase_shift_recovers_crystal() {
    let model = extract(
        &reference_sweep(),
        Method::PhaseShift,
        &ExtractionConfig::two_port(),
    )
    .unwrap();
    assert_close(model.fs, 25_989_890.0, 1e-9);
    assert_close(model.fp, 26_022_360.0, 1e-9);
    assert_close(model.r1, 20.0, 0.01);
    assert_close(model.c1, 5.0e-15, 0.02);
    assert_close(model.l1, 7.5e-3, 0.02);
    assert_close(model.c0, 2.0e-12, 0.02);
    assert_close(model.q, reference_crystal().quality_factor(), 0.02);
}

#[test]
fn test_extract_three_db_recovers_crystal() {
    let report = extract_report(
        &reference_sweep(),
        Method::ThreeDb,
        &ExtractionConfig::two_port(),
    )
    .unwrap();
    let model = report.model;
    assert_close(model.c1, 5.0e-15, 0.02);
    assert_close(model.l1, 7.5e-3, 0.02);
    assert_close(model.c0, 2.0e-12, 0.02);
    // Loaded Q straight from the -3 dB bandwidth
    let bw = report.bandwidth.unwrap();
    assert_close(model.q, model.fs / bw.bandwidth_hz, 1e-12);
    assert_eq!(model.esr, None);

    assert_eq!(report.sample_count, 5001);
    assert_eq!(report.frequency_resolution, Some(10.0));
    assert_eq!(report.stray_capacitance, None);
    assert_close(report.effective_resistance, 25.0 + model.r1, 1e-12);
}

#[test]
fn test_extract_three_db_with_load_capacitance() {
    let config = ExtractionConfig::two_port().with_load_capacitance_pf(18.0);
    let model = extract(&reference_sweep(), Method::ThreeDb, &config).unwrap();
    let esr = model.esr.unwrap();
    assert_close(esr, model.r1 * (1.0 + model.c0 / 18e-12).powi(2), 1e-12);
}

#[test]
fn test_phase_shift_q_identity() {
    let model = extract(
        &reference_sweep(),
        Method::PhaseShift,
        &ExtractionConfig::default(),
    )
    .unwrap();
    let q = 2.0 * std::f64::consts::PI * model.fs * model.l1 / model.r1;
    assert_close(model.q, q, 1e-12);
}

#[test]
fn test_extraction_is_idempotent() {
    let sweep = reference_sweep();
    let config = ExtractionConfig::two_port();
    for method in [Method::PhaseShift, Method::ThreeDb, Method::G3uur] {
        let a = extract_report(&sweep, method, &config).unwrap();
        let b = extract_report(&sweep, method, &config).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_flat_sweep_is_degenerate() {
    let series = SampleSeries::new(
        vec![1.0, 2.0, 3.0, 4.0],
        vec![-1.0; 4],
        vec![0.0; 4],
    )
    .unwrap();
    for method in [Method::PhaseShift, Method::ThreeDb, Method::G3uur] {
        let err = extract(&series, method, &ExtractionConfig::two_port()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateResonance);
    }
}

#[test]
fn test_invalid_source_resistance_rejected_up_front() {
    let config = ExtractionConfig::two_port().with_source_resistance(-1.0);
    let err = extract(&reference_sweep(), Method::PhaseShift, &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    assert!(Extractor::new(Method::PhaseShift, config).is_err());
}

#[test]
fn test_extractor_matches_free_function() {
    let sweep = reference_sweep();
    let extractor = Extractor::new(Method::ThreeDb, ExtractionConfig::one_port()).unwrap();
    assert_eq!(extractor.method(), Method::ThreeDb);
    assert_eq!(extractor.config().source_resistance_ohm, 50.0);
    assert_eq!(
        extractor.extract(&sweep).unwrap(),
        extract(&sweep, Method::ThreeDb, &ExtractionConfig::one_port()).unwrap()
    );
}

// ============================================================================
// Two-sweep method
// ============================================================================

#[test]
fn test_two_sweep_configured_stray() {
    let config = ExtractionConfig::two_port().with_stray_capacitance_ff(2000.0);
    let model = extract(&reference_sweep(), Method::G3uur, &config).unwrap();
    assert_close(model.c1, 5.0e-15, 0.01);
    assert_close(model.l1, 7.5e-3, 0.01);
    assert_close(model.c0, 2.0e-12, 0.01);
}

#[test]
fn test_two_sweep_nominal_c0_adds_to_stray() {
    let split = ExtractionConfig::two_port()
        .with_stray_capacitance_ff(500.0)
        .with_nominal_c0_pf(1.5);
    let combined = ExtractionConfig::two_port().with_stray_capacitance_ff(2000.0);
    let a = extract(&reference_sweep(), Method::G3uur, &split).unwrap();
    let b = extract(&reference_sweep(), Method::G3uur, &combined).unwrap();
    assert_close(a.c1, b.c1, 1e-12);
}

#[test]
fn test_two_sweep_from_stray_sweep() {
    let stray = simulate_stray_sweep(2.0e-12, &reference_plan()).unwrap();
    let config = ExtractionConfig::two_port().with_stray_source(StraySource::StraySweep);
    let report = extract_two_sweep(&reference_sweep(), &stray, &config).unwrap();

    assert_close(report.stray_capacitance.unwrap(), 2.0e-12, 1e-9);
    assert_close(report.model.c1, 5.0e-15, 0.01);
    assert!(report.bandwidth.is_none());
}

#[test]
fn test_two_sweep_configured_ignores_stray_sweep() {
    let stray = simulate_stray_sweep(2.0e-12, &reference_plan()).unwrap();
    let config = ExtractionConfig::two_port();
    let report = extract_two_sweep(&reference_sweep(), &stray, &config).unwrap();
    assert_close(report.stray_capacitance.unwrap(), 600e-15, 1e-12);
}

#[test]
fn test_extractor_two_sweep_keeps_bound_method() {
    let stray = simulate_stray_sweep(2.0e-12, &reference_plan()).unwrap();
    for method in [Method::PhaseShift, Method::ThreeDb] {
        let extractor = Extractor::new(method, ExtractionConfig::two_port()).unwrap();
        let err = extractor
            .report_two_sweep(&reference_sweep(), &stray)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }

    let extractor = Extractor::new(Method::G3uur, ExtractionConfig::two_port()).unwrap();
    let report = extractor.report_two_sweep(&reference_sweep(), &stray).unwrap();
    assert_eq!(report.model.method, Method::G3uur);
}

#[test]
fn test_stray_sweep_source_requires_sweep() {
    let config = ExtractionConfig::two_port().with_stray_source(StraySource::StraySweep);
    let err = extract(&reference_sweep(), Method::G3uur, &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
}

#[test]
fn test_stray_capacitance_from_zero_reading() {
    let stray = SampleSeries::new(vec![1e6, 2e6], vec![0.0, 0.0], vec![0.0, 0.0]).unwrap();
    let err = stray_capacitance_from_sweep(&stray, 1e6).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DegenerateResonance);
}

// ============================================================================
// Batch and configuration
// ============================================================================

#[test]
fn test_batch_keeps_order() {
    let short = SampleSeries::new(vec![1.0], vec![-1.0], vec![0.0]).unwrap();
    let sweeps = vec![reference_sweep(), short, reference_sweep()];
    let results = extract_batch(&sweeps, Method::PhaseShift, &ExtractionConfig::two_port());

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().unwrap_err().kind(),
        ErrorKind::InsufficientData
    );
    assert_eq!(results[0], results[2]);
}

#[test]
fn test_batch_with_invalid_config() {
    let sweeps = vec![reference_sweep(), reference_sweep()];
    let config = ExtractionConfig::two_port().with_stray_capacitance_ff(f64::NAN);
    let results = extract_batch(&sweeps, Method::G3uur, &config);
    assert!(results
        .iter()
        .all(|r| matches!(r, Err(ExtractionError::InvalidConfiguration(_)))));
}

#[test]
fn test_method_from_str() {
    assert_eq!("phase-shift".parse::<Method>().unwrap(), Method::PhaseShift);
    assert_eq!("45".parse::<Method>().unwrap(), Method::PhaseShift);
    assert_eq!("-3dB".parse::<Method>().unwrap(), Method::ThreeDb);
    assert_eq!("G3UUR".parse::<Method>().unwrap(), Method::G3uur);
    assert!("bogus".parse::<Method>().is_err());

    for name in Method::variants() {
        let method: Method = name.parse().unwrap();
        assert_eq!(method.to_string(), *name);
    }
    assert!(!Method::G3uur.uses_bandwidth());
}

#[test]
fn test_config_serde_defaults() {
    let config: ExtractionConfig =
        serde_json::from_str(r#"{"source_resistance_ohm": 50.0}"#).unwrap();
    assert_eq!(config.source_resistance_ohm, 50.0);
    assert_eq!(config.stray_capacitance_ff, 600.0);
    assert_eq!(config.stray_source, StraySource::Configured);
}

#[test]
fn test_model_display() {
    let model = FormulaSet::ThreeDb
        .compute(&FormulaInputs {
            load_capacitance: 18e-12,
            ..golden_inputs()
        })
        .unwrap();
    let text = model.to_string();
    assert!(text.contains("fs = 26000000 Hz"));
    assert!(text.contains("R1 = 225.00 Ohm"));
    assert!(text.contains("C1 = 0.47 fF"));
    assert!(text.contains("ESR = 228.07 Ohm"));
    assert!(text.ends_with("Q = 52000"));
}

#[test]
fn test_model_json_omits_missing_esr() {
    let model = FormulaSet::PhaseShift.compute(&golden_inputs()).unwrap();
    let json = serde_json::to_string(&model).unwrap();
    assert!(!json.contains("esr"));
    assert!(json.contains(r#""method":"phase-shift""#));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// fs and fp are always sampled frequencies, and loss_min is the peak
        #[test]
        fn test_locate_returns_sampled_points(
            losses in prop::collection::vec(-60.0f64..0.0, 2..64)
        ) {
            let frequencies: Vec<f64> = (0..losses.len()).map(|i| 1e6 + i as f64 * 10.0).collect();
            let phases = vec![0.0; losses.len()];
            let series = SampleSeries::new(frequencies.clone(), losses.clone(), phases).unwrap();
            let point = locate(&series).unwrap();

            prop_assert!(frequencies.contains(&point.fs));
            prop_assert!(frequencies.contains(&point.fp));
            prop_assert!(losses.iter().all(|&l| l <= point.loss_min));
            prop_assert!(losses.iter().all(|&l| l >= losses[point.fp_index]));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Repeated extraction gives identical models, and Q follows L1/R1
        #[test]
        fn test_phase_shift_consistency(r1 in 5.0f64..100.0) {
            let crystal = BvdCrystal::new(r1, 7.5e-3, 5.0e-15, 2.0e-12);
            let sweep = simulate_transmission(&crystal, 12.5, &reference_plan()).unwrap();
            let config = ExtractionConfig::two_port();

            let a = extract(&sweep, Method::PhaseShift, &config).unwrap();
            let b = extract(&sweep, Method::PhaseShift, &config).unwrap();
            prop_assert_eq!(a, b);

            let q = 2.0 * std::f64::consts::PI * a.fs * a.l1 / a.r1;
            prop_assert!(((a.q - q) / q).abs() < 1e-12);
            prop_assert!(((a.r1 - r1) / r1).abs() < 0.02);
        }
    }
}
