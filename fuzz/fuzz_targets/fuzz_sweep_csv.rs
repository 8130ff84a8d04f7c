#![no_main]

use libfuzzer_sys::fuzz_target;

use crystalfit::analysis::{extract_report, ExtractionConfig, Method};
use crystalfit::sweep::SampleSeries;

fuzz_target!(|data: &[u8]| {
    // Malformed tables must be rejected with an error, never a panic
    let Ok(sweep) = SampleSeries::from_csv_reader(data) else {
        return;
    };

    // Any valid series must extract or fail cleanly with every method
    let config = ExtractionConfig::two_port().with_load_capacitance_pf(18.0);
    for method in [Method::PhaseShift, Method::ThreeDb, Method::G3uur] {
        if let Ok(report) = extract_report(&sweep, method, &config) {
            assert!(report.model.r1.is_finite());
            assert!(report.model.q.is_finite());
        }
    }
});
