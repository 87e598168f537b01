//! Helper functions for integration tests

use fedbatch_rs::models::{GrowthLimitation, KineticParameters, MonodFedBatch};
use fedbatch_rs::physics::{Feed, ReactorState};
use fedbatch_rs::session::{OxygenUnit, ReactorSession};

/// Reference culture: mu_max = 0.4, K_S = 0.1, Y_xs = 0.5, oxygen-limited
/// Monod growth with k_La = 0.1, C_O2* = 8 and q_O2 = 0.5.
pub fn oxygen_limited_session() -> ReactorSession {
    let params = KineticParameters {
        mu_max: 0.4,
        k_s: 0.1,
        y_xs: 0.5,
        ..KineticParameters::default()
    };
    let model = MonodFedBatch::new(params, GrowthLimitation::SubstrateAndOxygen)
        .expect("reference parameters are valid");
    ReactorSession::new(Box::new(model)).with_oxygen_unit(OxygenUnit::Concentration)
}

/// Reference feed: F = 0.05 L/h, S_in = 10 g/L.
pub fn reference_feed() -> Feed {
    Feed::new(0.05, 10.0)
}

/// Reference inoculum in absolute units: C_O2 = 8 mg/L (saturated),
/// X = 0.1 g/L, S = 5 g/L, V = 1 L.
pub fn reference_initial() -> ReactorState {
    ReactorState::new(8.0, 0.1, 5.0, 1.0)
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Assert that a time series is strictly increasing.
pub fn assert_strictly_increasing(times: &[f64], message: &str) {
    for (i, pair) in times.windows(2).enumerate() {
        assert!(
            pair[1] > pair[0],
            "{}: times[{}] = {} does not exceed times[{}] = {}",
            message,
            i + 1,
            pair[1],
            i,
            pair[0]
        );
    }
}
