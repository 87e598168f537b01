//! Performance benchmarks for numerical integrators
//!
//! Compares the fixed-step RK4 and the adaptive Dormand-Prince integrator
//! on the reference fed-batch culture.
//!
//! # What We're Measuring
//!
//! 1. **RK4** (fixed step):
//!    - 4 model evaluations per substep, cost grows linearly with the
//!      substep count
//!    - No error control; the substep count is the accuracy knob
//!
//! 2. **Dormand-Prince 4(5)** (adaptive):
//!    - 6 fresh evaluations per accepted step (FSAL)
//!    - Step size follows the local error, so cost tracks the problem's
//!      actual stiffness rather than a fixed grid
//!
//! On the smooth Monod kinetics the adaptive solver should take large
//! steps and beat RK4 at equal accuracy; if it does not, inspect the
//! rejection rate first.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench --bench solver_performance
//!
//! # Only the RK4 scaling group
//! cargo bench --bench solver_performance rk4
//!
//! # Direct comparison at matched accuracy
//! cargo bench --bench solver_performance comparison
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use fedbatch_rs::models::{GrowthLimitation, KineticParameters, MonodFedBatch};
use fedbatch_rs::physics::{Feed, ReactorState};
use fedbatch_rs::solver::{DopriIntegrator, Integrator, Rk4Integrator, TimeGrid};

// =================================================================================================
// Reference Problem
// =================================================================================================

fn reference_model() -> MonodFedBatch {
    let params = KineticParameters {
        mu_max: 0.4,
        k_s: 0.1,
        y_xs: 0.5,
        ..KineticParameters::default()
    };
    MonodFedBatch::new(params, GrowthLimitation::SubstrateAndOxygen)
        .expect("reference parameters are valid")
}

fn reference_setup() -> (Feed, ReactorState) {
    (Feed::new(0.05, 10.0), ReactorState::new(8.0, 0.1, 5.0, 1.0))
}

// =================================================================================================
// Benchmark Functions
// =================================================================================================

/// RK4 cost scaling with the substep count.
///
/// Cost should be linear in substeps: each doubling doubles the model
/// evaluations over the same grid.
fn benchmark_rk4_substeps(c: &mut Criterion) {
    let mut group = c.benchmark_group("RK4 Substep Scaling");

    let model = reference_model();
    let (feed, initial) = reference_setup();
    let grid = TimeGrid::linspace(0.0, 24.0, 101).unwrap();

    for substeps in [1usize, 4, 16, 64].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(substeps),
            substeps,
            |b, &substeps| {
                let solver = Rk4Integrator::new(substeps);
                b.iter(|| {
                    solver
                        .integrate(black_box(&model), black_box(&feed), &grid, initial)
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

/// Adaptive solver cost across tolerances.
fn benchmark_adaptive_tolerances(c: &mut Criterion) {
    let mut group = c.benchmark_group("Dormand-Prince Tolerance Scaling");

    let model = reference_model();
    let (feed, initial) = reference_setup();
    let grid = TimeGrid::linspace(0.0, 24.0, 101).unwrap();

    for exponent in [4i32, 6, 8, 10].iter() {
        group.bench_with_input(
            BenchmarkId::new("rtol", format!("1e-{exponent}")),
            exponent,
            |b, &exponent| {
                let rtol = 10f64.powi(-exponent);
                let solver = DopriIntegrator::new(rtol, rtol * 1e-2);
                b.iter(|| {
                    solver
                        .integrate(black_box(&model), black_box(&feed), &grid, initial)
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

/// Both solvers at comparable accuracy on the 24 h reference culture.
fn benchmark_solver_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver_comparison");

    let model = reference_model();
    let (feed, initial) = reference_setup();
    let grid = TimeGrid::linspace(0.0, 24.0, 101).unwrap();

    group.bench_function("rk4_16_substeps", |b| {
        let solver = Rk4Integrator::new(16);
        b.iter(|| {
            solver
                .integrate(black_box(&model), black_box(&feed), &grid, initial)
                .unwrap()
        });
    });

    group.bench_function("dopri_default", |b| {
        let solver = DopriIntegrator::default();
        b.iter(|| {
            solver
                .integrate(black_box(&model), black_box(&feed), &grid, initial)
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_rk4_substeps,
    benchmark_adaptive_tolerances,
    benchmark_solver_comparison,
);
criterion_main!(benches);
