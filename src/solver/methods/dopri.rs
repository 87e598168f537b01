//! Adaptive Dormand-Prince 4(5) integrator
//!
//! # Mathematical Background
//!
//! The Dormand-Prince embedded pair computes a 5th-order solution together
//! with a 4th-order estimate from the same seven stages (FSAL: the last
//! stage of an accepted step is the first stage of the next). The
//! difference between the two orders drives the step-size controller:
//!
//! ```text
//! err = sqrt( mean_i (e_i / (atol + rtol·max(|yₙᵢ|, |yₙ₊₁ᵢ|)))² )
//! accept when err ≤ 1, then h ← h · clamp(0.9·err^(−1/5), 0.2, 5)
//! ```
//!
//! The 5th-order value advances the solution (local extrapolation).
//!
//! # Grid behavior
//!
//! The solver picks its own internal steps but clamps them so that every
//! [`TimeGrid`] sample is hit exactly — the recorded trajectory has one
//! state per grid time, like the fixed-step methods.
//!
//! # Characteristics
//!
//! - 5th-order accurate with built-in 4th-order error control
//! - 6 fresh model evaluations per accepted step (7 stages, FSAL)
//! - Bounded work: a step budget per segment turns pathological inputs
//!   (e.g. volume driven toward zero) into a reported
//!   [`Divergence`](crate::SimulationError::Divergence) instead of a hang
//!
//! Stage arithmetic runs in `nalgebra` vector space; the model is called
//! through the `ReactorState` view of each stage vector.

use nalgebra::DVector;

use crate::error::{Result, SimulationError};
use crate::physics::{Feed, KineticModel, ReactorState};
use crate::solver::{validate_state, Integrator, TimeGrid};

// =================================================================================================
// Butcher tableau (Dormand-Prince 4(5))
// =================================================================================================

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (advancing solution)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// 4th-order weights (error estimate only)
const BE1: f64 = 5179.0 / 57600.0;
const BE3: f64 = 7571.0 / 16695.0;
const BE4: f64 = 393.0 / 640.0;
const BE5: f64 = -92097.0 / 339200.0;
const BE6: f64 = 187.0 / 2100.0;
const BE7: f64 = 1.0 / 40.0;

// Error coefficients: e = (5th − 4th) weights
const E1: f64 = B1 - BE1;
const E3: f64 = B3 - BE3;
const E4: f64 = B4 - BE4;
const E5: f64 = B5 - BE5;
const E6: f64 = B6 - BE6;
const E7: f64 = -BE7;

// =================================================================================================
// Dopri Integrator
// =================================================================================================

/// Adaptive Dormand-Prince 4(5) method with PI-style step control.
///
/// The default integrator of [`ReactorSession`](crate::session::ReactorSession).
#[derive(Debug, Clone, Copy)]
pub struct DopriIntegrator {
    /// Relative tolerance.
    pub rtol: f64,

    /// Absolute tolerance.
    pub atol: f64,

    /// Step budget per segment (accepted + rejected attempts).
    pub max_steps: usize,

    /// Initial step size; 0.0 selects span/1000 automatically.
    pub initial_step: f64,
}

impl Default for DopriIntegrator {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-10,
            max_steps: 100_000,
            initial_step: 0.0,
        }
    }
}

impl DopriIntegrator {
    /// Create an integrator with the given tolerances and the default
    /// step budget.
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self {
            rtol,
            atol,
            ..Self::default()
        }
    }

    fn validate_options(&self) -> Result<()> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(SimulationError::validation(format!(
                "rtol must be finite and > 0, got {}",
                self.rtol
            )));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(SimulationError::validation(format!(
                "atol must be finite and > 0, got {}",
                self.atol
            )));
        }
        if self.max_steps == 0 {
            return Err(SimulationError::validation("max_steps must be > 0"));
        }
        if !self.initial_step.is_finite() || self.initial_step < 0.0 {
            return Err(SimulationError::validation(format!(
                "initial step must be finite and non-negative, got {}",
                self.initial_step
            )));
        }
        Ok(())
    }
}

/// Evaluate the model in vector space.
#[inline]
fn rhs(model: &dyn KineticModel, feed: &Feed, t: f64, y: &DVector<f64>) -> DVector<f64> {
    model
        .derivatives(t, &ReactorState::from_vector(y), feed)
        .to_vector()
}

impl Integrator for DopriIntegrator {
    fn integrate(
        &self,
        model: &dyn KineticModel,
        feed: &Feed,
        grid: &TimeGrid,
        initial: ReactorState,
    ) -> Result<Vec<ReactorState>> {
        self.validate_options()?;

        let times = grid.times();
        let mut states = Vec::with_capacity(times.len());
        states.push(initial);

        if grid.is_degenerate() {
            return Ok(states);
        }

        let span = grid.end() - grid.start();
        let h_min = 1e-12 * span.max(1.0);

        let mut t = grid.start();
        let mut y = initial.to_vector();
        let mut h = if self.initial_step > 0.0 {
            self.initial_step.min(span)
        } else {
            span * 1e-3
        };

        let mut k1 = rhs(model, feed, t, &y);
        let mut steps = 0usize;

        for &target in &times[1..] {
            // Advance internal steps until this grid sample is reached.
            while target - t > h_min {
                steps += 1;
                if steps > self.max_steps {
                    return Err(SimulationError::divergence(
                        t,
                        format!("step budget of {} exhausted", self.max_steps),
                    ));
                }

                let h_step = h.min(target - t);

                let k2 = rhs(model, feed, t + h_step * A21, &(&y + (&k1 * (h_step * A21))));
                let k3 = rhs(
                    model,
                    feed,
                    t + h_step * 0.3,
                    &(&y + &k1 * (h_step * A31) + &k2 * (h_step * A32)),
                );
                let k4 = rhs(
                    model,
                    feed,
                    t + h_step * 0.8,
                    &(&y + &k1 * (h_step * A41) + &k2 * (h_step * A42) + &k3 * (h_step * A43)),
                );
                let k5 = rhs(
                    model,
                    feed,
                    t + h_step * (8.0 / 9.0),
                    &(&y
                        + &k1 * (h_step * A51)
                        + &k2 * (h_step * A52)
                        + &k3 * (h_step * A53)
                        + &k4 * (h_step * A54)),
                );
                let k6 = rhs(
                    model,
                    feed,
                    t + h_step,
                    &(&y
                        + &k1 * (h_step * A61)
                        + &k2 * (h_step * A62)
                        + &k3 * (h_step * A63)
                        + &k4 * (h_step * A64)
                        + &k5 * (h_step * A65)),
                );

                let y_next = &y
                    + &k1 * (h_step * B1)
                    + &k3 * (h_step * B3)
                    + &k4 * (h_step * B4)
                    + &k5 * (h_step * B5)
                    + &k6 * (h_step * B6);

                // FSAL stage, also feeds the error estimate.
                let k7 = rhs(model, feed, t + h_step, &y_next);

                let mut err_norm = 0.0;
                for i in 0..y.len() {
                    let e = h_step
                        * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i]
                            + E7 * k7[i]);
                    let scale = self.atol + self.rtol * y[i].abs().max(y_next[i].abs());
                    err_norm += (e / scale) * (e / scale);
                }
                err_norm = (err_norm / y.len() as f64).sqrt();

                if !err_norm.is_finite() {
                    return Err(SimulationError::divergence(
                        t,
                        "non-finite error estimate (model produced NaN/Inf)",
                    ));
                }

                if err_norm <= 1.0 {
                    t += h_step;
                    y = y_next;
                    k1 = k7;
                } else {
                    log::debug!("rejected step h = {h_step:.3e} at t = {t:.4} (err = {err_norm:.3e})");
                }

                let factor = if err_norm == 0.0 {
                    5.0
                } else {
                    (0.9 * err_norm.powf(-0.2)).clamp(0.2, 5.0)
                };
                h = (h_step * factor).max(h_min);

                if h <= h_min && err_norm > 1.0 {
                    return Err(SimulationError::divergence(
                        t,
                        "step size underflow: tolerance cannot be met",
                    ));
                }
            }

            // Land exactly on the grid sample (t differs by at most h_min).
            t = target;
            let state = ReactorState::from_vector(&y);
            validate_state(&state, target)?;
            states.push(state);
        }

        Ok(states)
    }

    fn name(&self) -> &str {
        "Dormand-Prince 4(5) (adaptive)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
