//! Kinetic model trait and per-request control inputs
//!
//! # Responsibility split
//!
//! The model provides the physics (derivative equations), the solver
//! provides the numerics (method to integrate them). A model implementation
//! must be stateless and deterministic: it maps `(t, state, feed)` to a
//! derivative vector and does nothing else.
//!
//! Process-wide kinetic constants (saturation constants, yields, transfer
//! coefficients) belong to the model itself, fixed at construction. The
//! quantities an operator changes per request — feed flow and feed substrate
//! concentration — travel separately as [`Feed`].

use crate::error::{Result, SimulationError};
use crate::physics::ReactorState;

// =================================================================================================
// Control Inputs
// =================================================================================================

/// Per-request control inputs of a fed-batch run.
///
/// The reactor is fed-batch: feed is added, culture is never withdrawn, so
/// a negative flow rate is rejected at validation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feed {
    /// Feed flow rate F [L/h]
    pub flow_rate: f64,

    /// Substrate concentration in the feed S_in [g/L]
    pub substrate_in: f64,
}

impl Feed {
    /// Create a feed description.
    pub fn new(flow_rate: f64, substrate_in: f64) -> Self {
        Self {
            flow_rate,
            substrate_in,
        }
    }

    /// Check that both inputs are finite and physically meaningful.
    pub fn validate(&self) -> Result<()> {
        if !self.flow_rate.is_finite() {
            return Err(SimulationError::validation(format!(
                "feed flow rate must be finite, got {}",
                self.flow_rate
            )));
        }
        if self.flow_rate < 0.0 {
            return Err(SimulationError::validation(format!(
                "feed flow rate must be non-negative (fed-batch operation), got {}",
                self.flow_rate
            )));
        }
        if !self.substrate_in.is_finite() || self.substrate_in < 0.0 {
            return Err(SimulationError::validation(format!(
                "feed substrate concentration must be finite and non-negative, got {}",
                self.substrate_in
            )));
        }
        Ok(())
    }
}

// =================================================================================================
// Kinetic Model Trait
// =================================================================================================

/// Trait for bioreactor kinetic models.
///
/// # Contract
///
/// `derivatives` returns dy/dt for the current state. The formulation is
/// autonomous — `t` is unused by the shipped Monod model — but the
/// parameter is part of the interface so that time-dependent feed profiles
/// or induction terms can be added without breaking every solver.
///
/// # Precondition
///
/// `state.volume > 0`. The equations divide by V and the division is
/// deliberately unguarded: a zero volume is an input error that the
/// session layer rejects before any solver work, not something the physics
/// silently patches.
pub trait KineticModel: Send + Sync {
    /// Evaluate dy/dt at `(t, state)` under the given control inputs.
    fn derivatives(&self, t: f64, state: &ReactorState, feed: &Feed) -> ReactorState;

    /// Oxygen saturation concentration C_O2* [mg/L].
    ///
    /// Used by the session boundary to convert between absolute
    /// concentration and percent of saturation.
    fn oxygen_saturation(&self) -> f64;

    /// Name of the model (display and logging).
    fn name(&self) -> &str;

    /// Optional longer description.
    fn description(&self) -> Option<&str> {
        None
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_validation_accepts_zero_flow() {
        assert!(Feed::new(0.0, 0.0).validate().is_ok());
        assert!(Feed::new(0.05, 10.0).validate().is_ok());
    }

    #[test]
    fn test_feed_validation_rejects_negative_flow() {
        let err = Feed::new(-0.1, 10.0).validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_feed_validation_rejects_non_finite() {
        assert!(Feed::new(f64::NAN, 10.0).validate().is_err());
        assert!(Feed::new(0.05, f64::INFINITY).validate().is_err());
        assert!(Feed::new(0.05, -1.0).validate().is_err());
    }
}
