//! Integrator trait
//!
//! An integrator advances a kinetic model over a [`TimeGrid`] and returns
//! the state at every grid sample. The trait says nothing about HOW the
//! interval between two samples is traversed — a fixed-step method
//! subdivides it, an adaptive method picks its own internal steps and
//! lands exactly on the sample times.

use crate::error::Result;
use crate::physics::{Feed, KineticModel, ReactorState};
use crate::solver::TimeGrid;

/// Numerical time integrator for bioreactor kinetics.
///
/// # Contract
///
/// - The returned vector has exactly `grid.len()` states, the first being
///   `initial` unchanged.
/// - A degenerate single-point grid returns `vec![initial]` without
///   evaluating the model.
/// - Any non-finite state or exhausted step budget is reported as
///   [`SimulationError::Divergence`](crate::SimulationError::Divergence);
///   no partial trajectory is returned.
///
/// Implementations are stateless and reusable across simulations.
pub trait Integrator: Send + Sync {
    /// Integrate `model` from `initial` across all samples of `grid`.
    fn integrate(
        &self,
        model: &dyn KineticModel,
        feed: &Feed,
        grid: &TimeGrid,
        initial: ReactorState,
    ) -> Result<Vec<ReactorState>>;

    /// Name of the method (display and logging).
    fn name(&self) -> &str;
}
