//! Numerical solvers
//!
//! This module separates WHAT is solved from HOW it is solved:
//!
//! 1. **Model** ([`KineticModel`](crate::physics::KineticModel)) — the
//!    equations.
//! 2. **Grid** ([`TimeGrid`]) — where along the time axis the solution is
//!    reported.
//! 3. **Integrator** ([`Integrator`]) — the numerical method traversing
//!    the grid.
//!
//! The same grid and model can be handed to any method; the session layer
//! only ever talks to the trait.
//!
//! # Module Organization
//!
//! - **`grid`**: evenly spaced time grids with the degenerate single-point
//!   case handled as a valid grid
//! - **`traits`**: the `Integrator` trait
//! - **`methods`**: fixed-step RK4 and adaptive Dormand-Prince 4(5)

mod grid;
mod methods;
mod traits;

pub use grid::{TimeGrid, DEFAULT_SAMPLES};
pub use methods::{DopriIntegrator, Rk4Integrator};
pub use traits::Integrator;

use crate::error::Result;
use crate::error::SimulationError;
use crate::physics::ReactorState;

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Check an integrated state for NaN/Inf.
///
/// Non-finite values indicate numerical instability or a physics
/// precondition violation (e.g. volume driven to zero). They are surfaced
/// as [`SimulationError::Divergence`] with the grid time reached, never
/// silently truncated.
pub(crate) fn validate_state(state: &ReactorState, t: f64) -> Result<()> {
    if state.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::divergence(
            t,
            format!("non-finite state produced: {state:?}"),
        ))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
