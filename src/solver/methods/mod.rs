//! Numerical integration methods
//!
//! Concrete implementations of the [`Integrator`](crate::solver::Integrator)
//! trait. The trait is the stable seam; methods are added here without
//! touching callers.
//!
//! # Available Methods
//!
//! - **[`Rk4Integrator`]**: classical fixed-step Runge-Kutta 4. Simple,
//!   no tuning, fourth-order accurate. Good when the grid density is
//!   already fine enough for the kinetics at hand.
//! - **[`DopriIntegrator`]**: adaptive Dormand-Prince 4(5) with embedded
//!   error control. The default — it keeps the error at the configured
//!   tolerance regardless of how coarse the reporting grid is, and its
//!   step budget bounds the work done for pathological inputs.

mod dopri;
mod rk4;

pub use dopri::DopriIntegrator;
pub use rk4::Rk4Integrator;

// =================================================================================================
// Shared test kinetics
// =================================================================================================
