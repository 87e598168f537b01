//! fedbatch-rs: Fed-Batch Bioreactor Simulation Framework
//!
//! A framework for simulating fed-batch microbial cultures with Monod
//! growth kinetics, dissolved-oxygen transfer and volume dilution. Built
//! with Rust for performance and safety.
//!
//! # Architecture
//!
//! fedbatch-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Kinetic models define the mass balances (what to solve)
//!    - Numerical integrators provide the methods (how to solve)
//!
//! 2. **Sessions own trajectories**
//!    - A [`session::ReactorSession`] accumulates one trajectory across
//!      repeated simulate requests, resuming from stored state and
//!      rewinding history when a request starts inside it
//!    - Unit conversion (percent of oxygen saturation) happens only at
//!      the session boundary; physics and solvers see absolute units
//!
//! # Quick Start
//!
//! ```rust
//! use fedbatch_rs::models::{GrowthLimitation, KineticParameters, MonodFedBatch};
//! use fedbatch_rs::physics::{Feed, ReactorState};
//! use fedbatch_rs::session::ReactorSession;
//!
//! # fn main() -> Result<(), fedbatch_rs::SimulationError> {
//! // 1. Kinetic model: default parameters, oxygen-limited Monod growth
//! let model = MonodFedBatch::new(
//!     KineticParameters::default(),
//!     GrowthLimitation::SubstrateAndOxygen,
//! )?;
//!
//! // 2. Session with the default adaptive integrator
//! let mut session = ReactorSession::new(Box::new(model));
//!
//! // 3. Simulate 10 h from a fresh inoculum (oxygen in % saturation)
//! let initial = ReactorState::new(100.0, 0.1, 5.0, 1.0);
//! let feed = Feed::new(0.05, 10.0);
//! let output = session.simulate(0.0, 10.0, initial, &feed)?;
//!
//! // 4. Parallel arrays, one value per sample time
//! println!("final biomass: {:.3} g/L", output.biomass.last().unwrap());
//!
//! // 5. Continue the culture; stored state at t = 10 is resumed
//! let merged = session.simulate(10.0, 16.0, initial, &feed)?;
//! assert!(merged.times.len() > output.times.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Reactor state and the kinetic-model trait
//! - [`models`]: Monod fed-batch kinetics
//! - [`solver`]: Time grids and numerical integrators
//! - [`session`]: Trajectory accumulation and continuation
//! - [`output`]: CSV export and static plots

pub mod error;
pub mod models;
pub mod output;
pub mod physics;
pub mod session;
pub mod solver;

pub use error::{Result, SimulationError};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use fedbatch_rs::prelude::*;
    //! ```
    pub use crate::error::{Result, SimulationError};
    pub use crate::models::{GrowthLimitation, KineticParameters, MonodFedBatch};
    pub use crate::physics::{Feed, KineticModel, ReactorState};
    pub use crate::session::{OxygenUnit, ReactorSession, SimulationOutput};
    pub use crate::solver::{DopriIntegrator, Integrator, Rk4Integrator, TimeGrid};
}
