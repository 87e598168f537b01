//! Physical state and model interface
//!
//! This module defines the core API shared by models and solvers:
//!
//! - [`ReactorState`]: the 4-component state vector (oxygen, biomass,
//!   substrate, volume)
//! - [`Feed`]: per-request control inputs (flow rate, feed substrate)
//! - [`KineticModel`]: trait implemented by all bioreactor models
//!
//! Concrete models live in [`models`](crate::models); numerical methods in
//! [`solver`](crate::solver).

mod state;
mod traits;

pub use state::ReactorState;
pub use traits::{Feed, KineticModel};
