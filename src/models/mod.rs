//! Bioreactor kinetic models
//!
//! All models implement the [`KineticModel`](crate::physics::KineticModel)
//! trait. The solver calls `derivatives` at each stage evaluation — models
//! are responsible for the physics (growth, transfer, dilution), the
//! solver for the time integration.
//!
//! # Available Models
//!
//! ## [`MonodFedBatch`]
//!
//! Fed-batch culture with Monod growth kinetics. The growth-rate law is a
//! configuration variant ([`GrowthLimitation`]): substrate-limited, or
//! jointly substrate- and oxygen-limited. One polymorphic model replaces
//! what would otherwise be near-duplicate integration drivers per variant.

mod monod;

pub use monod::{GrowthLimitation, KineticParameters, MonodFedBatch};
