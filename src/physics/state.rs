//! Reactor state container
//!
//! The state of a fed-batch bioreactor is a fixed 4-component vector:
//!
//! | Field       | Symbol | Unit  |
//! |-------------|--------|-------|
//! | `oxygen`    | C_O2   | mg/L  |
//! | `biomass`   | X      | g/L   |
//! | `substrate` | S      | g/L   |
//! | `volume`    | V      | L     |
//!
//! # Unit convention
//!
//! The `oxygen` field is ALWAYS the absolute dissolved oxygen concentration.
//! Percent-of-saturation is a boundary representation that only exists in
//! [`session`](crate::session) ingress/egress conversion — no internal code
//! ever stores a percentage here.
//!
//! # Arithmetic
//!
//! `Add`, `Sub` and `Mul<f64>` are overloaded component-wise so that
//! Runge-Kutta stage algebra reads like the scheme itself:
//!
//! ```rust
//! use fedbatch_rs::physics::ReactorState;
//!
//! let y = ReactorState::new(8.0, 0.1, 5.0, 1.0);
//! let k = ReactorState::new(-0.4, 0.03, -0.07, 0.05);
//! let dt = 0.1;
//!
//! let next = y + k * dt;
//! assert!((next.biomass - 0.103).abs() < 1e-12);
//! ```

use nalgebra::DVector;

// =================================================================================================
// Reactor State
// =================================================================================================

/// Instantaneous state of the culture: dissolved oxygen, biomass,
/// substrate and liquid volume.
///
/// All fields are expected to be non-negative and `volume` strictly
/// positive whenever the state is used as an initial condition — the model
/// divides by V and does not guard that division (precondition, validated
/// at the session boundary).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactorState {
    /// Dissolved oxygen concentration C_O2 [mg/L]
    pub oxygen: f64,

    /// Biomass concentration X [g/L]
    pub biomass: f64,

    /// Substrate concentration S [g/L]
    pub substrate: f64,

    /// Culture volume V [L]
    pub volume: f64,
}

impl ReactorState {
    /// Create a state from its four components.
    pub fn new(oxygen: f64, biomass: f64, substrate: f64, volume: f64) -> Self {
        Self {
            oxygen,
            biomass,
            substrate,
            volume,
        }
    }

    /// All-zero state. Useful as an accumulator for stage algebra.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Pack into a `DVector` with the layout `[C_O2, X, S, V]`.
    ///
    /// Solvers that do their stage arithmetic in vector space (the adaptive
    /// Dormand-Prince method) work on this representation.
    pub fn to_vector(self) -> DVector<f64> {
        DVector::from_vec(vec![self.oxygen, self.biomass, self.substrate, self.volume])
    }

    /// Unpack from a `DVector` with the layout `[C_O2, X, S, V]`.
    ///
    /// # Panics
    ///
    /// Panics when the vector does not have exactly 4 components. The
    /// vector layout is crate-internal, so a mismatch is a programming
    /// error, not an input error.
    pub fn from_vector(v: &DVector<f64>) -> Self {
        assert_eq!(v.len(), 4, "reactor state vector must have 4 components");
        Self::new(v[0], v[1], v[2], v[3])
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.oxygen.is_finite()
            && self.biomass.is_finite()
            && self.substrate.is_finite()
            && self.volume.is_finite()
    }
}

// =================================================================================================
// Component-wise arithmetic (Runge-Kutta stage algebra)
// =================================================================================================

impl std::ops::Add for ReactorState {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.oxygen + rhs.oxygen,
            self.biomass + rhs.biomass,
            self.substrate + rhs.substrate,
            self.volume + rhs.volume,
        )
    }
}

impl std::ops::Sub for ReactorState {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.oxygen - rhs.oxygen,
            self.biomass - rhs.biomass,
            self.substrate - rhs.substrate,
            self.volume - rhs.volume,
        )
    }
}

impl std::ops::Mul<f64> for ReactorState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(
            self.oxygen * scalar,
            self.biomass * scalar,
            self.substrate * scalar,
            self.volume * scalar,
        )
    }
}

impl std::ops::Mul<ReactorState> for f64 {
    type Output = ReactorState;

    fn mul(self, rhs: ReactorState) -> ReactorState {
        rhs * self
    }
}

impl std::fmt::Display for ReactorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "C_O2 = {:.4} mg/L, X = {:.4} g/L, S = {:.4} g/L, V = {:.4} L",
            self.oxygen, self.biomass, self.substrate, self.volume
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================
