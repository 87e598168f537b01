//! Monod fed-batch bioreactor model
//!
//! # Mathematical Background
//!
//! ## Monod growth kinetics
//!
//! The specific growth rate μ saturates with the limiting nutrient
//! concentration:
//!
//! ```text
//! μ = μ_max · S/(K_S + S)                        (substrate-limited)
//! μ = μ_max · S/(K_S + S) · C_O2/(K_O2 + C_O2)   (substrate- and oxygen-limited)
//! ```
//!
//! Which formulation applies is a process decision made once at model
//! construction ([`GrowthLimitation`]), never per request.
//!
//! ## Balance equations
//!
//! With feed flow F and feed substrate concentration S_in, the fed-batch
//! balances are:
//!
//! ```text
//! dV/dt    = F
//! dX/dt    = μ·X − (F/V)·X
//! dS/dt    = −(μ/Y_xs)·X + (F/V)·(S_in − S)
//! dC_O2/dt = k_La·(C_O2* − C_O2) − q_O2·X − (F/V)·C_O2
//! ```
//!
//! The (F/V) terms are dilution: adding feed grows the volume and thins
//! every concentration. k_La·(C_O2* − C_O2) is gas-liquid oxygen transfer
//! toward saturation, q_O2·X is the respiration sink.
//!
//! ## Preconditions
//!
//! V > 0 at all times. The division by V is unguarded on purpose: a
//! vanishing volume is an input error that the session layer rejects, and
//! with F ≥ 0 a positive volume can only grow.
//!
//! # Example
//!
//! ```rust
//! use fedbatch_rs::models::{GrowthLimitation, KineticParameters, MonodFedBatch};
//! use fedbatch_rs::physics::{Feed, KineticModel, ReactorState};
//!
//! let model = MonodFedBatch::new(
//!     KineticParameters::default(),
//!     GrowthLimitation::SubstrateAndOxygen,
//! ).unwrap();
//!
//! let state = ReactorState::new(8.0, 0.1, 5.0, 1.0);
//! let feed = Feed::new(0.05, 10.0);
//! let dy = model.derivatives(0.0, &state, &feed);
//!
//! // Feed only enters the volume balance: dV/dt = F
//! assert!((dy.volume - 0.05).abs() < 1e-12);
//! ```

use crate::error::{Result, SimulationError};
use crate::physics::{Feed, KineticModel, ReactorState};

// =================================================================================================
// Growth Limitation Variant
// =================================================================================================

/// Which nutrients limit growth in the Monod rate law.
///
/// Selected once at model setup. Both variants share the same balance
/// equations; only the μ expression differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthLimitation {
    /// μ = μ_max · S/(K_S + S)
    Substrate,

    /// μ = μ_max · S/(K_S + S) · C_O2/(K_O2 + C_O2)
    SubstrateAndOxygen,
}

// =================================================================================================
// Kinetic Parameters
// =================================================================================================

/// Process-wide kinetic constants, fixed at configuration time.
///
/// Defaults are the reference deployment values for a laboratory
/// fed-batch culture.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KineticParameters {
    /// Maximum specific growth rate μ_max [1/h]
    pub mu_max: f64,

    /// Substrate half-saturation constant K_S [g/L]
    pub k_s: f64,

    /// Oxygen half-saturation constant K_O2 [mg/L]
    pub k_o2: f64,

    /// Biomass-on-substrate yield Y_xs [g/g]
    pub y_xs: f64,

    /// Volumetric oxygen transfer coefficient k_La [1/h]
    pub k_la: f64,

    /// Oxygen saturation concentration C_O2* [mg/L]
    pub c_o2_star: f64,

    /// Specific oxygen uptake rate q_O2 [mg/(g·h)]
    pub q_o2: f64,
}

impl Default for KineticParameters {
    fn default() -> Self {
        Self {
            mu_max: 0.3,
            k_s: 0.5,
            k_o2: 0.5,
            y_xs: 0.4,
            k_la: 0.1,
            c_o2_star: 8.0,
            q_o2: 0.5,
        }
    }
}

impl KineticParameters {
    /// Check the constants are finite and in their physical domain.
    ///
    /// Half-saturation constants, yield and saturation concentration must
    /// be strictly positive — each appears in a denominator or a boundary
    /// conversion. Rates (μ_max, k_La, q_O2) must be non-negative.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("K_S", self.k_s),
            ("K_O2", self.k_o2),
            ("Y_xs", self.y_xs),
            ("C_O2*", self.c_o2_star),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::validation(format!(
                    "{name} must be finite and strictly positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("mu_max", self.mu_max),
            ("k_La", self.k_la),
            ("q_O2", self.q_o2),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::validation(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

// =================================================================================================
// Monod Fed-Batch Model
// =================================================================================================

/// Fed-batch bioreactor with Monod-type growth kinetics.
///
/// Stateless and deterministic: the same `(t, state, feed)` always yields
/// the same derivative vector, so one model instance can back many
/// sessions and solver runs concurrently.
#[derive(Debug, Clone, Copy)]
pub struct MonodFedBatch {
    params: KineticParameters,
    limitation: GrowthLimitation,
}

impl MonodFedBatch {
    /// Create a model, validating the kinetic constants once.
    pub fn new(params: KineticParameters, limitation: GrowthLimitation) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, limitation })
    }

    /// Kinetic constants in use.
    pub fn params(&self) -> &KineticParameters {
        &self.params
    }

    /// Configured growth limitation variant.
    pub fn limitation(&self) -> GrowthLimitation {
        self.limitation
    }

    /// Specific growth rate μ at the given substrate and oxygen
    /// concentrations [1/h].
    #[inline]
    pub fn specific_growth_rate(&self, substrate: f64, oxygen: f64) -> f64 {
        let p = &self.params;
        let substrate_term = substrate / (p.k_s + substrate);
        match self.limitation {
            GrowthLimitation::Substrate => p.mu_max * substrate_term,
            GrowthLimitation::SubstrateAndOxygen => {
                p.mu_max * substrate_term * (oxygen / (p.k_o2 + oxygen))
            }
        }
    }
}

impl KineticModel for MonodFedBatch {
    fn derivatives(&self, _t: f64, state: &ReactorState, feed: &Feed) -> ReactorState {
        let p = &self.params;
        let mu = self.specific_growth_rate(state.substrate, state.oxygen);

        // Dilution rate F/V. V > 0 is a precondition (see module docs).
        let dilution = feed.flow_rate / state.volume;

        ReactorState {
            oxygen: p.k_la * (p.c_o2_star - state.oxygen)
                - p.q_o2 * state.biomass
                - dilution * state.oxygen,
            biomass: mu * state.biomass - dilution * state.biomass,
            substrate: -(mu / p.y_xs) * state.biomass
                + dilution * (feed.substrate_in - state.substrate),
            volume: feed.flow_rate,
        }
    }

    fn oxygen_saturation(&self) -> f64 {
        self.params.c_o2_star
    }

    fn name(&self) -> &str {
        match self.limitation {
            GrowthLimitation::Substrate => "Monod Fed-Batch (substrate-limited)",
            GrowthLimitation::SubstrateAndOxygen => "Monod Fed-Batch (substrate/oxygen-limited)",
        }
    }

    fn description(&self) -> Option<&str> {
        Some("Fed-batch bioreactor: dissolved oxygen, biomass, substrate and volume balances")
    }
}

// =================================================================================================
// Tests
// =================================================================================================
