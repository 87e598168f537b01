//! Error types shared across the crate
//!
//! Three failure classes exist:
//!
//! - **Validation**: an input scalar is non-finite or out of its physical
//!   domain (volume ≤ 0, end time before the effective start with nothing
//!   to clamp to, ...). Always rejected before any solver work begins.
//! - **Divergence**: the integrator exhausted its step budget or produced a
//!   non-finite state. Reported with the time reached; the session
//!   trajectory is left exactly as it was before the call.
//! - **Export / Plot**: I/O or rendering failures in the output module.
//!
//! Degenerate requests (start == end) are NOT errors — they produce a
//! well-formed single-sample response (see `session::ReactorSession`).

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// All failure modes of the simulation core.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Invalid numeric input, rejected before integration starts.
    #[error("invalid input: {what}")]
    Validation { what: String },

    /// The integrator could not satisfy its error tolerance within the
    /// bounded step count, or produced NaN/Inf.
    #[error("solver diverged at t = {t:.6} h: {detail}")]
    Divergence { t: f64, detail: String },

    /// Failure while writing exported data to disk.
    #[error("export failed: {0}")]
    Export(#[from] std::io::Error),

    /// Failure while rendering a plot.
    #[error("plot failed: {0}")]
    Plot(String),
}

impl SimulationError {
    /// Shorthand for a [`SimulationError::Validation`].
    pub fn validation(what: impl Into<String>) -> Self {
        Self::Validation { what: what.into() }
    }

    /// Shorthand for a [`SimulationError::Divergence`].
    pub fn divergence(t: f64, detail: impl Into<String>) -> Self {
        Self::Divergence {
            t,
            detail: detail.into(),
        }
    }

    /// True when the error was raised by input validation (i.e. before any
    /// integration work happened).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

// =================================================================================================
// Tests
// =================================================================================================
