//! Time grid construction
//!
//! A simulation segment is sampled on a fixed-count grid of strictly
//! increasing times. The default density (101 points inclusive) matches the
//! reference deployment's `linspace(t0, t1, 101)`.
//!
//! A degenerate request with `start == end` yields a single-point grid —
//! a valid grid, not an error. The engine uses it to return a well-formed
//! single-sample trajectory.

use crate::error::{Result, SimulationError};

/// Default number of samples per segment, endpoints inclusive.
pub const DEFAULT_SAMPLES: usize = 101;

// =================================================================================================
// Time Grid
// =================================================================================================

/// Ordered, strictly increasing sequence of sample times.
///
/// # Example
///
/// ```rust
/// use fedbatch_rs::solver::TimeGrid;
///
/// let grid = TimeGrid::linspace(0.0, 10.0, 101).unwrap();
/// assert_eq!(grid.len(), 101);
/// assert_eq!(grid.start(), 0.0);
/// assert_eq!(grid.end(), 10.0);
///
/// let point = TimeGrid::linspace(5.0, 5.0, 101).unwrap();
/// assert!(point.is_degenerate());
/// assert_eq!(point.times(), &[5.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Build an evenly spaced grid of `samples` points from `start` to
    /// `end` inclusive.
    ///
    /// `start == end` collapses to a single-point grid regardless of
    /// `samples`. Otherwise at least 2 samples are required.
    pub fn linspace(start: f64, end: f64, samples: usize) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SimulationError::validation(format!(
                "grid bounds must be finite, got [{start}, {end}]"
            )));
        }
        if end < start {
            return Err(SimulationError::validation(format!(
                "grid end {end} precedes start {start}"
            )));
        }
        if start == end {
            return Ok(Self { times: vec![start] });
        }
        if samples < 2 {
            return Err(SimulationError::validation(format!(
                "a non-degenerate grid needs at least 2 samples, got {samples}"
            )));
        }

        let span = end - start;
        let steps = (samples - 1) as f64;

        // Times are computed from the index, not accumulated, so the last
        // sample is exactly `end` within one rounding of the span.
        let mut times: Vec<f64> = (0..samples)
            .map(|i| start + span * (i as f64) / steps)
            .collect();
        times[samples - 1] = end;

        Ok(Self { times })
    }

    /// Sample times, strictly increasing.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of samples (≥ 1).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// A grid always has at least one sample.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True for a single-point grid (start == end request).
    pub fn is_degenerate(&self) -> bool {
        self.times.len() == 1
    }

    /// First sample time.
    pub fn start(&self) -> f64 {
        self.times[0]
    }

    /// Last sample time.
    pub fn end(&self) -> f64 {
        *self.times.last().expect("grid is never empty")
    }
}

// =================================================================================================
// Tests
// =================================================================================================
