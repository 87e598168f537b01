//! Session trajectory engine
//!
//! A [`ReactorSession`] owns one growing [`Trajectory`] and decides, for
//! every simulate request, where the new segment splices onto the stored
//! history:
//!
//! - **Fresh start** — empty trajectory: the caller-supplied initial state
//!   is used (converted to internal units).
//! - **Continuation** — the request starts at or inside stored history:
//!   the first stored sample with `time >= start` becomes the initial
//!   condition, everything after it is discarded, and the segment resumes
//!   from that sample's own time (never integrating backward). The
//!   caller's initial state is ignored. This is "rewind and redo": history
//!   past the splice point is replaced, not merged.
//! - **Gap** — the request starts beyond the stored end: the last stored
//!   sample provides the initial condition, the requested start time is
//!   kept, and nothing is truncated.
//!
//! Appending is all-or-nothing per segment: a solver failure leaves the
//! stored trajectory exactly as it was.
//!
//! # State machine
//!
//! ```text
//! EMPTY ──simulate──▶ ACTIVE ──simulate──▶ ACTIVE (possibly truncating)
//!   ▲                   │
//!   └───────reset───────┘        (reset is idempotent)
//! ```
//!
//! # Units at the boundary
//!
//! Internally oxygen is always an absolute concentration [mg/L]. The
//! session converts at ingress/egress only, according to its configured
//! [`OxygenUnit`] — by default percent of saturation, matching the
//! reference deployment (`percent = 100 · C_O2 / C_O2*`).
//!
//! # Concurrency
//!
//! `simulate` and `reset` take `&mut self`: exclusive access is enforced
//! by ownership. A host dispatching concurrent requests wraps each
//! session in its own lock; sessions share nothing with each other.

mod trajectory;

pub use trajectory::{Sample, Trajectory};

use crate::error::{Result, SimulationError};
use crate::physics::{Feed, KineticModel, ReactorState};
use crate::solver::{DopriIntegrator, Integrator, TimeGrid, DEFAULT_SAMPLES};

// =================================================================================================
// Boundary Units
// =================================================================================================

/// How the oxygen channel is exchanged with the hosting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OxygenUnit {
    /// Absolute dissolved oxygen concentration [mg/L].
    Concentration,

    /// Percent of the saturation concentration C_O2*.
    PercentSaturation,
}

// =================================================================================================
// Simulation Output
// =================================================================================================

/// Parallel-array view of a trajectory, as consumed by the hosting layer.
///
/// All five vectors have equal length and `times` is strictly increasing.
/// Oxygen is expressed in the session's configured [`OxygenUnit`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationOutput {
    /// Sample times [h]
    pub times: Vec<f64>,

    /// Dissolved oxygen, in the configured boundary unit
    pub oxygen: Vec<f64>,

    /// Biomass concentration [g/L]
    pub biomass: Vec<f64>,

    /// Substrate concentration [g/L]
    pub substrate: Vec<f64>,

    /// Culture volume [L]
    pub volume: Vec<f64>,
}

impl SimulationOutput {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when the output holds no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

// =================================================================================================
// Reactor Session
// =================================================================================================

/// One client session: a kinetic model, an integrator and the accumulated
/// trajectory.
///
/// # Example
///
/// ```rust
/// use fedbatch_rs::models::{GrowthLimitation, KineticParameters, MonodFedBatch};
/// use fedbatch_rs::physics::{Feed, ReactorState};
/// use fedbatch_rs::session::ReactorSession;
///
/// # fn main() -> Result<(), fedbatch_rs::SimulationError> {
/// let model = MonodFedBatch::new(
///     KineticParameters::default(),
///     GrowthLimitation::SubstrateAndOxygen,
/// )?;
/// let mut session = ReactorSession::new(Box::new(model));
///
/// // Oxygen given in percent of saturation (the default boundary unit).
/// let initial = ReactorState::new(100.0, 0.1, 5.0, 1.0);
/// let feed = Feed::new(0.05, 10.0);
///
/// let first = session.simulate(0.0, 10.0, initial, &feed)?;
/// assert_eq!(first.times.len(), 101);
///
/// // Continuation: the initial override is ignored, the stored state at
/// // t = 10 is resumed.
/// let merged = session.simulate(10.0, 20.0, ReactorState::zero(), &feed)?;
/// assert_eq!(merged.times.len(), 201);
/// # Ok(())
/// # }
/// ```
pub struct ReactorSession {
    model: Box<dyn KineticModel>,
    integrator: Box<dyn Integrator>,
    oxygen_unit: OxygenUnit,
    samples_per_segment: usize,
    segment_only: bool,
    trajectory: Trajectory,
}

/// Resolved initial condition of one segment.
struct SegmentStart {
    state: ReactorState,
    time: f64,
    /// Splice index into the stored trajectory, when resuming inside it.
    truncate_at: Option<usize>,
}

impl ReactorSession {
    /// Create a session with the default configuration: adaptive
    /// Dormand-Prince integrator, 101 samples per segment, oxygen
    /// exchanged as percent of saturation, full merged trajectory in
    /// every response.
    pub fn new(model: Box<dyn KineticModel>) -> Self {
        Self {
            model,
            integrator: Box::new(DopriIntegrator::default()),
            oxygen_unit: OxygenUnit::PercentSaturation,
            samples_per_segment: DEFAULT_SAMPLES,
            segment_only: false,
            trajectory: Trajectory::new(),
        }
    }

    /// Replace the integrator.
    pub fn with_integrator(mut self, integrator: Box<dyn Integrator>) -> Self {
        self.integrator = integrator;
        self
    }

    /// Set the boundary unit for the oxygen channel.
    pub fn with_oxygen_unit(mut self, unit: OxygenUnit) -> Self {
        self.oxygen_unit = unit;
        self
    }

    /// Set the sample count per segment (endpoints inclusive).
    pub fn with_samples_per_segment(mut self, samples: usize) -> Self {
        self.samples_per_segment = samples;
        self
    }

    /// When set, responses carry only the newly computed segment instead
    /// of the full merged trajectory. The stored history still grows the
    /// same way — this is a reporting choice, not a behavioral one.
    pub fn with_segment_only(mut self, segment_only: bool) -> Self {
        self.segment_only = segment_only;
        self
    }

    /// The accumulated trajectory (oxygen in absolute units).
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// True once at least one simulate call has stored samples.
    pub fn is_active(&self) -> bool {
        !self.trajectory.is_empty()
    }

    // ====================================== Operations ======================================

    /// Run one simulation segment from `start` to `end` and splice it onto
    /// the session trajectory.
    ///
    /// `initial` is only honored on a fresh (empty) session; on
    /// continuation the stored state at the splice point wins. Returns the
    /// full merged trajectory (or only the new segment, when configured).
    ///
    /// # Errors
    ///
    /// - [`Validation`](SimulationError::Validation) for non-finite
    ///   scalars, volume ≤ 0, or `end` before the effective start —
    ///   rejected before any integration.
    /// - [`Divergence`](SimulationError::Divergence) when the integrator
    ///   gives up; the stored trajectory is untouched in that case.
    pub fn simulate(
        &mut self,
        start: f64,
        end: f64,
        initial: ReactorState,
        feed: &Feed,
    ) -> Result<SimulationOutput> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SimulationError::validation(format!(
                "time window must be finite, got [{start}, {end}]"
            )));
        }
        feed.validate()?;

        let segment = self.resolve_start(start, initial)?;

        if end < segment.time {
            return Err(SimulationError::validation(format!(
                "end time {end} precedes the effective start {}",
                segment.time
            )));
        }

        let grid = TimeGrid::linspace(segment.time, end, self.samples_per_segment)?;
        log::debug!(
            "integrating `{}` over [{:.4}, {:.4}] h ({} samples) with {}",
            self.model.name(),
            grid.start(),
            grid.end(),
            grid.len(),
            self.integrator.name(),
        );

        let states = self
            .integrator
            .integrate(self.model.as_ref(), feed, &grid, segment.state)?;

        // Integration succeeded — now, and only now, mutate the history.
        if let Some(index) = segment.truncate_at {
            let dropped = self.trajectory.len() - (index + 1);
            if dropped > 0 {
                log::debug!("rewind to t = {:.4} h discards {dropped} stored samples", segment.time);
            }
            self.trajectory.truncate_after(index);
        }

        let duplicate_first = self
            .trajectory
            .last()
            .map_or(false, |s| s.time == grid.start());
        self.trajectory
            .extend_segment(grid.times(), &states, duplicate_first);

        let output = if self.segment_only {
            self.output_from(grid.times().iter().copied().zip(states.iter().copied()))
        } else {
            self.output_from(
                self.trajectory
                    .samples()
                    .iter()
                    .map(|s| (s.time, s.state)),
            )
        };
        Ok(output)
    }

    /// Clear the session trajectory. Idempotent; the next simulate call
    /// behaves as a fresh start.
    pub fn reset(&mut self) {
        log::debug!("session reset, discarding {} samples", self.trajectory.len());
        self.trajectory.clear();
    }

    // ===================================== Resolution =====================================

    /// Decide initial state, effective start time and truncation for the
    /// requested segment.
    fn resolve_start(&self, start: f64, initial: ReactorState) -> Result<SegmentStart> {
        if self.trajectory.is_empty() {
            return Ok(SegmentStart {
                state: self.ingress(initial)?,
                time: start,
                truncate_at: None,
            });
        }

        let index = self.trajectory.splice_index(start);
        if index == self.trajectory.len() {
            // Request starts beyond stored history: continue from the last
            // sample across the gap.
            let last = self.trajectory.last().expect("trajectory is non-empty");
            log::debug!(
                "continuation across gap [{:.4}, {start:.4}] h; initial override ignored",
                last.time
            );
            Ok(SegmentStart {
                state: last.state,
                time: start,
                truncate_at: None,
            })
        } else {
            let sample = self.trajectory.samples()[index];
            log::debug!(
                "resuming from stored sample at t = {:.4} h; initial override ignored",
                sample.time
            );
            Ok(SegmentStart {
                state: sample.state,
                time: sample.time,
                truncate_at: Some(index),
            })
        }
    }

    // =================================== Unit conversion ===================================

    /// Validate a caller-supplied initial state and convert it to internal
    /// units.
    fn ingress(&self, boundary: ReactorState) -> Result<ReactorState> {
        if !boundary.is_finite() {
            return Err(SimulationError::validation(format!(
                "initial state must be finite, got {boundary:?}"
            )));
        }
        if boundary.volume <= 0.0 {
            return Err(SimulationError::validation(format!(
                "initial volume must be strictly positive, got {}",
                boundary.volume
            )));
        }
        if boundary.oxygen < 0.0 || boundary.biomass < 0.0 || boundary.substrate < 0.0 {
            return Err(SimulationError::validation(format!(
                "concentrations must be non-negative, got {boundary:?}"
            )));
        }

        let oxygen = match self.oxygen_unit {
            OxygenUnit::Concentration => boundary.oxygen,
            OxygenUnit::PercentSaturation => {
                boundary.oxygen / 100.0 * self.model.oxygen_saturation()
            }
        };
        Ok(ReactorState { oxygen, ..boundary })
    }

    /// Oxygen in the configured boundary unit.
    fn egress_oxygen(&self, oxygen: f64) -> f64 {
        match self.oxygen_unit {
            OxygenUnit::Concentration => oxygen,
            OxygenUnit::PercentSaturation => 100.0 * oxygen / self.model.oxygen_saturation(),
        }
    }

    /// Build the parallel-array response from `(time, state)` pairs.
    fn output_from(&self, samples: impl Iterator<Item = (f64, ReactorState)>) -> SimulationOutput {
        let (lower, _) = samples.size_hint();
        let mut output = SimulationOutput {
            times: Vec::with_capacity(lower),
            oxygen: Vec::with_capacity(lower),
            biomass: Vec::with_capacity(lower),
            substrate: Vec::with_capacity(lower),
            volume: Vec::with_capacity(lower),
        };
        for (time, state) in samples {
            output.times.push(time);
            output.oxygen.push(self.egress_oxygen(state.oxygen));
            output.biomass.push(state.biomass);
            output.substrate.push(state.substrate);
            output.volume.push(state.volume);
        }
        output
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GrowthLimitation, KineticParameters, MonodFedBatch};

    fn reference_session() -> ReactorSession {
        let model = MonodFedBatch::new(
            KineticParameters::default(),
            GrowthLimitation::SubstrateAndOxygen,
        )
        .unwrap();
        ReactorSession::new(Box::new(model))
    }

    fn reference_feed() -> Feed {
        Feed::new(0.05, 10.0)
    }

    #[test]
    fn test_fresh_start_uses_initial_override() {
        let mut session = reference_session().with_oxygen_unit(OxygenUnit::Concentration);
        let initial = ReactorState::new(8.0, 0.1, 5.0, 1.0);

        let output = session
            .simulate(0.0, 10.0, initial, &reference_feed())
            .unwrap();

        assert_eq!(output.times[0], 0.0);
        assert_eq!(output.oxygen[0], 8.0);
        assert_eq!(output.biomass[0], 0.1);
    }

    #[test]
    fn test_percent_saturation_converts_at_both_boundaries() {
        let mut session = reference_session(); // percent is the default
        let initial = ReactorState::new(100.0, 0.1, 5.0, 1.0); // 100% of C_O2* = 8 mg/L

        let output = session
            .simulate(0.0, 1.0, initial, &reference_feed())
            .unwrap();

        // Boundary value round-trips: 100% in, 100% out at t = 0.
        assert!((output.oxygen[0] - 100.0).abs() < 1e-12);
        // Internally the trajectory stores 8 mg/L, not 100.
        assert!((session.trajectory().samples()[0].state.oxygen - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_validation_rejects_non_positive_volume() {
        let mut session = reference_session();
        let initial = ReactorState::new(100.0, 0.1, 5.0, 0.0);

        let err = session
            .simulate(0.0, 10.0, initial, &reference_feed())
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!session.is_active(), "no state stored after rejection");
    }

    #[test]
    fn test_validation_rejects_reversed_window_on_fresh_session() {
        let mut session = reference_session();
        let initial = ReactorState::new(100.0, 0.1, 5.0, 1.0);

        let err = session
            .simulate(10.0, 5.0, initial, &reference_feed())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_degenerate_request_single_sample() {
        let mut session = reference_session().with_oxygen_unit(OxygenUnit::Concentration);
        let initial = ReactorState::new(8.0, 0.1, 5.0, 1.0);

        let output = session
            .simulate(5.0, 5.0, initial, &reference_feed())
            .unwrap();

        assert_eq!(output.len(), 1);
        assert_eq!(output.times, vec![5.0]);
        assert_eq!(output.biomass, vec![0.1]);
        assert!(session.is_active());
    }

    #[test]
    fn test_continuation_resumes_stored_state() {
        let mut session = reference_session().with_oxygen_unit(OxygenUnit::Concentration);
        let initial = ReactorState::new(8.0, 0.1, 5.0, 1.0);
        let feed = reference_feed();

        session.simulate(0.0, 10.0, initial, &feed).unwrap();
        let stored_end = *session.trajectory().last().unwrap();

        // Second segment: the override is deliberately nonsense and must
        // be ignored.
        let merged = session
            .simulate(10.0, 20.0, ReactorState::new(0.0, 99.0, 99.0, 99.0), &feed)
            .unwrap();

        assert_eq!(merged.len(), 201);
        // The sample at t = 10 is still the one from the first segment.
        let idx = merged.times.iter().position(|&t| t == 10.0).unwrap();
        assert_eq!(merged.biomass[idx], stored_end.state.biomass);
    }

    #[test]
    fn test_rewind_truncates_then_replays() {
        let mut session = reference_session().with_oxygen_unit(OxygenUnit::Concentration);
        let initial = ReactorState::new(8.0, 0.1, 5.0, 1.0);
        let feed = reference_feed();

        session.simulate(0.0, 10.0, initial, &feed).unwrap();
        let before = session.trajectory().len();

        let merged = session
            .simulate(5.0, 15.0, ReactorState::zero(), &feed)
            .unwrap();

        // Stored history beyond the splice point was replaced.
        assert!(session.trajectory().len() < before + 101);
        // No stored time between the splice point and the new segment's
        // start is left over, and times stay strictly increasing.
        for pair in merged.times.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert_eq!(merged.times.last().copied().unwrap(), 15.0);
    }

    #[test]
    fn test_gap_continuation_keeps_history() {
        let mut session = reference_session().with_oxygen_unit(OxygenUnit::Concentration);
        let initial = ReactorState::new(8.0, 0.1, 5.0, 1.0);
        let feed = reference_feed();

        session.simulate(0.0, 10.0, initial, &feed).unwrap();
        let merged = session
            .simulate(12.0, 15.0, ReactorState::zero(), &feed)
            .unwrap();

        // 101 + 101 samples: nothing truncated, gap preserved.
        assert_eq!(merged.len(), 202);
        assert!(merged.times.iter().any(|&t| t == 10.0));
        assert!(merged.times.iter().any(|&t| t == 12.0));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = reference_session().with_oxygen_unit(OxygenUnit::Concentration);
        let initial = ReactorState::new(8.0, 0.1, 5.0, 1.0);

        session
            .simulate(0.0, 10.0, initial, &reference_feed())
            .unwrap();
        assert!(session.is_active());

        session.reset();
        assert!(!session.is_active());
        session.reset();
        assert!(!session.is_active());

        // Next simulate behaves as a fresh start and honors the override.
        let output = session
            .simulate(0.0, 1.0, initial, &reference_feed())
            .unwrap();
        assert_eq!(output.biomass[0], 0.1);
    }

    #[test]
    fn test_segment_only_response() {
        let mut session = reference_session()
            .with_oxygen_unit(OxygenUnit::Concentration)
            .with_segment_only(true);
        let initial = ReactorState::new(8.0, 0.1, 5.0, 1.0);
        let feed = reference_feed();

        session.simulate(0.0, 10.0, initial, &feed).unwrap();
        let second = session
            .simulate(10.0, 20.0, ReactorState::zero(), &feed)
            .unwrap();

        // Only the new segment is reported...
        assert_eq!(second.len(), 101);
        assert_eq!(second.times[0], 10.0);
        // ...but the stored history still holds both segments.
        assert_eq!(session.trajectory().len(), 201);
    }

    #[test]
    fn test_divergence_leaves_history_untouched() {
        let mut session = reference_session().with_oxygen_unit(OxygenUnit::Concentration);
        let initial = ReactorState::new(8.0, 0.1, 5.0, 1.0);
        let feed = reference_feed();

        session.simulate(0.0, 10.0, initial, &feed).unwrap();
        let stored = session.trajectory().len();

        // Starve the step budget so the next segment fails mid-flight.
        let mut session = ReactorSession {
            integrator: Box::new(DopriIntegrator {
                max_steps: 2,
                ..DopriIntegrator::default()
            }),
            ..session
        };

        let err = session
            .simulate(10.0, 500.0, ReactorState::zero(), &feed)
            .unwrap_err();
        assert!(matches!(err, SimulationError::Divergence { .. }));
        assert_eq!(session.trajectory().len(), stored);
    }

    #[test]
    fn test_end_before_effective_start_rejected() {
        let mut session = reference_session().with_oxygen_unit(OxygenUnit::Concentration);
        let initial = ReactorState::new(8.0, 0.1, 5.0, 1.0);
        let feed = reference_feed();

        // Stored history covers [5, 10]; asking for [0, 3] resumes at the
        // first stored sample (t = 5) which already exceeds the end time.
        session.simulate(5.0, 10.0, initial, &feed).unwrap();
        let err = session
            .simulate(0.0, 3.0, ReactorState::zero(), &feed)
            .unwrap_err();
        assert!(err.is_validation());
    }
}
