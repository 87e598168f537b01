//! Accumulated simulation history for one session
//!
//! A [`Trajectory`] is the ordered sequence of `(time, state)` samples a
//! session has produced so far. Times are strictly increasing — the
//! mutating methods preserve that invariant and are therefore crate-private;
//! the session layer is the only writer.

use crate::physics::ReactorState;

// =================================================================================================
// Sample
// =================================================================================================

/// One time-stamped state of the trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sample {
    /// Sample time [h]
    pub time: f64,

    /// Reactor state at that time (oxygen in absolute units)
    pub state: ReactorState,
}

// =================================================================================================
// Trajectory
// =================================================================================================

/// Time-ordered simulation history, strictly increasing in time.
///
/// Lifecycle: created empty at session start, extended by each simulate
/// call, truncated when a request rewinds into stored history, cleared by
/// reset, dropped with the session. Exclusively owned by one session.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

impl Trajectory {
    /// Create an empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no simulate call has stored anything yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All stored samples, ordered by time.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Most recent sample, if any.
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Index of the first stored sample with `time >= start`.
    ///
    /// Returns `len()` when every stored sample lies before `start`.
    /// This is the splice tie-break rule: an exact time match resumes
    /// from the matched sample itself.
    pub(crate) fn splice_index(&self, start: f64) -> usize {
        self.samples.partition_point(|s| s.time < start)
    }

    /// Discard every sample strictly after `index` (the sample at `index`
    /// is kept).
    pub(crate) fn truncate_after(&mut self, index: usize) {
        self.samples.truncate(index + 1);
    }

    /// Append a freshly integrated segment.
    ///
    /// `skip_first` drops the segment's first sample — used when it
    /// duplicates the stored sample the segment was resumed from.
    ///
    /// Callers guarantee the appended times continue strictly after the
    /// stored end; this is checked in debug builds.
    pub(crate) fn extend_segment(
        &mut self,
        times: &[f64],
        states: &[ReactorState],
        skip_first: bool,
    ) {
        debug_assert_eq!(times.len(), states.len());
        let offset = usize::from(skip_first);

        for (&time, &state) in times.iter().zip(states).skip(offset) {
            debug_assert!(
                self.samples.last().map_or(true, |s| time > s.time),
                "trajectory times must stay strictly increasing"
            );
            self.samples.push(Sample { time, state });
        }
    }

    /// Remove all samples.
    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }
}

// =================================================================================================
// Tests
// =================================================================================================
