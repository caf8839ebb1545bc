//! Strongly-typed identifiers.

use std::fmt;

/// Monotonically increasing step counter within a single solver run.
///
/// Incremented each time the time-stepper advances the field by one
/// explicit update. `StepId(0)` is the initial state at the run's start
/// time, before any update has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A phase label from a segmented image.
///
/// Segmentation tools emit small integer labels per voxel; the solver
/// restricts transport to the voxels carrying the phase-of-interest label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseLabel(pub i32);

impl fmt::Display for PhaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for PhaseLabel {
    fn from(v: i32) -> Self {
        Self(v)
    }
}
