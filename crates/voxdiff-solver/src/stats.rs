//! Per-run statistics collected by the time-stepper.

use std::time::Duration;

/// Summary counters for one completed (or failed) solver run.
///
/// The stepper populates these as it marches; the sweep attaches them to
/// each candidate's trajectory so downstream fitting can sanity-check a
/// run without walking every snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    /// Number of explicit updates applied.
    pub steps: u64,
    /// Simulated time at the end of the run, seconds.
    pub final_time: f64,
    /// Total species content over the active phase at the end of the run,
    /// mol (concentration integrated over voxel volumes).
    pub total_mass: f64,
    /// Smallest active-voxel concentration at the end of the run.
    pub c_min: f64,
    /// Largest active-voxel concentration at the end of the run.
    pub c_max: f64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}
