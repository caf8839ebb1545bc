//! Error types shared across the voxdiff workspace.
//!
//! Organized by subsystem: model evaluation, boundary flux, and the
//! time-stepper. Configuration and grid construction errors live next to
//! their constructors in `voxdiff-solver` and `voxdiff-grid`.

use std::error::Error;
use std::fmt;

/// Errors from constructing or evaluating a local physics model.
///
/// `InvalidParameter` is a construction-time rejection of a malformed
/// scalar. `InvalidConcentration` indicates a caller bug mid-run (the
/// stepper handed the model a value it should never see) — configuration
/// conflicts are rejected before any model is built.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// A model parameter is non-finite or outside its valid range.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A concentration outside `[0, c_max]` (or non-finite) was passed in.
    InvalidConcentration {
        /// The offending concentration.
        value: f64,
        /// The configured concentration ceiling.
        c_max: f64,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid parameter {name}: {value}")
            }
            Self::InvalidConcentration { value, c_max } => {
                write!(f, "concentration {value} outside [0, {c_max}]")
            }
        }
    }
}

impl Error for ModelError {}

/// Errors from the boundary flux provider.
#[derive(Clone, Debug, PartialEq)]
pub enum FluxError {
    /// A GITT series failed validation at load time.
    InvalidSeries {
        /// What was wrong with the samples.
        reason: String,
    },
    /// A GITT query fell outside the loaded series. The provider never
    /// extrapolates; a run that steps past the last sample fails.
    TimeOutOfRange {
        /// The queried simulated time.
        t: f64,
        /// First sample time in the series.
        first: f64,
        /// Last sample time in the series.
        last: f64,
    },
}

impl fmt::Display for FluxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSeries { reason } => write!(f, "invalid GITT series: {reason}"),
            Self::TimeOutOfRange { t, first, last } => {
                write!(f, "time {t} outside GITT series range [{first}, {last}]")
            }
        }
    }
}

impl Error for FluxError {}

/// Errors from the FVM time-stepper.
///
/// `UnstableConfiguration` is raised at the Initialized→Stepping transition,
/// before any update executes. The remaining variants terminate a run that
/// has already started; the sweep records them per candidate and continues.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// The explicit-scheme stability bound is violated for the maximum
    /// diffusivity reachable in this run.
    UnstableConfiguration {
        /// Diffusion number `D_max · dt / dx²`.
        diffusion_number: f64,
        /// The stability limit for the grid's active dimensionality.
        limit: f64,
    },
    /// A runtime invariant violation: a voxel concentration left
    /// `[0, c_max]` or became non-finite despite passing the stability
    /// check.
    NumericDivergence {
        /// Simulated time at the end of the failing step.
        time: f64,
        /// Linear index of the first offending voxel.
        voxel: usize,
        /// The offending concentration.
        value: f64,
    },
    /// The boundary flux provider failed (GITT query out of range).
    BoundaryFlux(FluxError),
    /// A local physics model rejected its input.
    Model(ModelError),
    /// `advance()` was called on a stepper already Completed or Failed.
    AlreadyTerminated,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnstableConfiguration {
                diffusion_number,
                limit,
            } => {
                write!(
                    f,
                    "unstable configuration: diffusion number {diffusion_number} exceeds {limit}"
                )
            }
            Self::NumericDivergence { time, voxel, value } => {
                write!(
                    f,
                    "numeric divergence at t={time}: voxel {voxel} reached {value}"
                )
            }
            Self::BoundaryFlux(e) => write!(f, "boundary flux: {e}"),
            Self::Model(e) => write!(f, "model: {e}"),
            Self::AlreadyTerminated => write!(f, "stepper already completed or failed"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BoundaryFlux(e) => Some(e),
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FluxError> for StepError {
    fn from(e: FluxError) -> Self {
        Self::BoundaryFlux(e)
    }
}

impl From<ModelError> for StepError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}
