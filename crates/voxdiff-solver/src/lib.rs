//! The voxdiff solver: options ingestion, the explicit FVM time-stepper,
//! and the diffusion-coefficient sweep.
//!
//! # Pipeline (one sweep)
//!
//! 1. [`SimulationOptions::resolve()`] — validate every scalar and flag
//!    combination eagerly; nothing past this point re-checks user input.
//! 2. [`SweepController::run()`] — one independent [`TimeStepper`] per
//!    candidate coefficient over a shared read-only phase mask.
//! 3. Each stepper marches the concentration field explicitly, capturing
//!    [`FieldSnapshot`](voxdiff_core::FieldSnapshot)s per the snapshot
//!    policy, and the report enumerates every candidate's outcome.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod stats;
pub mod stepper;
pub mod sweep;

pub use config::{ConfigError, DiffusivityMode, SimulationConfig, SimulationOptions};
pub use stats::RunStats;
pub use stepper::{Snapshots, StepperState, TimeStepper, Trajectory};
pub use sweep::{CandidateOutcome, SweepController, SweepReport};
