//! voxdiff: effective-diffusivity estimation on segmented voxel grids.
//!
//! This is the top-level facade crate re-exporting the public API of the
//! voxdiff workspace. For most users, adding `voxdiff` as a single
//! dependency is sufficient.
//!
//! A sweep takes a segmented phase map, restricts transport to one phase
//! of interest, and time-marches the diffusion (optionally diffusion–
//! migration) equation once per candidate diffusion coefficient under an
//! imposed electrochemical boundary flux. Downstream fitting compares the
//! resulting trajectories against measured transients (e.g. GITT data) to
//! recover the effective coefficient.
//!
//! # Quick start
//!
//! ```rust
//! use voxdiff::prelude::*;
//!
//! // A segmented 6×6 plane: phase 1 is the active material.
//! let lattice = Lattice::new(6, 6, 1).unwrap();
//! let labels = vec![1; lattice.cell_count()];
//! let grid = PhaseGrid::new(lattice, labels).unwrap();
//!
//! let config = SimulationOptions {
//!     print_map: false,
//!     snapshot_every: 1,
//!     poi: 1,
//!     dc_min: 1e-14,
//!     dc_max: 5e-14,
//!     dc_step: 2e-14,
//!     c_max: 1000.0,
//!     c0: 100.0,
//!     d0: 2e-14,
//!     mode: ChargeMode::Charge,
//!     current_density: 1e-4,
//!     step_size: 1.0,
//!     total_time: 30.0,
//!     start_time: 0.0,
//!     pixel_res: 1e-6,
//!     gitt: None,
//!     use_linear: false,
//!     use_anom: false,
//!     dprime: 1.0,
//!     migration: None,
//!     species_charge: 1.0,
//!     boundary: BoundarySide::XMin,
//! }
//! .resolve()
//! .unwrap();
//!
//! // Restrict the solve to the configured phase of interest.
//! let mask = grid.mask(config.poi()).unwrap();
//!
//! // One trajectory per candidate coefficient, failures isolated.
//! let report = SweepController::new(&config, &mask).run();
//! assert_eq!(report.outcomes.len(), 3);
//! for outcome in &report.outcomes {
//!     let trajectory = outcome.result.as_ref().unwrap();
//!     assert_eq!(trajectory.snapshots.last().unwrap().time, 30.0);
//! }
//!
//! // A single reference run at the nominal (trace) coefficient.
//! let trace = TimeStepper::new(&config, &mask, config.d0())
//!     .unwrap()
//!     .run()
//!     .unwrap();
//! assert!(trace.stats.total_mass > 0.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `voxdiff-core` | constants, IDs, errors, snapshots |
//! | [`grid`] | `voxdiff-grid` | lattice, voxel bitset, phase grids |
//! | [`models`] | `voxdiff-models` | diffusivity, migration, boundary flux |
//! | [`solver`] | `voxdiff-solver` | options, stepper, sweep |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: constants, identifiers, errors, and snapshot data.
pub mod types {
    pub use voxdiff_core::*;
}

/// Spatial data structures: lattice, voxel bitset, phase grids.
pub mod grid {
    pub use voxdiff_grid::*;
}

/// Local physics models: diffusivity, migration, boundary flux.
pub mod models {
    pub use voxdiff_models::*;
}

/// Options ingestion, the FVM time-stepper, and the sweep controller.
pub mod solver {
    pub use voxdiff_solver::*;
}

/// The types most programs need, importable in one line.
pub mod prelude {
    pub use voxdiff_core::{FieldSnapshot, PhaseLabel, SnapshotPolicy, StepError, StepId};
    pub use voxdiff_grid::{BoundarySide, Lattice, PhaseGrid, PhaseMask, VoxelSet};
    pub use voxdiff_models::{
        BoundaryFlux, ChargeMode, DiffusivityModel, GittSeries, Migration,
    };
    pub use voxdiff_solver::{
        CandidateOutcome, ConfigError, DiffusivityMode, RunStats, SimulationConfig,
        SimulationOptions, StepperState, SweepController, SweepReport, TimeStepper, Trajectory,
    };
}
