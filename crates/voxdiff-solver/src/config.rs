//! Simulation options ingestion, validation, and the resolved configuration.
//!
//! [`SimulationOptions`] mirrors the external interface one field per knob,
//! flags included. [`SimulationOptions::resolve()`] validates every scalar
//! and flag combination eagerly and produces a [`SimulationConfig`] whose
//! boundary and diffusivity modes are tagged variants — invalid
//! combinations cannot survive past this point, and no error surfaces
//! mid-run that could have been caught here.

use std::error::Error;
use std::fmt;

use voxdiff_core::{ModelError, PhaseLabel, SnapshotPolicy};
use voxdiff_grid::BoundarySide;
use voxdiff_models::{BoundaryFlux, ChargeMode, DiffusivityModel, GittSeries, Migration};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimulationOptions::resolve()`].
///
/// All of these abort the whole sweep before any grid or stepper is
/// built; nothing here is recoverable per candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A scalar option is non-finite or outside its valid range.
    InvalidScalar {
        /// Name of the offending option.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// `dc_min` exceeds `dc_max`.
    SweepBoundsInverted {
        /// Lower sweep bound.
        dc_min: f64,
        /// Upper sweep bound.
        dc_max: f64,
    },
    /// The initial concentration exceeds the ceiling.
    InitialExceedsMax {
        /// Configured initial concentration.
        c0: f64,
        /// Configured ceiling.
        c_max: f64,
    },
    /// The step size exceeds the total simulated duration.
    StepExceedsDuration {
        /// Configured step size.
        step_size: f64,
        /// Configured duration.
        total_time: f64,
    },
    /// Both the linear and the anomalous diffusivity model were requested.
    MutuallyExclusiveModels,
    /// `print_map` is set but the snapshot cadence is zero.
    SnapshotCadenceZero,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScalar { name, value } => {
                write!(f, "option {name} has invalid value {value}")
            }
            Self::SweepBoundsInverted { dc_min, dc_max } => {
                write!(f, "sweep bounds inverted: dc_min {dc_min} > dc_max {dc_max}")
            }
            Self::InitialExceedsMax { c0, c_max } => {
                write!(f, "initial concentration {c0} exceeds ceiling {c_max}")
            }
            Self::StepExceedsDuration {
                step_size,
                total_time,
            } => {
                write!(f, "step size {step_size} exceeds total time {total_time}")
            }
            Self::MutuallyExclusiveModels => {
                write!(f, "linear and anomalous diffusivity models are mutually exclusive")
            }
            Self::SnapshotCadenceZero => {
                write!(f, "snapshot cadence must be at least 1 when print_map is set")
            }
        }
    }
}

impl Error for ConfigError {}

// ── SimulationOptions ──────────────────────────────────────────────

/// Flag-level simulation options, one field per external knob.
///
/// This is the ingestion shape: whatever wrapper parses user input fills
/// it in directly. Nothing is validated until [`resolve()`](Self::resolve)
/// turns it into a [`SimulationConfig`].
#[derive(Clone, Debug)]
pub struct SimulationOptions {
    /// Emit concentration/flux map snapshots during the run.
    pub print_map: bool,
    /// Snapshot cadence in steps, meaningful when `print_map` is set.
    pub snapshot_every: u32,
    /// Phase-of-interest label in the segmented map.
    pub poi: i32,
    /// Lower bound of the diffusion-coefficient sweep, m²/s.
    pub dc_min: f64,
    /// Upper bound of the diffusion-coefficient sweep, m²/s.
    pub dc_max: f64,
    /// Sweep increment, m²/s.
    pub dc_step: f64,
    /// Maximum physical concentration, mol/m³.
    pub c_max: f64,
    /// Initial concentration across the active phase, mol/m³.
    pub c0: f64,
    /// Nominal (trace-condition) diffusion coefficient, m²/s. Not part of
    /// the sweep; used for single reference runs.
    pub d0: f64,
    /// Charge/discharge polarity of the imposed current.
    pub mode: ChargeMode,
    /// Magnitude of the imposed current density, A/m². Ignored when a
    /// GITT series is supplied.
    pub current_density: f64,
    /// Time step, seconds.
    pub step_size: f64,
    /// Total simulated duration, seconds.
    pub total_time: f64,
    /// Simulated start time, seconds. Usually zero.
    pub start_time: f64,
    /// Voxel edge length, meters.
    pub pixel_res: f64,
    /// Loaded GITT series; `Some` selects GITT-driven boundary flux.
    pub gitt: Option<GittSeries>,
    /// Use the linear-in-concentration diffusivity model.
    pub use_linear: bool,
    /// Use the anomalous (time-fractional) diffusivity model.
    pub use_anom: bool,
    /// Anomalous-diffusion exponent, meaningful when `use_anom` is set.
    pub dprime: f64,
    /// Migration record; `Some` enables Nernst–Planck drift.
    pub migration: Option<Migration>,
    /// Charge number `z` of the diffusing species.
    pub species_charge: f64,
    /// The lattice face carrying the applied boundary flux.
    pub boundary: BoundarySide,
}

fn check_positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidScalar { name, value })
    }
}

fn check_nonnegative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidScalar { name, value })
    }
}

impl SimulationOptions {
    /// Validate the options and produce the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found. Validation covers every
    /// scalar range from the data model plus the flag conflicts: the
    /// linear and anomalous models are mutually exclusive, and a zero
    /// snapshot cadence under `print_map` is rejected.
    pub fn resolve(self) -> Result<SimulationConfig, ConfigError> {
        check_positive("dc_min", self.dc_min)?;
        check_positive("dc_max", self.dc_max)?;
        check_positive("dc_step", self.dc_step)?;
        if self.dc_min > self.dc_max {
            return Err(ConfigError::SweepBoundsInverted {
                dc_min: self.dc_min,
                dc_max: self.dc_max,
            });
        }
        check_positive("c_max", self.c_max)?;
        check_nonnegative("c0", self.c0)?;
        if self.c0 > self.c_max {
            return Err(ConfigError::InitialExceedsMax {
                c0: self.c0,
                c_max: self.c_max,
            });
        }
        check_positive("d0", self.d0)?;
        check_nonnegative("current_density", self.current_density)?;
        check_positive("step_size", self.step_size)?;
        check_positive("total_time", self.total_time)?;
        if self.step_size > self.total_time {
            return Err(ConfigError::StepExceedsDuration {
                step_size: self.step_size,
                total_time: self.total_time,
            });
        }
        check_nonnegative("start_time", self.start_time)?;
        check_positive("pixel_res", self.pixel_res)?;
        if self.species_charge == 0.0 || !self.species_charge.is_finite() {
            return Err(ConfigError::InvalidScalar {
                name: "species_charge",
                value: self.species_charge,
            });
        }

        let diffusivity = match (self.use_linear, self.use_anom) {
            (true, true) => return Err(ConfigError::MutuallyExclusiveModels),
            (true, false) => DiffusivityMode::Linear,
            (false, true) => {
                check_positive("dprime", self.dprime)?;
                DiffusivityMode::Anomalous {
                    dprime: self.dprime,
                }
            }
            (false, false) => DiffusivityMode::Constant,
        };

        let snapshots = if self.print_map {
            if self.snapshot_every == 0 {
                return Err(ConfigError::SnapshotCadenceZero);
            }
            SnapshotPolicy::Every(self.snapshot_every)
        } else {
            SnapshotPolicy::Final
        };

        let boundary_flux = match self.gitt {
            Some(series) => BoundaryFlux::Gitt(series),
            None => BoundaryFlux::ConstantCurrent {
                density: self.current_density,
                mode: self.mode,
            },
        };

        Ok(SimulationConfig {
            poi: PhaseLabel(self.poi),
            dc_min: self.dc_min,
            dc_max: self.dc_max,
            dc_step: self.dc_step,
            c_max: self.c_max,
            c0: self.c0,
            d0: self.d0,
            step_size: self.step_size,
            total_time: self.total_time,
            start_time: self.start_time,
            pixel_res: self.pixel_res,
            diffusivity,
            boundary_flux,
            migration: self.migration,
            species_charge: self.species_charge,
            boundary: self.boundary,
            snapshots,
        })
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Which diffusivity functional form the run uses.
///
/// The candidate value is supplied per sweep iteration; this only selects
/// the form it is plugged into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DiffusivityMode {
    /// Concentration-independent.
    Constant,
    /// Linear ramp from the candidate to the sweep ceiling.
    Linear,
    /// Time-fractional scaling with the given exponent.
    Anomalous {
        /// Anomalous-diffusion exponent.
        dprime: f64,
    },
}

/// The validated, immutable configuration a sweep runs against.
///
/// Constructed only through [`SimulationOptions::resolve()`]; every
/// invariant from the data model holds by the time a value of this type
/// exists.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    poi: PhaseLabel,
    dc_min: f64,
    dc_max: f64,
    dc_step: f64,
    c_max: f64,
    c0: f64,
    d0: f64,
    step_size: f64,
    total_time: f64,
    start_time: f64,
    pixel_res: f64,
    diffusivity: DiffusivityMode,
    boundary_flux: BoundaryFlux,
    migration: Option<Migration>,
    species_charge: f64,
    boundary: BoundarySide,
    snapshots: SnapshotPolicy,
}

impl SimulationConfig {
    /// Phase-of-interest label.
    pub fn poi(&self) -> PhaseLabel {
        self.poi
    }

    /// Upper bound of the sweep, m²/s.
    pub fn dc_max(&self) -> f64 {
        self.dc_max
    }

    /// Concentration ceiling, mol/m³.
    pub fn c_max(&self) -> f64 {
        self.c_max
    }

    /// Initial concentration, mol/m³.
    pub fn c0(&self) -> f64 {
        self.c0
    }

    /// Nominal (trace-condition) diffusion coefficient, m²/s.
    ///
    /// Not part of the sweep: pass it to
    /// [`TimeStepper::new`](crate::TimeStepper::new) for a single
    /// reference run at the nominal coefficient.
    pub fn d0(&self) -> f64 {
        self.d0
    }

    /// Time step, seconds.
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Total simulated duration, seconds.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Simulated start time, seconds.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Simulated end time, seconds.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.total_time
    }

    /// Voxel edge length, meters.
    pub fn pixel_res(&self) -> f64 {
        self.pixel_res
    }

    /// Selected diffusivity functional form.
    pub fn diffusivity(&self) -> DiffusivityMode {
        self.diffusivity
    }

    /// The boundary flux provider.
    pub fn boundary_flux(&self) -> &BoundaryFlux {
        &self.boundary_flux
    }

    /// Migration record, if drift is enabled.
    pub fn migration(&self) -> Option<&Migration> {
        self.migration.as_ref()
    }

    /// Charge number of the diffusing species.
    pub fn species_charge(&self) -> f64 {
        self.species_charge
    }

    /// The lattice face carrying the applied flux.
    pub fn boundary(&self) -> BoundarySide {
        self.boundary
    }

    /// Snapshot policy for the run.
    pub fn snapshots(&self) -> SnapshotPolicy {
        self.snapshots
    }

    /// The sweep candidates, ascending: `dc_min + k · dc_step` for every
    /// `k` with a value not exceeding `dc_max` (within a relative epsilon
    /// absorbing float accumulation). Always at least one candidate.
    pub fn candidates(&self) -> Vec<f64> {
        let tol = self.dc_step * 1e-9;
        let mut out = Vec::new();
        let mut k = 0u32;
        loop {
            let c = self.dc_min + f64::from(k) * self.dc_step;
            if c > self.dc_max + tol {
                break;
            }
            out.push(c);
            k += 1;
        }
        out
    }

    /// Build the diffusivity model for one candidate value.
    ///
    /// Cannot fail for candidates produced by [`candidates()`](Self::candidates)
    /// on a resolved configuration; the `Result` covers direct callers
    /// passing arbitrary coefficients (e.g. a trace run with `d0` larger
    /// than the sweep ceiling under the linear model).
    pub fn model_for(&self, candidate: f64) -> Result<DiffusivityModel, ModelError> {
        match self.diffusivity {
            DiffusivityMode::Constant => DiffusivityModel::constant(candidate, self.c_max),
            DiffusivityMode::Linear => {
                DiffusivityModel::linear(candidate, self.dc_max, self.c_max)
            }
            DiffusivityMode::Anomalous { dprime } => {
                DiffusivityModel::anomalous(candidate, dprime, self.c_max)
            }
        }
    }
}
