//! The boundary flux provider: constant current or GITT interpolation.

use voxdiff_core::constants::FARADAY;
use voxdiff_core::FluxError;

/// Whether the imposed current charges or discharges the electrode.
///
/// Charge inserts the species at the boundary (positive flux into the
/// active phase); discharge extracts it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargeMode {
    /// Species inserted at the boundary.
    Charge,
    /// Species extracted at the boundary.
    Discharge,
}

impl ChargeMode {
    /// Sign applied to the configured current density.
    pub fn sign(self) -> f64 {
        match self {
            Self::Charge => 1.0,
            Self::Discharge => -1.0,
        }
    }
}

/// A loaded galvanostatic intermittent titration (GITT) profile.
///
/// An ordered sequence of `(time, current_density)` samples, strictly
/// increasing in time. Queries linearly interpolate between bracketing
/// samples; queries outside `[first, last]` are an error, never an
/// extrapolation. Sample current densities are signed as recorded — a
/// GITT file already encodes its rest and pulse polarities, so no
/// charge/discharge sign flip is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct GittSeries {
    samples: Vec<(f64, f64)>,
}

impl GittSeries {
    /// Validate and wrap a parsed sample sequence.
    ///
    /// # Errors
    ///
    /// [`FluxError::InvalidSeries`] if fewer than two samples were
    /// supplied, any value is non-finite, or times are not strictly
    /// increasing.
    pub fn new(samples: Vec<(f64, f64)>) -> Result<Self, FluxError> {
        if samples.len() < 2 {
            return Err(FluxError::InvalidSeries {
                reason: format!("need at least 2 samples, got {}", samples.len()),
            });
        }
        for &(t, j) in &samples {
            if !t.is_finite() || !j.is_finite() {
                return Err(FluxError::InvalidSeries {
                    reason: format!("non-finite sample ({t}, {j})"),
                });
            }
        }
        for pair in samples.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(FluxError::InvalidSeries {
                    reason: format!(
                        "times must be strictly increasing, got {} then {}",
                        pair[0].0, pair[1].0
                    ),
                });
            }
        }
        Ok(Self { samples })
    }

    /// Time of the first sample.
    pub fn first_time(&self) -> f64 {
        self.samples[0].0
    }

    /// Time of the last sample.
    pub fn last_time(&self) -> f64 {
        self.samples[self.samples.len() - 1].0
    }

    /// Number of samples. Always at least two.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false` — construction rejects short series.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Current density at time `t`, linearly interpolated between the
    /// bracketing samples.
    ///
    /// # Errors
    ///
    /// [`FluxError::TimeOutOfRange`] if `t` precedes the first sample or
    /// follows the last.
    pub fn interpolate(&self, t: f64) -> Result<f64, FluxError> {
        if t < self.first_time() || t > self.last_time() {
            return Err(FluxError::TimeOutOfRange {
                t,
                first: self.first_time(),
                last: self.last_time(),
            });
        }
        // First sample with time >= t; t is in range, so hi is valid.
        let hi = self.samples.partition_point(|&(st, _)| st < t);
        if hi == 0 {
            return Ok(self.samples[0].1);
        }
        let (t1, j1) = self.samples[hi];
        let (t0, j0) = self.samples[hi - 1];
        if t == t1 {
            return Ok(j1);
        }
        let frac = (t - t0) / (t1 - t0);
        Ok(j0 + frac * (j1 - j0))
    }
}

/// The instantaneous flux applied at the designated domain boundary.
///
/// Pure function of simulated time and configuration; the stepper queries
/// it once per step, at the step's start time.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryFlux {
    /// A fixed current density with charge/discharge polarity.
    ConstantCurrent {
        /// Magnitude of the imposed current density, A/m².
        density: f64,
        /// Polarity of the imposed current.
        mode: ChargeMode,
    },
    /// A time-varying profile interpolated from a loaded GITT series.
    Gitt(GittSeries),
}

impl BoundaryFlux {
    /// Signed current density at simulated time `t`, A/m².
    pub fn current_density(&self, t: f64) -> Result<f64, FluxError> {
        match self {
            Self::ConstantCurrent { density, mode } => Ok(density * mode.sign()),
            Self::Gitt(series) => series.interpolate(t),
        }
    }

    /// Molar flux into the active phase at time `t`, mol/(m²·s).
    ///
    /// Converts the electrical current density via `j / (z·F)` where `z`
    /// is the species charge number.
    pub fn molar_flux(&self, t: f64, species_charge: f64) -> Result<f64, FluxError> {
        Ok(self.current_density(t)? / (species_charge * FARADAY))
    }
}
