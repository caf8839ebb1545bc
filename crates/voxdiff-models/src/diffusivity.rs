//! Local diffusivity models: constant, linear-in-concentration, anomalous.

use voxdiff_core::ModelError;

/// Functional form of the concentration/time dependence.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Kind {
    Constant,
    Linear { d_cap: f64 },
    Anomalous { dprime: f64 },
}

/// Maps a local concentration to an effective local diffusion coefficient.
///
/// One model instance serves one sweep candidate: `d` is the candidate
/// value, and the variant decides how it responds to the local state.
///
/// - **Constant**: `D(C) = d`.
/// - **Linear**: `D(C) = d + (d_cap − d) · C / c_max`, a monotone ramp
///   from the candidate at `C = 0` to the sweep ceiling at `C = c_max`.
/// - **Anomalous**: `D(t) = d · t^(dprime − 1)`, time-fractional scaling
///   with elapsed run time. `dprime = 1` recovers Fickian transport,
///   `dprime < 1` is sub-diffusive. At `t = 0` the factor is defined as 1
///   (the Fickian limit), so the first step carries no correction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusivityModel {
    d: f64,
    c_max: f64,
    kind: Kind,
}

fn require_positive(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ModelError::InvalidParameter { name, value })
    }
}

impl DiffusivityModel {
    /// Concentration-independent model.
    pub fn constant(d: f64, c_max: f64) -> Result<Self, ModelError> {
        Ok(Self {
            d: require_positive("d", d)?,
            c_max: require_positive("c_max", c_max)?,
            kind: Kind::Constant,
        })
    }

    /// Linear ramp from `d` at zero concentration to `d_cap` at `c_max`.
    ///
    /// `d_cap` is the sweep ceiling; requiring `d_cap >= d` keeps the ramp
    /// monotone and makes the stability bound exact.
    pub fn linear(d: f64, d_cap: f64, c_max: f64) -> Result<Self, ModelError> {
        let d = require_positive("d", d)?;
        let d_cap = require_positive("d_cap", d_cap)?;
        if d_cap < d {
            return Err(ModelError::InvalidParameter {
                name: "d_cap",
                value: d_cap,
            });
        }
        Ok(Self {
            d,
            c_max: require_positive("c_max", c_max)?,
            kind: Kind::Linear { d_cap },
        })
    }

    /// Time-fractional scaling with exponent `dprime`.
    pub fn anomalous(d: f64, dprime: f64, c_max: f64) -> Result<Self, ModelError> {
        Ok(Self {
            d: require_positive("d", d)?,
            c_max: require_positive("c_max", c_max)?,
            kind: Kind::Anomalous {
                dprime: require_positive("dprime", dprime)?,
            },
        })
    }

    /// The candidate (base) diffusion coefficient, m²/s.
    pub fn base(&self) -> f64 {
        self.d
    }

    /// Effective local diffusivity for concentration `c` at elapsed run
    /// time `t_elapsed` (seconds since the run's start time).
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidConcentration`] if `c` is non-finite or
    /// outside `[0, c_max]` — a caller bug, never a user input problem.
    pub fn eval(&self, c: f64, t_elapsed: f64) -> Result<f64, ModelError> {
        if !c.is_finite() || c < 0.0 || c > self.c_max {
            return Err(ModelError::InvalidConcentration {
                value: c,
                c_max: self.c_max,
            });
        }
        Ok(match self.kind {
            Kind::Constant => self.d,
            Kind::Linear { d_cap } => self.d + (d_cap - self.d) * (c / self.c_max),
            Kind::Anomalous { dprime } => {
                if t_elapsed > 0.0 {
                    self.d * t_elapsed.powf(dprime - 1.0)
                } else {
                    self.d
                }
            }
        })
    }

    /// The largest diffusivity this model can produce during a run of the
    /// given step size and duration.
    ///
    /// Used by the stepper's stability gate: the explicit scheme must be
    /// stable for the worst case, not the initial state. For the anomalous
    /// variant the `t^(dprime−1)` factor is monotone in `t`, so the
    /// extremes are the first evaluation (`t = step_size`) and the last
    /// (`t = total_time`), plus the defined `t = 0` limit of 1.
    pub fn max_value(&self, step_size: f64, total_time: f64) -> f64 {
        match self.kind {
            Kind::Constant => self.d,
            Kind::Linear { d_cap } => d_cap,
            Kind::Anomalous { dprime } => {
                let first = step_size.powf(dprime - 1.0);
                let last = total_time.powf(dprime - 1.0);
                self.d * first.max(last).max(1.0)
            }
        }
    }
}
