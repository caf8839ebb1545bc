//! Nernst–Planck migration (drift) flux.

use voxdiff_core::constants::{FARADAY, GAS_CONSTANT};
use voxdiff_core::ModelError;

/// The potential-field record driving ionic migration.
///
/// Holds the operating temperature and the electric-potential gradient
/// per axis. Read-only input to the solver: if the field varies in time,
/// the caller supplies a fresh record per run. Drift adds to the diffusive
/// flux per the Nernst–Planck relation
/// `J_mig = −(z·F / (R·T)) · D · C · dE/dL`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Migration {
    temperature: f64,
    de_dl: [f64; 3],
}

impl Migration {
    /// Create a migration record.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidParameter`] if `temperature` is not a positive
    /// finite Kelvin value, or any gradient component is non-finite.
    pub fn new(temperature: f64, de_dl: [f64; 3]) -> Result<Self, ModelError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "temperature",
                value: temperature,
            });
        }
        for &g in &de_dl {
            if !g.is_finite() {
                return Err(ModelError::InvalidParameter {
                    name: "de_dl",
                    value: g,
                });
            }
        }
        Ok(Self {
            temperature,
            de_dl,
        })
    }

    /// Operating temperature, Kelvin.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Potential gradient per axis, V/m.
    pub fn potential_gradient(&self) -> [f64; 3] {
        self.de_dl
    }

    /// Drift flux component along `axis` (mol/(m²·s)) for a face with
    /// local diffusivity `d_local` and concentration `c_face`.
    ///
    /// `species_charge` is the signed charge number `z` of the diffusing
    /// species.
    pub fn drift_flux(&self, species_charge: f64, d_local: f64, c_face: f64, axis: usize) -> f64 {
        let mobility = species_charge * FARADAY / (GAS_CONSTANT * self.temperature);
        -mobility * d_local * c_face * self.de_dl[axis]
    }

    /// Full drift flux vector for one voxel-local state.
    pub fn drift_vector(&self, species_charge: f64, d_local: f64, c: f64) -> [f64; 3] {
        [
            self.drift_flux(species_charge, d_local, c, 0),
            self.drift_flux(species_charge, d_local, c, 1),
            self.drift_flux(species_charge, d_local, c, 2),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nonpositive_temperature() {
        assert!(Migration::new(0.0, [0.0; 3]).is_err());
        assert!(Migration::new(-300.0, [0.0; 3]).is_err());
        assert!(Migration::new(f64::NAN, [0.0; 3]).is_err());
        assert!(Migration::new(298.15, [0.0; 3]).is_ok());
    }

    #[test]
    fn rejects_nonfinite_gradient() {
        assert!(Migration::new(298.15, [0.0, f64::INFINITY, 0.0]).is_err());
        assert!(Migration::new(298.15, [0.0, 0.0, f64::NAN]).is_err());
    }

    #[test]
    fn drift_opposes_gradient_for_cations() {
        // Positive species, positive gradient: drift is down-gradient.
        let mig = Migration::new(298.15, [10.0, 0.0, 0.0]).unwrap();
        let j = mig.drift_flux(1.0, 1e-14, 500.0, 0);
        assert!(j < 0.0);
        // Anions drift the other way.
        let j_anion = mig.drift_flux(-1.0, 1e-14, 500.0, 0);
        assert!(j_anion > 0.0);
        assert!((j + j_anion).abs() < 1e-25);
    }

    #[test]
    fn drift_magnitude_matches_nernst_planck() {
        let t = 300.0;
        let mig = Migration::new(t, [1.0, 0.0, 0.0]).unwrap();
        let d = 1e-14;
        let c = 100.0;
        let expected = -(1.0 * FARADAY / (GAS_CONSTANT * t)) * d * c;
        let j = mig.drift_flux(1.0, d, c, 0);
        assert!((j - expected).abs() < expected.abs() * 1e-12);
    }

    #[test]
    fn drift_vector_is_componentwise() {
        let mig = Migration::new(298.15, [1.0, -2.0, 0.0]).unwrap();
        let v = mig.drift_vector(1.0, 1e-14, 100.0);
        assert!(v[0] < 0.0);
        assert!(v[1] > 0.0);
        assert_eq!(v[2], 0.0);
        assert!((v[1] + 2.0 * v[0]).abs() < 1e-25);
    }

    #[test]
    fn zero_gradient_means_zero_drift() {
        let mig = Migration::new(298.15, [0.0; 3]).unwrap();
        assert_eq!(mig.drift_vector(1.0, 1e-14, 500.0), [0.0; 3]);
    }
}
