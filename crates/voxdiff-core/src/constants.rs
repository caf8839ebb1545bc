//! Physical constants used by the transport models.
//!
//! All values are CODATA 2018 in SI units. Mathematical constants (π, e)
//! come from [`std::f64::consts`] and are not redefined here.

/// Universal gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314_462_618;

/// Faraday constant, C/mol — charge carried by one mole of electrons.
pub const FARADAY: f64 = 96_485.332_12;

/// Boltzmann constant, J/K.
pub const BOLTZMANN: f64 = 1.380_649e-23;
