//! Local physics models queried by the voxdiff time-stepper.
//!
//! Three providers, all pure functions of their inputs once constructed:
//!
//! 1. [`DiffusivityModel`] — maps local concentration (and, for the
//!    anomalous variant, elapsed time) to an effective local diffusion
//!    coefficient.
//! 2. [`Migration`] — Nernst–Planck drift flux from a potential-gradient
//!    field and temperature.
//! 3. [`BoundaryFlux`] — the applied flux at the designated domain
//!    boundary, from a constant current density or a GITT profile.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod diffusivity;
pub mod flux;
pub mod migration;

pub use diffusivity::DiffusivityModel;
pub use flux::{BoundaryFlux, ChargeMode, GittSeries};
pub use migration::Migration;
