//! Core types for the voxdiff workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! physical constants, typed identifiers, error enums, and snapshot data
//! types shared by the grid, model, and solver crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constants;
pub mod error;
pub mod id;
pub mod snapshot;

pub use error::{FluxError, ModelError, StepError};
pub use id::{PhaseLabel, StepId};
pub use snapshot::{FieldSnapshot, SnapshotPolicy};
