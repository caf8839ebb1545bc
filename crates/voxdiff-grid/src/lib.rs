//! Spatial data structures for the voxdiff solver.
//!
//! This crate defines the [`Lattice`] — a dense 3-D voxel grid with
//! 6-connected neighbour arithmetic over linear indices — together with
//! the [`VoxelSet`] bitset and the [`PhaseGrid`] that derives the
//! active-voxel mask from segmented phase labels.
//!
//! Thin inputs are handled by degenerate extents: a 2-D phase map is a
//! lattice with `nz = 1`, a 1-D column has `ny = nz = 1`. Neighbour
//! lookups are pure index arithmetic; there are no per-voxel pointer
//! graphs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod lattice;
pub mod phase;
pub mod voxel_set;

pub use error::GridError;
pub use lattice::{BoundarySide, Lattice};
pub use phase::{PhaseGrid, PhaseMask};
pub use voxel_set::VoxelSet;
