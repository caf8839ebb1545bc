//! Error types for grid construction.

use std::fmt;
use voxdiff_core::PhaseLabel;

/// Errors arising from lattice or phase-grid construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Attempted to construct a lattice with a zero extent.
    EmptyLattice,
    /// The voxel count `nx * ny * nz` does not fit in `usize`.
    CellCountOverflow {
        /// X extent.
        nx: u32,
        /// Y extent.
        ny: u32,
        /// Z extent.
        nz: u32,
    },
    /// The label array length does not match the lattice voxel count.
    LabelLengthMismatch {
        /// Voxel count of the lattice.
        expected: usize,
        /// Length of the supplied label array.
        got: usize,
    },
    /// The requested phase of interest appears nowhere in the label map.
    PhaseAbsent {
        /// The missing label.
        label: PhaseLabel,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLattice => write!(f, "lattice must have at least one voxel per axis"),
            Self::CellCountOverflow { nx, ny, nz } => {
                write!(f, "voxel count {nx}x{ny}x{nz} overflows usize")
            }
            Self::LabelLengthMismatch { expected, got } => {
                write!(f, "label array has {got} entries, lattice has {expected} voxels")
            }
            Self::PhaseAbsent { label } => {
                write!(f, "phase label {label} not present in the phase map")
            }
        }
    }
}

impl std::error::Error for GridError {}
