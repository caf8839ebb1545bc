//! Phase-labeled grids and the derived active-voxel mask.

use crate::error::GridError;
use crate::lattice::{BoundarySide, Lattice};
use crate::voxel_set::VoxelSet;
use indexmap::IndexMap;
use smallvec::SmallVec;
use voxdiff_core::PhaseLabel;

/// A voxel lattice with one phase label per voxel.
///
/// Consumes the output of external segmentation: a dense label array in
/// the lattice's linear ordering (x fastest). The grid is read-only after
/// construction; masks for any phase of interest are derived views.
#[derive(Clone, Debug)]
pub struct PhaseGrid {
    lattice: Lattice,
    labels: Vec<PhaseLabel>,
    inventory: IndexMap<PhaseLabel, usize>,
}

impl PhaseGrid {
    /// Build a phase grid from a lattice and its label array.
    ///
    /// Returns [`GridError::LabelLengthMismatch`] if the label array length
    /// differs from the lattice voxel count.
    pub fn new(lattice: Lattice, labels: Vec<i32>) -> Result<Self, GridError> {
        if labels.len() != lattice.cell_count() {
            return Err(GridError::LabelLengthMismatch {
                expected: lattice.cell_count(),
                got: labels.len(),
            });
        }
        let labels: Vec<PhaseLabel> = labels.into_iter().map(PhaseLabel).collect();
        let mut inventory: IndexMap<PhaseLabel, usize> = IndexMap::new();
        for &label in &labels {
            *inventory.entry(label).or_insert(0) += 1;
        }
        Ok(Self {
            lattice,
            labels,
            inventory,
        })
    }

    /// The underlying lattice.
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    /// The label of voxel `idx`.
    pub fn label(&self, idx: usize) -> PhaseLabel {
        self.labels[idx]
    }

    /// Voxel counts per label, in first-seen order.
    ///
    /// Useful for sanity-checking a segmentation before committing to a
    /// long sweep (e.g. spotting a phase that segmented to a sliver).
    pub fn inventory(&self) -> &IndexMap<PhaseLabel, usize> {
        &self.inventory
    }

    /// Derive the active mask for one phase of interest.
    ///
    /// Returns [`GridError::PhaseAbsent`] if no voxel carries the label.
    pub fn mask(&self, poi: PhaseLabel) -> Result<PhaseMask, GridError> {
        let active: Vec<usize> = self
            .labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == poi)
            .map(|(i, _)| i)
            .collect();
        if active.is_empty() {
            return Err(GridError::PhaseAbsent { label: poi });
        }
        let set: VoxelSet = active.iter().copied().collect();
        Ok(PhaseMask {
            lattice: self.lattice,
            set,
            active,
        })
    }
}

/// The active-voxel view of a [`PhaseGrid`] for one phase of interest.
///
/// Computed once per sweep and shared read-only by every candidate's
/// stepper. `active()` is the canonical active ordering used by field
/// snapshots: ascending linear index, x fastest.
#[derive(Clone, Debug)]
pub struct PhaseMask {
    lattice: Lattice,
    set: VoxelSet,
    active: Vec<usize>,
}

impl PhaseMask {
    /// The lattice this mask is defined over.
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    /// Whether voxel `idx` belongs to the phase of interest.
    pub fn is_active(&self, idx: usize) -> bool {
        self.set.contains(idx)
    }

    /// Active voxel indices in canonical order.
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Number of active voxels. Always at least one.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Always `false` — construction rejects phases with no voxels.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The underlying bitset.
    pub fn as_set(&self) -> &VoxelSet {
        &self.set
    }

    /// Face-adjacent neighbours of `idx` that are also active.
    ///
    /// Faces toward inactive voxels or the lattice exterior are absent:
    /// they carry no diffusive flux.
    pub fn active_neighbours(&self, idx: usize) -> SmallVec<[usize; 6]> {
        self.lattice
            .neighbours(idx)
            .into_iter()
            .filter(|&nb| self.set.contains(nb))
            .collect()
    }

    /// Active voxels with an exposed face on the given lattice side.
    ///
    /// These are the faces that receive the applied boundary flux when
    /// `side` is the designated boundary.
    pub fn boundary_faces(&self, side: BoundarySide) -> Vec<usize> {
        self.active
            .iter()
            .copied()
            .filter(|&idx| self.lattice.on_side(idx, side))
            .collect()
    }
}
