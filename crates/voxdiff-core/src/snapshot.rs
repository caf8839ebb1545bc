//! Snapshot data handed to the external map emitter.
//!
//! The solver does not define any file format. It produces plain
//! [`FieldSnapshot`] values; the emitter pairs them with the grid's
//! active-voxel coordinates and rasterizes concentration maps and flux
//! maps however it chooses.

/// When the time-stepper captures snapshots during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotPolicy {
    /// No snapshots at all (the trajectory carries only run statistics).
    Never,
    /// One snapshot every `n` steps, plus the final state. `n` must be
    /// nonzero; configuration resolution rejects zero.
    Every(u32),
    /// Only the final state.
    Final,
}

impl SnapshotPolicy {
    /// Whether a snapshot is due after the given 1-based step count.
    pub fn captures(&self, step: u64) -> bool {
        match self {
            Self::Never | Self::Final => false,
            Self::Every(n) => step % u64::from(*n) == 0,
        }
    }

    /// Whether the final state is captured when the run completes.
    pub fn captures_final(&self) -> bool {
        !matches!(self, Self::Never)
    }
}

/// A concentration (and optionally flux) snapshot at one simulated time.
///
/// `concentrations` holds one value per **active** voxel, in the grid's
/// canonical active ordering (ascending linear index, x fastest). Inactive
/// voxels never appear. `flux` holds voxel-centered flux vectors in the
/// same ordering when the snapshot policy requested flux maps.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSnapshot {
    /// Simulated time of this snapshot, seconds.
    pub time: f64,
    /// The candidate diffusion coefficient this run is using, m²/s.
    pub candidate: f64,
    /// Per-active-voxel concentration, mol/m³.
    pub concentrations: Vec<f64>,
    /// Per-active-voxel flux vector `[Jx, Jy, Jz]`, mol/(m²·s), if captured.
    pub flux: Option<Vec<[f64; 3]>>,
}
