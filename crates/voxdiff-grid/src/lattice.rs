//! Dense 3-D voxel lattice with 6-connected neighbour arithmetic.

use crate::error::GridError;
use smallvec::SmallVec;

/// One of the six faces of the lattice bounding box.
///
/// Exactly one side is designated to carry the applied boundary flux;
/// every other exterior face is insulated (no-flux).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundarySide {
    /// The `x = 0` face.
    XMin,
    /// The `x = nx - 1` face.
    XMax,
    /// The `y = 0` face.
    YMin,
    /// The `y = ny - 1` face.
    YMax,
    /// The `z = 0` face.
    ZMin,
    /// The `z = nz - 1` face.
    ZMax,
}

impl BoundarySide {
    /// All six sides, in axis order.
    pub const ALL: [BoundarySide; 6] = [
        Self::XMin,
        Self::XMax,
        Self::YMin,
        Self::YMax,
        Self::ZMin,
        Self::ZMax,
    ];

    /// The axis this side lies on: 0 = x, 1 = y, 2 = z.
    pub fn axis(self) -> usize {
        match self {
            Self::XMin | Self::XMax => 0,
            Self::YMin | Self::YMax => 1,
            Self::ZMin | Self::ZMax => 2,
        }
    }

    /// Outward direction along [`axis`](Self::axis): -1 on the min side,
    /// +1 on the max side.
    pub fn direction(self) -> i64 {
        match self {
            Self::XMin | Self::YMin | Self::ZMin => -1,
            Self::XMax | Self::YMax | Self::ZMax => 1,
        }
    }
}

/// A dense axis-aligned voxel grid.
///
/// Voxels are addressed by linear index with x fastest:
/// `index = x + nx * (y + ny * z)`. Neighbours are the six face-adjacent
/// voxels; faces on the lattice boundary simply have no neighbour
/// (transport across them is governed by the boundary condition, not the
/// topology).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lattice {
    nx: u32,
    ny: u32,
    nz: u32,
}

impl Lattice {
    /// Create a lattice with the given extents.
    ///
    /// Returns [`GridError::EmptyLattice`] if any extent is zero, or
    /// [`GridError::CellCountOverflow`] if the voxel count does not fit
    /// in `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxdiff_grid::Lattice;
    ///
    /// let lat = Lattice::new(8, 8, 4).unwrap();
    /// assert_eq!(lat.cell_count(), 256);
    /// assert_eq!(lat.active_axes(), 3);
    ///
    /// // A 2-D phase map is a lattice with a single z-slice.
    /// let plane = Lattice::new(64, 64, 1).unwrap();
    /// assert_eq!(plane.active_axes(), 2);
    /// ```
    pub fn new(nx: u32, ny: u32, nz: u32) -> Result<Self, GridError> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(GridError::EmptyLattice);
        }
        (nx as usize)
            .checked_mul(ny as usize)
            .and_then(|v| v.checked_mul(nz as usize))
            .ok_or(GridError::CellCountOverflow { nx, ny, nz })?;
        Ok(Self { nx, ny, nz })
    }

    /// X extent in voxels.
    pub fn nx(&self) -> u32 {
        self.nx
    }

    /// Y extent in voxels.
    pub fn ny(&self) -> u32 {
        self.ny
    }

    /// Z extent in voxels.
    pub fn nz(&self) -> u32 {
        self.nz
    }

    /// Total number of voxels.
    pub fn cell_count(&self) -> usize {
        self.nx as usize * self.ny as usize * self.nz as usize
    }

    /// Number of axes with extent greater than one.
    ///
    /// The explicit-scheme stability limit scales with this: 1/2 for a
    /// column, 1/4 for a plane, 1/6 for a full volume.
    pub fn active_axes(&self) -> usize {
        [self.nx, self.ny, self.nz]
            .iter()
            .filter(|&&n| n > 1)
            .count()
    }

    /// Linear index of voxel `(x, y, z)`.
    ///
    /// Debug-asserts bounds; callers iterate lattice coordinates and never
    /// construct out-of-range triples.
    pub fn index(&self, x: u32, y: u32, z: u32) -> usize {
        debug_assert!(x < self.nx && y < self.ny && z < self.nz);
        x as usize + self.nx as usize * (y as usize + self.ny as usize * z as usize)
    }

    /// Coordinates `(x, y, z)` of a linear index.
    pub fn coords(&self, idx: usize) -> (u32, u32, u32) {
        debug_assert!(idx < self.cell_count());
        let nx = self.nx as usize;
        let ny = self.ny as usize;
        let x = idx % nx;
        let y = (idx / nx) % ny;
        let z = idx / (nx * ny);
        (x as u32, y as u32, z as u32)
    }

    /// Linear indices of the face-adjacent neighbours of `idx`.
    ///
    /// Interior voxels have six; voxels on the bounding box have fewer.
    pub fn neighbours(&self, idx: usize) -> SmallVec<[usize; 6]> {
        let (x, y, z) = self.coords(idx);
        let mut result = SmallVec::new();
        if x > 0 {
            result.push(idx - 1);
        }
        if x + 1 < self.nx {
            result.push(idx + 1);
        }
        let nx = self.nx as usize;
        if y > 0 {
            result.push(idx - nx);
        }
        if y + 1 < self.ny {
            result.push(idx + nx);
        }
        let slab = nx * self.ny as usize;
        if z > 0 {
            result.push(idx - slab);
        }
        if z + 1 < self.nz {
            result.push(idx + slab);
        }
        result
    }

    /// Whether voxel `idx` has a face on the given side of the bounding box.
    pub fn on_side(&self, idx: usize, side: BoundarySide) -> bool {
        let (x, y, z) = self.coords(idx);
        match side {
            BoundarySide::XMin => x == 0,
            BoundarySide::XMax => x + 1 == self.nx,
            BoundarySide::YMin => y == 0,
            BoundarySide::YMax => y + 1 == self.ny,
            BoundarySide::ZMin => z == 0,
            BoundarySide::ZMax => z + 1 == self.nz,
        }
    }
}
