/**
 * Void-Cluster Engine
 *
 * Owns the content field, the energy field, the on/off state of every voxel
 * and the rank tracker, and keeps all four consistent across voxel toggles.
 *
 * Turning a voxel on adds the kernel to the energy of every voxel in its
 * toroidal footprint; turning it off subtracts the same weights. Each touched
 * energy is re-keyed in the tracker, so one toggle costs O(m log n) for a
 * kernel of m cells and a lattice of n voxels. There is no full-field blur
 * anywhere in the ranking loop.
 *
 * Content alone cannot tell whether a voxel is on: the voxel ranked first gets
 * the value 0.0. The on state is kept in a separate bit set.
 */

use bitvec::vec::BitVec;
use rand::Rng;

use crate::error::{GeneratorError, Result, TrackedSet};
use crate::field::{Dims, ScalarField};
use crate::kernel::Kernel;
use crate::tracker::RankTracker;
use crate::vec3::Vec3;

/// Upper bound of the random energy each voxel starts with
pub const ENERGY_JITTER: f32 = 1e-7;

/// Energy field, content field and tracking sets of one lattice
#[derive(Debug, Clone)]
pub struct VoidClusterEngine {
    dims: Dims,
    kernel: Kernel,
    content: ScalarField,
    energy: ScalarField,
    on: BitVec,
    tracker: RankTracker,
}

impl VoidClusterEngine {
    /// Create an engine with every voxel off and tracked as a void
    ///
    /// Energies start at uniform noise in `[0, ENERGY_JITTER)` drawn from
    /// `rng`, which breaks ties between untouched voxels.
    pub fn new<R: Rng>(dims: Dims, kernel: Kernel, rng: &mut R) -> Self {
        let energy = ScalarField::from_fn(dims, |_| rng.gen_range(0.0..ENERGY_JITTER));
        Self::with_energy(kernel, energy)
    }

    /// Create an engine from an explicit starting energy field
    pub fn with_energy(kernel: Kernel, energy: ScalarField) -> Self {
        let dims = energy.dims();
        let tracker = RankTracker::all_void(energy.as_slice());

        Self {
            dims,
            kernel,
            content: ScalarField::new(dims),
            energy,
            on: BitVec::repeat(false, dims.volume()),
            tracker,
        }
    }

    /// Lattice dimensions
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Kernel used for energy updates
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Content values (0 for off voxels, sentinel or rank for on voxels)
    pub fn content(&self) -> &ScalarField {
        &self.content
    }

    /// Accumulated proximity energy
    pub fn energy(&self) -> &ScalarField {
        &self.energy
    }

    /// Tracking sets
    pub fn tracker(&self) -> &RankTracker {
        &self.tracker
    }

    /// Whether the voxel at `coord` is on
    pub fn is_on(&self, coord: Vec3) -> bool {
        self.on[self.dims.index_of(coord)]
    }

    /// Number of voxels currently on
    pub fn on_count(&self) -> usize {
        self.on.count_ones()
    }

    /// Give up the engine and keep the content field
    pub fn into_content(self) -> ScalarField {
        self.content
    }

    /// Turn a voxel on with the given content value
    ///
    /// Fails with [`GeneratorError::AlreadySet`] if the voxel is already on.
    pub fn set_on(&mut self, coord: Vec3, value: f32) -> Result<()> {
        let idx = self.dims.index_of(coord);
        if self.on[idx] {
            return Err(GeneratorError::AlreadySet(coord.wrap(self.dims)));
        }

        self.on.set(idx, true);
        *self.content.at_mut(idx) = value;
        self.tracker.track_as_cluster(idx, self.energy.at(idx));
        self.splat(coord, 1.0);
        Ok(())
    }

    /// Turn a voxel off, clearing its content
    ///
    /// Turning off a voxel that is already off only re-tracks it as a void.
    pub fn set_off(&mut self, coord: Vec3) {
        let idx = self.dims.index_of(coord);
        let was_on = self.on.replace(idx, false);

        *self.content.at_mut(idx) = 0.0;
        self.tracker.track_as_void(idx, self.energy.at(idx));
        if was_on {
            self.splat(coord, -1.0);
        }
    }

    /// Off voxel with the lowest energy
    pub fn largest_void(&self) -> Result<Vec3> {
        self.tracker.largest_void().map(|i| self.dims.coord_of(i))
    }

    /// On voxel with the highest energy
    pub fn largest_cluster(&self) -> Result<Vec3> {
        self.tracker.largest_cluster().map(|i| self.dims.coord_of(i))
    }

    /// Remove a voxel from the search for good
    pub fn evict(&mut self, coord: Vec3) {
        let idx = self.dims.index_of(coord);
        self.tracker.evict(idx, self.energy.at(idx));
    }

    /// Stop maintaining the cluster set
    pub fn disable_cluster_tracking(&mut self) {
        self.tracker.disable_cluster_tracking();
    }

    /// Check that every tracked voxel sits in the set matching its on state
    ///
    /// Returns the first offending coordinate.
    pub fn find_misclassified(&self) -> Option<Vec3> {
        (0..self.dims.volume())
            .find(|&i| {
                let expected = if self.on[i] {
                    TrackedSet::Cluster
                } else {
                    TrackedSet::Void
                };
                matches!(self.tracker.membership(i), Some(set) if set != expected)
            })
            .map(|i| self.dims.coord_of(i))
    }

    /// Add `sign` times the kernel centred at `center` to the energy field
    fn splat(&mut self, center: Vec3, sign: f32) {
        let center = center.wrap(self.dims);
        for &(offset, weight) in self.kernel.taps() {
            let idx = self.dims.index_of(center + offset);
            let cell = self.energy.at_mut(idx);
            let old = *cell;
            *cell += sign * weight;
            self.tracker.update_key(idx, old, *cell);
        }
    }
}
