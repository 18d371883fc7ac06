/**
 * Rank Tracker
 *
 * Keeps the off voxels and the on voxels in two ordered sets keyed by
 * (energy, flat index), so the largest void (minimum off-voxel energy) and the
 * largest cluster (maximum on-voxel energy) are available in O(log n) while
 * arbitrary entries can still be removed when a neighbour's energy changes.
 * A binary heap would not do: kernel splats change energies of voxels that
 * are nowhere near the extremum.
 *
 * The tracker does not own the energies. Callers pass the energy a voxel is
 * currently keyed under whenever an entry has to be found again.
 */

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::{GeneratorError, Result, TrackedSet};

/// Ordering key of one tracked voxel
///
/// Ties in energy are broken by flat index, so the search is fully
/// deterministic for a fixed seed.
#[derive(Debug, Clone, Copy)]
struct EnergyKey {
    energy: f32,
    index: usize,
}

impl PartialEq for EnergyKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EnergyKey {}

impl PartialOrd for EnergyKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnergyKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.energy
            .total_cmp(&other.energy)
            .then(self.index.cmp(&other.index))
    }
}

/// Ordered void and cluster sets over the voxels of one lattice
#[derive(Debug, Clone)]
pub struct RankTracker {
    voids: BTreeSet<EnergyKey>,
    clusters: BTreeSet<EnergyKey>,
    membership: Vec<Option<TrackedSet>>,
    cluster_tracking: bool,
}

impl RankTracker {
    /// Track every voxel as a void, keyed by its energy
    pub fn all_void(energies: &[f32]) -> Self {
        let voids = energies
            .iter()
            .enumerate()
            .map(|(index, &energy)| EnergyKey { energy, index })
            .collect();

        Self {
            voids,
            clusters: BTreeSet::new(),
            membership: vec![Some(TrackedSet::Void); energies.len()],
            cluster_tracking: true,
        }
    }

    /// Set currently holding a voxel, `None` once evicted
    pub fn membership(&self, index: usize) -> Option<TrackedSet> {
        self.membership[index]
    }

    /// Number of voxels in the void set
    pub fn void_len(&self) -> usize {
        self.voids.len()
    }

    /// Number of voxels in the cluster set
    pub fn cluster_len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether on voxels are still being tracked
    pub fn cluster_tracking_enabled(&self) -> bool {
        self.cluster_tracking
    }

    fn set_mut(&mut self, set: TrackedSet) -> &mut BTreeSet<EnergyKey> {
        match set {
            TrackedSet::Void => &mut self.voids,
            TrackedSet::Cluster => &mut self.clusters,
        }
    }

    fn detach(&mut self, index: usize, energy: f32) {
        if let Some(set) = self.membership[index].take() {
            let removed = self.set_mut(set).remove(&EnergyKey { energy, index });
            debug_assert!(removed, "voxel {index} not keyed under {energy}");
        }
    }

    fn attach(&mut self, index: usize, energy: f32, set: TrackedSet) {
        self.set_mut(set).insert(EnergyKey { energy, index });
        self.membership[index] = Some(set);
    }

    /// Move a voxel into the void set
    pub fn track_as_void(&mut self, index: usize, energy: f32) {
        self.detach(index, energy);
        self.attach(index, energy, TrackedSet::Void);
    }

    /// Move a voxel into the cluster set
    ///
    /// With cluster tracking disabled the voxel only leaves the void set.
    pub fn track_as_cluster(&mut self, index: usize, energy: f32) {
        self.detach(index, energy);
        if self.cluster_tracking {
            self.attach(index, energy, TrackedSet::Cluster);
        }
    }

    /// Re-key a voxel after its energy changed from `old` to `new`
    ///
    /// Untracked voxels are left alone.
    pub fn update_key(&mut self, index: usize, old: f32, new: f32) {
        if let Some(set) = self.membership[index] {
            let entries = self.set_mut(set);
            let removed = entries.remove(&EnergyKey { energy: old, index });
            debug_assert!(removed, "voxel {index} not keyed under {old}");
            entries.insert(EnergyKey { energy: new, index });
        }
    }

    /// Stop tracking a voxel for good
    pub fn evict(&mut self, index: usize, energy: f32) {
        self.detach(index, energy);
    }

    /// Drop the cluster set and stop maintaining it
    pub fn disable_cluster_tracking(&mut self) {
        self.cluster_tracking = false;
        for key in std::mem::take(&mut self.clusters) {
            self.membership[key.index] = None;
        }
    }

    /// Flat index of the off voxel with the lowest energy
    pub fn largest_void(&self) -> Result<usize> {
        self.voids
            .first()
            .map(|key| key.index)
            .ok_or(GeneratorError::EmptySet(TrackedSet::Void))
    }

    /// Flat index of the on voxel with the highest energy
    pub fn largest_cluster(&self) -> Result<usize> {
        self.clusters
            .last()
            .map(|key| key.index)
            .ok_or(GeneratorError::EmptySet(TrackedSet::Cluster))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_void_picks_minimum() {
        let tracker = RankTracker::all_void(&[0.5, 0.1, 0.3, 0.9]);
        assert_eq!(tracker.void_len(), 4);
        assert_eq!(tracker.cluster_len(), 0);
        assert_eq!(tracker.largest_void(), Ok(1));
        assert_eq!(
            tracker.largest_cluster(),
            Err(GeneratorError::EmptySet(TrackedSet::Cluster))
        );
    }

    #[test]
    fn test_ties_break_by_index() {
        let tracker = RankTracker::all_void(&[0.0; 8]);
        assert_eq!(tracker.largest_void(), Ok(0));

        let mut tracker = RankTracker::all_void(&[1.0, 1.0, 1.0]);
        tracker.track_as_cluster(0, 1.0);
        tracker.track_as_cluster(2, 1.0);
        assert_eq!(tracker.largest_cluster(), Ok(2));
        assert_eq!(tracker.largest_void(), Ok(1));
    }

    #[test]
    fn test_move_between_sets() {
        let mut tracker = RankTracker::all_void(&[0.2, 0.4, 0.6]);
        tracker.track_as_cluster(1, 0.4);
        assert_eq!(tracker.membership(1), Some(TrackedSet::Cluster));
        assert_eq!(tracker.void_len(), 2);
        assert_eq!(tracker.cluster_len(), 1);
        assert_eq!(tracker.largest_cluster(), Ok(1));

        tracker.track_as_void(1, 0.4);
        assert_eq!(tracker.membership(1), Some(TrackedSet::Void));
        assert_eq!(tracker.void_len(), 3);
        assert_eq!(tracker.cluster_len(), 0);
    }

    #[test]
    fn test_update_key_reorders() {
        let mut tracker = RankTracker::all_void(&[0.2, 0.4, 0.6]);
        assert_eq!(tracker.largest_void(), Ok(0));
        tracker.update_key(0, 0.2, 0.7);
        assert_eq!(tracker.largest_void(), Ok(1));
        assert_eq!(tracker.void_len(), 3);

        tracker.track_as_cluster(2, 0.6);
        tracker.track_as_cluster(1, 0.4);
        assert_eq!(tracker.largest_cluster(), Ok(2));
        tracker.update_key(1, 0.4, 0.65);
        assert_eq!(tracker.largest_cluster(), Ok(1));
    }

    #[test]
    fn test_evicted_voxels_ignore_updates() {
        let mut tracker = RankTracker::all_void(&[0.2, 0.4]);
        tracker.evict(0, 0.2);
        assert_eq!(tracker.membership(0), None);
        tracker.update_key(0, 0.2, -5.0);
        assert_eq!(tracker.largest_void(), Ok(1));
        assert_eq!(tracker.void_len(), 1);

        tracker.evict(1, 0.4);
        assert_eq!(
            tracker.largest_void(),
            Err(GeneratorError::EmptySet(TrackedSet::Void))
        );
    }

    #[test]
    fn test_disable_cluster_tracking() {
        let mut tracker = RankTracker::all_void(&[0.1, 0.2, 0.3, 0.4]);
        tracker.track_as_cluster(0, 0.1);
        tracker.track_as_cluster(1, 0.2);
        tracker.disable_cluster_tracking();

        assert!(!tracker.cluster_tracking_enabled());
        assert_eq!(tracker.cluster_len(), 0);
        assert_eq!(tracker.membership(0), None);
        assert!(tracker.largest_cluster().is_err());

        tracker.track_as_cluster(2, 0.3);
        assert_eq!(tracker.membership(2), None);
        assert_eq!(tracker.cluster_len(), 0);
        assert_eq!(tracker.largest_void(), Ok(3));
    }
}
