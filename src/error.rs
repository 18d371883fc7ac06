//! Error types for dither volume generation

use std::fmt;

use thiserror::Error;

use crate::vec3::Vec3;

/// One of the two ordered sets kept by the rank tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedSet {
    /// Off voxels, searched for the largest void
    Void,
    /// On voxels, searched for the largest cluster
    Cluster,
}

impl fmt::Display for TrackedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackedSet::Void => f.write_str("void"),
            TrackedSet::Cluster => f.write_str("cluster"),
        }
    }
}

/// Error types for blue noise volume generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// A lattice dimension is zero or too large to address
    #[error("Lattice dimensions must be positive")]
    InvalidDimensions,

    /// Sigma parameter is zero, negative or not finite
    #[error("Sigma must be positive, got {0}")]
    InvalidSigma(f32),

    /// Kernel size is even or zero
    #[error("Kernel size must be odd and at least 1, got {0}")]
    InvalidKernelSize(usize),

    /// Initial density is out of the range (0, 1)
    #[error("Initial density must be between 0 and 1, got {0}")]
    InvalidDensity(f64),

    /// Initial sample count is zero or does not leave any voxel free
    #[error("Initial count must be in [1, {volume}), got {count}")]
    InvalidInitialCount {
        /// Requested count
        count: usize,
        /// Lattice volume
        volume: usize,
    },

    /// A voxel that is already on was turned on again
    #[error("Voxel {0} is already set")]
    AlreadySet(Vec3),

    /// An extremum was requested from an empty tracking set
    #[error("The {0} set is empty")]
    EmptySet(TrackedSet),

    /// A generation phase was run out of order
    #[error("Phase {requested:?} cannot run while in phase {current:?}")]
    PhaseOrder {
        /// Phase that was requested
        requested: crate::generator::Phase,
        /// Phase the generator is in
        current: crate::generator::Phase,
    },
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
