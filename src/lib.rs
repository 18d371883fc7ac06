//! 3D Blue Noise Library
//!
//! A Rust implementation of Robert Ulichney's void-and-cluster algorithm,
//! extended from 2D dither arrays to N×N×N volumes.
//!
//! # Features
//!
//! - Generate 3D dither arrays whose every threshold is a blue noise pattern
//! - Incremental energy updates: each voxel toggle touches only the kernel
//!   footprint, and the largest void / tightest cluster come from ordered sets
//! - Seamless tiling with toroidal topology on all three axes
//! - Reproducible results with seeded random number generation
//! - Export to one grayscale PNG per layer, and a terminal layer viewer
//!
//! # Quick Start
//!
//! ```no_run
//! use blue_noise_3d::{save_layers, BlueNoiseConfig, BlueNoiseGenerator};
//!
//! let config = BlueNoiseConfig {
//!     size: 32,
//!     sigma: 1.4,
//!     kernel_size: 17,
//!     seed: Some(0),
//!     ..Default::default()
//! };
//!
//! let generator = BlueNoiseGenerator::new(config).unwrap();
//! let volume = generator.generate().unwrap();
//! save_layers(&volume, "32x32x32", "layer_").unwrap();
//! ```
//!
//! # Algorithm
//!
//! Generation runs in four phases:
//!
//! 1. **Initial sampling**: turn on a few random voxels
//! 2. **Initial balancing**: move tightest clusters into largest voids until stable
//! 3. **Initial ranking**: rank the initial points, tightest clusters last
//! 4. **Dense ranking**: rank every other voxel by filling the largest void
//!
//! The volume holds for every voxel a rank in `{0, 1/n, ..., (n-1)/n}`.
//!
//! # Performance
//!
//! A toggle costs O(m log n) for a kernel of m cells, so a full run is
//! O(n m log n). A 32³ volume with a 17³ kernel takes a few minutes in
//! release mode; generate volumes ahead of time.
//!
//! # References
//!
//! - Ulichney, R. (1993). "Void-and-cluster method for dither array generation"

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Void-cluster engine: energy field, toggles and extremum search
pub mod engine;
/// Error types
pub mod error;
/// Layer export and import
pub mod export;
/// Toroidal scalar field and lattice dimensions
pub mod field;
/// Phase controller and generation configuration
pub mod generator;
/// Gaussian kernel
pub mod kernel;
/// Progress reporting
pub mod progress;
/// Ordered void and cluster sets
pub mod tracker;
/// Integer lattice coordinates
pub mod vec3;
/// Terminal layer viewer
pub mod viewer;

// Re-export main types for convenience
pub use engine::VoidClusterEngine;
pub use error::{GeneratorError, TrackedSet};
pub use export::{save_layers, ExportError, LayerStack, DEFAULT_LAYER_PREFIX};
pub use field::{Dims, ScalarField};
pub use generator::{
    generate_dither_volume, BalanceOutcome, BlueNoiseConfig, BlueNoiseGenerator, DitherVolume,
    Phase,
};
pub use kernel::Kernel;
pub use tracker::RankTracker;
pub use vec3::Vec3;
pub use viewer::view_layers;
